//! # gRPC Endpoint
//!
//! Parses the `--endpoint` flag. Only `unix://` and `tcp://` schemes are accepted
//! (case-insensitive), matching what the CSI driver can dial.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Where the gRPC server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Unix domain socket path
    Unix(PathBuf),
    /// TCP address (`host:port`)
    Tcp(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid endpoint format: {0}")]
pub struct InvalidEndpoint(pub String);

impl Endpoint {
    pub fn parse(endpoint: &str) -> Result<Self, InvalidEndpoint> {
        let invalid = || InvalidEndpoint(endpoint.to_string());

        let (scheme, addr) = endpoint.split_once("://").ok_or_else(invalid)?;
        if addr.is_empty() {
            return Err(invalid());
        }

        match scheme.to_ascii_lowercase().as_str() {
            "unix" => Ok(Endpoint::Unix(PathBuf::from(addr))),
            "tcp" => Ok(Endpoint::Tcp(addr.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}
