//! # Command-Line Flags

use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_HEALTHZ_ADDR};
use clap::Parser;
use std::net::SocketAddr;

/// SakuraCloud Secret Manager provider for the Secrets Store CSI driver
#[derive(Debug, Parser)]
#[command(name = "secrets-store-csi-driver-provider-sakuracloud")]
#[command(
    about = "SakuraCloud Secret Manager provider for the Secrets Store CSI driver",
    long_about = None
)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// gRPC endpoint to serve the provider on (unix:///path or tcp://host:port)
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Address of the health and metrics HTTP server
    #[arg(long, default_value = DEFAULT_HEALTHZ_ADDR)]
    pub healthz_addr: SocketAddr,

    /// Print version and exit
    #[arg(long)]
    pub version: bool,
}
