//! # Mount Error Types
//!
//! Errors produced while handling a single Mount call, with their mapping onto gRPC
//! status codes. Every error is terminal for the call: the driver retries the whole
//! Mount later.

use std::fmt;
use thiserror::Error;
use tonic::{Code, Status};

/// Error returned by the mount pipeline
#[derive(Debug, Error)]
pub enum MountError {
    /// The driver did not send a target path
    #[error("targetPath is required")]
    MissingTargetPath,

    /// The permission string is not a decimal unsigned integer
    #[error("unable to parse permission: {value}")]
    InvalidPermission {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The permission fits in `u32` but not in the `int32` file mode of the protocol
    #[error("permission out of range: {value}")]
    PermissionOutOfRange {
        value: u32,
        #[source]
        source: std::num::TryFromIntError,
    },

    /// The attributes payload could not be decoded
    #[error("failed to parse mount config: {0}")]
    MalformedInput(#[from] MalformedInput),

    /// One or more secret entries are invalid
    #[error("failed to parse mount config: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    /// Secret Manager could not return the secret
    ///
    /// The cause chain is part of the message, which is all the driver sees.
    #[error("failed to unveil secret {name:?} in vault {vault_id:?}: {cause:#}")]
    UpstreamFailure {
        name: String,
        vault_id: String,
        cause: anyhow::Error,
    },
}

impl MountError {
    /// gRPC status code reported to the driver
    pub fn code(&self) -> Code {
        match self {
            MountError::UpstreamFailure { .. } => Code::Internal,
            MountError::MissingTargetPath
            | MountError::InvalidPermission { .. }
            | MountError::PermissionOutOfRange { .. }
            | MountError::MalformedInput(_)
            | MountError::ValidationFailed(_) => Code::InvalidArgument,
        }
    }

    /// Short reason string for metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            MountError::MissingTargetPath => "missing_target_path",
            MountError::InvalidPermission { .. } | MountError::PermissionOutOfRange { .. } => {
                "invalid_permission"
            }
            MountError::MalformedInput(_) => "malformed_input",
            MountError::ValidationFailed(_) => "validation_failed",
            MountError::UpstreamFailure { .. } => "upstream_failure",
        }
    }
}

impl From<MountError> for Status {
    fn from(err: MountError) -> Self {
        Status::new(err.code(), err.to_string())
    }
}

/// Decoding failure of the attributes payload
///
/// The two stages are kept apart so the message says which document was broken.
#[derive(Debug, Error)]
pub enum MalformedInput {
    /// The outer JSON attributes object
    #[error("failed to unmarshal mount attributes: {0}")]
    Attributes(#[source] serde_json::Error),
    /// The YAML document carried in the `secrets` attribute
    #[error("failed to unmarshal secrets: {0}")]
    Secrets(#[source] serde_yaml::Error),
}

/// Reason a secret `path` was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPath {
    Absolute,
    ParentEscape,
}

impl fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPath::Absolute => f.write_str("path must not be absolute"),
            InvalidPath::ParentEscape => {
                f.write_str("path must not contain relative path escape sequences like '../'")
            }
        }
    }
}

/// A single problem found in the secrets list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A required field was blank
    MissingField { index: usize, field: &'static str },
    /// The path override is not a safe relative path
    InvalidPath { index: usize, reason: InvalidPath },
    /// No path override, and the name is not a safe relative path to fall back to
    InvalidName { index: usize, reason: InvalidPath },
}

impl Violation {
    /// Position of the offending entry in the secrets list
    pub fn index(&self) -> usize {
        match self {
            Violation::MissingField { index, .. }
            | Violation::InvalidPath { index, .. }
            | Violation::InvalidName { index, .. } => *index,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingField { index, field } => {
                write!(f, "secrets[{index}].{field} is required")
            }
            Violation::InvalidPath { index, reason } => {
                write!(f, "secrets[{index}].path is invalid: {reason}")
            }
            Violation::InvalidName { index, reason } => {
                write!(f, "secrets[{index}].name is invalid: {reason}")
            }
        }
    }
}

/// Every violation found while validating one request
///
/// Rendered one violation per line so the caller can fix all of them at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Returns `None` when there is nothing to report
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        (!violations.is_empty()).then_some(Self { violations })
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
