//! # Mount Pipeline
//!
//! Turns the attributes of a Mount call into the files the CSI driver writes:
//!
//! 1. **Request parsing** - decode the JSON attributes and the YAML secrets list,
//!    apply the default vault and validate every entry
//! 2. **Resolution** - fetch each secret from the provider and pair it with its
//!    object version

pub mod error;
pub mod permission;
pub mod request;
pub mod resolver;

pub use error::{InvalidPath, MalformedInput, MountError, ValidationErrors, Violation};
pub use permission::parse_permission;
pub use request::{parse_mount_request, validate_path, MountRequest, SecretRef};
pub use resolver::{MountResolver, ObjectVersion, ResolvedSecret, SecretFile};
