//! # SakuraCloud Secrets Store CSI Provider
//!
//! A provider for the [Secrets Store CSI driver](https://secrets-store-csi-driver.sigs.k8s.io/)
//! that mounts secrets stored in SakuraCloud Secret Manager into pods.
//!
//! ## Overview
//!
//! The CSI driver calls the provider over gRPC (`v1alpha1.CSIDriverProvider`) for every
//! volume it mounts. For each `Mount` call the provider:
//!
//! 1. **Parses the mount attributes** - the `SecretProviderClass` parameters, with a
//!    YAML list of secrets embedded in the JSON attributes
//! 2. **Validates every entry** - required names, default vault, safe relative paths
//! 3. **Unveils the secrets** - one Secret Manager call per entry
//! 4. **Returns file contents** - the driver writes the files into the volume
//!
//! The provider never touches the filesystem of the volume and keeps no state
//! between calls.

pub mod config;
pub mod constants;
pub mod mount;
pub mod observability;
pub mod provider;
pub mod runtime;
pub mod server;
