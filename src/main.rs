//! # SakuraCloud Secrets Store CSI Provider
//!
//! Serves the `v1alpha1.CSIDriverProvider` gRPC API for the Secrets Store CSI driver,
//! backed by SakuraCloud Secret Manager.
//!
//! ## Usage
//!
//! ```bash
//! SAKURACLOUD_ACCESS_TOKEN=... SAKURACLOUD_ACCESS_TOKEN_SECRET=... \
//!   secrets-store-csi-driver-provider-sakuracloud \
//!     --endpoint unix:///etc/kubernetes/secrets-store-csi-providers/sakuracloud.sock \
//!     --healthz-addr 0.0.0.0:8080
//! ```

use anyhow::Result;
use clap::Parser;
use secrets_store_csi_driver_provider_sakuracloud::config::Cli;
use secrets_store_csi_driver_provider_sakuracloud::constants::PROVIDER_VERSION;
use secrets_store_csi_driver_provider_sakuracloud::runtime;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("Version: {PROVIDER_VERSION}");
        return Ok(());
    }

    runtime::run(cli).await
}
