//! # Provider Configuration
//!
//! Process-level configuration: command-line flags (endpoint, health address) and
//! environment variables (Secret Manager credentials and tunables).
//!
//! All environment-driven settings have sensible defaults except the API credentials.

mod cli;
mod secret_manager;
mod server;

pub use cli::Cli;
pub use secret_manager::SecretManagerConfig;
pub use server::ServerConfig;

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
