//! # Runtime Module
//!
//! Runtime components for the provider: initialization, serving and shutdown.

pub mod initialization;
pub mod serve;
pub mod shutdown;

pub use initialization::*;
pub use serve::*;
pub use shutdown::*;
