//! # Subsystem Container
//!
//! Central container holding the subsystem instances with their adapters
//! wired in.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::SubsystemContainer;
