//! # Node Runtime Library
//!
//! Exposes the configuration and subsystem container for testing.
//! The main entry point is the `main.rs` binary.

pub mod container;

pub use container::{ConfigError, NodeConfig, SubsystemContainer};
