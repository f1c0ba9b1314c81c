//! Adapters for outbound ports

pub mod archivers;
pub mod http_catalog;

pub use archivers::*;
pub use http_catalog::*;
