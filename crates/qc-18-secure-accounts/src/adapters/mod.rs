//! Adapters for outbound ports

pub mod clock;

pub use clock::*;
