//! Adapters implementing the state ports.

pub mod memory_state;

pub use memory_state::*;
