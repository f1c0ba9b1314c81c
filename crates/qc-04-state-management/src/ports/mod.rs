//! Ports for the state view the host hands to the treasury engine.

pub mod state;

pub use state::*;
