//! Ticket domain types.

pub mod entities;

pub use entities::*;
