//! # Ports Layer
//!
//! - **Inbound (Driving)**: the multisig check other subsystems call

pub mod inbound;
