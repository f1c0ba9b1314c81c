//! # Shared Types Crate
//!
//! Primitive types used across the treasury transfer engine, the multisig
//! verifier and the ticket manager.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Cross-crate primitives are defined here.
//! - **Wire Compatibility**: Serde field names match the JSON shapes exchanged
//!   with signers, archivers and the host runtime.

pub mod canonical;
pub mod entities;
pub mod errors;

pub use canonical::*;
pub use entities::*;
pub use errors::*;
