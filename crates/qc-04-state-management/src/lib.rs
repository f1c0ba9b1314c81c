//! # qc-04-state-management
//!
//! Account entities and state plumbing for the treasury transfer engine.
//!
//! ## Role in System
//!
//! - **Tagged Accounts**: Every account carries an explicit `AccountType`
//!   discriminant and is matched exhaustively wherever kind matters
//! - **Content Hashing**: `AccountHasher` produces the digest nodes compare to
//!   agree on state
//! - **Binary Codec**: Versioned layout for the secure-account entity
//! - **Checkpointed State**: `TransactionalState` port with checkpoint /
//!   commit / revert so multi-account mutations are all-or-nothing
//!
//! ## Determinism
//!
//! Hashes are computed over canonical JSON (object keys sorted at every
//! depth), so two nodes holding equal accounts always produce equal digests.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
