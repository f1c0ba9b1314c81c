//! Treasury domain logic: registry, validation, application and genesis.

pub mod applier;
pub mod genesis;
pub mod receipt;
pub mod registry;
pub mod rejection;
pub mod transaction;
pub mod validator;

pub use applier::*;
pub use genesis::*;
pub use receipt::*;
pub use registry::*;
pub use rejection::*;
pub use transaction::*;
pub use validator::*;
