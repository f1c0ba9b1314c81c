//! Application services: the trust store and its refresh task.

pub mod refresh;
pub mod trust_store;

pub use refresh::*;
pub use trust_store::*;
