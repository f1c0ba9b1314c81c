pub mod address;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod hasher;
pub mod response;

pub use address::*;
pub use codec::*;
pub use entities::*;
pub use errors::*;
pub use hasher::*;
pub use response::*;
