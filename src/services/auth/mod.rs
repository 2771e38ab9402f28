pub mod role;
pub mod token;

pub use role::Role;
pub use token::{TokenCodec, TokenError, VerifiedToken};
