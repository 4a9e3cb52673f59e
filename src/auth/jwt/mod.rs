//! Session token management and validation
//!
//! This submodule handles session token creation, validation, and the claim
//! structure embedded in every token.

mod claims;
mod codec;

// Re-export public API
pub use claims::SessionClaims;
pub use codec::TokenCodec;
