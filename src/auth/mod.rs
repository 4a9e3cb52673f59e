// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication building blocks
//!
//! This module groups the security-sensitive pieces of the bridge:
//! session token issuance/validation, the bearer-token request guard, and
//! the OAuth2 authorization-code flow against the identity provider.

pub mod error;
pub mod guards;
pub mod jwt;
pub mod oauth2;

// Re-export public API
pub use error::AuthError;
pub use guards::SessionBearer;
pub use jwt::{SessionClaims, TokenCodec};
pub use oauth2::{ProviderClient, ProviderIdentity};
