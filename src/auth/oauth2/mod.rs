// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! OAuth2 authorization-code flow against the identity provider
//!
//! This submodule owns the outward leg of the bridge: building the
//! authorization redirect, correlating the callback through the anti-forgery
//! state store, exchanging the authorization code, and the two HTTP routes
//! that sequence it all.

pub mod handlers;
pub mod pkce;
pub mod provider;
pub mod state;

// Re-export public API
pub use handlers::{ProviderUser, TokenGrant};
pub use pkce::PkceChallenge;
pub use provider::{AuthorizedExchange, ProviderClient, ProviderIdentity};
pub use state::{BridgeState, MemoryStateStore, PendingAuthorization, StateStore};
