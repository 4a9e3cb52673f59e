// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Anti-forgery state storage and shared server state
//!
//! The OAuth2 flow spans two HTTP requests: the redirect to the provider
//! and the callback coming back. The [`StateStore`] correlates the two legs
//! through the opaque `state` value, which is the only server-side memory
//! the flow needs. The storage mechanism is pluggable so a cookie-based or
//! distributed implementation can replace the in-memory map without
//! touching the flow logic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::auth::jwt::TokenCodec;
use crate::auth::oauth2::provider::ProviderClient;
use crate::config::Config;

/// A login attempt awaiting its provider callback.
///
/// Created when the authorization redirect is issued, consumed exactly once
/// when the provider calls back. Entries left behind by abandoned logins
/// are treated as absent after [`PendingAuthorization::MAX_AGE_MINUTES`].
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    /// PKCE code verifier matching the challenge sent with the redirect.
    pub pkce_verifier: String,

    /// Optional post-login location hint supplied by the initiating client.
    pub return_to: Option<String>,

    /// When the redirect was issued.
    pub created_at: DateTime<Utc>,
}

impl PendingAuthorization {
    /// How long a pending flow stays redeemable.
    pub const MAX_AGE_MINUTES: i64 = 10;

    /// Whether this entry is too old to redeem.
    pub fn is_stale(&self) -> bool {
        Utc::now() - self.created_at > Duration::minutes(Self::MAX_AGE_MINUTES)
    }
}

/// Storage for pending authorization flows, keyed by the opaque anti-forgery
/// state value.
///
/// Implementations must be safe to call from concurrent requests.
pub trait StateStore: Send + Sync {
    /// Record a pending flow under its state key.
    fn put(&self, key: String, pending: PendingAuthorization);

    /// Look up a pending flow. Stale entries are reported as absent.
    fn get(&self, key: &str) -> Option<PendingAuthorization>;

    /// Remove a pending flow, returning it if it was present and fresh.
    fn delete(&self, key: &str) -> Option<PendingAuthorization>;
}

/// In-memory [`StateStore`]: state values are random keys into a mutex-held
/// hash map, which is all a single-process deployment needs.
#[derive(Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, PendingAuthorization>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn put(&self, key: String, pending: PendingAuthorization) {
        let mut entries = self.entries.lock().unwrap();
        // Opportunistic cleanup keeps abandoned logins from accumulating
        entries.retain(|_, entry| !entry.is_stale());
        entries.insert(key, pending);
    }

    fn get(&self, key: &str) -> Option<PendingAuthorization> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).filter(|entry| !entry.is_stale()).cloned()
    }

    fn delete(&self, key: &str) -> Option<PendingAuthorization> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key).filter(|entry| !entry.is_stale())
    }
}

/// Shared server state for the authentication flow.
///
/// Holds the token codec and the provider client, both of which are
/// constructed once at startup and safe for concurrent use. Shared across
/// Rocket workers via managed state; cloning shares the underlying
/// components rather than duplicating them.
pub struct BridgeState {
    /// Session token issuance and validation.
    pub codec: Arc<TokenCodec>,

    /// OAuth2 client for the configured identity provider.
    pub provider: Arc<ProviderClient>,

    /// The application configuration.
    pub config: Arc<Config>,
}

impl Clone for BridgeState {
    fn clone(&self) -> Self {
        BridgeState {
            codec: Arc::clone(&self.codec),
            provider: Arc::clone(&self.provider),
            config: Arc::clone(&self.config),
        }
    }
}

impl BridgeState {
    /// Build the shared state from the application configuration.
    ///
    /// The in-memory state store is wired in here; swapping the storage
    /// mechanism means swapping this one line.
    pub fn from_config(config: &Arc<Config>) -> anyhow::Result<Self> {
        let codec = TokenCodec::new(&config.jwt)?;
        let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::new());
        debug!(
            "Bridge state initialized for provider {:?}",
            config.provider.name
        );
        let provider = ProviderClient::new(
            config.provider.clone(),
            format!("{}/auth/callback", config.server.base_url()),
            store,
        )?;
        Ok(BridgeState {
            codec: Arc::new(codec),
            provider: Arc::new(provider),
            config: Arc::clone(config),
        })
    }
}
