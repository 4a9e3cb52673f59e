// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Claim structure for session tokens

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// The fields the bridge itself depends on (`sub`, `exp`) are named and
/// typed; everything else rides along in the flattened extension map, so
/// tokens stay forward compatible with claims added by later versions
/// without this struct having to know about them.
///
/// The structure is serialized to JSON when creating tokens and
/// deserialized when validating them, following RFC 7519 for the
/// registered claim names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the stable, provider-assigned user identifier.
    ///
    /// Must be non-empty before a token is minted, and is immutable for
    /// the lifetime of the token.
    pub sub: String,

    /// Expiration timestamp, Unix seconds.
    ///
    /// Always overwritten by [`TokenCodec::issue`](super::TokenCodec::issue);
    /// a caller-supplied value is never trusted.
    pub exp: i64,

    /// Issued-at timestamp, Unix seconds. Stamped at issuance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// The user's email address as reported by the provider, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Name of the identity provider that vouched for the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Issuer: the service that minted this token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Additional passenger claims, carried but never interpreted.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SessionClaims {
    /// Create claims for a subject. `exp` is a placeholder until issuance.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            exp: 0,
            iat: None,
            email: None,
            provider: None,
            iss: None,
            extra: HashMap::new(),
        }
    }

    /// Set the email claim
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Set the provider claim
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }
}
