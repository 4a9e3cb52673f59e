// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session token signing configuration

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

/// Configuration for session token issuance and validation.
///
/// Only symmetric HMAC algorithms (HS256/HS384/HS512) are supported: the
/// bridge both signs and verifies its own tokens, so there is no party that
/// would need a public verification key without also being trusted with the
/// signing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for HMAC-based JWT token signing and verification.
    ///
    /// The default exists so development instances start without ceremony;
    /// production deployments must set `JWT_SECRET_KEY`.
    #[serde(default = "default_hmac_secret")]
    pub hmac_secret: String,

    /// JWT signing algorithm. Default is HS256.
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    /// Lifetime of issued session tokens, in minutes. Default is 60.
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,

    /// Issuer name stamped into the `iss` claim of every session token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_hmac_secret() -> String {
    "dev-secret-change-me".to_string()
}

fn default_algorithm() -> Algorithm {
    Algorithm::HS256
}

fn default_expiry_minutes() -> i64 {
    60
}

fn default_issuer() -> String {
    "identity-bridge".to_string()
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            hmac_secret: default_hmac_secret(),
            algorithm: default_algorithm(),
            expiry_minutes: default_expiry_minutes(),
            issuer: default_issuer(),
        }
    }
}
