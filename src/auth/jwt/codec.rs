// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session token issuance and validation
//!
//! The [`TokenCodec`] is the single place where session tokens are signed
//! and verified. Issuance and validation are pure CPU-bound operations and
//! the codec holds no mutable state, so one instance is shared freely
//! across concurrent requests.
//!
//! # Example
//!
//! ```
//! use rust_identity_bridge::auth::jwt::{SessionClaims, TokenCodec};
//! use rust_identity_bridge::config::JwtConfig;
//!
//! let codec = TokenCodec::new(&JwtConfig::default()).unwrap();
//! let claims = SessionClaims::new("user-1").with_issuer("identity-bridge");
//! let token = codec.issue(claims, chrono::Duration::minutes(60)).unwrap();
//! let decoded = codec.validate(&token).unwrap();
//! assert_eq!(decoded.sub, "user-1");
//! ```

use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;

use crate::auth::error::AuthError;
use crate::config::JwtConfig;

use super::claims::SessionClaims;

/// Signs and verifies session tokens with a shared HMAC secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec from the JWT configuration.
    ///
    /// Fails on an empty secret or a non-HMAC algorithm; both are operator
    /// mistakes that must stop the server before it accepts requests.
    pub fn new(config: &JwtConfig) -> anyhow::Result<Self> {
        if config.hmac_secret.is_empty() {
            anyhow::bail!("JWT signing secret must not be empty");
        }
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            anyhow::bail!(
                "Unsupported JWT algorithm {:?}: only HMAC algorithms are supported",
                config.algorithm
            );
        }
        let secret = config.hmac_secret.as_bytes();
        Ok(TokenCodec {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: config.algorithm,
        })
    }

    /// Mint a signed session token from `claims`, valid for `ttl`.
    ///
    /// `exp` is set to `now + ttl` regardless of what the caller supplied,
    /// and `iat` is stamped alongside it. A claims set without a subject is
    /// refused: such a token would authenticate nobody.
    pub fn issue(&self, mut claims: SessionClaims, ttl: Duration) -> Result<String, AuthError> {
        if claims.sub.is_empty() {
            return Err(AuthError::Internal(
                "refusing to mint a session token without a subject".to_string(),
            ));
        }

        let now = Utc::now();
        claims.iat = Some(now.timestamp());
        claims.exp = (now + ttl).timestamp();

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Validate a session token and return the decoded claims.
    ///
    /// Verification checks, in order:
    /// - the signature, against the configured secret and algorithm (a
    ///   token signed with any other algorithm is rejected outright)
    /// - presence of the `exp` claim
    /// - expiry, at second precision with zero leeway: a token is accepted
    ///   at the exact `exp` instant and rejected strictly after it
    ///
    /// Any failure yields [`AuthError::InvalidToken`]; no claims are ever
    /// returned from a token that did not fully verify.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!("Session token rejected: {}", e);
                AuthError::InvalidToken
            })?;

        let claims = token_data.claims;

        // Instant-level recheck, independent of the library's clock reads
        let exp_time = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthError::InvalidToken)?;
        if exp_time < Utc::now() {
            debug!("Session token expired at {}", exp_time);
            return Err(AuthError::InvalidToken);
        }

        if claims.sub.is_empty() {
            debug!("Session token carries an empty subject");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}
