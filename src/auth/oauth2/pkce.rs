// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! PKCE (Proof Key for Code Exchange) support
//!
//! Implements the RFC 7636 S256 method: a random code verifier is kept
//! server-side for the token exchange while only its SHA-256 digest travels
//! through the browser with the authorization request.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

/// PKCE pair: the verifier held back for the token exchange and the
/// challenge sent with the authorization request.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// The code verifier, base64url without padding.
    pub verifier: String,

    /// SHA-256 digest of the verifier, base64url without padding.
    pub challenge: String,
}

impl PkceChallenge {
    /// Generate a fresh PKCE pair from 32 random bytes.
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::random();
        let verifier = URL_SAFE_NO_PAD.encode(random_bytes);

        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(hasher.finalize());

        Self {
            verifier,
            challenge,
        }
    }

    /// The code challenge method (always S256).
    pub fn challenge_method() -> &'static str {
        "S256"
    }
}
