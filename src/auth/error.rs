// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication error taxonomy
//!
//! Every failure the authentication flow can surface to a client is one of
//! the variants below. Each maps to exactly one HTTP status, and the
//! `Display` string is the response message, so handlers return the error
//! and are done with it. Nothing is retried here; retry, if any, is the
//! caller's decision.

use std::io::Cursor;

use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use thiserror::Error;

/// Failures surfaced by the authentication flow.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The provider credentials are absent: operator action required.
    #[error("OAuth2 {provider} client is not configured. Set {id_env}/{secret_env}.")]
    ProviderNotConfigured {
        provider: String,
        id_env: String,
        secret_env: String,
    },

    /// The provider-side exchange failed (network, HTTP error, malformed
    /// response, or anti-forgery state mismatch). The whole login flow can
    /// be retried from the start.
    #[error("OAuth2 exchange with {provider} failed: {reason}")]
    ProviderExchange { provider: String, reason: String },

    /// The provider answered, but its response carried no usable subject
    /// identifier.
    #[error("Failed to retrieve user information from {provider}")]
    IdentityRetrieval { provider: String },

    /// No bearer credential was presented at all. Kept distinct from
    /// `InvalidToken` so clients can tell "log in first" from "log in
    /// again".
    #[error("Missing Authorization: Bearer token")]
    MissingCredential,

    /// Signature mismatch, unsupported algorithm, missing or past expiry.
    /// The token is rejected as a whole; no claims escape a failed
    /// validation.
    #[error("Invalid or expired JWT token")]
    InvalidToken,

    /// A server-side fault unrelated to the client's input.
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// The HTTP status this error surfaces as.
    pub fn status(&self) -> Status {
        match self {
            AuthError::ProviderNotConfigured { .. } => Status::InternalServerError,
            AuthError::ProviderExchange { .. } => Status::BadGateway,
            AuthError::IdentityRetrieval { .. } => Status::BadRequest,
            AuthError::MissingCredential => Status::Unauthorized,
            AuthError::InvalidToken => Status::Unauthorized,
            AuthError::Internal(_) => Status::InternalServerError,
        }
    }
}

/// Renders the error as `{"error": "<message>"}` with its mapped status.
impl<'r> Responder<'r, 'static> for AuthError {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        let body = serde_json::json!({ "error": self.to_string() }).to_string();
        Response::build()
            .status(self.status())
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        let not_configured = AuthError::ProviderNotConfigured {
            provider: "google".to_string(),
            id_env: "GOOGLE_CLIENT_ID".to_string(),
            secret_env: "GOOGLE_CLIENT_SECRET".to_string(),
        };
        assert_eq!(not_configured.status(), Status::InternalServerError);

        let exchange = AuthError::ProviderExchange {
            provider: "google".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(exchange.status(), Status::BadGateway);

        let identity = AuthError::IdentityRetrieval {
            provider: "google".to_string(),
        };
        assert_eq!(identity.status(), Status::BadRequest);

        assert_eq!(AuthError::MissingCredential.status(), Status::Unauthorized);
        assert_eq!(AuthError::InvalidToken.status(), Status::Unauthorized);
    }

    #[test]
    fn messages_match_documented_wording() {
        let not_configured = AuthError::ProviderNotConfigured {
            provider: "google".to_string(),
            id_env: "GOOGLE_CLIENT_ID".to_string(),
            secret_env: "GOOGLE_CLIENT_SECRET".to_string(),
        };
        assert_eq!(
            not_configured.to_string(),
            "OAuth2 google client is not configured. Set GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET."
        );
        assert_eq!(
            AuthError::MissingCredential.to_string(),
            "Missing Authorization: Bearer token"
        );
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "Invalid or expired JWT token"
        );
    }
}
