// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Bearer token request guard
//!
//! This module provides the request guard that protects downstream
//! endpoints: it extracts the `Authorization: Bearer` credential, validates
//! it through the token codec, and hands the decoded claims to the handler.
//! Any number of routes can take the guard as a parameter; there is no
//! per-endpoint wiring beyond that.
//!
//! ### Error Responses
//!
//! | Condition | HTTP Status | Message |
//! |-----------|-------------|---------|
//! | No bearer credential in the request | 401 Unauthorized | `Missing Authorization: Bearer token` |
//! | Signature, algorithm or expiry failure | 401 Unauthorized | `Invalid or expired JWT token` |
//! | Bridge state missing from Rocket | 500 Internal Server Error | |
//!
//! The two 401 cases stay distinct so clients can tell "log in first" from
//! "log in again".
//!
//! ### Example
//!
//! ```rust,no_run
//! use rocket::get;
//! use rocket::serde::json::Json;
//! use rust_identity_bridge::auth::SessionBearer;
//!
//! #[get("/whoami")]
//! fn whoami(session: SessionBearer) -> Json<String> {
//!     Json(session.claims.sub.clone())
//! }
//! ```

use log::debug;
use rocket::catch;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;

use crate::auth::error::AuthError;
use crate::auth::jwt::SessionClaims;
use crate::auth::oauth2::state::BridgeState;

/// A validated bearer session.
///
/// Constructed only after the presented token fully verified; holding one
/// is proof the request was authenticated.
pub struct SessionBearer {
    /// Claims decoded from the validated session token.
    pub claims: SessionClaims,

    /// The raw token string as presented.
    pub token: String,
}

/// Guard failure parked for the 401 catcher, so the response body can carry
/// the exact failure message.
struct GuardFailure(Option<AuthError>);

fn fail(request: &Request<'_>, status: Status, error: AuthError) -> Outcome<SessionBearer, AuthError> {
    request.local_cache(|| GuardFailure(Some(error.clone())));
    Outcome::Error((status, error))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionBearer {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let bridge = match request.guard::<&State<BridgeState>>().await {
            Outcome::Success(bridge) => bridge,
            _ => {
                return fail(
                    request,
                    Status::InternalServerError,
                    AuthError::Internal("Missing bridge state".to_string()),
                )
            }
        };

        let header = request.headers().get_one("Authorization");
        let token = match header.and_then(|header| header.strip_prefix("Bearer ")) {
            Some(token) if !token.trim().is_empty() => token,
            _ => return fail(request, Status::Unauthorized, AuthError::MissingCredential),
        };

        match bridge.codec.validate(token) {
            Ok(claims) => Outcome::Success(SessionBearer {
                claims,
                token: token.to_string(),
            }),
            Err(error) => {
                debug!("Rejected bearer credential");
                fail(request, Status::Unauthorized, error)
            }
        }
    }
}

/// 401 catcher rendering the guard's failure message as a JSON body.
#[catch(401)]
pub fn unauthorized(request: &Request<'_>) -> Json<serde_json::Value> {
    let failure = request.local_cache(|| GuardFailure(None));
    let message = failure
        .0
        .as_ref()
        .map(|error| error.to_string())
        .unwrap_or_else(|| "Unauthorized".to_string());
    Json(serde_json::json!({ "error": message }))
}
