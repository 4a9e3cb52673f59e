// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Login and callback endpoint handlers
//!
//! The two Rocket route handlers that sequence the end-to-end flow:
//! `/auth/login` sends the browser to the provider, `/auth/callback`
//! redeems what the provider sends back and answers with a freshly minted
//! session token.

use log::{info, warn};
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::jwt::SessionClaims;

use super::state::BridgeState;

/// The provider-vouched identity echoed back to the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderUser {
    pub sub: String,
    /// Serialized as `null` when the provider shared no email.
    pub email: Option<String>,
}

/// Successful callback response: the session token and its metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenGrant {
    /// The signed session token.
    pub access_token: String,

    /// Always `"bearer"`.
    pub token_type: String,

    /// Token lifetime as configured, in minutes.
    pub expires_in_minutes: i64,

    /// The identity the token was minted for.
    pub provider_user: ProviderUser,

    /// Post-login location hint, echoed when the login leg supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
}

/// Start an OAuth2 login
///
/// # URL
///
/// `GET /auth/login?return_to=<optional hint>`
///
/// # Returns
///
/// - A redirect to the provider's authorization endpoint
/// - 500 with a configuration message when the provider credentials are
///   absent
#[get("/auth/login?<return_to>")]
pub fn login(
    return_to: Option<String>,
    bridge: &State<BridgeState>,
) -> Result<Redirect, AuthError> {
    let url = bridge.provider.build_authorization_redirect(return_to)?;
    Ok(Redirect::to(url.to_string()))
}

/// OAuth2 callback that returns the service session token
///
/// # URL
///
/// `GET /auth/callback?code=<authorization code>&state=<anti-forgery state>`
///
/// # Returns
///
/// - On success: a [`TokenGrant`] JSON body
/// - 500 when the provider credentials are absent
/// - 502 when the provider exchange fails (including a state mismatch or a
///   provider-reported `error` parameter)
/// - 400 when the provider's response carries no usable subject identifier
#[get("/auth/callback?<code>&<state>&<error>&<error_description>")]
pub async fn callback(
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    bridge: &State<BridgeState>,
) -> Result<Json<TokenGrant>, AuthError> {
    // A misconfigured bridge answers 500 before looking at any parameter
    bridge.provider.ensure_configured()?;

    let provider = bridge.provider.name().to_string();

    if let Some(error) = error {
        let reason = error_description.unwrap_or_else(|| error.clone());
        warn!("Provider {} reported callback error: {}", provider, reason);
        return Err(AuthError::ProviderExchange { provider, reason });
    }

    let code = code.ok_or_else(|| AuthError::ProviderExchange {
        provider: provider.clone(),
        reason: "callback missing authorization code".to_string(),
    })?;
    let state = state.ok_or_else(|| AuthError::ProviderExchange {
        provider: provider.clone(),
        reason: "callback missing anti-forgery state".to_string(),
    })?;

    let exchange = bridge.provider.exchange_code_for_identity(&code, &state).await?;
    let identity = exchange.identity;

    let claims = SessionClaims::new(identity.subject.clone())
        .with_email(identity.email.clone())
        .with_provider(provider.clone())
        .with_issuer(bridge.config.jwt.issuer.clone());

    let ttl = chrono::Duration::minutes(bridge.config.jwt.expiry_minutes);
    let access_token = bridge.codec.issue(claims, ttl)?;

    info!(
        "Issued session token for {} subject {}",
        provider, identity.subject
    );

    Ok(Json(TokenGrant {
        access_token,
        token_type: "bearer".to_string(),
        expires_in_minutes: bridge.config.jwt.expiry_minutes,
        provider_user: ProviderUser {
            sub: identity.subject,
            email: identity.email,
        },
        return_to: exchange.return_to,
    }))
}
