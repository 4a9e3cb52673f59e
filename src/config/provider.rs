// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Upstream OAuth2 identity provider configuration
//!
//! One provider per bridge instance. The defaults target Google; pointing
//! the endpoint URLs elsewhere (including at a wiremock double in tests) is
//! all it takes to swap providers.

use serde::{Deserialize, Serialize};

/// Configuration for the OAuth2 identity provider the bridge delegates to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Short provider name, used in claims, log lines and error messages.
    #[serde(default = "default_name")]
    pub name: String,

    /// OAuth2 client id registered with the provider.
    ///
    /// Usually supplied via the environment (`GOOGLE_CLIENT_ID` for the
    /// default provider). When this or `client_secret` is empty the
    /// provider-dependent endpoints refuse to operate.
    #[serde(default)]
    pub client_id: String,

    /// OAuth2 client secret registered with the provider.
    #[serde(default)]
    pub client_secret: String,

    /// Redirect URI the provider sends the browser back to.
    ///
    /// When unset, `<server base URL>/auth/callback` is used.
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// The provider's authorization endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// The provider's token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// The provider's OpenID Connect userinfo endpoint.
    ///
    /// Queried only when the token exchange response carries no usable
    /// embedded identity token.
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,

    /// Scopes requested during authorization.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_name() -> String {
    "google".to_string()
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "email".to_string(),
        "profile".to_string(),
    ]
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: None,
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            userinfo_url: default_userinfo_url(),
            scopes: default_scopes(),
        }
    }
}

impl ProviderConfig {
    /// Whether the provider credentials are present.
    ///
    /// Operations that would contact the provider must check this first and
    /// fail fast instead of attempting a doomed network call.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Environment variable holding the client id (e.g. `GOOGLE_CLIENT_ID`).
    pub fn client_id_env(&self) -> String {
        format!("{}_CLIENT_ID", self.env_prefix())
    }

    /// Environment variable holding the client secret.
    pub fn client_secret_env(&self) -> String {
        format!("{}_CLIENT_SECRET", self.env_prefix())
    }

    /// Environment variable holding the redirect URI override.
    pub fn redirect_uri_env(&self) -> String {
        format!("{}_REDIRECT_URI", self.env_prefix())
    }

    fn env_prefix(&self) -> String {
        self.name.to_uppercase().replace('-', "_")
    }
}
