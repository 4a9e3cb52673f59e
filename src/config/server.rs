// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Web server configuration

use serde::{Deserialize, Serialize};

/// Configuration for the bridge web server.
///
/// Controls network binding and the externally visible base URL, which is
/// what the default OAuth2 redirect URI is derived from when the provider
/// section does not pin one explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The network address the server will bind to.
    ///
    /// Can be an IPv4/IPv6 address or a hostname. Default is "127.0.0.1".
    /// Use "0.0.0.0" to bind to all IPv4 interfaces.
    #[serde(default = "default_address")]
    pub address: String,

    /// The TCP port the server will listen on.
    ///
    /// Valid range is 1-65534. Default value is 8080.
    #[serde(default = "default_port")]
    pub port: u16,

    /// The server name reported in HTTP headers and logs.
    #[serde(default = "default_name")]
    pub name: String,

    /// The base URL under which clients reach this server.
    ///
    /// Set this when the bridge sits behind a reverse proxy or a public
    /// hostname; the provider must be able to redirect browsers to
    /// `<external_url>/auth/callback`. When unset, the bind address and
    /// port are used.
    #[serde(default)]
    pub external_url: Option<String>,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_name() -> String {
    format!("IdentityBridgeServer/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            name: default_name(),
            external_url: None,
        }
    }
}

impl ServerConfig {
    /// The externally reachable base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.external_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.address, self.port),
        }
    }
}
