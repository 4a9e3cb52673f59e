// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the identity bridge
//!
//! The configuration is backed by a YAML file, with secrets and deployment
//! specifics overridable from the process environment and the command line.
//! It is loaded exactly once at startup and from then on passed around as an
//! immutable `Arc<Config>`; request handling never consults ambient
//! environment state.
//!
//! ## Sections
//!
//! - `server`: network binding and server identity
//! - `jwt`: session token signing (secret, algorithm, lifetime, issuer)
//! - `provider`: the upstream OAuth2 identity provider
//!
//! ## Usage
//!
//! ```no_run
//! use rust_identity_bridge::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Overlay environment variables (GOOGLE_CLIENT_ID, JWT_SECRET_KEY, ...)
//! config.apply_env();
//!
//! println!("Server port: {}", config.server.port);
//! ```

pub mod jwt;
pub mod provider;
pub mod server;
pub mod utils;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use jwt::JwtConfig;
pub use provider::ProviderConfig;
pub use server::ServerConfig;

/// Root configuration structure for the identity bridge.
///
/// Deserialized from YAML with serde; every section falls back to its
/// defaults when omitted, so a minimal (even empty) configuration file is
/// enough to get a development instance running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Network binding and server identity settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session token signing settings.
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Upstream OAuth2 identity provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// When the file does not exist, a default configuration file is written
    /// at `path` so the operator has a template to edit, and the defaults
    /// are returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        let config: Config = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        Ok(config)
    }

    /// Serialize the configuration back to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directory for config at {:?}", parent)
                })?;
            }
        }
        let contents =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write configuration file at {:?}", path))?;
        Ok(())
    }

    /// Overlay process-environment variables onto the loaded configuration.
    ///
    /// Secrets are expected to come from the environment in most
    /// deployments, so the environment always wins over the file. The
    /// provider variable names derive from the provider name
    /// (`GOOGLE_CLIENT_ID` etc. for the default provider).
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var(self.provider.client_id_env()) {
            self.provider.client_id = val;
        }
        if let Ok(val) = std::env::var(self.provider.client_secret_env()) {
            self.provider.client_secret = val;
        }
        if let Ok(val) = std::env::var(self.provider.redirect_uri_env()) {
            self.provider.redirect_uri = Some(val);
        }
        if let Ok(val) = std::env::var("JWT_SECRET_KEY") {
            self.jwt.hmac_secret = val;
        }
        if let Ok(val) = std::env::var("JWT_ALGORITHM") {
            match jsonwebtoken::Algorithm::from_str(&val) {
                Ok(alg) => self.jwt.algorithm = alg,
                Err(e) => warn!("Ignoring unparsable JWT_ALGORITHM {:?}: {}", val, e),
            }
        }
        if let Ok(val) = std::env::var("JWT_EXPIRE_MINUTES") {
            match val.parse::<i64>() {
                Ok(minutes) => self.jwt.expiry_minutes = minutes,
                Err(e) => warn!("Ignoring unparsable JWT_EXPIRE_MINUTES {:?}: {}", val, e),
            }
        }
    }

    /// Apply command line overrides.
    pub fn apply_args(
        &mut self,
        port: Option<u16>,
        address: Option<String>,
        hmac_secret: Option<String>,
    ) {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(address) = address {
            self.server.address = address;
        }
        if let Some(secret) = hmac_secret {
            self.jwt.hmac_secret = secret;
        }
    }
}
