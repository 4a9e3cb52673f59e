// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration validation utilities

use anyhow::Result;
use jsonwebtoken::Algorithm;
use log::{debug, warn};
use url::Url;

use super::Config;

/// Check if a string is a valid IP address
///
/// Validates that a string represents a valid IPv4 or IPv6 address,
/// or is one of the special values like "localhost" or "0.0.0.0".
pub fn is_valid_ip_address(addr: &str) -> bool {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }

    // Special cases
    matches!(addr, "localhost" | "::" | "::0" | "0.0.0.0")
}

/// Validates the configuration beyond what serde can express.
///
/// Called once at startup, before any network listener comes up, so a
/// misconfigured instance dies immediately instead of failing per-request.
///
/// # Validation Rules
///
/// - **Signing secret**: must be non-empty
/// - **Signing algorithm**: must be in the HMAC family (HS256/HS384/HS512)
/// - **Token lifetime**: must be at least one minute
/// - **Port range**: 1-65534
/// - **Endpoint URLs**: authorization, token, userinfo and (when set) the
///   redirect URI must parse as absolute URLs
pub fn validate(config: &Config) -> Result<()> {
    debug!("Performing configuration validation checks");

    if config.jwt.hmac_secret.is_empty() {
        anyhow::bail!("JWT signing secret must not be empty");
    }

    if !matches!(
        config.jwt.algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    ) {
        anyhow::bail!(
            "Unsupported JWT algorithm {:?}: only HMAC algorithms are supported",
            config.jwt.algorithm
        );
    }

    if config.jwt.expiry_minutes < 1 {
        anyhow::bail!(
            "Invalid token lifetime: {} minutes",
            config.jwt.expiry_minutes
        );
    }

    if config.server.port < 1 || config.server.port > 65534 {
        anyhow::bail!("Invalid port number: {}", config.server.port);
    }

    if !is_valid_ip_address(&config.server.address) {
        // Hostnames are tolerated; just flag the unusual ones
        warn!(
            "Potentially invalid address format: {}",
            config.server.address
        );
    }

    for (label, value) in [
        ("authorization endpoint", &config.provider.auth_url),
        ("token endpoint", &config.provider.token_url),
        ("userinfo endpoint", &config.provider.userinfo_url),
    ] {
        Url::parse(value)
            .map_err(|e| anyhow::anyhow!("Invalid {} URL {:?}: {}", label, value, e))?;
    }

    if let Some(redirect_uri) = &config.provider.redirect_uri {
        Url::parse(redirect_uri)
            .map_err(|e| anyhow::anyhow!("Invalid redirect URI {:?}: {}", redirect_uri, e))?;
    }

    Ok(())
}
