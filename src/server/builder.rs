// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rocket server builder and configuration
//!
//! This module provides the function that assembles the Rocket server
//! instance with all necessary routes, catchers, fairings, and state
//! management.

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};

use crate::auth::guards;
use crate::auth::oauth2::handlers::{callback, login};
use crate::auth::oauth2::state::BridgeState;
use crate::config::Config;

use super::cors::CORS;
use super::handlers::me;

/// Build a configured Rocket server instance
///
/// Constructs the shared [`BridgeState`] from the configuration (failing
/// fast on an unusable signing setup) and wires up the route table:
///
/// - `GET /auth/login` - start the OAuth2 flow
/// - `GET /auth/callback` - redeem the provider callback for a session token
/// - `GET /auth/me` - protected endpoint returning the caller's claims
///
/// ### Parameters
///
/// * `figment` - The Rocket configuration figment containing server settings
/// * `config` - The application configuration
///
/// ### Example
///
/// ```no_run
/// use std::sync::Arc;
/// use rust_identity_bridge::{config::Config, server};
///
/// let figment = rocket::Config::figment();
/// let config = Arc::new(Config::default());
/// let rocket = server::build_rocket(figment, config).unwrap();
/// // Launch the server
/// // rocket.launch().await.expect("Failed to launch");
/// ```
pub fn build_rocket(figment: Figment, config: Arc<Config>) -> Result<Rocket<Build>> {
    let bridge = BridgeState::from_config(&config)?;

    debug!(
        "Mounting authentication routes for provider {:?}",
        config.provider.name
    );

    Ok(rocket::custom(figment)
        .manage(Arc::clone(&config))
        .manage(bridge)
        .attach(CORS)
        .mount("/", routes![login, callback, me])
        .register("/", catchers![guards::unauthorized]))
}
