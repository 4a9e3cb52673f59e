// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! OAuth2 login bridge issuing short-lived signed session tokens
//!
//! This crate delegates end-user authentication to an external OAuth2
//! identity provider (Google by default) and mints a locally-trusted JWT
//! once the provider has vouched for the user. Downstream services verify
//! that JWT on their own, without ever talking to the provider again.
//!
//! ## Architecture
//!
//! - [`config`] - Immutable configuration loaded once at startup (YAML file,
//!   environment overlay, CLI overrides)
//! - [`auth::jwt`] - Session token issuance and validation
//! - [`auth::guards`] - Rocket request guard protecting downstream endpoints
//! - [`auth::oauth2`] - Authorization-code flow against the provider and the
//!   `/auth/login` / `/auth/callback` route pair
//! - [`server`] - Rocket assembly: managed state, routes, catchers, CORS
//!
//! ## Flow
//!
//! 1. `GET /auth/login` redirects the browser to the provider's
//!    authorization endpoint, carrying an anti-forgery `state` value and a
//!    PKCE challenge.
//! 2. The provider redirects back to `GET /auth/callback` with an
//!    authorization code; the bridge exchanges it server-side, extracts the
//!    user's identity, and returns a signed session token.
//! 3. Clients present that token as `Authorization: Bearer <token>` to any
//!    protected endpoint.

pub mod auth;
pub mod config;
pub mod server;
