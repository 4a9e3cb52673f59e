// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rocket server assembly
//!
//! This module builds the Rocket instance: managed state, the
//! authentication routes, the protected profile endpoint, catchers, and
//! the CORS fairing.

mod builder;
mod cors;
mod handlers;

// Re-export public API
pub use builder::build_rocket;
pub use cors::CORS;
