// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-identity-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rocket request guards for bearer-token authentication

mod bearer;

// Re-export public API
pub use bearer::{unauthorized, SessionBearer};
