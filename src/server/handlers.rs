//! Protected endpoint handlers

use rocket::get;
use rocket::serde::json::Json;

use crate::auth::jwt::SessionClaims;
use crate::auth::SessionBearer;

/// Return the authenticated caller's session claims
///
/// Accessed via `GET /auth/me` with `Authorization: Bearer <token>`.
/// Serves as the reference consumer of the [`SessionBearer`] guard: any
/// downstream endpoint protects itself the same way, by taking the guard
/// as a parameter.
#[get("/auth/me")]
pub fn me(session: SessionBearer) -> Json<SessionClaims> {
    Json(session.claims)
}
