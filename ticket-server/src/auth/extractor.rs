//! Actor Extractor
//!
//! Handlers take [`Actor`] as an argument; it is normally already placed in
//! the request extensions by `require_auth`.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::Actor;
use crate::auth::middleware::authenticate;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(actor) = parts.extensions.get::<Actor>() {
            return Ok(actor.clone());
        }

        let actor = authenticate(state, &parts.headers, &parts.uri)?;
        parts.extensions.insert(actor.clone());
        Ok(actor)
    }
}
