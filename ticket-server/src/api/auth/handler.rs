//! Authentication Handlers
//!
//! Login issues a bearer token; tokens are stateless, so logout only
//! records the event and the client discards its token.

use std::time::Duration;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError};

use crate::api::extract::Json;
use crate::api::{ApiResult, blocking};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::security_log;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: Actor,
}

/// Login handler
///
/// Every attempt takes at least `auth_delay_ms`, whether the user exists or
/// not, and failures share one message.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let users = state.users.clone();
    let username = req.username.clone();
    let delay = Duration::from_millis(state.config.auth_delay_ms);

    let (result, _) = tokio::join!(
        blocking(move || users.authenticate(&req.username, &req.password)),
        tokio::time::sleep(delay),
    );
    let actor = result.inspect_err(|e| {
        security_log!(
            "WARN",
            "login_failed",
            username = username.as_str(),
            reason = e.code.to_string()
        );
    })?;

    let token = state
        .jwt_service()
        .generate_token(actor.id, &actor.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = actor.id,
        username = %actor.username,
        role = actor.role.as_str(),
        "User logged in successfully"
    );

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: state.jwt_service().expires_in_seconds(),
        user: actor,
    }))
}

/// Current user
pub async fn me(actor: Actor) -> ApiResult<Actor> {
    Ok(ApiResponse::success(actor))
}

/// Logout handler
pub async fn logout(actor: Actor) -> ApiResult<()> {
    tracing::info!(user_id = actor.id, username = %actor.username, "User logged out");
    Ok(ApiResponse::ok())
}
