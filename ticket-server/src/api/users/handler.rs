//! User API Handlers
//!
//! Responses carry [`UserView`], which has no password hash field.

use axum::extract::State;
use shared::error::ApiResponse;
use shared::models::{UserCreate, UserUpdate, UserView};

use crate::api::extract::{Json, Path};
use crate::api::{ApiResult, blocking};
use crate::auth::Actor;
use crate::core::ServerState;

pub async fn list(State(state): State<ServerState>, actor: Actor) -> ApiResult<Vec<UserView>> {
    let users = state.users.clone();
    let list = blocking(move || users.list_users(&actor)).await?;
    Ok(ApiResponse::success(list))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
) -> ApiResult<UserView> {
    let users = state.users.clone();
    let user = blocking(move || users.get_user(&actor, id)).await?;
    Ok(ApiResponse::success(user))
}

pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<UserCreate>,
) -> ApiResult<UserView> {
    let users = state.users.clone();
    let user = blocking(move || users.create_user(&actor, payload)).await?;
    Ok(ApiResponse::success_with_message("User created", user))
}

/// Update role, command/unit or password (blank password keeps the old one)
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<UserView> {
    let users = state.users.clone();
    let user = blocking(move || users.update_user(&actor, id, payload)).await?;
    Ok(ApiResponse::success_with_message("User updated", user))
}

/// Delete an account; tickets keep their `createdBy`
pub async fn delete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
) -> ApiResult<()> {
    let users = state.users.clone();
    blocking(move || users.delete_user(&actor, id)).await?;
    Ok(ApiResponse::ok())
}
