//! Reference Data Handlers

use axum::extract::State;
use shared::error::ApiResponse;
use shared::models::{Command, CommandCreate, CommandWithUnits, Unit, UnitCreate};

use crate::api::extract::{Json, Path};
use crate::api::{ApiResult, blocking};
use crate::auth::Actor;
use crate::core::ServerState;

/// All commands with their units
pub async fn list_commands(
    State(state): State<ServerState>,
    _actor: Actor,
) -> ApiResult<Vec<CommandWithUnits>> {
    let reference = state.reference.clone();
    let commands = blocking(move || reference.list_commands()).await?;
    Ok(ApiResponse::success(commands))
}

/// Units of one command
pub async fn list_units(
    State(state): State<ServerState>,
    _actor: Actor,
    Path(id): Path<u64>,
) -> ApiResult<Vec<Unit>> {
    let reference = state.reference.clone();
    let units = blocking(move || reference.list_units(id)).await?;
    Ok(ApiResponse::success(units))
}

pub async fn create_command(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<CommandCreate>,
) -> ApiResult<Command> {
    let reference = state.reference.clone();
    let command = blocking(move || reference.create_command(&actor, payload)).await?;
    Ok(ApiResponse::success_with_message("Command created", command))
}

pub async fn create_unit(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<UnitCreate>,
) -> ApiResult<Unit> {
    let reference = state.reference.clone();
    let unit = blocking(move || reference.create_unit(&actor, payload)).await?;
    Ok(ApiResponse::success_with_message("Unit created", unit))
}
