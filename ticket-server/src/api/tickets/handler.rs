//! Ticket API Handlers

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use http::header;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    CommentCreate, TicketCreate, TicketFilter, TicketStats, TicketUpdate, TicketView,
};
use shared::query::{Page, PageRequest};

use crate::api::extract::{Json, Path, Query};
use crate::api::{ApiResult, blocking};
use crate::auth::Actor;
use crate::core::ServerState;

/// List tickets, newest first
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
    Query(filter): Query<TicketFilter>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Page<TicketView>> {
    let tickets = state.tickets.clone();
    let page = blocking(move || tickets.list_tickets(&actor, &filter, &page)).await?;
    Ok(ApiResponse::success(page))
}

/// Counts by status and priority over the filtered set
pub async fn stats(
    State(state): State<ServerState>,
    actor: Actor,
    Query(filter): Query<TicketFilter>,
) -> ApiResult<TicketStats> {
    let tickets = state.tickets.clone();
    let stats = blocking(move || tickets.ticket_stats(&actor, &filter)).await?;
    Ok(ApiResponse::success(stats))
}

/// Filtered tickets as a CSV download
pub async fn export(
    State(state): State<ServerState>,
    actor: Actor,
    Query(filter): Query<TicketFilter>,
) -> AppResult<Response> {
    let tickets = state.tickets.clone();
    let csv = blocking(move || tickets.export_tickets(&actor, &filter)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tickets.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
) -> ApiResult<TicketView> {
    let tickets = state.tickets.clone();
    let ticket = blocking(move || tickets.get_ticket(&actor, id)).await?;
    Ok(ApiResponse::success(ticket))
}

pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<TicketCreate>,
) -> ApiResult<TicketView> {
    let tickets = state.tickets.clone();
    let ticket = blocking(move || tickets.create_ticket(&actor, payload)).await?;
    Ok(ApiResponse::success_with_message("Ticket created", ticket))
}

/// Partial update; absent fields are left alone
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
    Json(payload): Json<TicketUpdate>,
) -> ApiResult<TicketView> {
    let tickets = state.tickets.clone();
    let ticket = blocking(move || tickets.update_ticket(&actor, id, payload)).await?;
    Ok(ApiResponse::success_with_message("Ticket updated", ticket))
}

pub async fn delete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
) -> ApiResult<()> {
    let tickets = state.tickets.clone();
    blocking(move || tickets.delete_ticket(&actor, id)).await?;
    Ok(ApiResponse::ok())
}

pub async fn add_comment(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<u64>,
    Json(payload): Json<CommentCreate>,
) -> ApiResult<TicketView> {
    let tickets = state.tickets.clone();
    let ticket = blocking(move || tickets.add_comment(&actor, id, &payload.content)).await?;
    Ok(ApiResponse::success_with_message("Comment added", ticket))
}
