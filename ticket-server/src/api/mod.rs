//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、当前用户、登出
//! - [`reference`] - 指挥部/单位参考数据
//! - [`tickets`] - 工单管理、统计、导出
//! - [`users`] - 用户管理 (仅管理员)
//! - [`import`] - 表格批量导入 (仅管理员)
//!
//! 所有 `/api/*` 响应都使用 [`ApiResponse`] 信封 (`code` 为 0 表示成功)。

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use shared::error::{ApiResponse, AppError, AppResult};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod auth;
pub mod extract;
pub mod health;
pub mod import;
pub mod middleware;
pub mod reference;
pub mod tickets;
pub mod users;

/// Handler result: enveloped payload or an [`AppError`] response
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Run store / hashing work off the async runtime
pub(crate) async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal(format!("Background task failed: {e}")))?
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login is public, the rest require a token
        .merge(auth::router())
        .merge(reference::router())
        .merge(tickets::router())
        // Admin API - admin role required
        .merge(users::router())
        .merge(import::router())
        .fallback(route_not_found)
}

/// Unknown routes still answer with the envelope
async fn route_not_found(uri: http::Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // ========== Application Middleware ==========
        // JWT authentication - injects Actor before handlers run
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        // Access log with request id and latency
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(TraceLayer::new_for_http())
        // Request ID - copy to the response, generated one layer further out
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        // ========== Tower HTTP Middleware ==========
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
