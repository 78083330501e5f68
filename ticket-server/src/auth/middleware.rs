//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, Uri};
use shared::error::{AppError, AppResult};

use crate::auth::{Actor, JwtError, JwtService, policy};
use crate::core::ServerState;
use crate::security_log;

/// Validate the bearer token and resolve the acting user
pub(crate) fn authenticate(state: &ServerState, headers: &HeaderMap, uri: &Uri) -> AppResult<Actor> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = uri.to_string());
            return Err(AppError::not_authenticated());
        }
    };

    let claims = state.jwt_service().validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            uri = uri.to_string()
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::invalid_token("Invalid token"))?;
    let txn = state.store().begin_read()?;
    Actor::resolve(&txn, user_id)
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 然后从存储加载用户，把 [`Actor`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/auth/login` (登录接口)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 账号已删除 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || path == "/api/auth/login" {
        return Ok(next.run(req).await);
    }

    let actor = authenticate(&state, req.headers(), req.uri())?;
    req.extensions_mut().insert(actor.clone());
    let mut response = next.run(req).await;
    // 访问日志在外层，从响应扩展读取操作者
    response.extensions_mut().insert(actor);
    Ok(response)
}

/// 管理员中间件 - 要求管理员角色
///
/// # 错误
///
/// 非管理员返回 403 AdminRequired
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .ok_or_else(AppError::not_authenticated)?;
    policy::require_admin(actor)?;

    Ok(next.run(req).await)
}
