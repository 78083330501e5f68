//! Import Routes
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/import/tickets | POST | multipart 上传 .xlsx/.xls，字段名 `excelFile` | 管理员 |

mod handler;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Build import router
///
/// axum's default body limit is replaced by the configured
/// `max_import_bytes`, enforced in the handler so the client gets a
/// `FileTooLarge` envelope instead of a bare 413.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/import/tickets", post(handler::import_tickets))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(require_admin))
}
