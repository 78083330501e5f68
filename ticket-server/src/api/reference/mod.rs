//! Reference Data API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/commands | GET | 登录用户 |
//! | /api/commands/{id}/units | GET | 登录用户 |
//! | /api/commands | POST | 管理员 |
//! | /api/units | POST | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 读取路由：下拉列表数据，任何登录用户可用
    let read_routes = Router::new()
        .route("/api/commands", get(handler::list_commands))
        .route("/api/commands/{id}/units", get(handler::list_units));

    let manage_routes = Router::new()
        .route("/api/commands", post(handler::create_command))
        .route("/api/units", post(handler::create_unit))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
