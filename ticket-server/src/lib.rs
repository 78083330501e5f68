//! Ticket Server - 维修工单跟踪服务
//!
//! # 架构概述
//!
//! 单进程 HTTP 服务，提供以下核心功能：
//!
//! - **存储** (`db`): 嵌入式 redb，工单号由事务内计数器分配
//! - **认证** (`auth`): JWT + Argon2，访问控制规则集中在 `policy`
//! - **服务** (`services`): 工单生命周期、用户管理、参考数据、批量导入
//! - **HTTP API** (`api`): RESTful 接口，统一 `ApiResponse` 信封
//!
//! # 模块结构
//!
//! ```text
//! ticket-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT、密码哈希、操作者、访问控制
//! ├── services/      # 业务逻辑 (同步，运行在阻塞线程池)
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # redb 表定义与仓储函数
//! ├── utils/         # 日志、输入校验
//! └── seed.rs        # 空库初始化
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod seed;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{Actor, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::Store;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 安全事件统一写入 "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
 _____ _      _        _
|_   _(_) ___| | _____| |_ ___
  | | | |/ __| |/ / _ \ __/ __|
  | | | | (__|   <  __/ |_\__ \
  |_| |_|\___|_|\_\___|\__|___/
    "#
    );
}
