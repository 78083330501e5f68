use std::path::PathBuf;

use crate::auth::{JwtConfig, PasswordCost};
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别或过滤表达式 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | MAX_IMPORT_BYTES | 10485760 | 导入文件大小上限 |
/// | AUTH_DELAY_MS | 500 | 登录固定延迟 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SEED_DEMO_DATA | false | 空库时写入演示数据 |
/// | ADMIN_PASSWORD | - | 初始管理员密码 (生产环境必填) |
/// | PASSWORD_MEMORY_KIB | 65536 | Argon2 内存 |
/// | PASSWORD_ITERATIONS | 3 | Argon2 迭代次数 |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/tickets HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 导入文件大小上限 (字节)
    pub max_import_bytes: usize,
    /// 登录失败/成功前的固定延迟，防止时序探测用户名
    pub auth_delay_ms: u64,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub seed_demo_data: bool,
    pub admin_password: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    pub password_cost: PasswordCost,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let production = environment == "production";

        let jwt = JwtConfig::from_env(production).map_err(|e| ServerError::Config(e.to_string()))?;

        let admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.trim().is_empty());

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            max_import_bytes: env_or("MAX_IMPORT_BYTES", 10 * 1024 * 1024),
            auth_delay_ms: env_or("AUTH_DELAY_MS", 500),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            seed_demo_data: env_or("SEED_DEMO_DATA", false),
            admin_password,
            jwt,
            password_cost: PasswordCost {
                memory_kib: env_or("PASSWORD_MEMORY_KIB", PasswordCost::PRODUCTION.memory_kib),
                iterations: env_or("PASSWORD_ITERATIONS", PasswordCost::PRODUCTION.iterations),
                parallelism: PasswordCost::PRODUCTION.parallelism,
            },
        })
    }

    /// 测试配置：无延迟、最低哈希成本、固定 JWT 密钥
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            max_import_bytes: 10 * 1024 * 1024,
            auth_delay_ms: 0,
            request_timeout_ms: 30_000,
            seed_demo_data: false,
            admin_password: Some("admin123".into()),
            jwt: JwtConfig::for_tests(),
            password_cost: PasswordCost::MINIMAL,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库文件路径: work_dir/database/tickets.redb
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
            .join("database")
            .join("tickets.redb")
    }

    /// 日志目录: work_dir/logs
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("database"))?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
