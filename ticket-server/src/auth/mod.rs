//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`PasswordHasher`] - Argon2id 密码哈希
//! - [`Actor`] - 当前操作者
//! - [`policy`] - 访问控制规则
//! - [`require_auth`] / [`require_admin`] - 认证中间件

pub mod actor;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use actor::Actor;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use password::{PasswordCost, PasswordHasher};
pub use policy::Action;
