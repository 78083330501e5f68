//! 当前操作者 (Actor)
//!
//! 每个请求由认证中间件构造一次，显式传入各个服务调用。

use redb::ReadTransaction;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::Role;

use crate::db::{UserRecord, repository};

/// Authenticated user performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: u64,
    pub username: String,
    pub role: Role,
    pub command_id: u64,
    pub command: String,
    pub unit_id: u64,
    pub unit: String,
}

impl Actor {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Build an actor from a stored user, joining command and unit names
    pub fn load(txn: &ReadTransaction, user: UserRecord) -> AppResult<Self> {
        let command = repository::command::find_by_id(txn, user.command_id)?
            .map(|c| c.name)
            .unwrap_or_default();
        let unit = repository::unit::find_by_id(txn, user.unit_id)?
            .map(|u| u.name)
            .unwrap_or_default();

        Ok(Self {
            id: user.id,
            username: user.username,
            role: user.role,
            command_id: user.command_id,
            command,
            unit_id: user.unit_id,
            unit,
        })
    }

    /// Resolve the actor for a token subject
    ///
    /// The user is re-read on every request so role and command changes
    /// apply immediately and deleted accounts lose access.
    pub fn resolve(txn: &ReadTransaction, user_id: u64) -> AppResult<Self> {
        let user = repository::user::find_by_id(txn, user_id)?
            .ok_or_else(|| AppError::invalid_token("Account no longer exists"))?;
        Self::load(txn, user)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Actor without backing store record (policy tests)
    pub fn actor(role: Role, command_id: u64) -> Actor {
        Actor {
            id: 100 + command_id,
            username: format!("{}-{}", role, command_id),
            role,
            command_id,
            command: format!("C{command_id}"),
            unit_id: command_id * 10,
            unit: format!("U{command_id}"),
        }
    }
}
