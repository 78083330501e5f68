//! 服务层 - 业务逻辑
//!
//! # 服务列表
//!
//! - [`ReferenceService`] - 指挥部/单位参考数据
//! - [`TicketService`] - 工单生命周期 (创建、更新、评论、删除、统计、导出)
//! - [`UserService`] - 用户管理与登录校验
//! - [`ImportService`] - 表格批量导入
//!
//! 每个入口都显式接收 [`Actor`](crate::auth::Actor)，权限判断统一走
//! [`policy`](crate::auth::policy)。

pub mod export;
pub mod import;
pub mod query;
pub mod reference;
pub mod spreadsheet;
pub mod tickets;
pub mod users;

pub use import::{ImportService, RawRow};
pub use query::TicketQuery;
pub use reference::ReferenceService;
pub use tickets::TicketService;
pub use users::UserService;

use std::collections::HashMap;

use shared::models::{TicketView, UserView};

use crate::db::{StoreResult, TableReader, TicketRecord, UserRecord, repository};

/// Command/unit names keyed by id, for turning records into views
#[derive(Debug, Default)]
pub(crate) struct ReferenceNames {
    commands: HashMap<u64, String>,
    units: HashMap<u64, String>,
}

impl ReferenceNames {
    pub(crate) fn load(txn: &impl TableReader) -> StoreResult<Self> {
        let commands = repository::command::find_all(txn)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let units = repository::unit::find_all(txn)?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();
        Ok(Self { commands, units })
    }

    /// Names for a single record's command and unit
    pub(crate) fn for_ids(txn: &impl TableReader, command_id: u64, unit_id: u64) -> StoreResult<Self> {
        let mut names = Self::default();
        if let Some(command) = repository::command::find_by_id(txn, command_id)? {
            names.commands.insert(command.id, command.name);
        }
        if let Some(unit) = repository::unit::find_by_id(txn, unit_id)? {
            names.units.insert(unit.id, unit.name);
        }
        Ok(names)
    }

    fn command(&self, id: u64) -> String {
        self.commands.get(&id).cloned().unwrap_or_default()
    }

    fn unit(&self, id: u64) -> String {
        self.units.get(&id).cloned().unwrap_or_default()
    }

    pub(crate) fn ticket_view(&self, ticket: TicketRecord) -> TicketView {
        TicketView {
            id: ticket.id,
            ticket_number: ticket.ticket_number,
            command: self.command(ticket.command_id),
            command_id: ticket.command_id,
            unit: self.unit(ticket.unit_id),
            unit_id: ticket.unit_id,
            priority: ticket.priority,
            status: ticket.status,
            is_recurring: ticket.is_recurring,
            description: ticket.description,
            open_date: ticket.open_date,
            close_date: ticket.close_date,
            created_by: ticket.created_by,
            assigned_technician: ticket.assigned_technician,
            comments: ticket.comments,
            updated_at: ticket.updated_at,
        }
    }

    pub(crate) fn user_view(&self, user: UserRecord) -> UserView {
        UserView {
            id: user.id,
            username: user.username,
            role: user.role,
            command: self.command(user.command_id),
            command_id: user.command_id,
            unit: self.unit(user.unit_id),
            unit_id: user.unit_id,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}
