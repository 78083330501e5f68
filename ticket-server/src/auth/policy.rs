//! Access control policy
//!
//! Every permission rule lives here. Predicates are pure functions of the
//! actor and the resource snapshot; [`authorize`] turns a denial into a
//! `PermissionDenied` error and a security log entry.
//!
//! | Action | admin | technician | viewer |
//! |--------|-------|------------|--------|
//! | view / list tickets | ✓ | ✓ | ✓ |
//! | create ticket | ✓ | ✓ | |
//! | edit / comment | ✓ | same command | |
//! | delete ticket | ✓ | | |
//! | users, reference data, import | ✓ | | |

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Role;
use std::fmt;

use crate::auth::Actor;
use crate::db::TicketRecord;
use crate::security_log;

/// Operation being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewTicket,
    CreateTicket,
    EditTicket,
    DeleteTicket,
    Comment,
    ManageUsers,
    ManageReferenceData,
    Import,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ViewTicket => "view ticket",
            Action::CreateTicket => "create ticket",
            Action::EditTicket => "edit ticket",
            Action::DeleteTicket => "delete ticket",
            Action::Comment => "comment on ticket",
            Action::ManageUsers => "manage users",
            Action::ManageReferenceData => "manage reference data",
            Action::Import => "import tickets",
        })
    }
}

/// Every authenticated user may view every ticket
pub fn can_view(_actor: &Actor, _ticket: &TicketRecord) -> bool {
    true
}

pub fn can_create(actor: &Actor) -> bool {
    matches!(actor.role, Role::Admin | Role::Technician)
}

/// Technicians may edit any ticket of their own command, whatever the unit
pub fn can_edit(actor: &Actor, ticket: &TicketRecord) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Technician => ticket.command_id == actor.command_id,
        Role::Viewer => false,
    }
}

pub fn can_delete(actor: &Actor, _ticket: &TicketRecord) -> bool {
    actor.is_admin()
}

pub fn can_comment(actor: &Actor, ticket: &TicketRecord) -> bool {
    can_edit(actor, ticket)
}

pub fn can_manage_users(actor: &Actor) -> bool {
    actor.is_admin()
}

pub fn can_manage_reference_data(actor: &Actor) -> bool {
    actor.is_admin()
}

pub fn can_import(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Route-level gate for admin-only areas
pub fn require_admin(actor: &Actor) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    security_log!(
        "WARN",
        "admin_required",
        user_id = actor.id,
        username = actor.username.as_str(),
        role = actor.role.as_str()
    );
    Err(AppError::admin_required())
}

/// Fail with `PermissionDenied` (admin-only actions: `AdminRequired`)
pub fn authorize(allowed: bool, actor: &Actor, action: Action) -> AppResult<()> {
    if allowed {
        return Ok(());
    }

    security_log!(
        "WARN",
        "permission_denied",
        user_id = actor.id,
        username = actor.username.as_str(),
        role = actor.role.as_str(),
        action = action.to_string()
    );

    let message = format!("Not allowed to {action}");
    match action {
        Action::DeleteTicket | Action::ManageUsers | Action::ManageReferenceData | Action::Import => {
            Err(AppError::with_message(ErrorCode::AdminRequired, message))
        }
        _ => Err(AppError::permission_denied(message)),
    }
}
