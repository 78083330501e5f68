//! Stored record shapes
//!
//! Tickets and users reference commands and units by id. Names are joined
//! back in when records are turned into API views.

use serde::{Deserialize, Serialize};
use shared::models::{Comment, Priority, Role, Status};

/// Stored user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
    pub command_id: u64,
    pub unit_id: u64,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

/// Stored ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: u64,
    pub ticket_number: u64,
    pub command_id: u64,
    pub unit_id: u64,
    pub priority: Priority,
    pub status: Status,
    pub is_recurring: bool,
    pub description: String,
    pub open_date: i64,
    pub close_date: Option<i64>,
    pub created_by: String,
    pub assigned_technician: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub updated_at: i64,
}

impl TicketRecord {
    /// Apply a status change, stamping or clearing `close_date`
    ///
    /// Entering `resolved` stamps the close date (never earlier than the
    /// open date); leaving it clears the close date.
    pub fn set_status(&mut self, status: Status, now: i64) {
        match (self.status.is_resolved(), status.is_resolved()) {
            (false, true) => self.close_date = Some(now.max(self.open_date)),
            (true, false) => self.close_date = None,
            _ => {}
        }
        self.status = status;
    }
}
