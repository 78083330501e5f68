//! Import Service - bulk ticket creation from spreadsheet rows
//!
//! Each row is validated and committed in its own write transaction, so a
//! bad row is reported and skipped without affecting the others. Rows go
//! through the same validation and ticket-number counter as interactive
//! creation.

use std::collections::HashMap;

use shared::error::{AppError, AppResult};
use shared::models::{ImportReport, Priority, Status};
use shared::util::now_millis;

use super::reference::resolve_unit;
use super::tickets::{NewTicket, insert_ticket, resolve_technician, validate_description};
use crate::auth::{Action, Actor, policy};
use crate::db::{Store, commit};

/// Header aliases, keyed by canonical field. Matching ignores case, spaces
/// and underscores; the Hebrew names are the legacy spreadsheet headers.
const FIELD_ALIASES: [(&str, &[&str]); 7] = [
    ("command", &["command", "פיקוד"]),
    ("unit", &["unit", "יחידה"]),
    ("priority", &["priority", "עדיפות"]),
    ("status", &["status", "סטטוס"]),
    ("isRecurring", &["isrecurring", "recurring", "תקלהחוזרת", "חוזרת"]),
    ("description", &["description", "תיאור"]),
    ("assignedTechnician", &["assignedtechnician", "technician", "טכנאי"]),
];

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// One data row: its spreadsheet line number and cells keyed by header
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub line: u32,
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new<K: AsRef<str>, V: Into<String>>(
        line: u32,
        cells: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let cells = cells
            .into_iter()
            .map(|(k, v)| (normalize_header(k.as_ref()), v.into()))
            .collect();
        Self { line, cells }
    }

    /// Trimmed, non-blank cell for a canonical field (or any raw header)
    pub fn get(&self, field: &str) -> Option<&str> {
        let aliases = FIELD_ALIASES
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, aliases)| *aliases);

        let value = match aliases {
            Some(aliases) => aliases.iter().find_map(|a| self.cells.get(*a)),
            None => self.cells.get(&normalize_header(field)),
        };
        value.map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

fn parse_priority_cell(raw: Option<&str>) -> AppResult<Priority> {
    match raw {
        None => Ok(Priority::default()),
        Some("רגילה") => Ok(Priority::Normal),
        Some("דחופה") => Ok(Priority::Urgent),
        Some("מבצעית") => Ok(Priority::Critical),
        Some(value) => value.to_lowercase().parse(),
    }
}

fn parse_status_cell(raw: Option<&str>) -> AppResult<Status> {
    match raw {
        None => Ok(Status::default()),
        Some("פתוח") => Ok(Status::Open),
        Some("בטיפול") => Ok(Status::InProgress),
        Some("תוקן") => Ok(Status::Resolved),
        Some(value) => value.to_lowercase().parse(),
    }
}

fn parse_bool_cell(raw: Option<&str>) -> AppResult<bool> {
    let Some(value) = raw else {
        return Ok(false);
    };
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "כן" => Ok(true),
        "false" | "no" | "0" | "לא" => Ok(false),
        _ => Err(AppError::validation(format!(
            "isRecurring must be true/false, got '{value}'"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct ImportService {
    store: Store,
}

impl ImportService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Import every non-blank row; failures are collected, never raised
    pub fn import_rows(&self, actor: &Actor, rows: Vec<RawRow>) -> AppResult<ImportReport> {
        policy::authorize(policy::can_import(actor), actor, Action::Import)?;

        let mut report = ImportReport::default();
        for row in rows.iter().filter(|r| !r.is_blank()) {
            match self.import_row(actor, row) {
                Ok(ticket_number) => report.record_success(ticket_number),
                Err(err) => {
                    tracing::debug!(line = row.line, error = %err, "Import row rejected");
                    report.record_failure(row.line, &err.message);
                }
            }
        }
        let report = report.finish();

        tracing::info!(
            total = report.total_rows,
            imported = report.imported,
            errors = report.errors,
            imported_by = %actor.username,
            "Ticket import finished"
        );
        Ok(report)
    }

    fn import_row(&self, actor: &Actor, row: &RawRow) -> AppResult<u64> {
        let description = validate_description(row.get("description").unwrap_or_default())?;
        let priority = parse_priority_cell(row.get("priority"))?;
        let status = parse_status_cell(row.get("status"))?;
        let is_recurring = parse_bool_cell(row.get("isRecurring"))?;

        let txn = self.store.begin_write()?;
        let (command, unit) = resolve_unit(
            &txn,
            row.get("command").unwrap_or_default(),
            row.get("unit").unwrap_or_default(),
        )?;
        let assigned_technician = match row.get("assignedTechnician") {
            Some(name) => resolve_technician(&txn, name)?,
            None => None,
        };

        let new = NewTicket {
            command_id: command.id,
            unit_id: unit.id,
            priority,
            status,
            is_recurring,
            description: description.to_string(),
            assigned_technician,
        };
        let ticket = insert_ticket(&txn, new, &actor.username, now_millis())?;
        commit(txn)?;
        Ok(ticket.ticket_number)
    }
}
