//! CSV export of ticket lists
//!
//! Column names line up with the spreadsheet import headers. The importer
//! itself only accepts .xlsx / .xls uploads.

use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::TicketView;
use shared::util::format_millis;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    ticket_number: u64,
    command: &'a str,
    unit: &'a str,
    priority: &'static str,
    status: &'static str,
    is_recurring: bool,
    description: &'a str,
    assigned_technician: &'a str,
    created_by: &'a str,
    open_date: String,
    close_date: String,
    comments: usize,
}

impl<'a> From<&'a TicketView> for CsvRow<'a> {
    fn from(ticket: &'a TicketView) -> Self {
        Self {
            ticket_number: ticket.ticket_number,
            command: &ticket.command,
            unit: &ticket.unit,
            priority: ticket.priority.as_str(),
            status: ticket.status.as_str(),
            is_recurring: ticket.is_recurring,
            description: &ticket.description,
            assigned_technician: ticket.assigned_technician.as_deref().unwrap_or_default(),
            created_by: &ticket.created_by,
            open_date: format_millis(ticket.open_date),
            close_date: ticket.close_date.map(format_millis).unwrap_or_default(),
            comments: ticket.comments.len(),
        }
    }
}

/// Render tickets as CSV (header row included, order preserved)
pub fn tickets_to_csv(tickets: &[TicketView]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for ticket in tickets {
        writer
            .serialize(CsvRow::from(ticket))
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }
    // serialize() only emits the header with the first record
    if tickets.is_empty() {
        writer
            .write_record(HEADERS)
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV encoding failed: {e}")))
}

const HEADERS: [&str; 12] = [
    "ticketNumber",
    "command",
    "unit",
    "priority",
    "status",
    "isRecurring",
    "description",
    "assignedTechnician",
    "createdBy",
    "openDate",
    "closeDate",
    "comments",
];
