//! Ticket Service - ticket lifecycle
//!
//! Every operation runs inside one store transaction. Mutations are
//! read-modify-write inside a single write transaction, so a patch only
//! changes the fields it names and concurrent comment appends are never lost.
//!
//! Ticket numbers come from one counter shared with the importer
//! (see [`insert_ticket`]).

use redb::WriteTransaction;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Comment, Priority, Status, TicketCreate, TicketFilter, TicketStats, TicketUpdate, TicketView,
};
use shared::query::{Page, PageRequest};
use shared::util::now_millis;

use super::query::TicketQuery;
use super::reference::resolve_unit;
use super::{ReferenceNames, export};
use crate::auth::{Action, Actor, policy};
use crate::db::{Store, TableReader, TicketRecord, commit, repository};
use crate::utils::validation::{MAX_DESCRIPTION_LEN, validate_optional_text};

// =============================================================================
// Shared creation path (interactive + import)
// =============================================================================

/// Validated fields of a ticket about to be inserted
#[derive(Debug, Clone)]
pub(crate) struct NewTicket {
    pub command_id: u64,
    pub unit_id: u64,
    pub priority: Priority,
    pub status: Status,
    pub is_recurring: bool,
    pub description: String,
    pub assigned_technician: Option<String>,
}

/// Trimmed, non-empty, length-capped description
pub(crate) fn validate_description(raw: &str) -> AppResult<&str> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(AppError::new(ErrorCode::TicketDescriptionEmpty));
    }
    validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    Ok(description)
}

/// Blank or absent means the default priority
pub(crate) fn parse_priority(raw: Option<&str>) -> AppResult<Priority> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Priority::default()),
        Some(value) => value.parse(),
    }
}

/// Blank clears the assignment; anything else must name an existing user
pub(crate) fn resolve_technician(
    txn: &impl TableReader,
    raw: &str,
) -> AppResult<Option<String>> {
    let username = raw.trim();
    if username.is_empty() {
        return Ok(None);
    }
    match repository::user::find_by_username(txn, username)? {
        Some(user) => Ok(Some(user.username)),
        None => Err(AppError::with_message(
            ErrorCode::UserNotFound,
            format!("Technician '{username}' not found"),
        )
        .with_detail("assignedTechnician", username)),
    }
}

/// Insert a ticket inside the caller's transaction
///
/// The ticket number is drawn from the store counter in the same
/// transaction, so it is unique across every creation path. A ticket
/// created already resolved is closed at its open date.
pub(crate) fn insert_ticket(
    txn: &WriteTransaction,
    new: NewTicket,
    created_by: &str,
    now: i64,
) -> AppResult<TicketRecord> {
    let (id, ticket_number) = repository::ticket::allocate(txn)?;
    let ticket = TicketRecord {
        id,
        ticket_number,
        command_id: new.command_id,
        unit_id: new.unit_id,
        priority: new.priority,
        close_date: new.status.is_resolved().then_some(now),
        status: new.status,
        is_recurring: new.is_recurring,
        description: new.description,
        open_date: now,
        created_by: created_by.to_string(),
        assigned_technician: new.assigned_technician,
        comments: Vec::new(),
        updated_at: now,
    };
    repository::ticket::save(txn, &ticket)?;
    Ok(ticket)
}

fn ticket_not_found(id: u64) -> AppError {
    AppError::with_message(ErrorCode::TicketNotFound, format!("Ticket {id} not found"))
        .with_detail("id", id)
}

fn view_of(txn: &impl TableReader, ticket: TicketRecord) -> AppResult<TicketView> {
    let names = ReferenceNames::for_ids(txn, ticket.command_id, ticket.unit_id)?;
    Ok(names.ticket_view(ticket))
}

// =============================================================================
// TicketService
// =============================================================================

#[derive(Debug, Clone)]
pub struct TicketService {
    store: Store,
}

impl TicketService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn create_ticket(&self, actor: &Actor, payload: TicketCreate) -> AppResult<TicketView> {
        policy::authorize(policy::can_create(actor), actor, Action::CreateTicket)?;

        let description = validate_description(&payload.description)?;
        let priority = parse_priority(payload.priority.as_deref())?;

        let txn = self.store.begin_write()?;
        let (command, unit) = resolve_unit(&txn, &payload.command, &payload.unit)?;
        let new = NewTicket {
            command_id: command.id,
            unit_id: unit.id,
            priority,
            status: Status::Open,
            is_recurring: payload.is_recurring,
            description: description.to_string(),
            assigned_technician: None,
        };
        let ticket = insert_ticket(&txn, new, &actor.username, now_millis())?;
        let view = view_of(&txn, ticket)?;
        commit(txn)?;

        tracing::info!(
            ticket_id = view.id,
            ticket_number = view.ticket_number,
            command = %view.command,
            created_by = %actor.username,
            "Ticket created"
        );
        Ok(view)
    }

    pub fn get_ticket(&self, actor: &Actor, id: u64) -> AppResult<TicketView> {
        let txn = self.store.begin_read()?;
        let ticket = repository::ticket::find_by_id(&txn, id)?.ok_or_else(|| ticket_not_found(id))?;
        policy::authorize(policy::can_view(actor, &ticket), actor, Action::ViewTicket)?;
        view_of(&txn, ticket)
    }

    /// Filtered page, newest ticket number first
    pub fn list_tickets(
        &self,
        actor: &Actor,
        filter: &TicketFilter,
        page: &PageRequest,
    ) -> AppResult<Page<TicketView>> {
        let query = TicketQuery::from_filter(filter)?;
        let tickets = self.matching(actor, &query)?;
        Ok(Page::from_ordered(tickets, page))
    }

    pub fn update_ticket(
        &self,
        actor: &Actor,
        id: u64,
        patch: TicketUpdate,
    ) -> AppResult<TicketView> {
        let txn = self.store.begin_write()?;
        let mut ticket =
            repository::ticket::find_by_id(&txn, id)?.ok_or_else(|| ticket_not_found(id))?;
        policy::authorize(policy::can_edit(actor, &ticket), actor, Action::EditTicket)?;

        let now = now_millis();
        if let Some(raw) = patch.priority.as_deref() {
            ticket.priority = raw.parse()?;
        }
        if let Some(raw) = patch.description.as_deref() {
            ticket.description = validate_description(raw)?.to_string();
        }
        if let Some(is_recurring) = patch.is_recurring {
            ticket.is_recurring = is_recurring;
        }
        if let Some(raw) = patch.assigned_technician.as_deref() {
            ticket.assigned_technician = resolve_technician(&txn, raw)?;
        }
        if let Some(raw) = patch.status.as_deref() {
            let status: Status = raw.parse()?;
            ticket.set_status(status, now);
        }
        ticket.updated_at = now;

        repository::ticket::save(&txn, &ticket)?;
        let view = view_of(&txn, ticket)?;
        commit(txn)?;

        tracing::info!(
            ticket_id = id,
            status = %view.status,
            updated_by = %actor.username,
            "Ticket updated"
        );
        Ok(view)
    }

    pub fn delete_ticket(&self, actor: &Actor, id: u64) -> AppResult<()> {
        let txn = self.store.begin_write()?;
        let ticket = repository::ticket::find_by_id(&txn, id)?.ok_or_else(|| ticket_not_found(id))?;
        policy::authorize(policy::can_delete(actor, &ticket), actor, Action::DeleteTicket)?;

        repository::ticket::delete(&txn, id)?;
        commit(txn)?;

        tracing::info!(
            ticket_id = id,
            ticket_number = ticket.ticket_number,
            deleted_by = %actor.username,
            "Ticket deleted"
        );
        Ok(())
    }

    /// Append a comment; no other ticket field changes
    pub fn add_comment(&self, actor: &Actor, id: u64, content: &str) -> AppResult<TicketView> {
        let txn = self.store.begin_write()?;
        let mut ticket =
            repository::ticket::find_by_id(&txn, id)?.ok_or_else(|| ticket_not_found(id))?;
        policy::authorize(policy::can_comment(actor, &ticket), actor, Action::Comment)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::new(ErrorCode::CommentEmpty));
        }
        validate_optional_text(content, "content", MAX_DESCRIPTION_LEN)?;

        ticket.comments.push(Comment {
            author: actor.username.clone(),
            content: content.to_string(),
            created_at: now_millis(),
        });
        repository::ticket::save(&txn, &ticket)?;
        let view = view_of(&txn, ticket)?;
        commit(txn)?;

        tracing::debug!(ticket_id = id, author = %actor.username, "Comment added");
        Ok(view)
    }

    /// Dashboard counters over the tickets matching the filter
    pub fn ticket_stats(&self, actor: &Actor, filter: &TicketFilter) -> AppResult<TicketStats> {
        let query = TicketQuery::from_filter(filter)?;
        let mut stats = TicketStats::default();
        for ticket in self.matching(actor, &query)? {
            stats.record(ticket.status, ticket.priority, ticket.is_recurring);
        }
        Ok(stats)
    }

    /// All matching tickets (unpaginated, same order as the list) as CSV
    pub fn export_tickets(&self, actor: &Actor, filter: &TicketFilter) -> AppResult<String> {
        let query = TicketQuery::from_filter(filter)?;
        let tickets = self.matching(actor, &query)?;
        tracing::info!(count = tickets.len(), exported_by = %actor.username, "Tickets exported");
        export::tickets_to_csv(&tickets)
    }

    fn matching(&self, actor: &Actor, query: &TicketQuery) -> AppResult<Vec<TicketView>> {
        let txn = self.store.begin_read()?;
        let names = ReferenceNames::load(&txn)?;
        let views = repository::ticket::find_all(&txn)?
            .into_iter()
            .filter(|t| policy::can_view(actor, t))
            .map(|t| names.ticket_view(t))
            .collect();
        Ok(query.apply(views))
    }
}
