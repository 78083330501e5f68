//! Ticket filtering
//!
//! Filters are parsed once into a [`TicketQuery`] (so an unknown status or
//! priority fails the whole request) and then applied to joined views. All
//! supplied filters are ANDed; input order is preserved.

use shared::error::AppResult;
use shared::models::{Priority, Status, TicketFilter, TicketView};

#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    command: Option<String>,
    unit: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    /// Lowercased search needle
    search: Option<String>,
}

impl TicketQuery {
    pub fn from_filter(filter: &TicketFilter) -> AppResult<Self> {
        Ok(Self {
            command: filter.command().map(str::to_string),
            unit: filter.unit().map(str::to_string),
            status: filter.status()?,
            priority: filter.priority()?,
            search: filter.search().map(str::to_lowercase),
        })
    }

    pub fn matches(&self, ticket: &TicketView) -> bool {
        if let Some(command) = &self.command
            && ticket.command != *command
        {
            return false;
        }
        if let Some(unit) = &self.unit
            && ticket.unit != *unit
        {
            return false;
        }
        if let Some(status) = self.status
            && ticket.status != status
        {
            return false;
        }
        if let Some(priority) = self.priority
            && ticket.priority != priority
        {
            return false;
        }
        if let Some(search) = &self.search
            && !ticket.description.to_lowercase().contains(search.as_str())
        {
            return false;
        }
        true
    }

    pub fn apply(&self, tickets: Vec<TicketView>) -> Vec<TicketView> {
        tickets.into_iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn view(number: u64, command: &str, unit: &str, status: Status, description: &str) -> TicketView {
        TicketView {
            id: number,
            ticket_number: number,
            command_id: 0,
            command: command.into(),
            unit_id: 0,
            unit: unit.into(),
            priority: Priority::Normal,
            status,
            is_recurring: false,
            description: description.into(),
            open_date: 0,
            close_date: None,
            created_by: "admin".into(),
            assigned_technician: None,
            comments: vec![],
            updated_at: 0,
        }
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let query = TicketQuery::from_filter(&TicketFilter::default()).unwrap();
        let tickets = vec![
            view(2, "C1", "North", Status::Open, "a"),
            view(1, "C2", "North", Status::Resolved, "b"),
        ];
        let numbers: Vec<u64> = query.apply(tickets).iter().map(|t| t.ticket_number).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[test]
    fn test_filters_are_anded() {
        let filter = TicketFilter {
            command: Some("C1".into()),
            status: Some("open".into()),
            ..Default::default()
        };
        let query = TicketQuery::from_filter(&filter).unwrap();

        assert!(query.matches(&view(1, "C1", "North", Status::Open, "x")));
        assert!(!query.matches(&view(2, "C1", "North", Status::InProgress, "x")));
        assert!(!query.matches(&view(3, "C2", "North", Status::Open, "x")));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = TicketFilter {
            search: Some("GENERATOR".into()),
            ..Default::default()
        };
        let query = TicketQuery::from_filter(&filter).unwrap();
        assert!(query.matches(&view(1, "C1", "North", Status::Open, "Backup generator fails")));
        assert!(!query.matches(&view(2, "C1", "North", Status::Open, "Door lock")));
    }

    #[test]
    fn test_blank_filters_ignored() {
        let filter = TicketFilter {
            command: Some("  ".into()),
            status: Some("".into()),
            ..Default::default()
        };
        let query = TicketQuery::from_filter(&filter).unwrap();
        assert!(query.matches(&view(1, "C9", "East", Status::Resolved, "x")));
    }

    #[test]
    fn test_unknown_vocabulary_rejected() {
        let filter = TicketFilter {
            status: Some("closed".into()),
            ..Default::default()
        };
        let err = TicketQuery::from_filter(&filter).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatus);

        let filter = TicketFilter {
            priority: Some("low".into()),
            ..Default::default()
        };
        let err = TicketQuery::from_filter(&filter).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPriority);
    }
}
