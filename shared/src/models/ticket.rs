//! Ticket Model

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::Urgent, Priority::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Urgent => "urgent",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" => Ok(Priority::Normal),
            "urgent" => Ok(Priority::Urgent),
            "critical" => Ok(Priority::Critical),
            other => Err(AppError::new(ErrorCode::InvalidPriority).with_detail("value", other)),
        }
    }
}

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Status::Resolved)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Status::Open),
            "in_progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            other => Err(AppError::new(ErrorCode::InvalidStatus).with_detail("value", other)),
        }
    }
}

/// Comment appended to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub content: String,
    pub created_at: i64,
}

/// Ticket response with command/unit names joined in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub id: u64,
    pub ticket_number: u64,
    pub command_id: u64,
    pub command: String,
    pub unit_id: u64,
    pub unit: String,
    pub priority: Priority,
    pub status: Status,
    pub is_recurring: bool,
    pub description: String,
    pub open_date: i64,
    pub close_date: Option<i64>,
    pub created_by: String,
    pub assigned_technician: Option<String>,
    pub comments: Vec<Comment>,
    pub updated_at: i64,
}

/// Create ticket payload
///
/// Enum fields arrive as text so an unknown value surfaces as a
/// vocabulary error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreate {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub unit: String,
    pub priority: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_recurring: bool,
}

/// Partial ticket update; only supplied fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub priority: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub is_recurring: Option<bool>,
    /// Empty string clears the assignment
    pub assigned_technician: Option<String>,
}

/// Comment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentCreate {
    #[serde(default)]
    pub content: String,
}

/// List filters; all supplied filters are ANDed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub command: Option<String>,
    pub unit: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn command(&self) -> Option<&str> {
        super::non_blank(self.command.as_deref())
    }

    pub fn unit(&self) -> Option<&str> {
        super::non_blank(self.unit.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        super::non_blank(self.search.as_deref())
    }

    /// Parsed status filter (blank means "any")
    pub fn status(&self) -> Result<Option<Status>, AppError> {
        super::non_blank(self.status.as_deref())
            .map(str::parse)
            .transpose()
    }

    /// Parsed priority filter (blank means "any")
    pub fn priority(&self) -> Result<Option<Priority>, AppError> {
        super::non_blank(self.priority.as_deref())
            .map(str::parse)
            .transpose()
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub normal: u64,
    pub urgent: u64,
    pub critical: u64,
    pub recurring: u64,
}

impl TicketStats {
    pub fn record(&mut self, status: Status, priority: Priority, is_recurring: bool) {
        self.total += 1;
        match status {
            Status::Open => self.open += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Resolved => self.resolved += 1,
        }
        match priority {
            Priority::Normal => self.normal += 1,
            Priority::Urgent => self.urgent += 1,
            Priority::Critical => self.critical += 1,
        }
        if is_recurring {
            self.recurring += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_vocabulary() {
        for p in Priority::ALL {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
        let err = "high".parse::<Priority>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPriority);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_status_vocabulary() {
        for s in Status::ALL {
            assert_eq!(s.as_str().parse::<Status>().unwrap(), s);
        }
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in_progress\""
        );
        let err = "closed".parse::<Status>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatus);
        assert!(err.is_validation());
    }

    #[test]
    fn test_filter_blank_is_any() {
        let filter = TicketFilter {
            command: Some("  ".into()),
            status: Some(String::new()),
            search: Some(" leak ".into()),
            ..Default::default()
        };
        assert_eq!(filter.command(), None);
        assert_eq!(filter.status().unwrap(), None);
        assert_eq!(filter.search(), Some("leak"));
    }

    #[test]
    fn test_filter_rejects_unknown_vocabulary() {
        let filter = TicketFilter {
            priority: Some("whenever".into()),
            ..Default::default()
        };
        assert_eq!(
            filter.priority().unwrap_err().code,
            ErrorCode::InvalidPriority
        );
    }

    #[test]
    fn test_create_payload_defaults() {
        let payload: TicketCreate =
            serde_json::from_str(r#"{"command":"North","unit":"Alpha"}"#).unwrap();
        assert!(payload.description.is_empty());
        assert!(payload.priority.is_none());
        assert!(!payload.is_recurring);
    }

    #[test]
    fn test_stats_record() {
        let mut stats = TicketStats::default();
        stats.record(Status::Open, Priority::Urgent, true);
        stats.record(Status::Resolved, Priority::Normal, false);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.recurring, 1);
    }
}
