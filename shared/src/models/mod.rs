//! Data models
//!
//! Shared between ticket-server and API clients. Views carry both the
//! reference ids and the joined names; payloads carry names only.
//! All ids are `u64` (redb table keys).

pub mod reference;
pub mod import;
pub mod ticket;
pub mod user;

// Re-exports
pub use import::*;
pub use reference::*;
pub use ticket::*;
pub use user::*;

/// Trim a payload string, treating blank as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
