//! Repository Module
//!
//! Per-entity lookups and writes over redb transactions. Reads accept any
//! [`TableReader`](super::TableReader) so they work inside a write
//! transaction as well as against a read snapshot; writes take the
//! [`WriteTransaction`](redb::WriteTransaction) they must commit with.

// Reference data
pub mod command;
pub mod unit;

// Accounts
pub mod user;

// Tickets
pub mod ticket;
