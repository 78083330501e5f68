//! Shared types for the ticket server
//!
//! Error types, response envelope, pagination and the domain models
//! exchanged over the HTTP API.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use query::{Page, PageRequest};
