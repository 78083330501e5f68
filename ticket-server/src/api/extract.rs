//! Request extractors with enveloped rejections
//!
//! Drop-in replacements for axum's `Json`, `Query` and `Path`: a body, query
//! string or path segment that fails to parse becomes an [`AppError`], so
//! the client still receives the `ApiResponse` envelope and a 400.

use axum::extract::{FromRequest, FromRequestParts};
use shared::error::AppError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);
