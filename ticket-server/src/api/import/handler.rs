//! Import Handler
//!
//! Reads the uploaded workbook, then hands its rows to the import service.
//! Row-level problems end up in the report; only file-level problems fail
//! the request.

use std::path::Path;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::ImportReport;

use crate::api::{ApiResult, blocking};
use crate::auth::Actor;
use crate::core::ServerState;
use crate::services::spreadsheet;

/// Multipart field carrying the workbook
const FILE_FIELD: &str = "excelFile";

/// Accepted workbook extensions
const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

fn multipart_error(err: impl std::fmt::Display) -> AppError {
    AppError::invalid_request(format!("Invalid multipart request: {err}"))
}

fn file_too_large(max_bytes: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!("File too large (max {} MB)", max_bytes / (1024 * 1024)),
    )
    .with_detail("maxBytes", max_bytes)
}

/// Validate the file name and return its lowercase extension
fn check_extension(filename: &str) -> AppResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            "Only Excel files (.xlsx, .xls) are allowed",
        )
        .with_detail("filename", filename))
    }
}

/// Upload handler: POST /api/import/tickets
pub async fn import_tickets(
    State(state): State<ServerState>,
    actor: Actor,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ImportReport> {
    let mut multipart = multipart?;
    let max_bytes = state.config.max_import_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        check_extension(&filename)?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > max_bytes {
                return Err(file_too_large(max_bytes));
            }
            data.extend_from_slice(&chunk);
        }
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload
        .ok_or_else(|| AppError::with_message(ErrorCode::NoFileProvided, "No file uploaded"))?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    tracing::info!(
        filename = %filename,
        size = data.len(),
        imported_by = %actor.username,
        "Ticket import started"
    );

    let import = state.import.clone();
    let report = blocking(move || {
        let rows = spreadsheet::read_workbook(data)?;
        import.import_rows(&actor, rows)
    })
    .await?;

    let message = format!("Imported {} of {} rows", report.imported, report.total_rows);
    Ok(ApiResponse::success_with_message(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_extension() {
        assert_eq!(check_extension("tickets.xlsx").unwrap(), "xlsx");
        assert_eq!(check_extension("OLD.XLS").unwrap(), "xls");

        for name in ["tickets.csv", "tickets", "", "xlsx"] {
            let err = check_extension(name).unwrap_err();
            assert_eq!(err.code, ErrorCode::UnsupportedFileFormat, "{name}");
        }
    }

    #[test]
    fn test_file_too_large_message() {
        let err = file_too_large(10 * 1024 * 1024);
        assert_eq!(err.code, ErrorCode::FileTooLarge);
        assert!(err.message.contains("10 MB"));
    }
}
