//! Spreadsheet reader - first worksheet to [`RawRow`]s
//!
//! The first non-blank row is the header. Line numbers are the
//! spreadsheet's own (1-based), so error reports point at the row a user
//! sees in Excel.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use shared::error::{AppError, AppResult, ErrorCode};

use super::import::RawRow;

fn unreadable(err: impl std::fmt::Display) -> AppError {
    AppError::with_message(
        ErrorCode::SpreadsheetUnreadable,
        format!("Spreadsheet could not be read: {err}"),
    )
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Read the first worksheet of an .xlsx / .xls file
pub fn read_workbook(bytes: Vec<u8>) -> AppResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(unreadable)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::with_message(ErrorCode::EmptyFile, "Workbook has no worksheets"))?
        .map_err(unreadable)?;

    let first_line = range.start().map(|(row, _)| row + 1).unwrap_or(1);
    let grid = range
        .rows()
        .enumerate()
        .map(|(i, cells)| (first_line + i as u32, cells.iter().map(cell_text).collect()));
    rows_from_grid(grid)
}

/// Turn `(line, cells)` rows into header-keyed [`RawRow`]s
///
/// Rows before the header and completely blank rows are dropped.
pub fn rows_from_grid(
    grid: impl IntoIterator<Item = (u32, Vec<String>)>,
) -> AppResult<Vec<RawRow>> {
    let mut grid = grid
        .into_iter()
        .skip_while(|(_, cells)| cells.iter().all(|c| c.trim().is_empty()));

    let Some((_, headers)) = grid.next() else {
        return Err(AppError::with_message(ErrorCode::EmptyFile, "Spreadsheet is empty"));
    };

    let rows = grid
        .map(|(line, cells)| {
            let pairs = headers
                .iter()
                .zip(cells)
                .filter(|(header, _)| !header.trim().is_empty())
                .map(|(header, value)| (header.as_str(), value));
            RawRow::new(line, pairs)
        })
        .filter(|row| !row.is_blank())
        .collect();
    Ok(rows)
}
