//! Bulk import report

use serde::{Deserialize, Serialize};

/// Maximum number of row errors reported back to the caller
pub const MAX_REPORTED_ERRORS: usize = 10;

/// Outcome of a bulk ticket import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub total_rows: u32,
    pub imported: u32,
    pub errors: u32,
    /// Percentage with one decimal, 0 when no rows
    pub success_rate: f64,
    /// First [`MAX_REPORTED_ERRORS`] failures, as "Row N: reason"
    pub error_details: Vec<String>,
    /// Failures not listed in `error_details`
    pub remaining_errors: u32,
    /// Ticket numbers assigned to the imported rows
    pub ticket_numbers: Vec<u64>,
}

impl ImportReport {
    pub fn record_success(&mut self, ticket_number: u64) {
        self.total_rows += 1;
        self.imported += 1;
        self.ticket_numbers.push(ticket_number);
    }

    pub fn record_failure(&mut self, line: u32, reason: impl AsRef<str>) {
        self.total_rows += 1;
        self.errors += 1;
        if self.error_details.len() < MAX_REPORTED_ERRORS {
            self.error_details
                .push(format!("Row {}: {}", line, reason.as_ref()));
        } else {
            self.remaining_errors += 1;
        }
    }

    /// Compute `success_rate` once all rows are recorded
    pub fn finish(mut self) -> Self {
        self.success_rate = if self.total_rows == 0 {
            0.0
        } else {
            let pct = self.imported as f64 * 100.0 / self.total_rows as f64;
            (pct * 10.0).round() / 10.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_details_are_capped() {
        let mut report = ImportReport::default();
        for line in 2..16 {
            report.record_failure(line, "description is required");
        }
        report.record_success(100);
        let report = report.finish();

        assert_eq!(report.total_rows, 15);
        assert_eq!(report.errors, 14);
        assert_eq!(report.error_details.len(), MAX_REPORTED_ERRORS);
        assert_eq!(report.remaining_errors, 4);
        assert_eq!(report.error_details[0], "Row 2: description is required");
    }

    #[test]
    fn test_success_rate_one_decimal() {
        let mut report = ImportReport::default();
        report.record_success(1);
        report.record_success(2);
        report.record_failure(4, "bad");
        let report = report.finish();
        assert_eq!(report.success_rate, 66.7);

        assert_eq!(ImportReport::default().finish().success_rate, 0.0);
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(ImportReport::default().finish()).unwrap();
        assert!(json.get("totalRows").is_some());
        assert!(json.get("successRate").is_some());
        assert!(json.get("errorDetails").is_some());
    }
}
