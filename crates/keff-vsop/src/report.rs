//! keff extraction from the simulator's text report.

use std::path::Path;

use keff_core::encoding::read_text;
use keff_core::{ErrorInfo, KeffError};

/// Column-header line marking the steady-state summary block.
pub const SUMMARY_HEADER: &str =
    "TIME (D)   K-EFF    POW-DENS   POW/BALL   FUEL TEMP    DISCH.-BU   POWER    TEMP.   TEMP.";

/// The summary row sits this many lines below the header, not immediately
/// beneath it.
pub const SUMMARY_ROW_OFFSET: usize = 3;

/// 1-indexed whitespace-split column holding keff in the summary row.
pub const KEFF_COLUMN: usize = 3;

/// Scrapes keff from a report file.
pub fn extract_keff(path: &Path) -> Result<f64, KeffError> {
    let (text, _) = read_text(path).map_err(KeffError::Extract)?;
    extract_from_text(&text, path)
}

fn extract_from_text(text: &str, path: &Path) -> Result<f64, KeffError> {
    let lines: Vec<&str> = text.lines().collect();
    let header_idx = lines
        .iter()
        .position(|line| line.contains(SUMMARY_HEADER))
        .ok_or_else(|| {
            KeffError::Extract(
                ErrorInfo::new("header-not-found", "summary header missing from report")
                    .with_context("path", path.display().to_string()),
            )
        })?;
    tracing::debug!(line = header_idx + 1, "found summary header");

    let row_idx = header_idx + SUMMARY_ROW_OFFSET;
    let row = lines.get(row_idx).ok_or_else(|| {
        KeffError::Extract(
            ErrorInfo::new("row-out-of-range", "summary row lies beyond end of report")
                .with_context("header_line", (header_idx + 1).to_string())
                .with_context("lines", lines.len().to_string()),
        )
    })?;

    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < KEFF_COLUMN {
        return Err(KeffError::Extract(
            ErrorInfo::new("row-truncated", "summary row has too few fields")
                .with_context("fields", fields.len().to_string())
                .with_context("row", row.trim_end().to_string()),
        ));
    }
    let token = fields[KEFF_COLUMN - 1];
    token.parse::<f64>().map_err(|_| {
        KeffError::Extract(
            ErrorInfo::new("keff-unparsable", "keff column is not a floating-point literal")
                .with_context("token", token.to_string())
                .with_context("row", row.trim_end().to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_report(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("1.000000E-08.out");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    fn report_with_summary(keff: &str) -> String {
        format!(
            "VSOP RUN LOG\n\
             preamble\n\
             {SUMMARY_HEADER}\n\
             -----------------------------------------\n\
             (units)\n\
             0.0   720.0   {keff}   3.05   1.85   912.4   88.1   12.5   610.0   380.0\n\
             trailing\n"
        )
    }

    #[test]
    fn keff_is_read_from_the_third_column_three_rows_down() {
        let (_dir, path) = write_report(&report_with_summary("1.223700"));
        let keff = extract_keff(&path).expect("extract");
        assert!((keff - 1.2237).abs() < 1e-12);
    }

    #[test]
    fn missing_header_fails_cleanly() {
        let (_dir, path) = write_report("no summary block in this report\n");
        let err = extract_keff(&path).unwrap_err();
        assert_eq!(err.info().code, "header-not-found");
    }

    #[test]
    fn short_file_after_header_is_rejected() {
        let body = format!("{SUMMARY_HEADER}\nonly one line follows\n");
        let (_dir, path) = write_report(&body);
        let err = extract_keff(&path).unwrap_err();
        assert_eq!(err.info().code, "row-out-of-range");
    }

    #[test]
    fn truncated_summary_row_is_rejected() {
        let body = format!("{SUMMARY_HEADER}\n-\n-\n0.0 720.0\n");
        let (_dir, path) = write_report(&body);
        let err = extract_keff(&path).unwrap_err();
        assert_eq!(err.info().code, "row-truncated");
    }

    #[test]
    fn non_numeric_keff_is_rejected() {
        let (_dir, path) = write_report(&report_with_summary("n/a"));
        let err = extract_keff(&path).unwrap_err();
        assert_eq!(err.info().code, "keff-unparsable");
        assert_eq!(err.info().context.get("token").unwrap(), "n/a");
    }
}
