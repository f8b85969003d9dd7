//! Tabular and plain-text result artifacts.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use keff_core::{format_sci, ErrorInfo, KeffError};

use crate::session::RunResult;
use crate::stats::SeriesSummary;

/// Sorts results by primary parameter value, ascending.
pub fn sort_results(results: &mut [RunResult]) {
    results.sort_by(|a, b| a.primary.total_cmp(&b.primary));
}

/// Writes the per-result table.
///
/// Columns: index, parameter value(s) in scientific notation, keff, delta
/// and percent delta from the first (sorted) result, optional delta from an
/// external baseline, and the source report filename. Results must already
/// be sorted.
pub fn write_results_csv(
    path: &Path,
    results: &[RunResult],
    baseline: Option<f64>,
) -> Result<(), KeffError> {
    if results.is_empty() {
        return Err(KeffError::Report(ErrorInfo::new(
            "no-results",
            "no valid results to tabulate",
        )));
    }
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|err| wrap_csv("results-open", path, err))?;
    writer
        .write_record([
            "index",
            "primary_value",
            "linked_value",
            "keff",
            "keff_delta",
            "keff_delta_percent",
            "baseline_delta",
            "report_file",
        ])
        .map_err(|err| wrap_csv("results-header", path, err))?;

    let first_keff = results[0].keff;
    for (idx, result) in results.iter().enumerate() {
        let delta = result.keff - first_keff;
        // A zero reference keff only occurs in synthetic reports; leave the
        // percent column empty rather than emit inf/NaN cells.
        let delta_percent = if first_keff == 0.0 {
            String::new()
        } else {
            format!("{:.4}", delta / first_keff * 100.0)
        };
        let record = [
            (idx + 1).to_string(),
            format_sci(result.primary),
            result.linked.map(format_sci).unwrap_or_default(),
            format!("{:.6}", result.keff),
            format!("{delta:.6}"),
            delta_percent,
            baseline
                .map(|base| format!("{:.6}", result.keff - base))
                .unwrap_or_default(),
            result.report_file.clone(),
        ];
        writer
            .write_record(record)
            .map_err(|err| wrap_csv("results-row", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_csv("results-flush", path, err.into()))?;
    Ok(())
}

/// Writes the plain-text statistical summary next to the CSV table.
pub fn write_summary_text(
    path: &Path,
    results: &[RunResult],
    summary: &SeriesSummary,
    attempted: usize,
) -> Result<(), KeffError> {
    let (Some(first), Some(last)) = (results.first(), results.last()) else {
        return Err(KeffError::Report(ErrorInfo::new(
            "no-results",
            "no valid results to summarize",
        )));
    };
    let mut body = Vec::new();
    render_summary(&mut body, first, last, summary, attempted).map_err(|err| {
        KeffError::Report(
            ErrorInfo::new("summary-render", "failed to render summary")
                .with_hint(err.to_string()),
        )
    })?;
    fs::write(path, body).map_err(|err| {
        KeffError::Report(
            ErrorInfo::new("summary-write", "failed to write summary file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}

fn render_summary(
    out: &mut impl Write,
    first: &RunResult,
    last: &RunResult,
    summary: &SeriesSummary,
    attempted: usize,
) -> std::io::Result<()> {
    writeln!(out, "keff study summary")?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out)?;
    writeln!(out, "parameters:")?;
    writeln!(
        out,
        "  primary value range: {} - {}",
        format_sci(first.primary),
        format_sci(last.primary)
    )?;
    if let (Some(lo), Some(hi)) = (first.linked, last.linked) {
        writeln!(
            out,
            "  linked value range:  {} - {}",
            format_sci(lo),
            format_sci(hi)
        )?;
        writeln!(out, "  achieved ratio:      {:.3}", first.primary / lo)?;
    }
    writeln!(out)?;
    writeln!(out, "results:")?;
    writeln!(
        out,
        "  keff range:          {:.6} - {:.6}",
        summary.keff_min, summary.keff_max
    )?;
    writeln!(out, "  keff spread:         {:.6}", summary.keff_range)?;
    writeln!(out, "  keff mean:           {:.6}", summary.keff_mean)?;
    writeln!(out, "  keff std dev:        {:.6}", summary.keff_std_dev)?;
    writeln!(
        out,
        "  max change:          {:.4}%",
        summary.max_change_percent
    )?;
    if let (Some(base), Some(delta)) = (summary.baseline_keff, summary.max_baseline_delta) {
        writeln!(out, "  baseline keff:       {base:.6}")?;
        writeln!(out, "  max baseline delta:  {delta:.6}")?;
    }
    writeln!(
        out,
        "  valid results:       {} of {} points",
        summary.count, attempted
    )?;
    Ok(())
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> KeffError {
    KeffError::Report(
        ErrorInfo::new(code, "failed to write results table")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
