//! Aggregate statistics over a result series.

use serde::{Deserialize, Serialize};

use keff_core::{ErrorInfo, KeffError};

use crate::session::RunResult;

/// Summary statistics for the keff series, computed over results sorted by
/// primary parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of valid results.
    pub count: usize,
    /// Smallest keff in the series.
    pub keff_min: f64,
    /// Largest keff in the series.
    pub keff_max: f64,
    /// Arithmetic mean.
    pub keff_mean: f64,
    /// Population standard deviation.
    pub keff_std_dev: f64,
    /// `keff_max - keff_min`.
    pub keff_range: f64,
    /// Largest |percent change| relative to the first (sorted) result.
    /// Zero when that reference keff is itself zero, which only synthetic
    /// reports produce.
    pub max_change_percent: f64,
    /// External reference keff, when the plan provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_keff: Option<f64>,
    /// Largest |keff - baseline| over the series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_baseline_delta: Option<f64>,
}

/// Computes the series summary. Fails with `no-results` on an empty series;
/// the caller then simply produces no artifact.
pub fn summarize(results: &[RunResult], baseline: Option<f64>) -> Result<SeriesSummary, KeffError> {
    if results.is_empty() {
        return Err(KeffError::Report(ErrorInfo::new(
            "no-results",
            "no valid results to summarize",
        )));
    }
    let keffs: Vec<f64> = results.iter().map(|r| r.keff).collect();
    let count = keffs.len();
    let keff_min = keffs.iter().copied().fold(f64::INFINITY, f64::min);
    let keff_max = keffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let keff_mean = keffs.iter().sum::<f64>() / count as f64;
    let keff_std_dev = (keffs
        .iter()
        .map(|k| (k - keff_mean).powi(2))
        .sum::<f64>()
        / count as f64)
        .sqrt();
    let first = keffs[0];
    let max_change_percent = if first == 0.0 {
        0.0
    } else {
        keffs
            .iter()
            .map(|k| ((k - first) / first * 100.0).abs())
            .fold(0.0f64, f64::max)
    };
    let max_baseline_delta =
        baseline.map(|base| keffs.iter().map(|k| (k - base).abs()).fold(0.0f64, f64::max));

    Ok(SeriesSummary {
        count,
        keff_min,
        keff_max,
        keff_mean,
        keff_std_dev,
        keff_range: keff_max - keff_min,
        max_change_percent,
        baseline_keff: baseline,
        max_baseline_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(primary: f64, keff: f64) -> RunResult {
        RunResult {
            primary,
            linked: None,
            keff,
            report_file: format!("{primary:E}.out"),
        }
    }

    #[test]
    fn summary_matches_hand_computed_values() {
        let results = vec![
            result(1e-8, 1.20),
            result(1e-7, 1.22),
            result(1e-6, 1.24),
        ];
        let summary = summarize(&results, Some(1.0)).expect("summary");
        assert_eq!(summary.count, 3);
        assert!((summary.keff_min - 1.20).abs() < 1e-12);
        assert!((summary.keff_max - 1.24).abs() < 1e-12);
        assert!((summary.keff_mean - 1.22).abs() < 1e-12);
        let expected_std = (2.0f64 * 0.02f64.powi(2) / 3.0).sqrt();
        assert!((summary.keff_std_dev - expected_std).abs() < 1e-12);
        assert!((summary.keff_range - 0.04).abs() < 1e-12);
        assert!((summary.max_change_percent - 0.04 / 1.20 * 100.0).abs() < 1e-9);
        assert!((summary.max_baseline_delta.unwrap() - 0.24).abs() < 1e-12);
    }

    #[test]
    fn zero_reference_keff_stays_finite() {
        let results = vec![result(1e-8, 0.0), result(1e-7, 0.01)];
        let summary = summarize(&results, None).expect("summary");
        assert_eq!(summary.max_change_percent, 0.0);
        assert!(summary.keff_mean.is_finite());
        assert!((summary.keff_range - 0.01).abs() < 1e-12);
    }

    #[test]
    fn empty_series_yields_no_results_error() {
        let err = summarize(&[], None).unwrap_err();
        assert_eq!(err.info().code, "no-results");
    }
}
