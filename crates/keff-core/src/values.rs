//! Numeric value helpers: scientific-notation formatting, the log-uniform
//! sweep sequence, and ratio-linked parameter derivation.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, KeffError};

/// Formats a value in scientific notation with 6 significant decimals and a
/// signed two-digit exponent (`1e-8` becomes `1.000000E-08`).
///
/// The simulator's deck format and the derived report filenames both depend
/// on this exact rendering, so the exponent is always padded.
pub fn format_sci(value: f64) -> String {
    let raw = format!("{value:.6E}");
    match raw.split_once('E') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        // `{:E}` always emits an exponent; kept as a fallthrough for safety.
        None => raw,
    }
}

/// Generates `count` log-uniformly spaced values over `[start, end]`.
///
/// Samples are taken equally spaced in log10 space, endpoints included; the
/// first and last entries are forced to exactly `start` and `end` so the
/// bounds survive the round trip through `log10`/`powi`.
pub fn log_space(start: f64, end: f64, count: usize) -> Result<Vec<f64>, KeffError> {
    if count < 2 {
        return Err(KeffError::Config(
            ErrorInfo::new("sweep-count", "a sweep needs at least 2 points")
                .with_context("points", count.to_string()),
        ));
    }
    if !(start > 0.0) {
        return Err(KeffError::Config(
            ErrorInfo::new("sweep-domain", "log-uniform sweeps need a positive start value")
                .with_context("start", start.to_string()),
        ));
    }
    if !(start < end) {
        return Err(KeffError::Config(
            ErrorInfo::new("sweep-bounds", "sweep start must be strictly below end")
                .with_context("start", start.to_string())
                .with_context("end", end.to_string()),
        ));
    }

    let log_start = start.log10();
    let log_end = end.log10();
    let step = (log_end - log_start) / (count - 1) as f64;
    let mut values: Vec<f64> = (0..count)
        .map(|i| 10f64.powf(log_start + i as f64 * step))
        .collect();
    values[0] = start;
    values[count - 1] = end;
    Ok(values)
}

/// Fixed quotient linking a primary deck field to a dependent one.
///
/// The dependent value is `primary / (numerator / denominator)`; the default
/// link is the 7.95 : 5 ratio between the two fuel-loading records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioLink {
    /// Numerator of the fixed quotient.
    pub numerator: f64,
    /// Denominator of the fixed quotient.
    pub denominator: f64,
}

impl Default for RatioLink {
    fn default() -> Self {
        Self {
            numerator: 7.95,
            denominator: 5.0,
        }
    }
}

impl RatioLink {
    /// Returns the quotient the two linked fields must maintain.
    pub fn ratio(&self) -> f64 {
        self.numerator / self.denominator
    }

    /// Derives the dependent field value from the primary one.
    pub fn derive(&self, primary: f64) -> f64 {
        primary / self.ratio()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn sci_format_pads_the_exponent() {
        assert_eq!(format_sci(1e-8), "1.000000E-08");
        assert_eq!(format_sci(9e-7), "9.000000E-07");
        assert_eq!(format_sci(1.0), "1.000000E+00");
        assert_eq!(format_sci(1.2237), "1.223700E+00");
        assert_eq!(format_sci(-3.5e12), "-3.500000E+12");
        assert_eq!(format_sci(0.0), "0.000000E+00");
    }

    #[test]
    fn log_space_matches_the_reference_grid() {
        let values = log_space(1e-8, 9e-7, 9).expect("sequence");
        let expected = [
            1.0e-8, 1.755013e-8, 3.08007e-8, 5.405563e-8, 9.486833e-8, 1.664951e-7, 2.922011e-7,
            5.128167e-7, 9.0e-7,
        ];
        assert_eq!(values.len(), expected.len());
        for (got, want) in values.iter().zip(expected) {
            assert!(
                (got - want).abs() / want < 1e-6,
                "got {got:e}, expected {want:e}"
            );
        }
        assert_eq!(values[0], 1e-8);
        assert_eq!(values[8], 9e-7);
    }

    #[test]
    fn log_space_rejects_bad_configurations() {
        let too_few = log_space(1e-8, 9e-7, 1).unwrap_err();
        assert_eq!(too_few.info().code, "sweep-count");
        let inverted = log_space(9e-7, 1e-8, 5).unwrap_err();
        assert_eq!(inverted.info().code, "sweep-bounds");
        let nonpositive = log_space(0.0, 1e-6, 5).unwrap_err();
        assert_eq!(nonpositive.info().code, "sweep-domain");
    }

    #[test]
    fn default_ratio_is_7_95_to_5() {
        let link = RatioLink::default();
        assert!((link.ratio() - 1.59).abs() < 1e-12);
        let derived = link.derive(7.95e-8);
        assert!((derived - 5.0e-8).abs() < 1e-20);
    }

    proptest! {
        #[test]
        fn log_space_is_a_geometric_progression(
            start_exp in -12.0f64..-2.0,
            span in 0.5f64..6.0,
            count in 2usize..32,
        ) {
            let start = 10f64.powf(start_exp);
            let end = 10f64.powf(start_exp + span);
            let values = log_space(start, end, count).unwrap();
            prop_assert_eq!(values.len(), count);
            prop_assert!((values[0] - start).abs() <= start * 1e-12);
            prop_assert!((values[count - 1] - end).abs() <= end * 1e-12);
            let expected_ratio = (end / start).powf(1.0 / (count - 1) as f64);
            for pair in values.windows(2) {
                prop_assert!(pair[0] < pair[1]);
                let ratio = pair[1] / pair[0];
                prop_assert!((ratio / expected_ratio - 1.0).abs() < 1e-9);
            }
        }

        #[test]
        fn derived_value_restores_the_ratio(primary in 1e-12f64..1e3) {
            let link = RatioLink::default();
            let derived = link.derive(primary);
            prop_assert!((primary / derived - link.ratio()).abs() < 1e-9);
        }
    }
}
