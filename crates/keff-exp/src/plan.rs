//! Study plan: the single configuration object a sweep is parameterized by.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use keff_core::{log_space, ErrorInfo, KeffError, RatioLink};
use keff_deck::FieldTarget;
use keff_vsop::Simulator;

/// Log-uniform parameter range for the primary field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    /// First (smallest) primary value, inclusive.
    pub start: f64,
    /// Last (largest) primary value, inclusive.
    pub end: f64,
    /// Number of sweep points, endpoints included.
    pub points: usize,
}

/// Ratio-linked dependent field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedField {
    /// The dependent deck field.
    pub target: FieldTarget,
    /// Fixed quotient the two fields maintain (default 7.95 : 5).
    #[serde(default)]
    pub ratio: RatioLink,
}

/// One generated sweep point: the primary value plus the derived linked
/// value when the plan links two fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterPoint {
    /// Primary field value.
    pub primary: f64,
    /// Derived dependent field value, when linked.
    pub linked: Option<f64>,
}

/// Complete description of a keff study, loaded from YAML.
///
/// Single-field and ratio-linked studies share this one shape; the
/// controller never branches on anything but the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    /// Input deck consumed by the simulator.
    pub deck: PathBuf,
    /// Simulator executable, invoked with no arguments.
    pub program: PathBuf,
    /// Working directory for simulator runs and report files.
    #[serde(default = "StudyPlan::default_workdir")]
    pub workdir: PathBuf,
    /// Primary patched field.
    pub primary: FieldTarget,
    /// Optional ratio-linked second field.
    #[serde(default)]
    pub linked: Option<LinkedField>,
    /// Parameter range.
    pub sweep: SweepRange,
    /// Wall-clock budget per simulator run, in seconds.
    #[serde(default = "StudyPlan::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional external reference keff the reporter computes deltas from.
    #[serde(default)]
    pub baseline_keff: Option<f64>,
}

impl StudyPlan {
    fn default_workdir() -> PathBuf {
        PathBuf::from(".")
    }

    const fn default_timeout_secs() -> u64 {
        600
    }

    /// Loads and parses a plan file.
    pub fn load(path: &Path) -> Result<Self, KeffError> {
        let text = fs::read_to_string(path).map_err(|err| {
            KeffError::Config(
                ErrorInfo::new("plan-read", "failed to read plan file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        serde_yaml::from_str(&text).map_err(|err| {
            KeffError::Config(
                ErrorInfo::new("plan-parse", "plan file is not a valid study plan")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Validates the numeric configuration before any run starts.
    pub fn validate(&self) -> Result<(), KeffError> {
        log_space(self.sweep.start, self.sweep.end, self.sweep.points)?;
        if let Some(link) = &self.linked {
            if !(link.ratio.numerator > 0.0 && link.ratio.denominator > 0.0) {
                return Err(KeffError::Config(
                    ErrorInfo::new("ratio-invalid", "ratio terms must be positive")
                        .with_context("numerator", link.ratio.numerator.to_string())
                        .with_context("denominator", link.ratio.denominator.to_string()),
                ));
            }
        }
        if self.timeout_secs == 0 {
            return Err(KeffError::Config(ErrorInfo::new(
                "timeout-invalid",
                "timeout must be at least 1 second",
            )));
        }
        Ok(())
    }

    /// Checks that the deck file exists; run before any mutation.
    pub fn check_deck(&self) -> Result<(), KeffError> {
        if self.deck_path().exists() {
            Ok(())
        } else {
            Err(KeffError::Config(
                ErrorInfo::new("deck-missing", "input deck not found")
                    .with_context("deck", self.deck_path().display().to_string()),
            ))
        }
    }

    /// Deck path resolved against the working directory.
    pub fn deck_path(&self) -> PathBuf {
        if self.deck.is_absolute() {
            self.deck.clone()
        } else {
            self.workdir.join(&self.deck)
        }
    }

    /// Generates the immutable parameter grid.
    pub fn points(&self) -> Result<Vec<ParameterPoint>, KeffError> {
        let values = log_space(self.sweep.start, self.sweep.end, self.sweep.points)?;
        Ok(values
            .into_iter()
            .map(|primary| ParameterPoint {
                primary,
                linked: self.linked.as_ref().map(|link| link.ratio.derive(primary)),
            })
            .collect())
    }

    /// Per-run timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the simulator handle described by this plan.
    pub fn simulator(&self) -> Simulator {
        Simulator::new(&self.program)
            .with_workdir(&self.workdir)
            .with_timeout(self.timeout())
    }
}
