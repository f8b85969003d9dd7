//! The sweep controller: patch → invoke → extract per point, with the deck
//! restored on every exit path.

use serde::{Deserialize, Serialize};

use keff_core::{format_sci, ErrorInfo, KeffError};
use keff_deck::{patch_field, patch_linked_fields, BackupGuard, Deck};
use keff_vsop::{extract_keff, report_filename, Simulator};

use crate::hash::stable_hash_string;
use crate::plan::{ParameterPoint, StudyPlan};

/// Seam between the controller and the external simulator, so sweeps can be
/// exercised against a scripted stand-in.
pub trait SimulatorRunner {
    /// Runs one simulation case. `deck_name` and `report_name` are the two
    /// lines of the console transcript, relative to the working directory.
    fn run_case(&self, deck_name: &str, report_name: &str) -> Result<(), KeffError>;

    /// Checks preconditions (e.g. executable present) before the deck is
    /// backed up or touched.
    fn preflight(&self) -> Result<(), KeffError> {
        Ok(())
    }
}

impl SimulatorRunner for Simulator {
    fn run_case(&self, deck_name: &str, report_name: &str) -> Result<(), KeffError> {
        Simulator::run_case(self, deck_name, report_name)
    }

    fn preflight(&self) -> Result<(), KeffError> {
        Simulator::preflight(self)
    }
}

/// One successful sweep point. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Primary field value.
    pub primary: f64,
    /// Derived linked field value, when the plan links two fields.
    pub linked: Option<f64>,
    /// Extracted effective neutron multiplication factor.
    pub keff: f64,
    /// Report file the value was scraped from.
    pub report_file: String,
}

/// Per-point outcome recorded for reproducibility, completed or skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOutcome {
    /// 1-based point index in sweep order.
    pub index: usize,
    /// Primary field value for the point.
    pub primary: f64,
    /// `completed` or `skipped`.
    pub status: String,
    /// Failure detail when the point was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Aggregate session report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Stable hash of the plan that produced this report.
    pub plan_hash: String,
    /// Number of points attempted.
    pub attempted: usize,
    /// Number of points that yielded a valid keff.
    pub succeeded: usize,
    /// Per-point outcomes in sweep order.
    pub outcomes: Vec<PointOutcome>,
    /// Successful results in sweep order.
    pub results: Vec<RunResult>,
}

/// Drives one sweep over a study plan.
pub struct SweepSession<'a> {
    plan: &'a StudyPlan,
}

impl<'a> SweepSession<'a> {
    /// Creates a session for the given plan.
    pub fn new(plan: &'a StudyPlan) -> Self {
        Self { plan }
    }

    /// Runs the full sweep.
    ///
    /// Configuration errors (invalid bounds, missing deck or executable)
    /// abort before any mutation. Point-local failures (patch, invoke,
    /// extract) are logged and skipped; deck I/O failures abort the sweep.
    /// The deck is restored from its backup on every exit path: explicitly
    /// after the loop, and through the guard's `Drop` when an error
    /// propagates or anything unwinds.
    pub fn run(&self, runner: &dyn SimulatorRunner) -> Result<SweepReport, KeffError> {
        self.plan.validate()?;
        self.plan.check_deck()?;
        runner.preflight()?;
        let points = self.plan.points()?;
        let plan_hash = stable_hash_string(self.plan)?;
        tracing::info!(
            points = points.len(),
            start = %format_sci(self.plan.sweep.start),
            end = %format_sci(self.plan.sweep.end),
            plan_hash = %plan_hash,
            "sweep starting"
        );

        let mut guard = BackupGuard::acquire(&self.plan.deck_path())?;
        let (outcomes, results) = self.run_points(&points, runner)?;
        guard.restore()?;

        let report = SweepReport {
            plan_hash,
            attempted: points.len(),
            succeeded: results.len(),
            outcomes,
            results,
        };
        tracing::info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            "sweep finished"
        );
        Ok(report)
    }

    fn run_points(
        &self,
        points: &[ParameterPoint],
        runner: &dyn SimulatorRunner,
    ) -> Result<(Vec<PointOutcome>, Vec<RunResult>), KeffError> {
        let mut outcomes = Vec::with_capacity(points.len());
        let mut results = Vec::new();
        for (idx, point) in points.iter().enumerate() {
            let index = idx + 1;
            tracing::info!(
                point = index,
                total = points.len(),
                primary = %format_sci(point.primary),
                "sweep point"
            );
            match self.run_point(point, runner) {
                Ok(result) => {
                    tracing::info!(point = index, keff = result.keff, "point completed");
                    outcomes.push(PointOutcome {
                        index,
                        primary: point.primary,
                        status: "completed".to_string(),
                        error: None,
                    });
                    results.push(result);
                }
                Err(err) if err.is_point_local() => {
                    tracing::warn!(point = index, error = %err, "point skipped");
                    outcomes.push(PointOutcome {
                        index,
                        primary: point.primary,
                        status: "skipped".to_string(),
                        error: Some(err.info().clone()),
                    });
                }
                // Deck I/O failures are not local to one point; abort and
                // let the guard restore the deck.
                Err(err) => return Err(err),
            }
        }
        Ok((outcomes, results))
    }

    fn run_point(
        &self,
        point: &ParameterPoint,
        runner: &dyn SimulatorRunner,
    ) -> Result<RunResult, KeffError> {
        let mut deck = Deck::load(&self.plan.deck_path())?;
        match &self.plan.linked {
            Some(link) => {
                patch_linked_fields(
                    &mut deck,
                    &self.plan.primary,
                    &link.target,
                    &link.ratio,
                    point.primary,
                )?;
            }
            None => patch_field(&mut deck, &self.plan.primary, point.primary)?,
        }
        deck.write()?;

        let deck_name = self.plan.deck.to_string_lossy().into_owned();
        let report_name = report_filename(point.primary);
        runner.run_case(&deck_name, &report_name)?;

        let keff = extract_keff(&self.plan.workdir.join(&report_name))?;
        Ok(RunResult {
            primary: point.primary,
            linked: point.linked,
            keff,
            report_file: report_name,
        })
    }
}
