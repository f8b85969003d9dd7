//! Sweep orchestration for keff studies.
//!
//! A study is described by a YAML [`StudyPlan`]; the [`SweepSession`]
//! drives the patch → invoke → extract cycle over a log-uniform parameter
//! grid, guarantees the deck is restored afterwards, and hands the ordered
//! results to the reporter.

mod hash;
mod plan;
mod reporter;
mod session;
mod stats;

pub use hash::{stable_hash_string, to_canonical_json_bytes};
pub use plan::{LinkedField, ParameterPoint, StudyPlan, SweepRange};
pub use reporter::{sort_results, write_results_csv, write_summary_text};
pub use session::{PointOutcome, RunResult, SimulatorRunner, SweepReport, SweepSession};
pub use stats::{summarize, SeriesSummary};
