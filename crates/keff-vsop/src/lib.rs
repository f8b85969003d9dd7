//! Interface to the external VSOP simulator executable.
//!
//! The simulator is an opaque binary driven over a two-line console
//! transcript (deck filename, then report filename) and answered through a
//! fixed-format text report. This crate owns both ends of that boundary:
//! launching and reaping the child process, and scraping keff back out of
//! the report.

mod invoke;
mod report;

pub use invoke::{report_filename, Simulator, DEFAULT_TIMEOUT};
pub use report::{extract_keff, KEFF_COLUMN, SUMMARY_HEADER, SUMMARY_ROW_OFFSET};
