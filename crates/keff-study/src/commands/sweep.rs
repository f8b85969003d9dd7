use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;

use keff_exp::{
    sort_results, summarize, to_canonical_json_bytes, write_results_csv, write_summary_text,
    StudyPlan, SweepSession,
};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML study plan describing deck, program, targets, and range.
    #[arg(long)]
    pub plan: PathBuf,
    /// Output directory for results.csv, summary.txt, and sweep_report.json.
    #[arg(long)]
    pub out: PathBuf,
    /// Override the plan's sweep start value.
    #[arg(long)]
    pub start: Option<f64>,
    /// Override the plan's sweep end value.
    #[arg(long)]
    pub end: Option<f64>,
    /// Override the plan's point count.
    #[arg(long)]
    pub points: Option<usize>,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let mut plan = StudyPlan::load(&args.plan)?;
    if let Some(start) = args.start {
        plan.sweep.start = start;
    }
    if let Some(end) = args.end {
        plan.sweep.end = end;
    }
    if let Some(points) = args.points {
        plan.sweep.points = points;
    }

    let simulator = plan.simulator();
    let report = SweepSession::new(&plan).run(&simulator)?;

    fs::create_dir_all(&args.out)?;
    let bytes = to_canonical_json_bytes(&report)?;
    fs::write(args.out.join("sweep_report.json"), bytes)?;

    println!(
        "sweep finished: {} of {} points yielded valid results",
        report.succeeded, report.attempted
    );
    if report.results.is_empty() {
        return Err("no valid results; results.csv and summary.txt not written".into());
    }

    let mut results = report.results.clone();
    sort_results(&mut results);
    write_results_csv(&args.out.join("results.csv"), &results, plan.baseline_keff)?;
    let summary = summarize(&results, plan.baseline_keff)?;
    write_summary_text(
        &args.out.join("summary.txt"),
        &results,
        &summary,
        report.attempted,
    )?;
    println!(
        "keff range {:.6} - {:.6}, max change {:.4}%",
        summary.keff_min, summary.keff_max, summary.max_change_percent
    );
    Ok(())
}
