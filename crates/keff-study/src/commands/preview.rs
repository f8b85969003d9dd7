use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use keff_core::{format_sci, log_space, RatioLink};
use keff_exp::StudyPlan;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Study plan to preview; range flags below override its sweep section.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Sweep start value (required without --plan).
    #[arg(long, required_unless_present = "plan")]
    pub start: Option<f64>,
    /// Sweep end value (required without --plan).
    #[arg(long, required_unless_present = "plan")]
    pub end: Option<f64>,
    /// Number of points (defaults to the plan's count, or 9).
    #[arg(long)]
    pub points: Option<usize>,
    /// Also show the ratio-linked value column (implied by a linked plan).
    #[arg(long)]
    pub linked: bool,
}

pub fn run(args: &PreviewArgs) -> Result<(), Box<dyn Error>> {
    let plan = match &args.plan {
        Some(path) => Some(StudyPlan::load(path)?),
        None => None,
    };
    let (start, end, points) = match &plan {
        Some(plan) => (
            args.start.unwrap_or(plan.sweep.start),
            args.end.unwrap_or(plan.sweep.end),
            args.points.unwrap_or(plan.sweep.points),
        ),
        None => {
            let start = args.start.ok_or("--start is required without --plan")?;
            let end = args.end.ok_or("--end is required without --plan")?;
            (start, end, args.points.unwrap_or(9))
        }
    };
    let ratio = plan
        .as_ref()
        .and_then(|p| p.linked.as_ref().map(|l| l.ratio))
        .or_else(|| args.linked.then(RatioLink::default));

    let values = log_space(start, end, points)?;

    println!("span analysis:");
    println!("  absolute span: {}", format_sci(end - start));
    println!("  relative span: {:.1}x", end / start);
    println!("  decades:       {:.2}", (end / start).log10());
    println!();

    match ratio {
        Some(ratio) => {
            println!("  #  | primary value | linked value  | ratio");
            println!("{}", "-".repeat(48));
            for (idx, value) in values.iter().enumerate() {
                let derived = ratio.derive(*value);
                println!(
                    "{:3}  | {} | {} | {:.3}",
                    idx + 1,
                    format_sci(*value),
                    format_sci(derived),
                    value / derived
                );
            }
        }
        None => {
            println!("  #  | primary value");
            println!("{}", "-".repeat(22));
            for (idx, value) in values.iter().enumerate() {
                println!("{:3}  | {}", idx + 1, format_sci(*value));
            }
        }
    }
    Ok(())
}
