use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use keff_deck::backup_path_for;
use keff_exp::{to_canonical_json_bytes, StudyPlan};

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Study plan to check.
    #[arg(long)]
    pub plan: PathBuf,
    /// Emit only the JSON report.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(args: &DoctorArgs) -> Result<(), Box<dyn Error>> {
    let report = diagnose(args);
    let json = to_canonical_json_bytes(&report)?;
    let rendered = String::from_utf8(json)?;
    if args.quiet {
        println!("{rendered}");
    } else {
        println!("keff-study doctor status: {}", report.status);
        println!("{rendered}");
    }
    if report.status != "ok" {
        return Err("one or more checks failed".into());
    }
    Ok(())
}

fn diagnose(args: &DoctorArgs) -> DoctorReport {
    let mut checks = Vec::new();

    let plan = match StudyPlan::load(&args.plan) {
        Ok(plan) => {
            checks.push(check("plan-parse", true, "plan file parsed"));
            Some(plan)
        }
        Err(err) => {
            checks.push(check("plan-parse", false, &err.to_string()));
            None
        }
    };

    if let Some(plan) = &plan {
        match plan.validate() {
            Ok(()) => checks.push(check("sweep-config", true, "sweep range is valid")),
            Err(err) => checks.push(check("sweep-config", false, &err.to_string())),
        }
        let deck = plan.deck_path();
        checks.push(check(
            "deck-file",
            deck.exists(),
            &deck.display().to_string(),
        ));
        let simulator = plan.simulator();
        checks.push(check(
            "simulator-program",
            simulator.preflight().is_ok(),
            &plan.program.display().to_string(),
        ));
        // A leftover backup is not an error; it just means the next sweep
        // will reuse the original snapshot.
        let backup = backup_path_for(&deck);
        let detail = if backup.exists() {
            format!("{} (present, will be reused)", backup.display())
        } else {
            format!("{} (absent, will be created)", backup.display())
        };
        checks.push(check("deck-backup", true, &detail));
    }

    let status = if checks.iter().all(|c| c.ok) {
        "ok"
    } else {
        "failed"
    };
    DoctorReport {
        status: status.to_string(),
        checks,
    }
}

fn check(name: &str, ok: bool, detail: &str) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        ok,
        detail: detail.to_string(),
    }
}
