use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    doctor::{self, DoctorArgs},
    extract::{self, ExtractArgs},
    preview::{self, PreviewArgs},
    restore::{self, RestoreArgs},
    sweep::{self, SweepArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "keff-study", about = "Automated keff parameter studies for the VSOP simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full parameter sweep from a study plan.
    Sweep(SweepArgs),
    /// Print the parameter grid a plan or range would produce, without
    /// touching the deck.
    Preview(PreviewArgs),
    /// Scrape keff out of one existing report file.
    Extract(ExtractArgs),
    /// Check that a study environment is runnable.
    Doctor(DoctorArgs),
    /// Restore the deck from its backup on demand.
    Restore(RestoreArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sweep(args) => sweep::run(&args),
        Command::Preview(args) => preview::run(&args),
        Command::Extract(args) => extract::run(&args),
        Command::Doctor(args) => doctor::run(&args),
        Command::Restore(args) => restore::run(&args),
    }
}
