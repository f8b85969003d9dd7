use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use keff_vsop::extract_keff;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Report file produced by a simulator run.
    #[arg(long)]
    pub report: PathBuf,
}

pub fn run(args: &ExtractArgs) -> Result<(), Box<dyn Error>> {
    let keff = extract_keff(&args.report)?;
    println!("keff = {keff:.6}");
    Ok(())
}
