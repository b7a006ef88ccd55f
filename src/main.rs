use anyhow::Result;
use clap::Parser;
use tracing::error;

use serpcmp::{pipeline, utils, Args, Config};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    let config = Config::from_args(&args);

    match pipeline::run(&config) {
        Ok(Some(report)) => {
            report.print_summary();
            Ok(())
        }
        Ok(None) => {
            println!(
                "No reference results at {:?}; nothing to compare.",
                config.reference_path
            );
            Ok(())
        }
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
