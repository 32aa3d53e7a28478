//! Arch Module Builder - Main entry point

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use archbuilder::cli::Cli;
use archbuilder::{BuilderError, FsSource, Outcome, logging};

fn main() -> ExitCode {
    // Usage errors exit 1; exit 2 is reserved for missing files
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    logging::init(cli.verbose);
    debug!(?cli, "CLI arguments parsed");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<BuilderError>()
                .map(BuilderError::exit_code)
                .unwrap_or(1);
            eprintln!("error: {:#}", e);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let request = cli.into_request()?;
    let outcome = archbuilder::run(&request, &FsSource).with_context(|| {
        format!(
            "Failed to build from {}",
            request.paths.config.display()
        )
    })?;

    match outcome {
        Outcome::Printed(text) => print!("{}", text),
        Outcome::ListFile(path) => info!(path = %path.display(), "list written"),
        Outcome::Merged(path) => {
            info!(path = %path.display(), "merge complete");
            println!("Merged configuration written to {}", path.display());
        }
    }

    Ok(())
}
