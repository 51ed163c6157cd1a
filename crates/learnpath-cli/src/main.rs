//! `learnpath` binary.

use clap::Parser;
use learnpath_cli::{CliArgs, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run(CliArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
