use kr_let::{error::ModelError, model::LetModel, render::write_report};
use std::{io::{self, Write}, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// Builds the model and prints the report to stdout.
fn run() -> Result<(), ModelError> {
    let report = LetModel::build()?.report()?;

    let mut out = io::stdout().lock();
    write_report(&mut out, &report)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    // stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        },
    }
}
