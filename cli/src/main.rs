use clap::Parser;
use dayshape_cli::Cli;
use dayshape_engine::{EngineError, ErrorCategory};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// 2 for bad settings, 3 for an unreadable snapshot, 1 for anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let category = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<EngineError>())
        .map(EngineError::category);
    match category {
        Some(ErrorCategory::ConfigError) => 2,
        Some(ErrorCategory::SnapshotError) => 3,
        _ => 1,
    }
}
