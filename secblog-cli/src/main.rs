use std::process::ExitCode;

use clap::Parser;
use secblog_core::error::ErrorClass;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "secblog=info,secblog_lib=info,secblog_ai=info,secblog_core=info";

fn main() -> ExitCode {
    // A missing .env is fine; real env vars still apply.
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = secblog_lib::Cli::parse();
    match secblog_lib::run(cli.command) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(code = %err.code, retryable = err.retryable, "command failed");
            eprintln!("error: {err}");
            ExitCode::from(match err.class() {
                ErrorClass::Input => 2,
                ErrorClass::Configuration => 3,
                ErrorClass::ExternalService => 4,
                ErrorClass::Internal => 1,
            })
        }
    }
}
