mod cli;
mod commands;
mod output;

use clap::Parser;
use clubdesk_core::ClientError;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Flags fall back to .env values, so load it before parsing.
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = std::io::stdout();
    match commands::run(cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let expired = e
                .downcast_ref::<ClientError>()
                .is_some_and(ClientError::is_session_expired);
            if expired {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
