// src/main.rs

use std::process::ExitCode;

use wafflebot::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("wafflebot: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "wafflebot stopped");
            eprintln!("wafflebot error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
