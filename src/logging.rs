// src/logging.rs

//! Logging setup for `wafflebot` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. the `--log-level` CLI flag;
//! 2. the `WAFFLEBOT_LOG` environment variable, which takes full `EnvFilter`
//!    directives (e.g. `info,wafflebot::engine=debug`);
//! 3. `info`.
//!
//! An unparsable `WAFFLEBOT_LOG` is reported and ignored. Logs go to STDERR;
//! STDOUT is reserved for `--dry-run` output.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "WAFFLEBOT_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let (filter, rejected) = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing the log subscriber: {e}"))?;

    if let Some(err) = rejected {
        tracing::warn!(var = LOG_ENV_VAR, error = %err, "ignoring invalid log filter");
    }
    Ok(())
}

/// Resolve the filter from the CLI flag and the raw env value.
///
/// Also returns the parse error if the env value was present but rejected.
pub fn build_filter(
    cli_level: Option<LogLevel>,
    env: Option<&str>,
) -> (EnvFilter, Option<String>) {
    if let Some(level) = cli_level {
        return (EnvFilter::new(directive_for(level)), None);
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match EnvFilter::try_new(raw) {
            Ok(filter) => (filter, None),
            Err(err) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(err.to_string())),
        },
        None => (EnvFilter::new(DEFAULT_DIRECTIVE), None),
    }
}

fn directive_for(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
