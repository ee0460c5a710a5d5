//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after settings are resolved. Events go to
//! stderr; stdout is reserved for the driver's transcript.

use std::env;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialise the global tracing subscriber.
///
/// `level` is a bare level (`"info"`, `"debug"`, ...) or an `EnvFilter`
/// directive list such as `"info,gameday_notify=debug"`.
///
/// If `prefer_level` is `true` (the level was set explicitly through
/// `GAMEDAY_LOG_LEVEL`), `level` wins and `RUST_LOG` is only a fallback when
/// `level` is invalid. Otherwise `RUST_LOG` wins and `level` is the fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, prefer_level, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

/// Resolve the effective filter from the configured level and `RUST_LOG`.
fn build_filter(level: &str, prefer_level: bool, rust_log: Option<&str>) -> Result<EnvFilter, AppError> {
    let from_env = || rust_log.and_then(|directives| EnvFilter::try_new(directives).ok());

    if prefer_level {
        match level_filter(level) {
            Ok(filter) => Ok(filter),
            Err(level_err) => from_env().ok_or_else(|| {
                AppError::Logger(format!("{level_err}; RUST_LOG unset or invalid"))
            }),
        }
    } else {
        match from_env() {
            Some(filter) => Ok(filter),
            None => level_filter(level),
        }
    }
}

/// A bare word must be a real level; anything with `=` or `,` is handed to
/// `EnvFilter` as directives.
fn level_filter(level: &str) -> Result<EnvFilter, AppError> {
    if !level.contains(['=', ',']) {
        parse_level(level)?;
    }
    EnvFilter::try_new(level)
        .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
}

/// Parse a log level string into a [`LevelFilter`], returning an error on
/// unrecognised values.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
