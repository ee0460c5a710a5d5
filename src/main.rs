//! NBA Game Day Notifications — local test harness.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load settings (config/default.toml + env overrides)
//!   3. Init logger at the configured level
//!   4. Read credentials from the environment
//!   5. Drive one handler invocation and print the outcome
//!
//! Missing credentials and handler failures are reported on stdout and the
//! process still exits 0; only bootstrap failures exit non-zero.

use gameday_notify::{config, driver, error::AppError, handler::GameDayHandler, logger};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let settings = config::load_settings()?;
    logger::init(&settings.log_level, settings.log_level_forced)?;

    info!(
        api_base_url = %settings.api_base_url,
        publisher = ?settings.publisher,
        utc_offset_hours = settings.utc_offset_hours,
        "settings loaded"
    );

    let credentials = config::load_credentials();
    let mut stdout = std::io::stdout();
    let outcome = driver::run(
        credentials,
        |credentials| GameDayHandler::connect(&settings, credentials),
        &mut stdout,
    )
    .await?;

    info!(outcome = ?outcome, "run finished");
    Ok(())
}
