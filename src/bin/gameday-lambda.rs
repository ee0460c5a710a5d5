//! NBA Game Day Notifications — AWS Lambda entry point.
//!
//! Same handler as the local harness, but missing credentials abort cold
//! start instead of being reported and skipped.

use gameday_notify::{
    config::{self, Credentials, Settings},
    error::AppError,
    handler::{Context, Event, GameDayHandler, Handler},
    logger,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let (settings, credentials) = bootstrap()?;
    let handler = GameDayHandler::connect(&settings, credentials).await?;
    info!(publisher = ?settings.publisher, "lambda handler ready");

    let handler = &handler;
    lambda_runtime::run(service_fn(move |_event: LambdaEvent<Value>| async move {
        let response = handler.handle(Event::default(), Context::default()).await?;
        Ok::<Value, Error>(serde_json::to_value(response)?)
    }))
    .await
}

fn bootstrap() -> Result<(Settings, Credentials), AppError> {
    // Deployed functions have no .env; local `cargo lambda watch` runs may.
    let _ = dotenvy::dotenv();

    let settings = config::load_settings()?;
    logger::init(&settings.log_level, settings.log_level_forced)?;

    let credentials = config::load_credentials()?;
    Ok((settings, credentials))
}
