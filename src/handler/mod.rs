//! Game day handler — the single entry point both binaries invoke.
//!
//! One invocation: work out today's date in the league's offset, fetch that
//! day's games, render a digest, publish it once. Fetch failures come back as
//! a `500` response value; publish failures come back as `Err`.

pub mod feed;
pub mod games;
pub mod publisher;

use std::fmt;
use std::future::Future;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::{Credentials, PublisherKind, Settings};

use self::feed::GameFeed;
use self::games::compose_digest;
use self::publisher::{DummyPublisher, Publisher, SnsPublisher};

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler config error: {0}")]
    Config(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("publish failed: {0}")]
    Publish(String),
}

// ── Invocation surface ────────────────────────────────────────────────────────

/// Trigger payload. Manual and scheduled runs carry nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {}

/// Invocation context placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {}

/// Lambda-style response object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status_code: 200, body: body.into() }
    }

    pub fn server_error(body: impl Into<String>) -> Self {
        Self { status_code: 500, body: body.into() }
    }
}

impl fmt::Display for HandlerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{{\"statusCode\":{},\"body\":{:?}}}", self.status_code, self.body),
        }
    }
}

/// Anything the driver can invoke once with `(event, context)`.
pub trait Handler {
    type Output: fmt::Display;

    fn handle(
        &self,
        event: Event,
        context: Context,
    ) -> impl Future<Output = Result<Self::Output, HandlerError>> + Send;
}

// ── Game day handler ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GameDayHandler {
    feed: GameFeed,
    publisher: Publisher,
    subject: String,
    offset: FixedOffset,
}

impl GameDayHandler {
    pub fn new(
        feed: GameFeed,
        publisher: Publisher,
        subject: impl Into<String>,
        utc_offset_hours: i32,
    ) -> Result<Self, HandlerError> {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
            HandlerError::Config(format!("invalid utc offset: {utc_offset_hours}h"))
        })?;
        Ok(Self { feed, publisher, subject: subject.into(), offset })
    }

    /// Build the handler for the configured publisher backend.
    pub async fn connect(settings: &Settings, credentials: Credentials) -> Result<Self, HandlerError> {
        let feed = GameFeed::new(&settings.api_base_url, credentials.api_key, settings.timeout_seconds)?;
        let publisher = match settings.publisher {
            PublisherKind::Sns => Publisher::Sns(SnsPublisher::from_env(credentials.topic_arn).await),
            PublisherKind::Dummy => Publisher::Dummy(DummyPublisher::new()),
        };
        Self::new(feed, publisher, settings.subject.clone(), settings.utc_offset_hours)
    }

    /// Calendar date in the league's offset at instant `now`.
    pub fn league_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Run one invocation as if the clock read `now`.
    pub async fn handle_at(&self, now: DateTime<Utc>) -> Result<HandlerResponse, HandlerError> {
        let date = self.league_date(now);
        info!(%date, "checking today's games");

        let games = match self.feed.games_by_date(date).await {
            Ok(games) => games,
            Err(e) => {
                error!(error = %e, "could not fetch games");
                return Ok(HandlerResponse::server_error(format!("Error fetching data: {e}")));
            }
        };

        let digest = compose_digest(&games);
        let receipt = self.publisher.publish(&self.subject, &digest).await?;
        info!(games = games.len(), message_id = ?receipt.message_id, "digest published");

        Ok(HandlerResponse::ok("Data processed and sent to SNS"))
    }
}

impl Handler for GameDayHandler {
    type Output = HandlerResponse;

    async fn handle(&self, _event: Event, _context: Context) -> Result<HandlerResponse, HandlerError> {
        self.handle_at(Utc::now()).await
    }
}
