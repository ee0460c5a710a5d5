//! sportsdata.io `GamesByDate` client.
//!
//! The subscription key travels in a header rather than the query string, so
//! transport errors (which embed the request URL) never carry it.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, error};

use super::HandlerError;
use super::games::Game;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Fetches one day of games. Cheap to clone: `reqwest::Client` is an `Arc`.
#[derive(Debug, Clone)]
pub struct GameFeed {
    client: Client,
    api_base_url: String,
    api_key: String,
}

impl GameFeed {
    pub fn new(api_base_url: &str, api_key: String, timeout_seconds: u64) -> Result<Self, HandlerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| HandlerError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/GamesByDate/{}", self.api_base_url, date.format("%Y-%m-%d"))
    }

    /// One GET round-trip; no retries.
    pub async fn games_by_date(&self, date: NaiveDate) -> Result<Vec<Game>, HandlerError> {
        let url = self.url_for(date);
        debug!(%url, "fetching games");

        let response = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "scores request failed (transport)");
                HandlerError::Fetch(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            error!(%status, %url, "scores request returned HTTP error");
            return Err(HandlerError::Fetch(format!("HTTP {status}: {}", body.trim())));
        }

        let games = response.json::<Vec<Game>>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize scores response");
            HandlerError::Decode(format!("failed to parse response body: {e}"))
        })?;

        debug!(count = games.len(), "received games");
        Ok(games)
    }
}
