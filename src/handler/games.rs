//! Scores API game records and their plain-text rendering.
//!
//! Only the fields the digest shows are modelled; everything else in the
//! payload is ignored. Every field is optional because the API sends `null`
//! freely for games that have not started.

use serde::Deserialize;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const SEPARATOR: &str = "\n---\n";
const NO_GAMES: &str = "No games available for today.";

/// One entry of `GamesByDate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Game {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team_score: Option<i64>,
    #[serde(default)]
    pub home_team_score: Option<i64>,
    /// Scheduled tip-off, as sent by the API (local ISO timestamp).
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub last_play: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub quarters: Vec<Quarter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quarter {
    pub number: i64,
    #[serde(default)]
    pub away_score: Option<i64>,
    #[serde(default)]
    pub home_score: Option<i64>,
}

/// Rendering branch for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Final,
    InProgress,
    Scheduled,
    Other,
}

impl GameStatus {
    pub fn from_api(status: Option<&str>) -> Self {
        match status {
            Some("Final") | Some("F/OT") => Self::Final,
            Some("InProgress") => Self::InProgress,
            Some("Scheduled") => Self::Scheduled,
            _ => Self::Other,
        }
    }
}

impl Game {
    pub fn status(&self) -> GameStatus {
        GameStatus::from_api(self.status.as_deref())
    }

    /// `away-home`, with `N/A` for a side that has no score yet.
    fn score_line(&self) -> String {
        format!("{}-{}", score(self.away_team_score), score(self.home_team_score))
    }

    fn quarter_line(&self) -> String {
        self.quarters
            .iter()
            .map(|q| format!("Q{}: {}-{}", q.number, score(q.away_score), score(q.home_score)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Multi-line notification text for this game.
    pub fn to_message(&self) -> String {
        let status = text(&self.status);
        let matchup = format!("{} vs {}", text(&self.away_team), text(&self.home_team));
        let channel = text(&self.channel);

        match self.status() {
            GameStatus::Final => format!(
                "Game Status: {status}\n{matchup}\nFinal Score: {}\nStart Time: {}\nChannel: {channel}\nQuarter Scores: {}\n",
                self.score_line(),
                text(&self.date_time),
                self.quarter_line(),
            ),
            GameStatus::InProgress => format!(
                "Game Status: {status}\n{matchup}\nCurrent Score: {}\nLast Play: {}\nChannel: {channel}\n",
                self.score_line(),
                self.last_play.as_deref().unwrap_or(NOT_AVAILABLE),
            ),
            GameStatus::Scheduled => format!(
                "Game Status: {status}\n{matchup}\nStart Time: {}\nChannel: {channel}\n",
                text(&self.date_time),
            ),
            GameStatus::Other => format!(
                "Game Status: {status}\n{matchup}\nDetails are unavailable at the moment.\n"
            ),
        }
    }
}

/// Join per-game messages into the single published body.
pub fn compose_digest(games: &[Game]) -> String {
    if games.is_empty() {
        return NO_GAMES.to_string();
    }
    games
        .iter()
        .map(Game::to_message)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

fn score(value: Option<i64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Quarter>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Quarter>>::deserialize(deserializer)?.unwrap_or_default())
}
