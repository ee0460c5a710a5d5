//! Configuration loading with env-var overrides.
//!
//! Two sources, kept apart on purpose:
//!   - secrets (`NBA_API_KEY`, `SNS_TOPIC_ARN`) come from the process
//!     environment only, after `.env` has been loaded by the binary;
//!   - tunables come from the optional `config/default.toml`, then
//!     `GAMEDAY_LOG_LEVEL` / `GAMEDAY_PUBLISHER` env overrides.

use std::{env, fmt, fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;

/// Env var holding the sportsdata.io subscription key.
pub const API_KEY_VAR: &str = "NBA_API_KEY";
/// Env var holding the SNS topic that receives the digest.
pub const TOPIC_ARN_VAR: &str = "SNS_TOPIC_ARN";
/// Required settings, in the order they are reported when missing.
pub const REQUIRED_VARS: [&str; 2] = [API_KEY_VAR, TOPIC_ARN_VAR];

const SETTINGS_PATH: &str = "config/default.toml";
const REDACTION_MASK: &str = "********************";
const REDACTION_VISIBLE: usize = 4;

// ── Credentials ───────────────────────────────────────────────────────────────

/// One or more required env vars were unset or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing environment variables: {}", .0.join(", "))]
pub struct MissingVars(pub Vec<String>);

/// Required secrets, validated non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub topic_arn: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("topic_arn", &self.topic_arn)
            .finish()
    }
}

/// Read credentials from the process environment.
pub fn load_credentials() -> Result<Credentials, MissingVars> {
    load_credentials_with(|name| env::var(name).ok())
}

/// Internal loader — resolves each required name through `lookup`.
/// Tests pass a closure over a map instead of mutating env vars.
///
/// Every missing name is collected before returning, so the caller can
/// report them all at once.
pub fn load_credentials_with<F>(lookup: F) -> Result<Credentials, MissingVars>
where
    F: Fn(&str) -> Option<String>,
{
    let [api_key, topic_arn] =
        REQUIRED_VARS.map(|name| lookup(name).filter(|value| !value.is_empty()));

    match (api_key, topic_arn) {
        (Some(api_key), Some(topic_arn)) => Ok(Credentials { api_key, topic_arn }),
        (api_key, topic_arn) => {
            let missing = REQUIRED_VARS
                .iter()
                .zip([api_key.is_none(), topic_arn.is_none()])
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name.to_string())
                .collect();
            Err(MissingVars(missing))
        }
    }
}

/// Mask a secret for display: a fixed run of `*` plus its last four
/// characters. Secrets of four characters or fewer show only the mask.
pub fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= REDACTION_VISIBLE {
        return REDACTION_MASK.to_string();
    }
    let tail: String = secret.chars().skip(count - REDACTION_VISIBLE).collect();
    format!("{REDACTION_MASK}{tail}")
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Which publisher backend the handler uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherKind {
    Sns,
    /// Log and record the digest instead of publishing it.
    Dummy,
}

impl std::str::FromStr for PublisherKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sns" => Ok(Self::Sns),
            "dummy" => Ok(Self::Dummy),
            other => Err(AppError::Config(format!("unknown publisher: '{other}'"))),
        }
    }
}

/// Fully-resolved non-secret settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: String,
    /// `true` when `log_level` came from `GAMEDAY_LOG_LEVEL`; it then wins over `RUST_LOG`.
    pub log_level_forced: bool,
    /// Base of the scores API; `/GamesByDate/{date}` is appended.
    pub api_base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Fixed UTC offset used to decide which date is "today".
    pub utc_offset_hours: i32,
    pub subject: String,
    pub publisher: PublisherKind,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawSettings {
    #[serde(default)]
    notifier: RawNotifier,
}

#[derive(Deserialize)]
struct RawNotifier {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_utc_offset_hours")]
    utc_offset_hours: i32,
    #[serde(default = "default_subject")]
    subject: String,
    #[serde(default = "default_publisher")]
    publisher: PublisherKind,
}

impl Default for RawNotifier {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
            utc_offset_hours: default_utc_offset_hours(),
            subject: default_subject(),
            publisher: default_publisher(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_api_base_url() -> String { "https://api.sportsdata.io/v3/nba/scores/json".to_string() }
fn default_timeout_seconds() -> u64 { 30 }
fn default_utc_offset_hours() -> i32 { -6 }
fn default_subject() -> String { "NBA Game Updates".to_string() }
fn default_publisher() -> PublisherKind { PublisherKind::Sns }

/// Load settings from `config/default.toml`, then apply env-var overrides.
pub fn load_settings() -> Result<Settings, AppError> {
    let log_level_override = env::var("GAMEDAY_LOG_LEVEL").ok();
    let publisher_override = env::var("GAMEDAY_PUBLISHER").ok();
    load_settings_from(
        Path::new(SETTINGS_PATH),
        log_level_override.as_deref(),
        publisher_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// A missing file is not an error: every field falls back to its default.
pub fn load_settings_from(
    path: &Path,
    log_level_override: Option<&str>,
    publisher_override: Option<&str>,
) -> Result<Settings, AppError> {
    let parsed = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<RawSettings>(&raw)
            .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => RawSettings::default(),
        Err(e) => {
            return Err(AppError::Config(format!("cannot read {}: {e}", path.display())));
        }
    };

    let n = parsed.notifier;

    let publisher = match publisher_override {
        Some(value) => value.parse()?,
        None => n.publisher,
    };

    if n.timeout_seconds == 0 {
        return Err(AppError::Config("timeout_seconds must be greater than zero".into()));
    }
    if !(-12..=14).contains(&n.utc_offset_hours) {
        return Err(AppError::Config(format!(
            "utc_offset_hours out of range: {}",
            n.utc_offset_hours
        )));
    }

    Ok(Settings {
        log_level: log_level_override.unwrap_or(&n.log_level).to_string(),
        log_level_forced: log_level_override.is_some(),
        api_base_url: n.api_base_url.trim_end_matches('/').to_string(),
        timeout_seconds: n.timeout_seconds,
        utc_offset_hours: n.utc_offset_hours,
        subject: n.subject,
        publisher,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn all_credentials_present() {
        let creds = load_credentials_with(lookup_from(&[
            (API_KEY_VAR, "abcd1234"),
            (TOPIC_ARN_VAR, "arn:aws:sns:us-east-1:123456789012:gd_topic"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key, "abcd1234");
        assert_eq!(creds.topic_arn, "arn:aws:sns:us-east-1:123456789012:gd_topic");
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = load_credentials_with(lookup_from(&[
            (API_KEY_VAR, ""),
            (TOPIC_ARN_VAR, "arn:aws:sns:us-east-1:123456789012:gd_topic"),
        ]))
        .unwrap_err();
        assert_eq!(err.0, vec![API_KEY_VAR.to_string()]);
    }

    #[test]
    fn whitespace_value_is_accepted() {
        let creds = load_credentials_with(lookup_from(&[
            (API_KEY_VAR, "   "),
            (TOPIC_ARN_VAR, "arn:aws:sns:us-east-1:123456789012:gd_topic"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key, "   ");
    }

    #[test]
    fn reports_every_missing_name_in_order() {
        let err = load_credentials_with(lookup_from(&[])).unwrap_err();
        assert_eq!(err.0, vec![API_KEY_VAR.to_string(), TOPIC_ARN_VAR.to_string()]);
        assert_eq!(err.to_string(), "missing environment variables: NBA_API_KEY, SNS_TOPIC_ARN");
    }

    #[test]
    fn redact_keeps_last_four() {
        assert_eq!(redact("abcd1234"), "********************1234");
    }

    #[test]
    fn redact_short_secret_is_fully_masked() {
        assert_eq!(redact("1234"), REDACTION_MASK);
        assert_eq!(redact("ab"), REDACTION_MASK);
        assert_eq!(redact(""), REDACTION_MASK);
    }

    #[test]
    fn redact_counts_characters_not_bytes() {
        assert_eq!(redact("секретный"), format!("{REDACTION_MASK}тный"));
    }

    #[test]
    fn credentials_debug_hides_key() {
        let creds = Credentials {
            api_key: "supersecretvalue9876".into(),
            topic_arn: "arn:aws:sns:us-east-1:1:t".into(),
        };
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("supersecret"));
        assert!(dbg.contains("9876"));
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let s = load_settings_from(Path::new("/nonexistent/default.toml"), None, None).unwrap();
        assert_eq!(s.log_level, "info");
        assert_eq!(s.api_base_url, "https://api.sportsdata.io/v3/nba/scores/json");
        assert_eq!(s.timeout_seconds, 30);
        assert_eq!(s.utc_offset_hours, -6);
        assert_eq!(s.subject, "NBA Game Updates");
        assert_eq!(s.publisher, PublisherKind::Sns);
    }

    #[test]
    fn parse_settings_file() {
        let f = write_toml(
            r#"
[notifier]
log_level = "debug"
api_base_url = "http://127.0.0.1:9999/nba/"
timeout_seconds = 5
utc_offset_hours = -5
subject = "Tonight"
publisher = "dummy"
"#,
        );
        let s = load_settings_from(f.path(), None, None).unwrap();
        assert_eq!(s.log_level, "debug");
        assert!(!s.log_level_forced);
        assert_eq!(s.api_base_url, "http://127.0.0.1:9999/nba");
        assert_eq!(s.timeout_seconds, 5);
        assert_eq!(s.utc_offset_hours, -5);
        assert_eq!(s.subject, "Tonight");
        assert_eq!(s.publisher, PublisherKind::Dummy);
    }

    #[test]
    fn malformed_settings_file_errors() {
        let f = write_toml("[notifier\nlog_level = ");
        let msg = load_settings_from(f.path(), None, None).unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let f = write_toml("[notifier]\ntimeout_seconds = 0\n");
        assert!(load_settings_from(f.path(), None, None).is_err());
    }

    #[test]
    fn env_overrides_win() {
        let f = write_toml("[notifier]\nlog_level = \"warn\"\npublisher = \"sns\"\n");
        let s = load_settings_from(f.path(), Some("trace"), Some("Dummy")).unwrap();
        assert_eq!(s.log_level, "trace");
        assert!(s.log_level_forced);
        assert_eq!(s.publisher, PublisherKind::Dummy);
    }

    #[test]
    fn unknown_publisher_override_errors() {
        let f = write_toml("");
        assert!(load_settings_from(f.path(), None, Some("email")).is_err());
    }
}
