use anyhow::Context;
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;

use super::league::League;
use super::provider::{FetchError, ScoreFetcher};

/// One scheduled, live or finished contest as the scoreboard returns it.
///
/// Every field is optional on the wire; the summarizer decides what is
/// mandatory so that one bad event never poisons the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub competitions: Vec<RawCompetition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCompetition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub competitors: Vec<RawCompetitor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCompetitor {
    /// "home" | "away"
    #[serde(rename = "homeAway", default, deserialize_with = "null_as_default")]
    pub home_away: String,
    #[serde(default)]
    pub team: Option<RawTeam>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<RawRecord>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub score: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTeam {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// e.g. "85-67" or "10-7-0"
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStatus {
    #[serde(rename = "type", default)]
    pub kind: Option<RawStatusType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStatusType {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoreboardResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<RawGame>,
}

/// An explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// ESPN sends ids and scores as strings, but accept bare numbers too.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Query value pinning the scoreboard to the local calendar date (YYYY-MM-DD).
pub fn today_param() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Scoreboard source backed by ESPN's public site API. No key required.
pub struct EspnScoreboard {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
}

impl EspnScoreboard {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnScoreboard {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, league: League) -> String {
        format!("{}/{}", self.base_url, league.scoreboard_path())
    }
}

#[async_trait]
impl ScoreFetcher for EspnScoreboard {
    fn name(&self) -> &str {
        "ESPN"
    }

    async fn fetch(&self, league: League) -> Result<Vec<RawGame>, FetchError> {
        let url = self.url_for(league);
        let dates = today_param();
        debug!("Fetching {} scoreboard: {} (dates={})", league, url, dates);

        let resp = self
            .http
            .get(&url)
            .query(&[("dates", dates.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let parsed: ScoreboardResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!("{} scoreboard returned {} event(s)", league, parsed.events.len());
        Ok(parsed.events)
    }
}
