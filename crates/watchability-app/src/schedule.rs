// Daily schedule source backed by the MLB Stats API.
//
// `GET {base_url}/schedule?sportId=1&date=YYYY-MM-DD&hydrate=probablePitcher`
// returns one entry per date with its games. Each game carries both clubs,
// the probable starters when announced, and a UTC start time that is
// converted to the configured display timezone.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use watchability_baseball::ScheduledGame;
use watchability_core::config::ScheduleConfig;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid date format, expected YYYY-MM-DD, got: {date}")]
    InvalidDate { date: String },

    #[error("schedule request failed for {date}: {source}")]
    Http {
        date: String,
        source: reqwest::Error,
    },

    #[error("schedule API returned status {status} for {date}")]
    Status {
        date: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode schedule for {date}: {source}")]
    Decode {
        date: String,
        source: serde_json::Error,
    },
}

/// Validate a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate {
        date: date.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can list the games scheduled on a date.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn games_on(&self, date: &str) -> Result<Vec<ScheduledGame>, ScheduleError>;
}

// ---------------------------------------------------------------------------
// MLB Stats API client
// ---------------------------------------------------------------------------

pub struct MlbStatsApi {
    http: reqwest::Client,
    base_url: String,
    tz: Tz,
}

impl MlbStatsApi {
    pub fn new(base_url: impl Into<String>, tz: Tz, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            tz,
        })
    }

    /// Build from the `[schedule]` config section.
    pub fn from_config(config: &ScheduleConfig) -> anyhow::Result<Self> {
        let tz = config.tz()?;
        Ok(Self::new(
            config.base_url.trim_end_matches('/'),
            tz,
            Duration::from_secs(config.timeout_secs),
        )?)
    }
}

#[async_trait]
impl ScheduleSource for MlbStatsApi {
    async fn games_on(&self, date: &str) -> Result<Vec<ScheduledGame>, ScheduleError> {
        parse_date(date)?;

        let url = format!("{}/schedule", self.base_url);
        debug!(%url, date, "requesting schedule");
        let http_err = |source| ScheduleError::Http {
            date: date.to_string(),
            source,
        };
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("sportId", "1"),
                ("date", date),
                ("hydrate", "probablePitcher"),
            ])
            .send()
            .await
            .map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScheduleError::Status {
                date: date.to_string(),
                status,
            });
        }
        let body = resp.text().await.map_err(http_err)?;

        let games = parse_schedule(&body, self.tz).map_err(|source| ScheduleError::Decode {
            date: date.to_string(),
            source,
        })?;
        info!("Fetched {} games for {}", games.len(), date);
        Ok(games)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSchedule {
    #[serde(default)]
    dates: Vec<RawDate>,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    #[serde(default)]
    games: Vec<RawGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    game_date: Option<String>,
    teams: RawMatchup,
}

#[derive(Debug, Deserialize)]
struct RawMatchup {
    away: RawSide,
    home: RawSide,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSide {
    team: RawTeam,
    probable_pitcher: Option<RawPitcher>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPitcher {
    full_name: Option<String>,
}

/// Parse a schedule response body into games in listing order.
pub fn parse_schedule(body: &str, tz: Tz) -> Result<Vec<ScheduledGame>, serde_json::Error> {
    let raw: RawSchedule = serde_json::from_str(body)?;
    Ok(raw
        .dates
        .into_iter()
        .flat_map(|d| d.games)
        .map(|g| ScheduledGame {
            away_starter: starter_name(g.teams.away.probable_pitcher),
            home_starter: starter_name(g.teams.home.probable_pitcher),
            away_team: g.teams.away.team.name,
            home_team: g.teams.home.team.name,
            game_time: g.game_date.as_deref().and_then(|t| local_start_time(t, tz)),
        })
        .collect())
}

fn starter_name(pitcher: Option<RawPitcher>) -> Option<String> {
    pitcher
        .and_then(|p| p.full_name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Convert an RFC 3339 UTC timestamp to `HH:MM` in `tz`.
pub fn local_start_time(utc: &str, tz: Tz) -> Option<String> {
    DateTime::parse_from_rfc3339(utc)
        .ok()
        .map(|dt| dt.with_timezone(&tz).format("%H:%M").to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
