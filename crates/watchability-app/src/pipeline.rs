// Daily scoring pipeline.
//
// schedule -> season stats -> aliases -> league scores -> ranked games.
// The schedule is fetched first so a day without games never touches the
// statistics files.

use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use watchability_baseball::{
    load_season, score_games, GameScore, LeagueScores, NameAliases, NerdConstants,
};
use watchability_core::Config;

use crate::schedule::ScheduleSource;

/// Everything computed for one date.
#[derive(Debug, Clone)]
pub struct DailyRanking {
    pub date: String,
    pub season: i32,
    pub league: LeagueScores,
    /// Highest gNERD first.
    pub games: Vec<GameScore>,
}

/// Load the season's statistics and score every team and pitcher.
pub fn load_league(config: &Config, season: i32) -> anyhow::Result<LeagueScores> {
    let stats_dir = Path::new(&config.data_paths.stats_dir);
    let stats = load_season(stats_dir, season, config.scoring.min_innings_pitched)
        .with_context(|| format!("failed to load {season} statistics"))?;

    let aliases = NameAliases::load_or_empty(Path::new(&config.data_paths.name_mapping));
    let constants = NerdConstants {
        team: config.scoring.team_constant,
        pitcher: config.scoring.pitcher_constant,
    };

    let league = LeagueScores::compute(stats.teams, stats.pitchers, aliases, constants);
    info!(
        "Scored {} teams and {} pitchers",
        league.teams.len(),
        league.pitchers.len()
    );
    if !league.rejected.is_empty() {
        warn!("{} entities rejected by validation", league.rejected.len());
    }
    Ok(league)
}

/// Fetch the schedule for `date` and rank its games.
pub async fn rank_day(
    config: &Config,
    schedule: &dyn ScheduleSource,
    date: &str,
    season: i32,
) -> anyhow::Result<DailyRanking> {
    info!("Retrieving game schedule for {date}");
    let scheduled = schedule
        .games_on(date)
        .await
        .with_context(|| format!("failed to retrieve schedule for {date}"))?;

    if scheduled.is_empty() {
        return Ok(DailyRanking {
            date: date.to_string(),
            season,
            league: LeagueScores::default(),
            games: Vec::new(),
        });
    }

    info!("Using season {season} statistics for {} games", scheduled.len());
    let league = load_league(config, season)?;
    let games = score_games(&scheduled, &league);

    Ok(DailyRanking {
        date: date.to_string(),
        season,
        league,
        games,
    })
}
