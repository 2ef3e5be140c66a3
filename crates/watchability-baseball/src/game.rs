// Game NERD (gNERD) composition and ranking.
//
// gNERD = mean(tNERD of both teams) + mean(pNERD of the resolved starters)

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::league::Rejection;
use crate::names::NameAliases;
use crate::pitcher::{score_pitchers, PitcherNerd, PitcherStats, PNERD_CONSTANT};
use crate::resolver::resolve;
use crate::team::{score_teams, TeamNerd, TeamStats, TNERD_CONSTANT};
use crate::team_mappings::team_abbreviation;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One entry from the schedule feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledGame {
    /// Full team name or FanGraphs abbreviation.
    pub away_team: String,
    pub home_team: String,
    /// Probable starter; `None` or `"TBD"` when unannounced.
    pub away_starter: Option<String>,
    pub home_starter: Option<String>,
    /// Local start time as `HH:MM`.
    pub game_time: Option<String>,
}

/// Formula constants for one scoring run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NerdConstants {
    pub team: f64,
    pub pitcher: f64,
}

impl Default for NerdConstants {
    fn default() -> Self {
        Self {
            team: TNERD_CONSTANT,
            pitcher: PNERD_CONSTANT,
        }
    }
}

/// Every team and pitcher breakdown for one season, plus the alias table used
/// to find starters.
#[derive(Debug, Clone, Default)]
pub struct LeagueScores {
    pub teams: HashMap<String, TeamNerd>,
    pub pitchers: HashMap<String, PitcherNerd>,
    pub aliases: NameAliases,
    /// Entities dropped by bound checks during this run.
    pub rejected: Vec<Rejection>,
}

/// Breakdowns referenced by one game, for detail rendering.
#[derive(Debug, Clone, Copy)]
pub struct GameDetails<'a> {
    pub away_team: Option<&'a TeamNerd>,
    pub home_team: Option<&'a TeamNerd>,
    pub away_pitcher: Option<&'a PitcherNerd>,
    pub home_pitcher: Option<&'a PitcherNerd>,
}

impl LeagueScores {
    /// Score both populations. Team and pitcher aggregates are computed
    /// independently, each over its full batch.
    pub fn compute(
        teams: Vec<TeamStats>,
        pitchers: Vec<PitcherStats>,
        aliases: NameAliases,
        constants: NerdConstants,
    ) -> Self {
        let team_batch = score_teams(teams, constants.team);
        let pitcher_batch = score_pitchers(pitchers, constants.pitcher);

        let mut rejected = team_batch.rejected;
        rejected.extend(pitcher_batch.rejected);

        Self {
            teams: team_batch.scores,
            pitchers: pitcher_batch.scores,
            aliases,
            rejected,
        }
    }

    /// Breakdown for a team by full name or abbreviation.
    pub fn team(&self, team: &str) -> Option<&TeamNerd> {
        self.teams.get(team_abbreviation(team))
    }

    /// Breakdowns for the four entities a scored game references.
    pub fn details(&self, game: &GameScore) -> GameDetails<'_> {
        let team = |key: &Option<String>| key.as_deref().and_then(|k| self.teams.get(k));
        let pitcher = |key: &Option<String>| key.as_deref().and_then(|k| self.pitchers.get(k));
        GameDetails {
            away_team: team(&game.away_team_key),
            home_team: team(&game.home_team_key),
            away_pitcher: pitcher(&game.away_pitcher_key),
            home_pitcher: pitcher(&game.home_pitcher_key),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Score of one scheduled game. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GameScore {
    pub away_team: String,
    pub home_team: String,
    pub away_starter: Option<String>,
    pub home_starter: Option<String>,
    pub game_time: Option<String>,

    /// Team keys that resolved to a breakdown.
    pub away_team_key: Option<String>,
    pub home_team_key: Option<String>,
    /// tNERD, or 0.0 when the team has no data.
    pub away_team_nerd: f64,
    pub home_team_nerd: f64,
    pub average_team_nerd: f64,

    /// Statistics-side pitcher names that resolved.
    pub away_pitcher_key: Option<String>,
    pub home_pitcher_key: Option<String>,
    pub away_pitcher_nerd: Option<f64>,
    pub home_pitcher_nerd: Option<f64>,
    /// `None` when neither starter resolved.
    pub average_pitcher_nerd: Option<f64>,

    pub gnerd: f64,
}

/// Average of whichever pitcher scores are present.
fn pitcher_average(away: Option<f64>, home: Option<f64>) -> Option<f64> {
    match (away, home) {
        (Some(a), Some(h)) => Some((a + h) / 2.0),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

/// Score a single game against the league breakdowns.
pub fn score_game(game: &ScheduledGame, league: &LeagueScores) -> GameScore {
    let team_side = |name: &str| -> (Option<String>, f64) {
        let key = team_abbreviation(name);
        match league.teams.get(key) {
            Some(nerd) => (Some(key.to_string()), nerd.tnerd),
            None => {
                debug!("no team data for '{}', using 0.0", name);
                (None, 0.0)
            }
        }
    };
    let pitcher_side = |starter: Option<&str>| -> (Option<String>, Option<f64>) {
        match resolve(starter, &league.pitchers, &league.aliases) {
            Some(m) => (Some(m.key.to_string()), Some(m.value.pnerd)),
            None => (None, None),
        }
    };

    let (away_team_key, away_team_nerd) = team_side(&game.away_team);
    let (home_team_key, home_team_nerd) = team_side(&game.home_team);
    let average_team_nerd = (away_team_nerd + home_team_nerd) / 2.0;

    let (away_pitcher_key, away_pitcher_nerd) = pitcher_side(game.away_starter.as_deref());
    let (home_pitcher_key, home_pitcher_nerd) = pitcher_side(game.home_starter.as_deref());
    let average_pitcher_nerd = pitcher_average(away_pitcher_nerd, home_pitcher_nerd);

    let gnerd = match average_pitcher_nerd {
        Some(p) => average_team_nerd + p,
        None => average_team_nerd,
    };

    GameScore {
        away_team: game.away_team.clone(),
        home_team: game.home_team.clone(),
        away_starter: game.away_starter.clone(),
        home_starter: game.home_starter.clone(),
        game_time: game.game_time.clone(),
        away_team_key,
        home_team_key,
        away_team_nerd,
        home_team_nerd,
        average_team_nerd,
        away_pitcher_key,
        home_pitcher_key,
        away_pitcher_nerd,
        home_pitcher_nerd,
        average_pitcher_nerd,
        gnerd,
    }
}

/// Score every game and rank by gNERD, highest first. Ties keep schedule order.
pub fn score_games(games: &[ScheduledGame], league: &LeagueScores) -> Vec<GameScore> {
    let mut scores: Vec<GameScore> = games.iter().map(|g| score_game(g, league)).collect();
    sort_by_gnerd(&mut scores);
    for (i, s) in scores.iter().enumerate() {
        info!(
            "#{} {} @ {}: gNERD {:.1}",
            i + 1,
            s.away_team,
            s.home_team,
            s.gnerd
        );
    }
    scores
}

/// Stable descending sort by gNERD.
pub fn sort_by_gnerd(scores: &mut [GameScore]) {
    scores.sort_by(|a, b| b.gnerd.partial_cmp(&a.gnerd).unwrap_or(Ordering::Equal));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitcher::{PitcherComponents, PitcherZScores};
    use crate::team::{TeamComponents, TeamZScores};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn team_nerd(abbr: &str, tnerd: f64) -> TeamNerd {
        TeamNerd {
            stats: TeamStats {
                name: abbr.into(),
                batting_runs: 0.0,
                barrel_rate: 0.08,
                baserunning_runs: 0.0,
                fielding_runs: 0.0,
                payroll: 150.0,
                age: 28.0,
                luck: 0.0,
            },
            zscores: TeamZScores {
                batting_runs: 0.0,
                barrel_rate: 0.0,
                baserunning_runs: 0.0,
                fielding_runs: 0.0,
                payroll: 0.0,
                age: 0.0,
                luck: 0.0,
            },
            adjusted_payroll: 0.0,
            adjusted_age: 0.0,
            adjusted_luck: 0.0,
            components: TeamComponents {
                batting: tnerd - 4.0,
                barrel: 0.0,
                baserunning: 0.0,
                fielding: 0.0,
                payroll: 0.0,
                age: 0.0,
                luck: 0.0,
                constant: 4.0,
            },
            tnerd,
        }
    }

    fn pitcher_nerd(name: &str, pnerd: f64) -> PitcherNerd {
        PitcherNerd {
            stats: PitcherStats {
                name: name.into(),
                team: "SEA".into(),
                xfip_minus: 100.0,
                swinging_strike_rate: 0.11,
                strike_rate: 0.64,
                velocity: 94.0,
                age: 29.0,
                pace: 18.0,
                luck: 0.0,
                knuckleball_rate: 0.0,
            },
            zscores: PitcherZScores {
                xfip_minus: 0.0,
                swinging_strike_rate: 0.0,
                strike_rate: 0.0,
                velocity: 0.0,
                age: 0.0,
                pace: 0.0,
            },
            adjusted_velocity: 0.0,
            adjusted_age: 0.0,
            adjusted_luck: 0.0,
            components: PitcherComponents {
                xfip: pnerd - 3.8,
                swinging_strike: 0.0,
                strike: 0.0,
                velocity: 0.0,
                age: 0.0,
                pace: 0.0,
                luck: 0.0,
                knuckleball: 0.0,
                constant: 3.8,
            },
            pnerd,
        }
    }

    fn league() -> LeagueScores {
        let teams = [("SEA", 8.2), ("HOU", 9.5), ("NYY", 7.0), ("BOS", 6.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), team_nerd(k, v)))
            .collect();
        let pitchers = [
            ("Logan Gilbert", 7.8),
            ("Framber Valdez", 6.2),
            ("Jesus Luzardo", 5.5),
            ("Matt Waldron", 9.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), pitcher_nerd(k, v)))
        .collect();
        LeagueScores {
            teams,
            pitchers,
            aliases: [("Matthew Waldron", "Matt Waldron")].into_iter().collect(),
            rejected: Vec::new(),
        }
    }

    fn game(away: &str, home: &str, away_sp: Option<&str>, home_sp: Option<&str>) -> ScheduledGame {
        ScheduledGame {
            away_team: away.into(),
            home_team: home.into(),
            away_starter: away_sp.map(String::from),
            home_starter: home_sp.map(String::from),
            game_time: Some("19:10".into()),
        }
    }

    #[test]
    fn full_data_game() {
        let g = game(
            "Seattle Mariners",
            "Houston Astros",
            Some("Logan Gilbert"),
            Some("Framber Valdez"),
        );
        let s = score_game(&g, &league());
        assert!(approx_eq(s.average_team_nerd, 8.85, 1e-9));
        assert!(approx_eq(s.average_pitcher_nerd.unwrap(), 7.0, 1e-9));
        assert!(approx_eq(s.gnerd, 15.85, 1e-9));
        assert_eq!(s.away_team_key.as_deref(), Some("SEA"));
        assert_eq!(s.home_pitcher_key.as_deref(), Some("Framber Valdez"));
    }

    #[test]
    fn one_pitcher_is_not_halved() {
        let g = game("SEA", "HOU", Some("Jesús Luzardo"), Some("TBD"));
        let s = score_game(&g, &league());
        assert_eq!(s.away_pitcher_nerd, Some(5.5));
        assert_eq!(s.home_pitcher_nerd, None);
        assert!(approx_eq(s.average_pitcher_nerd.unwrap(), 5.5, 1e-12));
        assert!(approx_eq(s.gnerd, 8.85 + 5.5, 1e-9));
    }

    #[test]
    fn no_pitchers_means_team_average_alone() {
        let g = game("SEA", "HOU", None, Some("Unknown Rookie"));
        let s = score_game(&g, &league());
        assert_eq!(s.average_pitcher_nerd, None);
        assert_eq!(s.gnerd, s.average_team_nerd);
    }

    #[test]
    fn missing_team_counts_as_zero() {
        let g = game("Expansion Club", "HOU", Some("Logan Gilbert"), None);
        let s = score_game(&g, &league());
        assert_eq!(s.away_team_key, None);
        assert_eq!(s.away_team_nerd, 0.0);
        assert!(approx_eq(s.average_team_nerd, 4.75, 1e-12));
        assert!(approx_eq(s.gnerd, 4.75 + 7.8, 1e-9));
    }

    #[test]
    fn alias_resolves_starter() {
        let g = game("NYY", "BOS", Some("Matthew Waldron"), None);
        let s = score_game(&g, &league());
        assert_eq!(s.away_pitcher_key.as_deref(), Some("Matt Waldron"));
        assert_eq!(s.away_pitcher_nerd, Some(9.0));
    }

    #[test]
    fn ranking_is_descending() {
        let league = league();
        let games = vec![
            // team avg 6.5, pitcher 7.0 -> 13.5
            game("NYY", "BOS", Some("Framber Valdez"), Some("Logan Gilbert")),
            // 15.85
            game("SEA", "HOU", Some("Logan Gilbert"), Some("Framber Valdez")),
        ];
        let ranked = score_games(&games, &league);
        assert!(approx_eq(ranked[0].gnerd, 15.85, 1e-9));
        assert!(approx_eq(ranked[1].gnerd, 13.5, 1e-9));
    }

    #[test]
    fn ties_keep_schedule_order() {
        let league = league();
        let games = vec![
            game("NYY", "BOS", None, None),
            game("BOS", "NYY", None, None),
            game("SEA", "HOU", None, None),
        ];
        let ranked = score_games(&games, &league);
        assert_eq!(ranked[0].away_team, "SEA");
        assert_eq!(ranked[1].away_team, "NYY");
        assert_eq!(ranked[2].away_team, "BOS");
    }

    #[test]
    fn details_expose_all_four_breakdowns() {
        let league = league();
        let g = game("SEA", "HOU", Some("Logan Gilbert"), Some("TBD"));
        let s = score_game(&g, &league);
        let d = league.details(&s);
        assert_eq!(d.away_team.map(|t| t.tnerd), Some(8.2));
        assert_eq!(d.home_team.map(|t| t.tnerd), Some(9.5));
        assert_eq!(d.away_pitcher.map(|p| p.pnerd), Some(7.8));
        assert!(d.home_pitcher.is_none());
    }

    #[test]
    fn team_lookup_by_full_name() {
        let league = league();
        assert!(league.team("Seattle Mariners").is_some());
        assert!(league.team("SEA").is_some());
        assert!(league.team("Montreal Expos").is_none());
    }

    #[test]
    fn empty_schedule_scores_nothing() {
        assert!(score_games(&[], &league()).is_empty());
    }

    #[test]
    fn compute_with_no_data_is_empty_not_an_error() {
        let scores = LeagueScores::compute(
            Vec::new(),
            Vec::new(),
            NameAliases::new(),
            NerdConstants::default(),
        );
        assert!(scores.teams.is_empty());
        assert!(scores.pitchers.is_empty());
        let g = game("SEA", "HOU", Some("Logan Gilbert"), None);
        let s = score_game(&g, &scores);
        assert_eq!(s.gnerd, 0.0);
        assert_eq!(s.average_pitcher_nerd, None);
    }
}
