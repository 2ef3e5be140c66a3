// Library root for the NERD scoring engine: league aggregates, team and
// pitcher composers, name resolution, and game ranking. The `stats` and
// `names` loaders are the only modules that touch the filesystem.

pub mod error;
pub mod game;
pub mod league;
pub mod names;
pub mod pitcher;
pub mod resolver;
pub mod stats;
pub mod team;
pub mod team_mappings;
pub mod validation;
pub mod zscore;

pub use error::NerdError;
pub use game::{score_game, score_games, GameDetails, GameScore, LeagueScores, NerdConstants, ScheduledGame};
pub use league::{compute_league_aggregates, LeagueAggregates, Rejection, StatRecord};
pub use names::{remove_accents, NameAliases};
pub use pitcher::{calculate_pnerd, PitcherNerd, PitcherStats};
pub use resolver::resolve;
pub use stats::{load_season, SeasonStats, StatsError, DEFAULT_MIN_INNINGS_PITCHED};
pub use team::{calculate_tnerd, TeamNerd, TeamStats};
