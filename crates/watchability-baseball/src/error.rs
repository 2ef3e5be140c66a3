// Error types for the scoring engine.

use thiserror::Error;

use crate::validation::ValidationError;

/// Which population a scoring batch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Pitcher,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Team => f.write_str("team"),
            EntityKind::Pitcher => f.write_str("pitcher"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NerdError {
    /// No records were supplied for a batch, so no league aggregates exist.
    #[error("no {kind} records to aggregate")]
    NoData { kind: EntityKind },

    /// A composer asked for a statistic the aggregates were not built with.
    #[error("statistic `{stat}` was not included in the league aggregates")]
    UntrackedStat { stat: String },

    /// A composed breakdown failed its bound check.
    #[error(transparent)]
    OutOfRange(#[from] ValidationError),
}
