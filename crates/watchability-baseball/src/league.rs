// League aggregates: batch-scoped means and standard deviations.
//
// Aggregates are computed once per scoring run from the complete entity
// collection and passed explicitly into every composer call. A z-score is
// only meaningful relative to the batch it was computed against.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{info, warn};

use crate::error::{EntityKind, NerdError};
use crate::zscore::{compute_stat_summary, compute_zscore, StatSummary};

/// A raw statistics record whose tracked statistics can be aggregated.
pub trait StatRecord {
    /// Identifier for one tracked statistic.
    type Stat: Copy + Eq + Hash + Debug;

    /// Which population this record belongs to.
    const KIND: EntityKind;

    /// Natural identity of the entity (team abbreviation or pitcher name).
    fn name(&self) -> &str;

    /// Raw value of the given statistic for this entity.
    fn stat(&self, stat: Self::Stat) -> f64;
}

/// Mean and standard deviation for every aggregated statistic in a batch.
#[derive(Debug, Clone)]
pub struct LeagueAggregates<S: Copy + Eq + Hash + Debug> {
    summaries: HashMap<S, StatSummary>,
    entity_count: usize,
}

impl<S: Copy + Eq + Hash + Debug> LeagueAggregates<S> {
    /// Build aggregates from summaries computed elsewhere.
    pub fn from_summaries(
        summaries: impl IntoIterator<Item = (S, StatSummary)>,
        entity_count: usize,
    ) -> Self {
        Self {
            summaries: summaries.into_iter().collect(),
            entity_count,
        }
    }

    /// Summary for one statistic.
    pub fn summary(&self, stat: S) -> Result<StatSummary, NerdError> {
        self.summaries
            .get(&stat)
            .copied()
            .ok_or_else(|| NerdError::UntrackedStat {
                stat: format!("{stat:?}"),
            })
    }

    pub fn mean(&self, stat: S) -> Result<f64, NerdError> {
        self.summary(stat).map(|s| s.mean)
    }

    pub fn stdev(&self, stat: S) -> Result<f64, NerdError> {
        self.summary(stat).map(|s| s.stdev)
    }

    /// Z-score of `value` for `stat` relative to this batch.
    pub fn zscore(&self, stat: S, value: f64) -> Result<f64, NerdError> {
        self.summary(stat).map(|s| compute_zscore(value, &s))
    }

    /// Number of entities the aggregates were computed over.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Map of statistic to mean.
    pub fn means(&self) -> HashMap<S, f64> {
        self.summaries.iter().map(|(k, s)| (*k, s.mean)).collect()
    }

    /// Map of statistic to standard deviation.
    pub fn stdevs(&self) -> HashMap<S, f64> {
        self.summaries.iter().map(|(k, s)| (*k, s.stdev)).collect()
    }
}

/// An entity dropped from a scoring batch because its breakdown failed a
/// bound check.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub kind: EntityKind,
    pub name: String,
    pub reason: String,
}

/// Result of scoring one batch: accepted breakdowns keyed by entity name,
/// plus every entity that was dropped.
#[derive(Debug, Clone)]
pub struct ScoredBatch<T> {
    pub scores: HashMap<String, T>,
    pub rejected: Vec<Rejection>,
}

impl<T> ScoredBatch<T> {
    pub fn empty() -> Self {
        Self {
            scores: HashMap::new(),
            rejected: Vec::new(),
        }
    }
}

/// Compute league aggregates for `stats` across all `records`.
///
/// Returns [`NerdError::NoData`] for an empty batch; callers turn that into
/// an empty result set for the entity kind.
pub fn compute_league_aggregates<R: StatRecord>(
    records: &[R],
    stats: &[R::Stat],
) -> Result<LeagueAggregates<R::Stat>, NerdError> {
    if records.is_empty() {
        return Err(NerdError::NoData { kind: R::KIND });
    }

    let summaries = stats
        .iter()
        .map(|&stat| {
            let values: Vec<f64> = records.iter().map(|r| r.stat(stat)).collect();
            (stat, compute_stat_summary(&values))
        })
        .collect();

    Ok(LeagueAggregates {
        summaries,
        entity_count: records.len(),
    })
}

/// Score a whole batch: aggregate over every record first, then compose
/// each entity against those aggregates.
///
/// An empty batch yields an empty result. An entity whose composition fails
/// is logged and recorded in `rejected`; the rest of the batch is unaffected.
pub fn score_batch<R, T, F>(records: Vec<R>, stats: &[R::Stat], compose: F) -> ScoredBatch<T>
where
    R: StatRecord,
    F: Fn(R, &LeagueAggregates<R::Stat>) -> Result<T, NerdError>,
{
    let aggregates = match compute_league_aggregates(&records, stats) {
        Ok(agg) => agg,
        Err(e) => {
            warn!("{e}; returning empty {} scores", R::KIND);
            return ScoredBatch::empty();
        }
    };

    let mut batch = ScoredBatch::empty();
    for record in records {
        let name = record.name().to_string();
        match compose(record, &aggregates) {
            Ok(score) => {
                if batch.scores.insert(name.clone(), score).is_some() {
                    warn!("duplicate {} '{}', keeping the later record", R::KIND, name);
                }
            }
            Err(e) => {
                warn!("dropping {} '{}': {}", R::KIND, name, e);
                batch.rejected.push(Rejection {
                    kind: R::KIND,
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "scored {} {}s ({} rejected) from a batch of {}",
        batch.scores.len(),
        R::KIND,
        batch.rejected.len(),
        aggregates.entity_count()
    );
    batch
}
