// Team NERD (tNERD) composition.
//
// tNERD = zBat + zBarrel% + zBsR + zFld + AdjPay + AdjAge + AdjLuck + constant

use crate::error::{EntityKind, NerdError};
use crate::league::{score_batch, LeagueAggregates, ScoredBatch, StatRecord};
use crate::validation::{check_identity, check_range, ValidationError};

/// Default tNERD constant.
pub const TNERD_CONSTANT: f64 = 4.0;

/// Upper bound for the flipped payroll and age terms.
const MAX_ADJUSTED_PAYROLL: f64 = 10.0;
const MAX_ADJUSTED_AGE: f64 = 10.0;
/// Hard cap on the luck z-score.
const LUCK_CAP: f64 = 2.0;
const MAX_TNERD: f64 = 50.0;

// ---------------------------------------------------------------------------
// Raw stats
// ---------------------------------------------------------------------------

/// Season statistics for one team, keyed by its FanGraphs abbreviation.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStats {
    pub name: String,
    /// Park-adjusted batting runs above average (Bat).
    pub batting_runs: f64,
    /// Barrel% as a fraction.
    pub barrel_rate: f64,
    /// Baserunning runs (BsR).
    pub baserunning_runs: f64,
    /// Fielding runs above average (Fld).
    pub fielding_runs: f64,
    /// Payroll in millions; below average is better.
    pub payroll: f64,
    /// Average batter age; younger is better.
    pub age: f64,
    /// wRC minus runs scored.
    pub luck: f64,
}

impl TeamStats {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identity("team name", &self.name)
    }
}

/// Statistics aggregated across the team batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamStat {
    BattingRuns,
    BarrelRate,
    BaserunningRuns,
    FieldingRuns,
    Payroll,
    Age,
    Luck,
}

impl TeamStat {
    pub const ALL: [TeamStat; 7] = [
        TeamStat::BattingRuns,
        TeamStat::BarrelRate,
        TeamStat::BaserunningRuns,
        TeamStat::FieldingRuns,
        TeamStat::Payroll,
        TeamStat::Age,
        TeamStat::Luck,
    ];
}

impl StatRecord for TeamStats {
    type Stat = TeamStat;
    const KIND: EntityKind = EntityKind::Team;

    fn name(&self) -> &str {
        &self.name
    }

    fn stat(&self, stat: TeamStat) -> f64 {
        match stat {
            TeamStat::BattingRuns => self.batting_runs,
            TeamStat::BarrelRate => self.barrel_rate,
            TeamStat::BaserunningRuns => self.baserunning_runs,
            TeamStat::FieldingRuns => self.fielding_runs,
            TeamStat::Payroll => self.payroll,
            TeamStat::Age => self.age,
            TeamStat::Luck => self.luck,
        }
    }
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// One z-score per tracked team statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamZScores {
    pub batting_runs: f64,
    pub barrel_rate: f64,
    pub baserunning_runs: f64,
    pub fielding_runs: f64,
    pub payroll: f64,
    pub age: f64,
    pub luck: f64,
}

/// Contribution of each tNERD term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamComponents {
    pub batting: f64,
    pub barrel: f64,
    pub baserunning: f64,
    pub fielding: f64,
    pub payroll: f64,
    pub age: f64,
    pub luck: f64,
    pub constant: f64,
}

impl TeamComponents {
    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.named().iter().map(|(_, v)| v).sum()
    }

    /// Components with display labels, in formula order.
    pub fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("Batting Runs", self.batting),
            ("Barrel Rate", self.barrel),
            ("Baserunning Runs", self.baserunning),
            ("Fielding Runs", self.fielding),
            ("Payroll", self.payroll),
            ("Age", self.age),
            ("Luck", self.luck),
            ("Constant", self.constant),
        ]
    }
}

/// Fully itemized tNERD result for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamNerd {
    pub stats: TeamStats,
    pub zscores: TeamZScores,
    /// max(0, -zPay)
    pub adjusted_payroll: f64,
    /// max(0, -zAge)
    pub adjusted_age: f64,
    /// max(0, min(2, zLuck))
    pub adjusted_luck: f64,
    pub components: TeamComponents,
    pub tnerd: f64,
}

impl TeamNerd {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = &self.stats.name;
        check_range(name, "adjusted_payroll", self.adjusted_payroll, 0.0, MAX_ADJUSTED_PAYROLL)?;
        check_range(name, "adjusted_age", self.adjusted_age, 0.0, MAX_ADJUSTED_AGE)?;
        check_range(name, "adjusted_luck", self.adjusted_luck, 0.0, LUCK_CAP)?;
        check_range(name, "tnerd", self.tnerd, 0.0, MAX_TNERD)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Compute the tNERD breakdown for one team against the batch aggregates.
pub fn calculate_tnerd(
    stats: TeamStats,
    aggregates: &LeagueAggregates<TeamStat>,
    constant: f64,
) -> Result<TeamNerd, NerdError> {
    stats.validate()?;

    let zscores = TeamZScores {
        batting_runs: aggregates.zscore(TeamStat::BattingRuns, stats.batting_runs)?,
        barrel_rate: aggregates.zscore(TeamStat::BarrelRate, stats.barrel_rate)?,
        baserunning_runs: aggregates.zscore(TeamStat::BaserunningRuns, stats.baserunning_runs)?,
        fielding_runs: aggregates.zscore(TeamStat::FieldingRuns, stats.fielding_runs)?,
        payroll: aggregates.zscore(TeamStat::Payroll, stats.payroll)?,
        age: aggregates.zscore(TeamStat::Age, stats.age)?,
        luck: aggregates.zscore(TeamStat::Luck, stats.luck)?,
    };

    // Lower payroll and younger rosters are rewarded; the opposite is not penalized.
    let adjusted_payroll = (-zscores.payroll).max(0.0);
    let adjusted_age = (-zscores.age).max(0.0);
    let adjusted_luck = zscores.luck.min(LUCK_CAP).max(0.0);

    let components = TeamComponents {
        batting: zscores.batting_runs,
        barrel: zscores.barrel_rate,
        baserunning: zscores.baserunning_runs,
        fielding: zscores.fielding_runs,
        payroll: adjusted_payroll,
        age: adjusted_age,
        luck: adjusted_luck,
        constant,
    };

    let nerd = TeamNerd {
        stats,
        zscores,
        adjusted_payroll,
        adjusted_age,
        adjusted_luck,
        tnerd: components.total(),
        components,
    };
    nerd.validate()?;
    Ok(nerd)
}

/// Score every team in the batch, keyed by team abbreviation.
pub fn score_teams(teams: Vec<TeamStats>, constant: f64) -> ScoredBatch<TeamNerd> {
    score_batch(teams, &TeamStat::ALL, |stats, agg| {
        calculate_tnerd(stats, agg, constant)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zscore::StatSummary;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    /// Aggregates where every statistic has mean 0 and stdev 1, so raw values
    /// are their own z-scores.
    fn unit_aggregates() -> LeagueAggregates<TeamStat> {
        LeagueAggregates::from_summaries(
            TeamStat::ALL.iter().map(|&s| {
                (
                    s,
                    StatSummary {
                        mean: 0.0,
                        stdev: 1.0,
                    },
                )
            }),
            30,
        )
    }

    fn team(name: &str, z: [f64; 7]) -> TeamStats {
        TeamStats {
            name: name.into(),
            batting_runs: z[0],
            barrel_rate: z[1],
            baserunning_runs: z[2],
            fielding_runs: z[3],
            payroll: z[4],
            age: z[5],
            luck: z[6],
        }
    }

    #[test]
    fn basic_formula() {
        let stats = team("BOS", [1.0, 0.5, 0.3, 1.2, -0.8, -0.5, 0.4]);
        let nerd = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap();

        assert!(approx_eq(nerd.adjusted_payroll, 0.8, 1e-12));
        assert!(approx_eq(nerd.adjusted_age, 0.5, 1e-12));
        assert!(approx_eq(nerd.adjusted_luck, 0.4, 1e-12));
        let expected = 1.0 + 0.5 + 0.3 + 1.2 + 0.8 + 0.5 + 0.4 + 4.0;
        assert!(approx_eq(nerd.tnerd, expected, 1e-12));
    }

    #[test]
    fn real_aggregates_scale_raw_values() {
        let agg = LeagueAggregates::from_summaries(
            TeamStat::ALL.iter().map(|&s| {
                let summary = match s {
                    TeamStat::Payroll => StatSummary {
                        mean: 150.0,
                        stdev: 50.0,
                    },
                    _ => StatSummary {
                        mean: 0.0,
                        stdev: 1.0,
                    },
                };
                (s, summary)
            }),
            30,
        );
        let stats = team("TBR", [0.0, 0.0, 0.0, 0.0, 75.0, 0.0, 0.0]);
        let nerd = calculate_tnerd(stats, &agg, TNERD_CONSTANT).unwrap();
        assert!(approx_eq(nerd.zscores.payroll, -1.5, 1e-12));
        assert!(approx_eq(nerd.adjusted_payroll, 1.5, 1e-12));
    }

    #[test]
    fn total_equals_sum_of_components() {
        let stats = team("NYY", [1.5, 0.8, 0.6, 0.9, -1.2, -0.3, 3.1]);
        let nerd = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap();
        let sum: f64 = nerd.components.named().iter().map(|(_, v)| v).sum();
        assert!(approx_eq(nerd.tnerd, sum, 1e-3));
        assert!(approx_eq(nerd.components.constant, 4.0, 1e-12));
    }

    #[test]
    fn penalized_direction_contributes_exactly_zero() {
        // Five standard deviations more expensive and older than average.
        let stats = team("LAD", [3.0, 3.0, 3.0, 3.0, 5.0, 5.0, 0.0]);
        let nerd = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap();
        assert_eq!(nerd.adjusted_payroll, 0.0);
        assert_eq!(nerd.adjusted_age, 0.0);
        assert_eq!(nerd.components.payroll, 0.0);
        assert_eq!(nerd.components.age, 0.0);
    }

    #[test]
    fn luck_zscore_capped_at_two() {
        for z in [2.0, 2.5, 4.0] {
            let stats = team("SEA", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, z]);
            let nerd = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap();
            assert_eq!(nerd.adjusted_luck, 2.0, "luck z = {z}");
        }
    }

    #[test]
    fn negative_luck_contributes_zero() {
        // Mean luck is 0, so negative raw luck has a negative z-score.
        let stats = team("COL", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.7]);
        let nerd = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap();
        assert_eq!(nerd.adjusted_luck, 0.0);
    }

    #[test]
    fn luck_cap_applies_to_zscore_not_raw_value() {
        // Raw luck of 30 runs with mean 10 and stdev 20 is z = 1.0, below the cap.
        let agg = LeagueAggregates::from_summaries(
            TeamStat::ALL.iter().map(|&s| {
                let summary = match s {
                    TeamStat::Luck => StatSummary {
                        mean: 10.0,
                        stdev: 20.0,
                    },
                    _ => StatSummary {
                        mean: 0.0,
                        stdev: 1.0,
                    },
                };
                (s, summary)
            }),
            30,
        );
        let stats = team("MIL", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 30.0]);
        let nerd = calculate_tnerd(stats, &agg, TNERD_CONSTANT).unwrap();
        assert!(approx_eq(nerd.adjusted_luck, 1.0, 1e-12));
    }

    #[test]
    fn all_average_team_scores_the_constant() {
        let stats = team("KCR", [0.0; 7]);
        let nerd = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap();
        assert!(approx_eq(nerd.tnerd, 4.0, 1e-12));
    }

    #[test]
    fn out_of_range_total_is_rejected() {
        let stats = team("BAD", [20.0, 20.0, 10.0, 0.0, 0.0, 0.0, 0.0]);
        let err = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap_err();
        match err {
            NerdError::OutOfRange(v) => assert_eq!(v.field(), "tnerd"),
            other => panic!("expected OutOfRange, got: {other}"),
        }
    }

    #[test]
    fn negative_total_is_rejected_not_clamped() {
        let stats = team("CHW", [-3.0, -3.0, -2.0, -2.0, 0.0, 0.0, 0.0]);
        let err = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap_err();
        assert!(matches!(err, NerdError::OutOfRange(_)));
    }

    #[test]
    fn adjusted_payroll_above_ten_is_rejected() {
        let stats = team("OAK", [5.0, 5.0, 5.0, 5.0, -11.0, 0.0, 0.0]);
        let err = calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).unwrap_err();
        match err {
            NerdError::OutOfRange(v) => assert_eq!(v.field(), "adjusted_payroll"),
            other => panic!("expected OutOfRange, got: {other}"),
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let stats = team("  ", [0.0; 7]);
        assert!(calculate_tnerd(stats, &unit_aggregates(), TNERD_CONSTANT).is_err());
    }

    #[test]
    fn score_teams_drops_only_the_bad_team() {
        let mut teams: Vec<TeamStats> = (0..29)
            .map(|i| {
                let x = i as f64;
                TeamStats {
                    name: format!("T{i:02}"),
                    batting_runs: x - 14.0,
                    barrel_rate: 0.07 + x * 0.001,
                    baserunning_runs: (x % 5.0) - 2.0,
                    fielding_runs: 10.0 - x * 0.5,
                    payroll: 100.0 + x * 5.0,
                    age: 26.0 + (x % 6.0) * 0.5,
                    luck: (x % 7.0) - 3.0,
                }
            })
            .collect();
        teams.push(TeamStats {
            name: "   ".into(),
            batting_runs: 0.0,
            barrel_rate: 0.08,
            baserunning_runs: 0.0,
            fielding_runs: 0.0,
            payroll: 150.0,
            age: 28.0,
            luck: 0.0,
        });

        let batch = score_teams(teams, TNERD_CONSTANT);
        assert_eq!(batch.scores.len(), 29);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].kind, EntityKind::Team);
    }

    #[test]
    fn score_teams_empty_batch() {
        let batch = score_teams(Vec::new(), TNERD_CONSTANT);
        assert!(batch.scores.is_empty());
        assert!(batch.rejected.is_empty());
    }
}
