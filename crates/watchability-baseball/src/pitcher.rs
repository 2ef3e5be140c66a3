// Pitcher NERD (pNERD) composition.
//
// pNERD = -zxFIP- * 2 + zSwStr / 2 + zStrk / 2 + AdjVelo + AdjAge
//         - zPace / 2 + AdjLuck / 20 + KN * 5 + constant

use crate::error::{EntityKind, NerdError};
use crate::league::{score_batch, LeagueAggregates, ScoredBatch, StatRecord};
use crate::validation::{check_identity, check_range, ValidationError};

/// Default pNERD constant.
pub const PNERD_CONSTANT: f64 = 3.8;

const MAX_ABS_ZSCORE: f64 = 10.0;
const VELOCITY_CAP: f64 = 2.0;
const AGE_CAP: f64 = 2.0;
/// Cap on the raw luck value (not its z-score).
const LUCK_CAP: f64 = 1.0;
const LUCK_DIVISOR: f64 = 20.0;
const KNUCKLEBALL_WEIGHT: f64 = 5.0;
const MAX_PNERD: f64 = 50.0;

// ---------------------------------------------------------------------------
// Raw stats
// ---------------------------------------------------------------------------

/// Season statistics for one starting pitcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PitcherStats {
    pub name: String,
    /// FanGraphs team abbreviation.
    pub team: String,
    pub xfip_minus: f64,
    /// SwStr% as a fraction.
    pub swinging_strike_rate: f64,
    /// Strikes / pitches.
    pub strike_rate: f64,
    /// Average fastball velocity (mph).
    pub velocity: f64,
    pub age: f64,
    /// Seconds between pitches.
    pub pace: f64,
    /// ERA- minus xFIP-.
    pub luck: f64,
    /// KN% as a fraction; zero for pitchers without a knuckleball.
    pub knuckleball_rate: f64,
}

impl PitcherStats {
    /// Identity fields must be present and raw values physically plausible.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identity("pitcher name", &self.name)?;
        check_identity("pitcher team", &self.team)?;

        let name = &self.name;
        check_range(name, "xfip_minus", self.xfip_minus, 0.0, 300.0)?;
        check_range(name, "swinging_strike_rate", self.swinging_strike_rate, 0.0, 1.0)?;
        check_range(name, "strike_rate", self.strike_rate, 0.0, 1.0)?;
        check_range(name, "velocity", self.velocity, 70.0, 110.0)?;
        check_range(name, "age", self.age, 18.0, 50.0)?;
        check_range(name, "pace", self.pace, 10.0, 40.0)?;
        check_range(name, "luck", self.luck, -100.0, 100.0)?;
        check_range(name, "knuckleball_rate", self.knuckleball_rate, 0.0, 1.0)?;
        Ok(())
    }
}

/// Statistics aggregated across the pitcher batch. Luck and knuckleball rate
/// enter the formula raw and are not aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitcherStat {
    XfipMinus,
    SwingingStrikeRate,
    StrikeRate,
    Velocity,
    Age,
    Pace,
}

impl PitcherStat {
    pub const ALL: [PitcherStat; 6] = [
        PitcherStat::XfipMinus,
        PitcherStat::SwingingStrikeRate,
        PitcherStat::StrikeRate,
        PitcherStat::Velocity,
        PitcherStat::Age,
        PitcherStat::Pace,
    ];

    fn field(self) -> &'static str {
        match self {
            PitcherStat::XfipMinus => "z_xfip_minus",
            PitcherStat::SwingingStrikeRate => "z_swinging_strike_rate",
            PitcherStat::StrikeRate => "z_strike_rate",
            PitcherStat::Velocity => "z_velocity",
            PitcherStat::Age => "z_age",
            PitcherStat::Pace => "z_pace",
        }
    }
}

impl StatRecord for PitcherStats {
    type Stat = PitcherStat;
    const KIND: EntityKind = EntityKind::Pitcher;

    fn name(&self) -> &str {
        &self.name
    }

    fn stat(&self, stat: PitcherStat) -> f64 {
        match stat {
            PitcherStat::XfipMinus => self.xfip_minus,
            PitcherStat::SwingingStrikeRate => self.swinging_strike_rate,
            PitcherStat::StrikeRate => self.strike_rate,
            PitcherStat::Velocity => self.velocity,
            PitcherStat::Age => self.age,
            PitcherStat::Pace => self.pace,
        }
    }
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitcherZScores {
    pub xfip_minus: f64,
    pub swinging_strike_rate: f64,
    pub strike_rate: f64,
    pub velocity: f64,
    pub age: f64,
    pub pace: f64,
}

impl PitcherZScores {
    fn get(&self, stat: PitcherStat) -> f64 {
        match stat {
            PitcherStat::XfipMinus => self.xfip_minus,
            PitcherStat::SwingingStrikeRate => self.swinging_strike_rate,
            PitcherStat::StrikeRate => self.strike_rate,
            PitcherStat::Velocity => self.velocity,
            PitcherStat::Age => self.age,
            PitcherStat::Pace => self.pace,
        }
    }
}

/// Contribution of each pNERD term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitcherComponents {
    pub xfip: f64,
    pub swinging_strike: f64,
    pub strike: f64,
    pub velocity: f64,
    pub age: f64,
    pub pace: f64,
    pub luck: f64,
    pub knuckleball: f64,
    pub constant: f64,
}

impl PitcherComponents {
    pub fn total(&self) -> f64 {
        self.named().iter().map(|(_, v)| v).sum()
    }

    /// Components with display labels, in formula order.
    pub fn named(&self) -> [(&'static str, f64); 9] {
        [
            ("xFIP-", self.xfip),
            ("Swinging Strike Rate", self.swinging_strike),
            ("Strike Rate", self.strike),
            ("Velocity", self.velocity),
            ("Age", self.age),
            ("Pace", self.pace),
            ("Luck", self.luck),
            ("Knuckleball Rate", self.knuckleball),
            ("Constant", self.constant),
        ]
    }
}

/// Fully itemized pNERD result for one pitcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PitcherNerd {
    pub stats: PitcherStats,
    pub zscores: PitcherZScores,
    /// max(0, min(2, zVelo))
    pub adjusted_velocity: f64,
    /// max(0, min(2, -zAge))
    pub adjusted_age: f64,
    /// max(0, min(1, raw luck))
    pub adjusted_luck: f64,
    pub components: PitcherComponents,
    pub pnerd: f64,
}

impl PitcherNerd {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = &self.stats.name;
        for stat in PitcherStat::ALL {
            check_range(
                name,
                stat.field(),
                self.zscores.get(stat),
                -MAX_ABS_ZSCORE,
                MAX_ABS_ZSCORE,
            )?;
        }
        check_range(name, "adjusted_velocity", self.adjusted_velocity, 0.0, VELOCITY_CAP)?;
        check_range(name, "adjusted_age", self.adjusted_age, 0.0, AGE_CAP)?;
        check_range(name, "adjusted_luck", self.adjusted_luck, 0.0, LUCK_CAP)?;
        check_range(name, "pnerd", self.pnerd, 0.0, MAX_PNERD)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Compute the pNERD breakdown for one pitcher against the batch aggregates.
pub fn calculate_pnerd(
    stats: PitcherStats,
    aggregates: &LeagueAggregates<PitcherStat>,
    constant: f64,
) -> Result<PitcherNerd, NerdError> {
    stats.validate()?;

    let zscores = PitcherZScores {
        xfip_minus: aggregates.zscore(PitcherStat::XfipMinus, stats.xfip_minus)?,
        swinging_strike_rate: aggregates
            .zscore(PitcherStat::SwingingStrikeRate, stats.swinging_strike_rate)?,
        strike_rate: aggregates.zscore(PitcherStat::StrikeRate, stats.strike_rate)?,
        velocity: aggregates.zscore(PitcherStat::Velocity, stats.velocity)?,
        age: aggregates.zscore(PitcherStat::Age, stats.age)?,
        pace: aggregates.zscore(PitcherStat::Pace, stats.pace)?,
    };

    let adjusted_velocity = zscores.velocity.min(VELOCITY_CAP).max(0.0);
    let adjusted_age = (-zscores.age).min(AGE_CAP).max(0.0);
    let adjusted_luck = stats.luck.min(LUCK_CAP).max(0.0);

    let components = PitcherComponents {
        xfip: -zscores.xfip_minus * 2.0,
        swinging_strike: zscores.swinging_strike_rate / 2.0,
        strike: zscores.strike_rate / 2.0,
        velocity: adjusted_velocity,
        age: adjusted_age,
        pace: -zscores.pace / 2.0,
        luck: adjusted_luck / LUCK_DIVISOR,
        knuckleball: stats.knuckleball_rate * KNUCKLEBALL_WEIGHT,
        constant,
    };

    let nerd = PitcherNerd {
        stats,
        zscores,
        adjusted_velocity,
        adjusted_age,
        adjusted_luck,
        pnerd: components.total(),
        components,
    };
    nerd.validate()?;
    Ok(nerd)
}

/// Score every pitcher in the batch, keyed by pitcher name.
pub fn score_pitchers(pitchers: Vec<PitcherStats>, constant: f64) -> ScoredBatch<PitcherNerd> {
    score_batch(pitchers, &PitcherStat::ALL, |stats, agg| {
        calculate_pnerd(stats, agg, constant)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
