// Season statistics loading from FanGraphs CSV exports.
//
// Layout: `{stats_dir}/{season}/team_batting.csv`, `payroll.csv` and
// `pitchers.csv`. Team batting and payroll rows are joined on the FanGraphs
// abbreviation.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::pitcher::PitcherStats;
use crate::team::TeamStats;
use crate::team_mappings::normalize_payroll_abbreviation;

pub const TEAM_BATTING_FILE: &str = "team_batting.csv";
pub const PAYROLL_FILE: &str = "payroll.csv";
pub const PITCHERS_FILE: &str = "pitchers.csv";

/// Innings a starter needs before joining the pitcher population.
pub const DEFAULT_MIN_INNINGS_PITCHED: f64 = 20.0;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Raw statistics for one season, ready for scoring.
#[derive(Debug, Clone)]
pub struct SeasonStats {
    pub season: i32,
    pub teams: Vec<TeamStats>,
    pub pitchers: Vec<PitcherStats>,
}

/// Team batting row before the payroll join.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamBatting {
    pub team: String,
    pub batting_runs: f64,
    pub barrel_rate: f64,
    pub baserunning_runs: f64,
    pub fielding_runs: f64,
    pub age: f64,
    pub luck: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawTeamBatting {
    Team: String,
    Bat: f64,
    #[serde(rename = "Barrel%")]
    Barrel: f64,
    BsR: f64,
    Fld: f64,
    Age: f64,
    wRC: f64,
    R: f64,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawPayroll {
    Team: String,
    Payroll: f64,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawPitcher {
    Name: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    GS: f64,
    /// FanGraphs notation: `180.1` is 180 and one third innings.
    IP: f64,
    #[serde(rename = "xFIP-")]
    XfipMinus: f64,
    #[serde(rename = "SwStr%")]
    SwStr: f64,
    Strikes: f64,
    Pitches: f64,
    #[serde(alias = "vFA (pi)")]
    FBv: f64,
    Age: f64,
    Pace: f64,
    #[serde(rename = "ERA-")]
    EraMinus: f64,
    /// Blank for pitchers who have never thrown a knuckleball. Keep this
    /// struct free of `#[serde(flatten)]` or blank cells stop mapping to `None`.
    #[serde(rename = "KN%", default)]
    Kn: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn open(path: &Path) -> Result<std::fs::File, StatsError> {
    std::fs::File::open(path).map_err(|e| StatsError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> StatsError + '_ {
    move |e| StatsError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

pub fn load_team_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamBatting>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut teams = Vec::new();
    for result in reader.deserialize::<RawTeamBatting>() {
        match result {
            Ok(raw) => {
                let team = raw.Team.trim().to_string();
                if !all_finite(&[raw.Bat, raw.Barrel, raw.BsR, raw.Fld, raw.Age, raw.wRC, raw.R]) {
                    warn!("skipping team '{}': non-finite batting value", team);
                    continue;
                }
                teams.push(TeamBatting {
                    team,
                    batting_runs: raw.Bat,
                    barrel_rate: raw.Barrel,
                    baserunning_runs: raw.BsR,
                    fielding_runs: raw.Fld,
                    age: raw.Age,
                    luck: raw.wRC - raw.R,
                });
            }
            Err(e) => {
                warn!("skipping malformed team batting row: {}", e);
            }
        }
    }
    Ok(teams)
}

/// Payroll in millions keyed by normalized FanGraphs abbreviation.
pub fn load_payroll_from_reader<R: Read>(rdr: R) -> Result<HashMap<String, f64>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map = HashMap::new();
    for result in reader.deserialize::<RawPayroll>() {
        match result {
            Ok(raw) => {
                let team = normalize_payroll_abbreviation(raw.Team.trim()).to_string();
                if !raw.Payroll.is_finite() {
                    warn!("skipping payroll for '{}': non-finite value", team);
                    continue;
                }
                if map.insert(team.clone(), raw.Payroll).is_some() {
                    warn!("duplicate payroll entry for '{}', using latest value", team);
                }
            }
            Err(e) => {
                warn!("skipping malformed payroll row: {}", e);
            }
        }
    }
    Ok(map)
}

/// Starting pitchers (GS > 0) with at least `min_innings` innings whose raw
/// values pass their sanity ranges.
pub fn load_pitchers_from_reader<R: Read>(
    rdr: R,
    min_innings: f64,
) -> Result<Vec<PitcherStats>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pitchers = Vec::new();
    for result in reader.deserialize::<RawPitcher>() {
        match result {
            Ok(raw) => {
                let name = raw.Name.trim().to_string();
                if raw.GS <= 0.0 {
                    continue;
                }
                if raw.IP < min_innings {
                    debug!("skipping pitcher '{}': {} IP below {}", name, raw.IP, min_innings);
                    continue;
                }
                if raw.Pitches <= 0.0 {
                    warn!("skipping pitcher '{}': no pitches recorded", name);
                    continue;
                }
                let stats = PitcherStats {
                    team: raw.Team.trim().to_string(),
                    xfip_minus: raw.XfipMinus,
                    swinging_strike_rate: raw.SwStr,
                    strike_rate: raw.Strikes / raw.Pitches,
                    velocity: raw.FBv,
                    age: raw.Age,
                    pace: raw.Pace,
                    luck: raw.EraMinus - raw.XfipMinus,
                    knuckleball_rate: raw.Kn.unwrap_or(0.0),
                    name,
                };
                if let Err(e) = stats.validate() {
                    warn!("skipping pitcher: {}", e);
                    continue;
                }
                pitchers.push(stats);
            }
            Err(e) => {
                warn!("skipping malformed pitcher row: {}", e);
            }
        }
    }
    Ok(pitchers)
}

/// Join batting rows with payroll. Teams without a payroll entry are skipped.
pub fn join_team_stats(batting: Vec<TeamBatting>, payroll: &HashMap<String, f64>) -> Vec<TeamStats> {
    batting
        .into_iter()
        .filter_map(|b| match payroll.get(&b.team) {
            Some(&pay) => Some(TeamStats {
                name: b.team,
                batting_runs: b.batting_runs,
                barrel_rate: b.barrel_rate,
                baserunning_runs: b.baserunning_runs,
                fielding_runs: b.fielding_runs,
                payroll: pay,
                age: b.age,
                luck: b.luck,
            }),
            None => {
                warn!("skipping team '{}': no payroll data", b.team);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

pub fn load_team_batting(path: &Path) -> Result<Vec<TeamBatting>, StatsError> {
    load_team_batting_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_payroll(path: &Path) -> Result<HashMap<String, f64>, StatsError> {
    load_payroll_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_pitchers(path: &Path, min_innings: f64) -> Result<Vec<PitcherStats>, StatsError> {
    load_pitchers_from_reader(open(path)?, min_innings).map_err(csv_error(path))
}

/// Directory holding one season's CSV exports.
pub fn season_dir(stats_dir: &Path, season: i32) -> PathBuf {
    stats_dir.join(season.to_string())
}

/// Load and join all raw statistics for a season.
///
/// A missing or unreadable file is an error. A file that yields no usable
/// rows is not; scoring treats the empty population as "no data".
/// Starters below `min_innings` innings are left out of the season.
pub fn load_season(
    stats_dir: &Path,
    season: i32,
    min_innings: f64,
) -> Result<SeasonStats, StatsError> {
    let dir = season_dir(stats_dir, season);
    if !dir.is_dir() {
        return Err(StatsError::Validation(format!(
            "no statistics directory for season {season} at {}",
            dir.display()
        )));
    }

    let batting = load_team_batting(&dir.join(TEAM_BATTING_FILE))?;
    let payroll = load_payroll(&dir.join(PAYROLL_FILE))?;
    let teams = join_team_stats(batting, &payroll);
    let pitchers = load_pitchers(&dir.join(PITCHERS_FILE), min_innings)?;

    info!(
        "loaded {} season stats: {} teams, {} starting pitchers",
        season,
        teams.len(),
        pitchers.len()
    );

    Ok(SeasonStats {
        season,
        teams,
        pitchers,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    const BATTING: &str = "\
Team,G,Bat,Barrel%,BsR,Fld,Age,wRC,R
LAD,162,120.5,0.102,5.1,10.2,29.4,880,842
COL,162,-80.2,0.071,-3.0,-20.5,27.1,610,640
";

    #[test]
    fn team_batting_computes_luck() {
        let teams = load_team_batting_from_reader(BATTING.as_bytes()).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].team, "LAD");
        assert!(approx_eq(teams[0].luck, 38.0, 1e-9));
        assert!(approx_eq(teams[1].luck, -30.0, 1e-9));
        assert!(approx_eq(teams[0].barrel_rate, 0.102, 1e-12));
    }

    #[test]
    fn team_batting_skips_malformed_rows() {
        let csv = "Team,Bat,Barrel%,BsR,Fld,Age,wRC,R\nLAD,abc,0.1,1,1,29,800,800\nSEA,10,0.09,1,1,28,700,690\n";
        let teams = load_team_batting_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team, "SEA");
    }

    #[test]
    fn payroll_normalizes_abbreviations() {
        let csv = "Team,Payroll\nTB,95.5\nWSH,120.0\nNYY,300.1\n";
        let payroll = load_payroll_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(payroll.get("TBR"), Some(&95.5));
        assert_eq!(payroll.get("WSN"), Some(&120.0));
        assert_eq!(payroll.get("NYY"), Some(&300.1));
        assert!(!payroll.contains_key("TB"));
    }

    #[test]
    fn join_drops_teams_without_payroll() {
        let batting = load_team_batting_from_reader(BATTING.as_bytes()).unwrap();
        let payroll: HashMap<String, f64> = [("LAD".to_string(), 350.0)].into_iter().collect();
        let teams = join_team_stats(batting, &payroll);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "LAD");
        assert_eq!(teams[0].payroll, 350.0);
    }

    const PITCHERS: &str = "\
Name,Team,GS,IP,xFIP-,SwStr%,Strikes,Pitches,FBv,Age,Pace,ERA-,KN%
Tarik Skubal,DET,31,180.1,72,0.145,2000,3000,96.8,27,17.5,65,
Matt Waldron,SDP,12,70.2,105,0.10,900,1400,91.2,28,19.0,110,0.62
Mop Up,SEA,0,45.0,120,0.08,300,500,92.0,30,21.0,130,
Broken Gun,LAA,5,30.0,100,0.10,300,500,130.0,30,21.0,100,
";

    #[test]
    fn pitchers_filter_and_derive() {
        let pitchers = load_pitchers_from_reader(PITCHERS.as_bytes(), DEFAULT_MIN_INNINGS_PITCHED).unwrap();
        let names: Vec<&str> = pitchers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Tarik Skubal", "Matt Waldron"]);

        let skubal = &pitchers[0];
        assert!(approx_eq(skubal.strike_rate, 2.0 / 3.0, 1e-12));
        assert!(approx_eq(skubal.luck, -7.0, 1e-12));
        assert_eq!(skubal.knuckleball_rate, 0.0);

        let waldron = &pitchers[1];
        assert!(approx_eq(waldron.knuckleball_rate, 0.62, 1e-12));
        assert!(approx_eq(waldron.luck, 5.0, 1e-12));
    }

    #[test]
    fn pitchers_skip_zero_pitches() {
        let csv = "Name,Team,GS,IP,xFIP-,SwStr%,Strikes,Pitches,FBv,Age,Pace,ERA-,KN%\nOpener,TBR,1,25.0,100,0.1,0,0,94,30,20,100,\n";
        assert!(load_pitchers_from_reader(csv.as_bytes(), DEFAULT_MIN_INNINGS_PITCHED)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn pitchers_below_innings_minimum_are_left_out() {
        let csv = "\
Name,Team,GS,IP,xFIP-,SwStr%,Strikes,Pitches,FBv,Age,Pace,ERA-,KN%
Tarik Skubal,DET,28,180.1,70,0.152,1880,2780,97.1,28,17.6,64,
One Inning Opener,TBR,1,1.0,95,0.11,12,20,94.0,26,19.0,90,
Almost There,MIA,4,19.2,100,0.10,200,330,93.0,25,20.0,100,
Right At It,OAK,4,20.0,100,0.10,200,330,93.0,25,20.0,100,
";
        let pitchers = load_pitchers_from_reader(csv.as_bytes(), DEFAULT_MIN_INNINGS_PITCHED).unwrap();
        let names: Vec<&str> = pitchers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Tarik Skubal", "Right At It"]);

        let everyone = load_pitchers_from_reader(csv.as_bytes(), 0.0).unwrap();
        assert_eq!(everyone.len(), 4);
    }

    #[test]
    fn missing_season_dir_is_an_error() {
        let err = load_season(Path::new("/nonexistent/stats"), 2025, DEFAULT_MIN_INNINGS_PITCHED).unwrap_err();
        match err {
            StatsError::Validation(msg) => assert!(msg.contains("2025")),
            other => panic!("expected Validation, got: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        match load_payroll(Path::new("/nonexistent/payroll.csv")) {
            Err(StatsError::Io { path, .. }) => assert!(path.contains("payroll.csv")),
            other => panic!("expected Io error, got: {other:?}"),
        }
    }
}
