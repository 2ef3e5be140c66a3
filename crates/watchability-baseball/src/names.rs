// Pitcher name normalization and the schedule-to-stats alias table.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip combining diacritical marks: decompose, then drop the marks.
///
/// `"Jesús Luzardo"` becomes `"Jesus Luzardo"`. Total; empty in, empty out.
pub fn remove_accents(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("failed to read alias table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in alias table {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct RawAlias {
    mlbam_name: String,
    fangraphs_name: String,
}

/// Schedule-feed (MLBAM) pitcher name to statistics-feed (FanGraphs) name.
#[derive(Debug, Clone, Default)]
pub struct NameAliases {
    map: HashMap<String, String>,
}

impl NameAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the reader of a `mlbam_name,fangraphs_name` CSV.
    ///
    /// Rows with a blank side are skipped. A missing header is an error.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(rdr);
        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h.trim() == "mlbam_name")
            || !headers.iter().any(|h| h.trim() == "fangraphs_name")
        {
            return Err(csv::Error::from(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "expected columns mlbam_name,fangraphs_name",
            )));
        }

        let mut map = HashMap::new();
        for result in reader.deserialize::<RawAlias>() {
            match result {
                Ok(raw) => {
                    let from = raw.mlbam_name.trim();
                    let to = raw.fangraphs_name.trim();
                    if from.is_empty() || to.is_empty() {
                        warn!("skipping alias row with a blank name");
                        continue;
                    }
                    map.insert(from.to_string(), to.to_string());
                }
                Err(e) => {
                    warn!("skipping malformed alias row: {}", e);
                }
            }
        }
        Ok(Self { map })
    }

    /// Load the alias table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, AliasError> {
        let file = std::fs::File::open(path).map_err(|e| AliasError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_reader(file).map_err(|e| AliasError::Csv {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load the alias table, degrading to an empty table on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(aliases) => {
                info!("loaded {} pitcher name aliases", aliases.len());
                aliases
            }
            Err(e) => {
                warn!("{e}; alias matching disabled for this run");
                Self::default()
            }
        }
    }

    /// Statistics-feed name for a schedule-feed name (exact, case-sensitive).
    pub fn lookup(&self, schedule_name: &str) -> Option<&str> {
        self.map.get(schedule_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NameAliases {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
