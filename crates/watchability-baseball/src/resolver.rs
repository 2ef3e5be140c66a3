// Fuzzy pitcher-name resolution.
//
// Strategies are tried in order and the first hit wins. A miss from one
// strategy is not an error; exhausting all of them is a normal "no match".

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::names::{remove_accents, NameAliases};

/// Placeholder the schedule feed uses for an unannounced starter.
pub const TBD: &str = "TBD";

/// One way of mapping a schedule-feed name onto a statistics key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Exact,
    AccentFolded,
    Alias,
}

impl MatchStrategy {
    /// Priority order.
    pub const ORDER: [MatchStrategy; 3] = [
        MatchStrategy::Exact,
        MatchStrategy::AccentFolded,
        MatchStrategy::Alias,
    ];

    /// Find the key in `scores` this strategy maps `name` onto.
    fn find<'a, T>(
        self,
        name: &str,
        scores: &'a HashMap<String, T>,
        aliases: &NameAliases,
    ) -> Option<&'a str> {
        match self {
            MatchStrategy::Exact => scores.get_key_value(name).map(|(k, _)| k.as_str()),
            MatchStrategy::AccentFolded => {
                let folded = remove_accents(name);
                if let Some((k, _)) = scores.get_key_value(folded.as_str()) {
                    return Some(k.as_str());
                }
                // Accented keys on the statistics side; lowest key wins if
                // several fold to the same string.
                scores
                    .keys()
                    .filter(|k| remove_accents(k) == folded)
                    .min()
                    .map(String::as_str)
            }
            MatchStrategy::Alias => {
                let target = aliases.lookup(name)?;
                scores.get_key_value(target).map(|(k, _)| k.as_str())
            }
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::AccentFolded => "accent-folded",
            MatchStrategy::Alias => "alias",
        };
        f.write_str(label)
    }
}

/// A successful resolution.
#[derive(Debug, PartialEq)]
pub struct NameMatch<'a, T> {
    /// Statistics-side key that matched.
    pub key: &'a str,
    pub value: &'a T,
    pub strategy: MatchStrategy,
}

/// Whether a schedule-feed starter name is actually announced.
pub fn is_announced(name: Option<&str>) -> bool {
    matches!(name.map(str::trim), Some(n) if !n.is_empty() && n != TBD)
}

/// Resolve a schedule-feed pitcher name against the scored pitchers.
///
/// Absent, empty and `"TBD"` names return `None` without trying any strategy.
pub fn resolve<'a, T>(
    name: Option<&str>,
    scores: &'a HashMap<String, T>,
    aliases: &NameAliases,
) -> Option<NameMatch<'a, T>> {
    if !is_announced(name) {
        return None;
    }
    let name = name?.trim();

    for strategy in MatchStrategy::ORDER {
        if let Some(key) = strategy.find(name, scores, aliases) {
            debug!("resolved pitcher '{}' -> '{}' ({})", name, key, strategy);
            let value = scores.get(key)?;
            return Some(NameMatch {
                key,
                value,
                strategy,
            });
        }
        debug!("pitcher '{}': no {} match", name, strategy);
    }
    debug!("pitcher '{}' not found in stats", name);
    None
}
