// Team identity mappings between the schedule feed, the payroll export and
// FanGraphs.

/// Map a full schedule team name to its FanGraphs abbreviation.
///
/// Unknown names (including names that are already abbreviations) pass
/// through unchanged.
pub fn team_abbreviation(full_name: &str) -> &str {
    match full_name {
        "Arizona Diamondbacks" => "ARI",
        "Atlanta Braves" => "ATL",
        "Baltimore Orioles" => "BAL",
        "Boston Red Sox" => "BOS",
        "Chicago Cubs" => "CHC",
        "Chicago White Sox" => "CHW",
        "Cincinnati Reds" => "CIN",
        "Cleveland Guardians" => "CLE",
        "Colorado Rockies" => "COL",
        "Detroit Tigers" => "DET",
        "Houston Astros" => "HOU",
        "Kansas City Royals" => "KCR",
        "Los Angeles Angels" => "LAA",
        "Los Angeles Dodgers" => "LAD",
        "Miami Marlins" => "MIA",
        "Milwaukee Brewers" => "MIL",
        "Minnesota Twins" => "MIN",
        "New York Mets" => "NYM",
        "New York Yankees" => "NYY",
        "Oakland Athletics" | "Athletics" => "ATH",
        "Philadelphia Phillies" => "PHI",
        "Pittsburgh Pirates" => "PIT",
        "San Diego Padres" => "SDP",
        "San Francisco Giants" => "SFG",
        "Seattle Mariners" => "SEA",
        "St. Louis Cardinals" => "STL",
        "Tampa Bay Rays" => "TBR",
        "Texas Rangers" => "TEX",
        "Toronto Blue Jays" => "TOR",
        "Washington Nationals" => "WSN",
        other => other,
    }
}

/// Normalize an abbreviation from the payroll export to the FanGraphs scheme.
pub fn normalize_payroll_abbreviation(abbr: &str) -> &str {
    match abbr {
        "TB" => "TBR",
        "WSH" => "WSN",
        "SD" => "SDP",
        "SF" => "SFG",
        "KC" => "KCR",
        other => other,
    }
}

/// FanGraphs URL slug for a team, given its full name or abbreviation.
/// Falls back to the lowercased abbreviation.
pub fn fangraphs_team_slug(team: &str) -> String {
    let abbr = team_abbreviation(team);
    let slug = match abbr {
        "ARI" => "diamondbacks",
        "ATL" => "braves",
        "BAL" => "orioles",
        "BOS" => "red-sox",
        "CHC" => "cubs",
        "CHW" => "white-sox",
        "CIN" => "reds",
        "CLE" => "guardians",
        "COL" => "rockies",
        "DET" => "tigers",
        "HOU" => "astros",
        "KCR" => "royals",
        "LAA" => "angels",
        "LAD" => "dodgers",
        "MIA" => "marlins",
        "MIL" => "brewers",
        "MIN" => "twins",
        "NYM" => "mets",
        "NYY" => "yankees",
        "ATH" => "athletics",
        "PHI" => "phillies",
        "PIT" => "pirates",
        "SDP" => "padres",
        "SFG" => "giants",
        "SEA" => "mariners",
        "STL" => "cardinals",
        "TBR" => "rays",
        "TEX" => "rangers",
        "TOR" => "blue-jays",
        "WSN" => "nationals",
        other => return other.to_lowercase(),
    };
    slug.to_string()
}
