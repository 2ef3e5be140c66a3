// Markdown rendering of a day's ranked games.
//
// Layout: YAML front matter, intro, the ranked table, one detail section per
// game (team and starter breakdowns plus any description), footer notes.

use chrono::NaiveDate;
use chrono_tz::Tz;

use watchability_baseball::team_mappings::fangraphs_team_slug;
use watchability_baseball::{LeagueScores, PitcherNerd, TeamNerd};

use crate::descriptions::RankedGame;
use crate::time_format::{format_time_12_hour, zone_abbreviation};

// ---------------------------------------------------------------------------
// Fixed text
// ---------------------------------------------------------------------------

const INTRO_TEXT: &str = "Here are today's MLB games, ordered by watchability, based on how \
interesting the teams and starting pitchers look. Higher is better.

This is inspired by [Carson Cistulli's NERD scores](https://blogs.fangraphs.com/introducing-team-nerd/) \
at FanGraphs. Team scores (tNERD) reward hitting, barrels, baserunning, defense, a low payroll, \
youth and bad luck; pitcher scores (pNERD) reward run prevention, whiffs, strikes, velocity, \
youth, a quick pace and knuckleballs.
";

const FOOTER_TEXT: &str = "Notes:

- **Pitcher 'no data'**: Pitchers only have a pNERD score once they've started at least one \
game. 'No data' also shows up when a probable starter's name can't be matched to the \
statistics, or when the starter hasn't been announced.
";

const TABLE_HEADER: &str = "| Score | Time ({zone}) | Visitors | Score | Home | Score | Starter (V) | Score | Starter (H) | Score |";
const TABLE_SEPARATOR: &str = "|-------|------------|----------|-------|------|-------|-------------|-------|-------------|-------|";

const NO_DATA: &str = "No data";

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Team name as a link to its FanGraphs stats page.
pub fn team_link(team: &str) -> String {
    if team.is_empty() || team == "TBD" {
        return "TBD".to_string();
    }
    format!(
        "[{team}](https://www.fangraphs.com/teams/{}/stats)",
        fangraphs_team_slug(team)
    )
}

/// Pitcher name as a FanGraphs search link on the surname.
pub fn pitcher_link(pitcher: Option<&str>) -> String {
    let name = match pitcher.map(str::trim) {
        None | Some("") | Some("TBD") => return "TBD".to_string(),
        Some(name) => name,
    };
    let last = name.split_whitespace().last().unwrap_or(name);
    format!("[{name}](https://www.fangraphs.com/search?q={last})")
}

fn score_cell(score: Option<f64>) -> String {
    score.map_or_else(|| NO_DATA.to_string(), |s| format!("{s:.1}"))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Front matter. The title date is spelled out; an unparseable date is
/// used as given.
pub fn metadata_block(date: &str) -> String {
    let formatted = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string());
    format!("---\ntitle: \"MLB: What to watch on {formatted}\"\ndate: {date}\ntags: mlbw\n---")
}

/// The ranked table, wrapped for the site's wide-table shortcode. `zone`
/// labels the start-time column.
pub fn games_table(games: &[RankedGame], zone: &str) -> String {
    if games.is_empty() {
        return "No games available for table.".to_string();
    }

    let mut lines = vec![
        "{% wideTable %}".to_string(),
        String::new(),
        TABLE_HEADER.replace("{zone}", zone),
        TABLE_SEPARATOR.to_string(),
    ];
    for game in games {
        let g = &game.score;
        lines.push(format!(
            "| {:.1} | {} | {} | {:.1} | {} | {:.1} | {} | {} | {} | {} |",
            g.gnerd,
            format_time_12_hour(g.game_time.as_deref()),
            team_link(&g.away_team),
            g.away_team_nerd,
            team_link(&g.home_team),
            g.home_team_nerd,
            pitcher_link(g.away_starter.as_deref()),
            score_cell(g.away_pitcher_nerd),
            pitcher_link(g.home_starter.as_deref()),
            score_cell(g.home_pitcher_nerd),
        ));
    }
    lines.push("{% endwideTable %}".to_string());
    lines.join("\n")
}

fn push_team_breakdown(out: &mut String, team: &str, nerd: Option<&TeamNerd>) {
    out.push_str(&format!("**{team}**"));
    let Some(nerd) = nerd else {
        out.push_str(": no team data\n\n");
        return;
    };
    out.push_str(&format!(" (tNERD {:.1})\n\n", nerd.tnerd));
    out.push_str("| Component | Value |\n|-----------|-------|\n");
    for (label, value) in nerd.components.named() {
        out.push_str(&format!("| {label} | {value:.2} |\n"));
    }
    out.push('\n');
}

fn push_pitcher_breakdown(out: &mut String, starter: Option<&str>, nerd: Option<&PitcherNerd>) {
    let name = starter.unwrap_or("TBD");
    out.push_str(&format!("**{name}**"));
    let Some(nerd) = nerd else {
        out.push_str(": no data\n\n");
        return;
    };
    out.push_str(&format!(" (pNERD {:.1})\n\n", nerd.pnerd));
    out.push_str("| Component | Value |\n|-----------|-------|\n");
    for (label, value) in nerd.components.named() {
        out.push_str(&format!("| {label} | {value:.2} |\n"));
    }
    out.push('\n');
}

/// Per-game detail sections in rank order.
pub fn game_details(games: &[RankedGame], league: &LeagueScores) -> String {
    let mut out = String::new();
    for (rank, game) in games.iter().enumerate() {
        let g = &game.score;
        let details = league.details(g);

        out.push_str(&format!(
            "### {}. {} @ {} ({:.1})\n\n",
            rank + 1,
            g.away_team,
            g.home_team,
            g.gnerd
        ));

        if let Some(description) = &game.description {
            out.push_str(description.text.trim());
            out.push_str("\n\n");
            if !description.sources.is_empty() {
                out.push_str("Sources:\n\n");
                for source in &description.sources {
                    out.push_str(&format!("- [{}]({})\n", source.title, source.url));
                }
                out.push('\n');
            }
        }

        push_team_breakdown(&mut out, &g.away_team, details.away_team);
        push_team_breakdown(&mut out, &g.home_team, details.home_team);
        push_pitcher_breakdown(&mut out, g.away_starter.as_deref(), details.away_pitcher);
        push_pitcher_breakdown(&mut out, g.home_starter.as_deref(), details.home_pitcher);
    }
    out
}

/// The complete file. Start times are already in `tz`.
pub fn render_markdown(
    date: &str,
    games: &[RankedGame],
    league: &LeagueScores,
    tz: Tz,
) -> String {
    let mut parts = vec![
        metadata_block(date),
        String::new(),
        INTRO_TEXT.to_string(),
        String::new(),
        games_table(games, &zone_abbreviation(date, tz)),
        String::new(),
    ];
    if !games.is_empty() {
        parts.push("## Game details\n".to_string());
        parts.push(game_details(games, league));
    }
    parts.push(FOOTER_TEXT.to_string());
    parts.push(String::new());
    parts.join("\n")
}

/// `mlb_what_to_watch_2025_07_27.md` for `2025-07-27`.
pub fn markdown_filename(date: &str) -> String {
    format!("mlb_what_to_watch_{}.md", date.replace('-', "_"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
