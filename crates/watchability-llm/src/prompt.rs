// Prompt templates for game summaries.
//
// Builds a compact, structured prompt describing one ranked game: the
// gNERD ranking, both team breakdowns and both starter breakdowns. The
// numbers are pre-computed so the model writes about matchups and context
// instead of doing arithmetic.

use watchability_baseball::{GameDetails, GameScore, PitcherNerd, TeamNerd};

// ---------------------------------------------------------------------------
// System prompt
// ---------------------------------------------------------------------------

/// Return the static system prompt for game summary calls.
pub fn system_prompt() -> String {
    "You are a baseball writer producing short previews for a daily \"what to watch\" column.\n\
     \n\
     Games are ranked by NERD watchability scores. tNERD rates a team (batting, barrels, \
     baserunning, fielding, payroll, youth, luck). pNERD rates a starting pitcher (xFIP-, \
     swinging strikes, strikes, velocity, youth, pace, luck, knuckleballs). gNERD is the \
     average of the team and pitcher averages.\n\
     \n\
     Use the pre-computed numbers I provide. Do NOT do arithmetic. Explain what makes the \
     game worth watching in plain language; do not list every component back to the reader."
        .to_string()
}

// ---------------------------------------------------------------------------
// Game summary prompt
// ---------------------------------------------------------------------------

/// Build the prompt for one game.
///
/// `game_date` is the schedule date (YYYY-MM-DD) the game was fetched for.
/// Sections for a team or starter without data say so rather than being
/// omitted, so the model does not invent numbers.
pub fn build_game_prompt(game: &GameScore, details: &GameDetails<'_>, game_date: &str) -> String {
    let mut p = String::with_capacity(4096);

    let away_starter = game.away_starter.as_deref().unwrap_or("TBD");
    let home_starter = game.home_starter.as_deref().unwrap_or("TBD");

    // --- Game ---
    p.push_str("## GAME\n");
    p.push_str(&format!("{} @ {}\n", game.away_team, game.home_team));
    p.push_str(&format!("Date: {game_date}\n"));
    p.push_str(&format!(
        "Time: {}\n",
        game.game_time.as_deref().unwrap_or("TBD")
    ));
    p.push_str(&format!("Starters: {away_starter} vs. {home_starter}\n\n"));

    // --- Scores ---
    p.push_str("## SCORES\n");
    p.push_str(&format!("gNERD: {:.1}\n", game.gnerd));
    p.push_str(&format!(
        "Team NERD: {} {:.1}, {} {:.1} (average {:.1})\n",
        game.away_team,
        game.away_team_nerd,
        game.home_team,
        game.home_team_nerd,
        game.average_team_nerd
    ));
    p.push_str(&format!(
        "Pitcher NERD: {away_starter} {}, {home_starter} {} (average {})\n\n",
        score_or_no_data(game.away_pitcher_nerd),
        score_or_no_data(game.home_pitcher_nerd),
        score_or_no_data(game.average_pitcher_nerd)
    ));

    // --- Teams ---
    push_team_section(&mut p, "AWAY TEAM", &game.away_team, details.away_team);
    push_team_section(&mut p, "HOME TEAM", &game.home_team, details.home_team);

    // --- Starters ---
    push_pitcher_section(&mut p, "AWAY STARTER", away_starter, details.away_pitcher);
    push_pitcher_section(&mut p, "HOME STARTER", home_starter, details.home_pitcher);

    // --- Task ---
    p.push_str("## TASK\n");
    p.push_str(
        "Write a two or three paragraph preview (about 150 words) of this game for a \
         general baseball audience. Lead with the most compelling storyline the numbers \
         suggest, then mention recent form, injuries or standings context if a web search \
         turns up anything relevant. Plain prose, no headings or bullet lists.\n",
    );

    p
}

fn score_or_no_data(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{s:.1}"),
        None => "No data".to_string(),
    }
}

fn push_team_section(p: &mut String, heading: &str, team: &str, nerd: Option<&TeamNerd>) {
    p.push_str(&format!("## {heading}: {team}\n"));
    let Some(nerd) = nerd else {
        p.push_str("No team statistics available.\n\n");
        return;
    };

    let s = &nerd.stats;
    p.push_str(&format!(
        "Batting Runs {:.1} | Barrel% {:.1}% | Baserunning {:.1} | Fielding {:.1} | \
         Payroll ${:.1}M | Age {:.1} | Luck {:.1}\n",
        s.batting_runs,
        s.barrel_rate * 100.0,
        s.baserunning_runs,
        s.fielding_runs,
        s.payroll,
        s.age,
        s.luck
    ));
    p.push_str("tNERD components: ");
    let parts: Vec<String> = nerd
        .components
        .named()
        .iter()
        .map(|(label, value)| format!("{label} {value:+.2}"))
        .collect();
    p.push_str(&parts.join(", "));
    p.push_str(&format!("\ntNERD: {:.1}\n\n", nerd.tnerd));
}

fn push_pitcher_section(p: &mut String, heading: &str, starter: &str, nerd: Option<&PitcherNerd>) {
    p.push_str(&format!("## {heading}: {starter}\n"));
    let Some(nerd) = nerd else {
        p.push_str("No pitcher statistics available.\n\n");
        return;
    };

    let s = &nerd.stats;
    p.push_str(&format!(
        "xFIP- {:.0} | SwStr% {:.1}% | Strike% {:.1}% | Velocity {:.1} mph | Age {:.0} | \
         Pace {:.1}s | Luck {:.0} | KN% {:.1}%\n",
        s.xfip_minus,
        s.swinging_strike_rate * 100.0,
        s.strike_rate * 100.0,
        s.velocity,
        s.age,
        s.pace,
        s.luck,
        s.knuckleball_rate * 100.0
    ));
    p.push_str("pNERD components: ");
    let parts: Vec<String> = nerd
        .components
        .named()
        .iter()
        .map(|(label, value)| format!("{label} {value:+.2}"))
        .collect();
    p.push_str(&parts.join(", "));
    p.push_str(&format!("\npNERD: {:.1}\n\n", nerd.pnerd));
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchability_baseball::pitcher::PitcherStat;
    use watchability_baseball::team::TeamStat;
    use watchability_baseball::zscore::StatSummary;
    use watchability_baseball::{
        calculate_pnerd, calculate_tnerd, LeagueAggregates, PitcherStats, TeamStats,
    };

    fn team_nerd() -> TeamNerd {
        let stats = TeamStats {
            name: "SEA".into(),
            batting_runs: 20.0,
            barrel_rate: 0.09,
            baserunning_runs: 3.0,
            fielding_runs: 5.0,
            payroll: 140.0,
            age: 27.5,
            luck: 4.0,
        };
        let agg = LeagueAggregates::from_summaries(
            TeamStat::ALL
                .iter()
                .map(|&s| (s, StatSummary { mean: 0.0, stdev: 10.0 })),
            30,
        );
        calculate_tnerd(stats, &agg, 4.0).unwrap()
    }

    fn pitcher_nerd() -> PitcherNerd {
        let stats = PitcherStats {
            name: "Logan Gilbert".into(),
            team: "SEA".into(),
            xfip_minus: 80.0,
            swinging_strike_rate: 0.14,
            strike_rate: 0.67,
            velocity: 95.5,
            age: 28.0,
            pace: 19.0,
            luck: 5.0,
            knuckleball_rate: 0.0,
        };
        let agg = LeagueAggregates::from_summaries(
            PitcherStat::ALL
                .iter()
                .map(|&s| {
                    let summary = match s {
                        PitcherStat::XfipMinus => StatSummary { mean: 100.0, stdev: 15.0 },
                        PitcherStat::SwingingStrikeRate => StatSummary { mean: 0.11, stdev: 0.02 },
                        PitcherStat::StrikeRate => StatSummary { mean: 0.64, stdev: 0.02 },
                        PitcherStat::Velocity => StatSummary { mean: 93.0, stdev: 2.0 },
                        PitcherStat::Age => StatSummary { mean: 29.0, stdev: 3.0 },
                        PitcherStat::Pace => StatSummary { mean: 20.0, stdev: 1.5 },
                    };
                    (s, summary)
                }),
            60,
        );
        calculate_pnerd(stats, &agg, 3.8).unwrap()
    }

    fn game() -> GameScore {
        GameScore {
            away_team: "Seattle Mariners".into(),
            home_team: "Houston Astros".into(),
            away_starter: Some("Logan Gilbert".into()),
            home_starter: None,
            game_time: Some("19:10".into()),
            away_team_key: Some("SEA".into()),
            home_team_key: None,
            away_team_nerd: 7.25,
            home_team_nerd: 0.0,
            average_team_nerd: 3.625,
            away_pitcher_key: Some("Logan Gilbert".into()),
            home_pitcher_key: None,
            away_pitcher_nerd: Some(6.4),
            home_pitcher_nerd: None,
            average_pitcher_nerd: Some(6.4),
            gnerd: 5.0125,
        }
    }

    #[test]
    fn system_prompt_mentions_scores() {
        let sp = system_prompt();
        assert!(sp.contains("tNERD"));
        assert!(sp.contains("pNERD"));
        assert!(sp.contains("gNERD"));
    }

    #[test]
    fn game_prompt_has_all_sections() {
        let team = team_nerd();
        let pitcher = pitcher_nerd();
        let details = GameDetails {
            away_team: Some(&team),
            home_team: None,
            away_pitcher: Some(&pitcher),
            home_pitcher: None,
        };
        let prompt = build_game_prompt(&game(), &details, "2025-07-27");

        for heading in [
            "## GAME",
            "## SCORES",
            "## AWAY TEAM: Seattle Mariners",
            "## HOME TEAM: Houston Astros",
            "## AWAY STARTER: Logan Gilbert",
            "## HOME STARTER: TBD",
            "## TASK",
        ] {
            assert!(prompt.contains(heading), "missing {heading}");
        }
        assert!(prompt.contains("Seattle Mariners @ Houston Astros"));
        assert!(prompt.contains("Date: 2025-07-27"));
        assert!(prompt.contains("gNERD: 5.0"));
        assert!(prompt.contains("Logan Gilbert 6.4, TBD No data"));
    }

    #[test]
    fn game_prompt_lists_every_component() {
        let team = team_nerd();
        let pitcher = pitcher_nerd();
        let details = GameDetails {
            away_team: Some(&team),
            home_team: None,
            away_pitcher: Some(&pitcher),
            home_pitcher: None,
        };
        let prompt = build_game_prompt(&game(), &details, "2025-07-27");

        for (label, _) in team.components.named() {
            assert!(prompt.contains(label), "missing team component {label}");
        }
        for (label, _) in pitcher.components.named() {
            assert!(prompt.contains(label), "missing pitcher component {label}");
        }
        assert!(prompt.contains(&format!("tNERD: {:.1}", team.tnerd)));
        assert!(prompt.contains(&format!("pNERD: {:.1}", pitcher.pnerd)));
    }

    #[test]
    fn missing_data_is_stated() {
        let details = GameDetails {
            away_team: None,
            home_team: None,
            away_pitcher: None,
            home_pitcher: None,
        };
        let prompt = build_game_prompt(&game(), &details, "2025-07-27");
        assert_eq!(prompt.matches("No team statistics available.").count(), 2);
        assert_eq!(prompt.matches("No pitcher statistics available.").count(), 2);
    }
}
