// Command handlers behind the `mlbw` subcommands.
//
// Each handler resolves the date and season, runs the pipeline against a
// `ScheduleSource`, and writes its output. Output for the user goes to
// stdout; progress goes to the tracing log.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use watchability_core::Config;
use watchability_llm::{build_game_prompt, system_prompt, LlmClient, MessageOptions, ModelChoice};

use crate::cli::{Command, DescriptionSource};
use crate::descriptions::{
    describe_games, CannedDescriptions, GameDescription, GameDescriptionSource, LlmDescriptions,
    RankedGame,
};
use crate::markdown::{markdown_filename, render_markdown};
use crate::pipeline::{rank_day, DailyRanking};
use crate::schedule::{parse_date, ScheduleSource};
use crate::time_format::{extract_year_from_date, format_time_12_hour, today};

/// Dispatch one parsed command.
pub async fn run(
    command: Command,
    config: &Config,
    schedule: &dyn ScheduleSource,
) -> anyhow::Result<()> {
    match command {
        Command::Scores { date, season } => {
            let (date, season) = resolve_date(date, season)?;
            let day = rank_day(config, schedule, &date, season).await?;
            if day.games.is_empty() {
                println!("No games found for {date}");
                return Ok(());
            }
            print!("{}", scores_table(&day));
            Ok(())
        }
        Command::Markdown {
            date,
            season,
            game_desc_source,
            game_desc_limit,
            llm_model,
        } => {
            let (date, season) = resolve_date(date, season)?;
            let day = rank_day(config, schedule, &date, season).await?;
            if day.games.is_empty() {
                println!("No games found for {date}");
                return Ok(());
            }
            let path = write_markdown(
                config,
                day,
                game_desc_source,
                game_desc_limit,
                llm_model.into(),
            )
            .await?;
            println!("Markdown file generated: {}", path.display());
            Ok(())
        }
        Command::Prompt {
            date,
            game_index,
            season,
            send_to_llm,
        } => {
            let (date, season) = resolve_date(date, season)?;
            let day = rank_day(config, schedule, &date, season).await?;
            if day.games.is_empty() {
                println!("No games found for {date}");
                return Ok(());
            }
            if game_index >= day.games.len() {
                println!(
                    "Game index {game_index} is out of range. Available games: 0-{}",
                    day.games.len() - 1
                );
                return Ok(());
            }

            let (path, prompt) = write_prompt(config, &day, game_index)?;
            println!("Game prompt file generated: {}", path.display());

            if send_to_llm {
                let client = LlmClient::from_config(config, ModelChoice::Normal);
                let generated = client
                    .generate(&system_prompt(), &prompt, &MessageOptions::from_config(config))
                    .await
                    .context("failed to generate game description")?;
                print!(
                    "{}",
                    llm_report(&GameDescription {
                        text: generated.text,
                        sources: generated.sources,
                    })
                );
            }
            Ok(())
        }
    }
}

/// Date defaults to today; season defaults to the date's year.
pub fn resolve_date(date: Option<String>, season: Option<i32>) -> anyhow::Result<(String, i32)> {
    let date = date.unwrap_or_else(today);
    parse_date(&date)?;
    let season = season.unwrap_or_else(|| extract_year_from_date(&date));
    Ok((date, season))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Plain-text ranking for the terminal.
pub fn scores_table(day: &DailyRanking) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "MLB games for {} (season {} statistics)\n\n",
        day.date, day.season
    ));
    out.push_str(&format!(
        "{:>3} {:>6} {:>6}  {:<28} {:>5}  {:<28} {:>5}  {:<22} {:>7}  {:<22} {:>7}\n",
        "#", "gNERD", "Time", "Visitors", "tNERD", "Home", "tNERD", "Starter (V)", "pNERD",
        "Starter (H)", "pNERD"
    ));
    for (i, g) in day.games.iter().enumerate() {
        out.push_str(&format!(
            "{:>3} {:>6.1} {:>6}  {:<28} {:>5.1}  {:<28} {:>5.1}  {:<22} {:>7}  {:<22} {:>7}\n",
            i + 1,
            g.gnerd,
            format_time_12_hour(g.game_time.as_deref()),
            g.away_team,
            g.away_team_nerd,
            g.home_team,
            g.home_team_nerd,
            g.away_starter.as_deref().unwrap_or("TBD"),
            pitcher_score(g.away_pitcher_nerd),
            g.home_starter.as_deref().unwrap_or("TBD"),
            pitcher_score(g.home_pitcher_nerd),
        ));
    }
    out
}

fn pitcher_score(score: Option<f64>) -> String {
    score.map_or_else(|| "No data".to_string(), |s| format!("{s:.1}"))
}

/// Description and numbered sources, as printed by `prompt --send-to-llm`.
pub fn llm_report(description: &GameDescription) -> String {
    let rule = "=".repeat(50);
    let mut out = format!("\n{rule}\nLLM-GENERATED DESCRIPTION:\n{rule}\n{}\n", description.text);
    out.push_str(&format!("\n{rule}\nWEB SOURCES:\n{rule}\n"));
    if description.sources.is_empty() {
        out.push_str("No web sources found.\n");
    }
    for (i, source) in description.sources.iter().enumerate() {
        out.push_str(&format!("{}. {}\n   URL: {}\n", i + 1, source.title, source.url));
    }
    out
}

pub fn prompt_filename(date: &str, game_index: usize) -> String {
    format!("game_prompt_{date}_game_{game_index}.md")
}

fn output_path(config: &Config, filename: &str) -> anyhow::Result<PathBuf> {
    let dir = Path::new(&config.output.dir);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    Ok(dir.join(filename))
}

async fn write_markdown(
    config: &Config,
    day: DailyRanking,
    source_kind: DescriptionSource,
    limit: usize,
    model: ModelChoice,
) -> anyhow::Result<PathBuf> {
    let source: Option<Box<dyn GameDescriptionSource>> = match source_kind {
        DescriptionSource::None => None,
        DescriptionSource::Canned => Some(Box::new(CannedDescriptions)),
        DescriptionSource::Llm => {
            let client = LlmClient::from_config(config, model);
            if !client.is_active() {
                warn!("LLM descriptions requested but no API key is configured");
            }
            Some(Box::new(LlmDescriptions::new(
                client,
                MessageOptions::from_config(config),
            )))
        }
    };

    let ranked: Vec<RankedGame> =
        describe_games(day.games, &day.league, source.as_deref(), limit, &day.date).await;
    let content = render_markdown(&day.date, &ranked, &day.league, config.schedule.tz()?);

    let path = output_path(config, &markdown_filename(&day.date))?;
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote markdown file {}", path.display());
    Ok(path)
}

fn write_prompt(
    config: &Config,
    day: &DailyRanking,
    game_index: usize,
) -> anyhow::Result<(PathBuf, String)> {
    let game = &day.games[game_index];
    info!(
        "Selected game: {} @ {} (gNERD: {:.1})",
        game.away_team, game.home_team, game.gnerd
    );
    let prompt = build_game_prompt(game, &day.league.details(game), &day.date);

    let path = output_path(config, &prompt_filename(&day.date, game_index))?;
    std::fs::write(&path, &prompt)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote prompt file {}", path.display());
    Ok((path, prompt))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
