use clap::{Parser, Subcommand, ValueEnum};

use watchability_llm::ModelChoice;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rank today's MLB games by NERD watchability")]
pub struct Cli {
    /// Command
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[command(rename_all = "lower_case")]
pub enum Command {
    /// Print the ranked games for a date
    Scores {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
        /// Statistics season, defaults to the date's year
        #[arg(long)]
        season: Option<i32>,
    },
    /// Write the "what to watch" markdown file for a date
    Markdown {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
        /// Statistics season, defaults to the date's year
        #[arg(long)]
        season: Option<i32>,
        /// Where game descriptions come from
        #[arg(long, value_enum, default_value_t = DescriptionSource::None)]
        game_desc_source: DescriptionSource,
        /// Number of top games that get a description
        #[arg(long, default_value_t = 1)]
        game_desc_limit: usize,
        /// Model used for LLM descriptions
        #[arg(long, value_enum, default_value_t = LlmModel::Normal)]
        llm_model: LlmModel,
    },
    /// Write the LLM prompt for one ranked game
    Prompt {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
        /// Rank of the game, 0 for the most watchable
        #[arg(default_value_t = 0)]
        game_index: usize,
        /// Statistics season, defaults to the date's year
        #[arg(long)]
        season: Option<i32>,
        /// Also send the prompt and print the description and sources
        #[arg(short = 'g', long)]
        send_to_llm: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    None,
    Canned,
    Llm,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmModel {
    Normal,
    Cheap,
}

impl From<LlmModel> for ModelChoice {
    fn from(model: LlmModel) -> Self {
        match model {
            LlmModel::Normal => ModelChoice::Normal,
            LlmModel::Cheap => ModelChoice::Cheap,
        }
    }
}
