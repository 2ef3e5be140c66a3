// Game descriptions attached to the top-ranked games.
//
// A `GameDescriptionSource` turns one scored game into prose plus any web
// sources it consulted. Only the first `limit` games are described; a
// failure for one game is logged and leaves that game undescribed.

use async_trait::async_trait;
use tracing::{info, warn};

use watchability_baseball::{GameDetails, GameScore, LeagueScores};
use watchability_llm::{build_game_prompt, system_prompt, LlmClient, MessageOptions, WebSource};

/// Placeholder used when descriptions are requested without calling a model.
pub const CANNED_DESCRIPTION: &str = "This game features a compelling matchup between two \
    teams with interesting storylines. Both clubs bring something worth watching, and the \
    starting pitchers should make for an entertaining few innings. Check back closer to first \
    pitch for more detail.";

#[derive(Debug, Clone, PartialEq)]
pub struct GameDescription {
    pub text: String,
    pub sources: Vec<WebSource>,
}

/// A scored game in rank order, with its description if one was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGame {
    pub score: GameScore,
    pub description: Option<GameDescription>,
}

#[async_trait]
pub trait GameDescriptionSource: Send + Sync {
    async fn describe(
        &self,
        game: &GameScore,
        details: &GameDetails<'_>,
        date: &str,
    ) -> anyhow::Result<GameDescription>;
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

pub struct CannedDescriptions;

#[async_trait]
impl GameDescriptionSource for CannedDescriptions {
    async fn describe(
        &self,
        _game: &GameScore,
        _details: &GameDetails<'_>,
        _date: &str,
    ) -> anyhow::Result<GameDescription> {
        Ok(GameDescription {
            text: CANNED_DESCRIPTION.to_string(),
            sources: Vec::new(),
        })
    }
}

/// Descriptions written by Claude from the game's full breakdown.
pub struct LlmDescriptions {
    client: LlmClient,
    options: MessageOptions,
}

impl LlmDescriptions {
    pub fn new(client: LlmClient, options: MessageOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl GameDescriptionSource for LlmDescriptions {
    async fn describe(
        &self,
        game: &GameScore,
        details: &GameDetails<'_>,
        date: &str,
    ) -> anyhow::Result<GameDescription> {
        let prompt = build_game_prompt(game, details, date);
        let generated = self
            .client
            .generate(&system_prompt(), &prompt, &self.options)
            .await?;
        Ok(GameDescription {
            text: generated.text.trim().to_string(),
            sources: generated.sources,
        })
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// Pair each ranked score with a description, describing at most `limit`
/// games from the top. With no source every game is left undescribed.
pub async fn describe_games(
    scores: Vec<GameScore>,
    league: &LeagueScores,
    source: Option<&dyn GameDescriptionSource>,
    limit: usize,
    date: &str,
) -> Vec<RankedGame> {
    let mut ranked = Vec::with_capacity(scores.len());
    for (index, score) in scores.into_iter().enumerate() {
        let description = match source {
            Some(source) if index < limit => {
                let details = league.details(&score);
                match source.describe(&score, &details, date).await {
                    Ok(description) => {
                        info!(
                            "Described game {}: {} @ {} ({} sources)",
                            index + 1,
                            score.away_team,
                            score.home_team,
                            description.sources.len()
                        );
                        Some(description)
                    }
                    Err(e) => {
                        warn!(
                            "No description for {} @ {}: {e:#}",
                            score.away_team, score.home_team
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        ranked.push(RankedGame { score, description });
    }
    ranked
}
