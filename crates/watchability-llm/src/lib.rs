// Anthropic Messages API client and game-summary prompts.

pub mod client;
pub mod event;
pub mod prompt;

pub use client::{
    collect_response, ClaudeClient, GeneratedText, LlmClient, MessageOptions, ModelChoice,
};
pub use event::{LlmEvent, WebSource};
pub use prompt::{build_game_prompt, system_prompt};
