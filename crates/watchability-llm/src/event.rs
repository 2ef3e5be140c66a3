// Events emitted while streaming a Claude response.

use serde::{Deserialize, Serialize};

/// A web page the model consulted through the web search tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub title: String,
    pub url: String,
}

/// One step of a streamed response.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEvent {
    /// Incremental text.
    Token { text: String },
    /// The response finished normally.
    Complete {
        full_text: String,
        sources: Vec<WebSource>,
        input_tokens: u32,
        output_tokens: u32,
    },
    /// The request failed; no `Complete` follows.
    Error { message: String },
}
