// Streaming Messages API client for game write-ups.
//
// A request goes out with `stream: true`; each SSE frame is decoded into an
// `LlmEvent` and pushed down an mpsc channel to the collector.
// Search hits and citations accumulate into the final `WebSource` list.

use anyhow::{anyhow, bail};
use futures_util::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use watchability_core::Config;

use crate::event::{LlmEvent, WebSource};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const WEB_SEARCH_TOOL: &str = "web_search_20250305";
const WEB_SEARCH_MAX_USES: u32 = 5;

// ---------------------------------------------------------------------------
// Request options
// ---------------------------------------------------------------------------

/// Which configured model to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    Normal,
    Cheap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageOptions {
    pub max_tokens: u32,
    pub temperature: f64,
    /// Offer the server-side web search tool.
    pub web_search: bool,
}

impl MessageOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            web_search: config.llm.include_web_search,
        }
    }
}

/// A completed, non-streamed response.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub text: String,
    pub sources: Vec<WebSource>,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// One model, one API key. Streams replies over a channel.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different Messages endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn request_body(&self, system: &str, user_content: &str, options: &MessageOptions) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
            "stream": true,
            "messages": [{ "role": "user", "content": user_content }]
        });
        if !system.is_empty() {
            body["system"] = Value::String(system.to_string());
        }
        if options.web_search {
            body["tools"] = serde_json::json!([{
                "type": WEB_SEARCH_TOOL,
                "name": "web_search",
                "max_uses": WEB_SEARCH_MAX_USES
            }]);
        }
        body
    }

    /// Stream one reply over `tx`. Every failure is delivered as an
    /// `LlmEvent::Error`; the returned `Result` is always `Ok`.
    pub async fn stream_message(
        &self,
        system: &str,
        user_content: &str,
        options: &MessageOptions,
        tx: mpsc::Sender<LlmEvent>,
    ) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            report_error(&tx, "API key not configured").await;
            return Ok(());
        }

        let request = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(system, user_content, options));

        let mut es = match request.eventsource() {
            Ok(es) => es,
            Err(e) => {
                report_error(&tx, format!("could not open event stream: {e}")).await;
                return Ok(());
            }
        };

        let mut reply = String::new();
        let mut sources: Vec<WebSource> = Vec::new();
        let (mut tokens_in, mut tokens_out) = (0u32, 0u32);

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Open) => debug!("stream open"),
                Ok(Event::Message(frame)) => {
                    let data = frame.data.as_str();
                    match frame.event.as_str() {
                        "message_start" => {
                            if let Some(n) = parse_input_tokens(data) {
                                tokens_in = n;
                            } else {
                                warn!("message_start without usage");
                            }
                        }
                        "content_block_start" => {
                            let found = parse_search_results(data);
                            if !found.is_empty() {
                                debug!(count = found.len(), "web search results");
                            }
                            merge_sources(&mut sources, found);
                        }
                        "content_block_delta" => {
                            if let Some(citation) = parse_citation(data) {
                                merge_sources(&mut sources, vec![citation]);
                            }
                            if let Some(text) = parse_delta_text(data) {
                                reply.push_str(&text);
                                if tx.send(LlmEvent::Token { text }).await.is_err() {
                                    // Nobody is listening any more.
                                    es.close();
                                    return Ok(());
                                }
                            }
                        }
                        "message_delta" => {
                            if let Some(n) = parse_output_tokens(data) {
                                tokens_out = n;
                            } else {
                                warn!("message_delta without usage");
                            }
                        }
                        "message_stop" => {
                            debug!(tokens_in, tokens_out, "reply complete");
                            es.close();
                            break;
                        }
                        "error" => {
                            let message = parse_stream_error(data)
                                .unwrap_or_else(|| "API reported an error".to_string());
                            es.close();
                            report_error(&tx, message).await;
                            return Ok(());
                        }
                        other => debug!(event = other, "skipping frame"),
                    }
                }
                Err(err) => {
                    warn!(?err, "event stream failed");
                    es.close();
                    report_error(&tx, describe_stream_error(&err)).await;
                    return Ok(());
                }
            }
        }

        // A stream that closes early still counts if some text arrived.
        if reply.is_empty() {
            report_error(&tx, "stream closed before any text arrived").await;
        } else {
            let _ = tx
                .send(LlmEvent::Complete {
                    full_text: reply,
                    sources,
                    input_tokens: tokens_in,
                    output_tokens: tokens_out,
                })
                .await;
        }
        Ok(())
    }

    /// Send a message and wait for the whole response.
    pub async fn generate(
        &self,
        system: &str,
        user_content: &str,
        options: &MessageOptions,
    ) -> anyhow::Result<GeneratedText> {
        let (tx, mut rx) = mpsc::channel(64);
        let (streamed, collected) = tokio::join!(
            self.stream_message(system, user_content, options, tx),
            collect_response(&mut rx),
        );
        streamed?;
        let generated = collected?;
        info!(
            model = %self.model,
            input_tokens = generated.input_tokens,
            output_tokens = generated.output_tokens,
            sources = generated.sources.len(),
            "generated {} characters",
            generated.text.len()
        );
        Ok(generated)
    }
}

/// Drain events until the response completes or fails.
pub async fn collect_response(rx: &mut mpsc::Receiver<LlmEvent>) -> anyhow::Result<GeneratedText> {
    while let Some(event) = rx.recv().await {
        match event {
            LlmEvent::Token { .. } => {}
            LlmEvent::Complete {
                full_text,
                sources,
                input_tokens,
                output_tokens,
                ..
            } => {
                if full_text.trim().is_empty() {
                    bail!("Received empty response from LLM");
                }
                return Ok(GeneratedText {
                    text: full_text,
                    sources,
                    input_tokens,
                    output_tokens,
                });
            }
            LlmEvent::Error { message, .. } => return Err(anyhow!(message)),
        }
    }
    Err(anyhow!("LLM stream closed without a response"))
}

async fn report_error(tx: &mpsc::Sender<LlmEvent>, message: impl Into<String>) {
    let _ = tx
        .send(LlmEvent::Error {
            message: message.into(),
        })
        .await;
}

// ---------------------------------------------------------------------------
// Configured client
// ---------------------------------------------------------------------------

/// The client the rest of the app holds. `Disabled` when no key is set.
pub enum LlmClient {
    Active(ClaudeClient),
    Disabled,
}

impl LlmClient {
    /// Pick the normal or cheap model; a missing or blank key gives `Disabled`.
    pub fn from_config(config: &Config, choice: ModelChoice) -> Self {
        match &config.credentials.anthropic_api_key {
            Some(key) if !key.is_empty() => {
                let model = match choice {
                    ModelChoice::Normal => config.llm.model.clone(),
                    ModelChoice::Cheap => config.llm.cheap_model.clone(),
                };
                LlmClient::Active(ClaudeClient::new(key.clone(), model))
            }
            _ => LlmClient::Disabled,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LlmClient::Active(_))
    }

    pub async fn generate(
        &self,
        system: &str,
        user_content: &str,
        options: &MessageOptions,
    ) -> anyhow::Result<GeneratedText> {
        match self {
            LlmClient::Active(client) => client.generate(system, user_content, options).await,
            LlmClient::Disabled => bail!("LLM not configured (set ANTHROPIC_API_KEY)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame decoding
// ---------------------------------------------------------------------------

/// `message.usage.input_tokens` of a `message_start` frame.
///
/// `None` when the frame carries no usage block.
pub(crate) fn parse_input_tokens(data: &str) -> Option<u32> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("message")?
        .get("usage")?
        .get("input_tokens")?
        .as_u64()
        .map(|n| n as u32)
}

/// `delta.text` of a `content_block_delta` frame.
///
/// Only `text_delta` carries text; tool input and citation deltas yield `None`.
pub(crate) fn parse_delta_text(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("delta")?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

/// `usage.output_tokens` of a `message_delta` frame.
pub(crate) fn parse_output_tokens(data: &str) -> Option<u32> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("usage")?
        .get("output_tokens")?
        .as_u64()
        .map(|n| n as u32)
}

/// Web search results from a `content_block_start` of type
/// `web_search_tool_result`.
///
/// Expected shape: `{ "content_block": { "type": "web_search_tool_result",
/// "content": [{ "type": "web_search_result", "title": "...", "url": "..." }] } }`
pub(crate) fn parse_search_results(data: &str) -> Vec<WebSource> {
    let Ok(v) = serde_json::from_str::<Value>(data) else {
        return Vec::new();
    };
    let Some(block) = v.get("content_block") else {
        return Vec::new();
    };
    if block.get("type").and_then(Value::as_str) != Some("web_search_tool_result") {
        return Vec::new();
    }
    block
        .get("content")
        .and_then(Value::as_array)
        .map(|results| results.iter().filter_map(web_source).collect())
        .unwrap_or_default()
}

/// Citation from a `citations_delta`.
pub(crate) fn parse_citation(data: &str) -> Option<WebSource> {
    let v: Value = serde_json::from_str(data).ok()?;
    let delta = v.get("delta")?;
    if delta.get("type")?.as_str()? != "citations_delta" {
        return None;
    }
    web_source(delta.get("citation")?)
}

fn web_source(v: &Value) -> Option<WebSource> {
    let url = v.get("url")?.as_str()?.to_string();
    let title = v
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or("N/A")
        .to_string();
    Some(WebSource { title, url })
}

/// Append sources not already present (by URL), preserving order.
fn merge_sources(sources: &mut Vec<WebSource>, found: Vec<WebSource>) {
    for source in found {
        if !sources.iter().any(|s| s.url == source.url) {
            sources.push(source);
        }
    }
}

/// Message from an in-stream `error` event.
fn parse_stream_error(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("error")?
        .get("message")?
        .as_str()
        .map(|s| format!("API error: {s}"))
}

fn describe_stream_error(err: &reqwest_eventsource::Error) -> String {
    use reqwest_eventsource::Error;
    match err {
        Error::InvalidStatusCode(status, _) => format!("Messages API answered with status {status}"),
        Error::Transport(e) => format!("request to Messages API failed: {e}"),
        other => format!("event stream error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
