//! Anthropic Messages API client implementing the `AIProvider` port.
//!
//! Blocking completions retry transient failures with exponential backoff;
//! streaming completions decode the API's SSE event framing into
//! `StreamChunk`s as bytes arrive.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, StreamChunk, TokenUsage,
};

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION_HEADER: &str = "2023-06-01";

/// Claude models all expose a 200k-token context window.
const CONTEXT_WINDOW: u32 = 200_000;

/// Fallback retry delay when a 429 body carries no parseable hint.
const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

/// Connection settings for the Anthropic API.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-3-5-sonnet-20241022".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// `AIProvider` backed by Anthropic's Messages API.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("reqwest client");
        Self { config, client }
    }

    fn encode_request(&self, request: &CompletionRequest, stream: bool) -> MessagesRequest {
        let mut turns: Vec<WireTurn> = request
            .messages
            .iter()
            .map(|m| WireTurn {
                role: match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                },
                content: m.content.clone(),
            })
            .collect();

        // The API rejects an empty conversation; open with a user turn.
        if turns.is_empty() {
            turns.push(WireTurn {
                role: "user",
                content: "Hello".to_string(),
            });
        }

        MessagesRequest {
            model: self.config.model.clone(),
            messages: turns,
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens.unwrap_or(4096),
            temperature: request.temperature,
            stream: stream.then_some(true),
        }
    }

    async fn post_messages(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<Response, AIError> {
        let body = self.encode_request(request, stream);
        let url = format!("{}{}", self.config.base_url, MESSAGES_PATH);

        let response = self
            .client
            .post(url)
            .header("x-api-key", self.config.key())
            .header("anthropic-version", API_VERSION_HEADER)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => AIError::AuthenticationFailed,
            429 => AIError::rate_limited(retry_after_hint(&body)),
            400 if body.contains("prompt is too long") => {
                AIError::ContextTooLong { tokens: 0, max: 0 }
            }
            400 => AIError::InvalidRequest(body),
            500..=599 => AIError::unavailable(format!("server error {status}: {body}")),
            _ => AIError::network(format!("unexpected status {status}: {body}")),
        })
    }

    async fn decode_completion(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let reply: MessagesReply = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("undecodable response body: {e}")))?;

        let content: String = reply
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        Ok(CompletionResponse {
            content,
            usage: TokenUsage::new(reply.usage.input_tokens, reply.usage.output_tokens),
            model: reply.model,
            finish_reason: decode_stop_reason(reply.stop_reason.as_deref()),
        })
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut attempt = 0;
        loop {
            let outcome = match self.post_messages(&request, false).await {
                Ok(response) => self.decode_completion(response).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(completion) => return Ok(completion),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    tracing::warn!(error = %e, attempt, "completion failed, retrying");
                    // 1s, 2s, 4s, ...
                    sleep(Duration::from_secs(1 << attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>>, AIError> {
        let response = self.post_messages(&request, true).await?;

        let chunks = response
            .bytes_stream()
            .map(|piece| match piece {
                Ok(bytes) => decode_sse(&String::from_utf8_lossy(&bytes)),
                Err(e) => vec![Err(AIError::network(format!("stream error: {e}")))],
            })
            .flat_map(stream::iter);

        Ok(Box::pin(chunks))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model, CONTEXT_WINDOW)
    }
}

fn decode_stop_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

/// Pulls a retry delay out of a 429 body.
///
/// The API embeds hints like "try again in 12s" in the error message; when
/// absent, assume a full rate-limit window.
fn retry_after_hint(body: &str) -> u32 {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return DEFAULT_RETRY_AFTER_SECS,
    };
    let Some(message) = parsed
        .pointer("/error/message")
        .and_then(|m| m.as_str())
    else {
        return DEFAULT_RETRY_AFTER_SECS;
    };
    let Some(tail) = message.split("try again in ").nth(1) else {
        return DEFAULT_RETRY_AFTER_SECS;
    };
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Decodes one network read's worth of SSE lines.
///
/// The API frames events as `event:` / `data:` line pairs. Only
/// `content_block_delta` (text), `message_delta` (stop reason + usage), and
/// `error` events matter here; framing events are skipped.
fn decode_sse(text: &str) -> Vec<Result<StreamChunk, AIError>> {
    let mut out = Vec::new();
    let mut event = "";

    for line in text.lines() {
        if let Some(name) = line.strip_prefix("event: ") {
            event = name;
            continue;
        }
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };

        match event {
            "content_block_delta" => {
                if let Ok(block) = serde_json::from_str::<DeltaEvent>(data) {
                    if let Some(text) = block.delta.text {
                        if !text.is_empty() {
                            out.push(Ok(StreamChunk::content(&text)));
                        }
                    }
                }
            }
            "message_delta" => {
                if let Ok(tail) = serde_json::from_str::<TailEvent>(data) {
                    let usage = tail
                        .usage
                        .map(|u| TokenUsage::new(u.input_tokens.unwrap_or(0), u.output_tokens))
                        .unwrap_or_default();
                    out.push(Ok(StreamChunk::final_chunk(
                        decode_stop_reason(tail.delta.stop_reason.as_deref()),
                        usage,
                    )));
                }
            }
            "error" => {
                let message = serde_json::from_str::<serde_json::Value>(data)
                    .ok()
                    .and_then(|v| {
                        v.pointer("/error/message")
                            .and_then(|m| m.as_str())
                            .map(String::from)
                    })
                    .unwrap_or_else(|| "stream error".to_string());
                out.push(Err(AIError::unavailable(message)));
            }
            _ => {}
        }
    }

    out
}

// Wire types for the Messages API.

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    messages: Vec<WireTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize)]
struct WireTurn {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    model: String,
    content: Vec<ReplyBlock>,
    stop_reason: Option<String>,
    usage: ReplyUsage,
}

#[derive(Debug, Deserialize)]
struct ReplyBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct DeltaEvent {
    delta: DeltaText,
}

#[derive(Debug, Deserialize)]
struct DeltaText {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TailEvent {
    delta: TailStop,
    usage: Option<TailUsage>,
}

#[derive(Debug, Deserialize)]
struct TailStop {
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TailUsage {
    input_tokens: Option<u32>,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicConfig::new("test-key"))
    }

    #[test]
    fn config_builder_chains() {
        let config = AnthropicConfig::new("k")
            .with_model("claude-3-haiku-20240307")
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1);

        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.key(), "k");
    }

    #[test]
    fn encodes_system_prompt_and_turns() {
        let request = CompletionRequest::new()
            .with_system_prompt("You coach.")
            .with_message(MessageRole::User, "hello")
            .with_message(MessageRole::Assistant, "hi")
            .with_max_tokens(128);

        let wire = provider().encode_request(&request, false);
        assert_eq!(wire.system.as_deref(), Some("You coach."));
        assert_eq!(wire.max_tokens, 128);
        assert_eq!(wire.messages[0].role, "user");
        assert_eq!(wire.messages[1].role, "assistant");
        assert!(wire.stream.is_none());
    }

    #[test]
    fn empty_conversation_gets_an_opening_turn() {
        let wire = provider().encode_request(&CompletionRequest::new(), true);
        assert_eq!(wire.messages.len(), 1);
        assert_eq!(wire.stream, Some(true));
    }

    #[test]
    fn sse_text_delta_becomes_chunk() {
        let frame = "event: content_block_delta\n\
             data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"Hey\"}}";
        let chunks = decode_sse(frame);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().delta, "Hey");
    }

    #[test]
    fn sse_message_delta_is_final_with_usage() {
        let frame = "event: message_delta\n\
             data: {\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":17}}";
        let chunks = decode_sse(frame);
        let chunk = chunks[0].as_ref().unwrap();
        assert!(chunk.is_final());
        assert_eq!(chunk.finish_reason, Some(FinishReason::Stop));
        assert_eq!(chunk.usage.as_ref().map(|u| u.completion_tokens), Some(17));
    }

    #[test]
    fn sse_splits_consecutive_frames() {
        let frame = "event: content_block_delta\n\
             data: {\"delta\":{\"text\":\"a\"}}\n\n\
             event: content_block_delta\n\
             data: {\"delta\":{\"text\":\"b\"}}";
        let chunks = decode_sse(frame);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].as_ref().unwrap().delta, "b");
    }

    #[test]
    fn sse_error_event_surfaces() {
        let chunks = decode_sse("event: error\ndata: {\"error\":{\"message\":\"overloaded\"}}");
        assert!(matches!(
            chunks[0],
            Err(AIError::Unavailable { .. })
        ));
    }

    #[test]
    fn retry_hint_parsed_from_message() {
        let body = r#"{"error":{"message":"rate limited, try again in 12s"}}"#;
        assert_eq!(retry_after_hint(body), 12);
    }

    #[test]
    fn retry_hint_defaults_without_a_number() {
        assert_eq!(
            retry_after_hint(r#"{"error":{"message":"slow down"}}"#),
            DEFAULT_RETRY_AFTER_SECS
        );
        assert_eq!(retry_after_hint("not json"), DEFAULT_RETRY_AFTER_SECS);
    }
}
