//! Mock Provider - scripted AIProvider implementation for tests.
//!
//! Returns queued responses in order (the last one repeats), records every
//! request it receives, and can be switched into a failing mode to exercise
//! error paths.

use async_trait::async_trait;
use futures::stream::{self, Stream};
use std::pin::Pin;
use std::sync::Mutex;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    StreamChunk, TokenUsage,
};

/// Scripted provider for unit and integration tests.
pub struct MockProvider {
    responses: Mutex<Vec<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
    fail_with: Mutex<Option<String>>,
}

impl MockProvider {
    /// Provider that always answers with one canned response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(vec![response.into()]),
            requests: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Provider that answers with the given responses in order.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Provider whose every call fails as unavailable.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            fail_with: Mutex::new(Some(message.into())),
        }
    }

    /// Requests received so far.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("mock lock").clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }

    fn next_response(&self, request: &CompletionRequest) -> Result<String, AIError> {
        self.requests.lock().expect("mock lock").push(request.clone());

        if let Some(message) = self.fail_with.lock().expect("mock lock").as_ref() {
            return Err(AIError::unavailable(message.clone()));
        }

        let mut responses = self.responses.lock().expect("mock lock");
        if responses.is_empty() {
            return Err(AIError::unavailable("mock has no responses queued"));
        }
        if responses.len() == 1 {
            Ok(responses[0].clone())
        } else {
            Ok(responses.remove(0))
        }
    }
}

#[async_trait]
impl AIProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let content = self.next_response(&request)?;
        let usage = TokenUsage::new(10, content.len() as u32 / 4);
        Ok(CompletionResponse {
            content,
            usage,
            model: "mock".to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>>, AIError> {
        let content = self.next_response(&request)?;

        // Split on whitespace so tests see multiple chunks.
        let mut chunks: Vec<Result<StreamChunk, AIError>> = content
            .split_inclusive(' ')
            .map(|piece| Ok(StreamChunk::content(piece)))
            .collect();
        chunks.push(Ok(StreamChunk::final_chunk(
            FinishReason::Stop,
            TokenUsage::new(10, content.len() as u32 / 4),
        )));

        Ok(Box::pin(stream::iter(chunks)))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock", 200_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn returns_canned_response_and_records_request() {
        let provider = MockProvider::with_response("Hello coach");
        let request = CompletionRequest::new().with_system_prompt("sys");

        let response = provider.complete(request).await.unwrap();
        assert_eq!(response.content, "Hello coach");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(
            provider.recorded_requests()[0].system_prompt.as_deref(),
            Some("sys")
        );
    }

    #[tokio::test]
    async fn queued_responses_play_in_order_then_repeat() {
        let provider =
            MockProvider::with_responses(vec!["first".to_string(), "second".to_string()]);

        assert_eq!(
            provider.complete(CompletionRequest::new()).await.unwrap().content,
            "first"
        );
        assert_eq!(
            provider.complete(CompletionRequest::new()).await.unwrap().content,
            "second"
        );
        assert_eq!(
            provider.complete(CompletionRequest::new()).await.unwrap().content,
            "second"
        );
    }

    #[tokio::test]
    async fn failing_mode_errors() {
        let provider = MockProvider::failing("down for maintenance");
        let err = provider.complete(CompletionRequest::new()).await.unwrap_err();
        assert!(matches!(err, AIError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn stream_reassembles_to_full_content() {
        let provider = MockProvider::with_response("one two three");
        let mut stream = provider
            .stream_complete(CompletionRequest::new())
            .await
            .unwrap();

        let mut assembled = String::new();
        let mut saw_final = false;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            assembled.push_str(&chunk.delta);
            if chunk.is_final() {
                saw_final = true;
            }
        }
        assert_eq!(assembled, "one two three");
        assert!(saw_final);
    }
}
