//! Mock provider implementation for testing.

use super::{ChatMessage, Completion, CompletionProvider, FinishReason, ProviderError, Role};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does with each request.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always answer with this text.
    Reply(String),
    /// Answer with the user message content, prefixed with `Echo: `.
    Echo,
    /// Always fail with a network error carrying this text.
    Fail(String),
}

/// Mock completion provider for testing.
pub struct MockCompletionProvider {
    behavior: MockBehavior,
    delay: Duration,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(error.into()))
    }

    /// Simulate provider latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Conversations received so far, in arrival order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let text = match &self.behavior {
            MockBehavior::Reply(text) => text.clone(),
            MockBehavior::Echo => {
                let user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                format!("Echo: {}", user)
            }
            MockBehavior::Fail(error) => return Err(ProviderError::NetworkError(error.clone())),
        };

        let input_tokens = messages.iter().map(|m| m.content.len() as u32 / 4).sum();

        Ok(Completion {
            text,
            input_tokens,
            output_tokens: 10,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Fail(error) => Err(ProviderError::NotConfigured(error.clone())),
            _ => Ok(()),
        }
    }
}
