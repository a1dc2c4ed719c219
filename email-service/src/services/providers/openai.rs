//! OpenAI-compatible chat completion provider.
//!
//! Speaks `POST {base_url}/chat/completions` with bearer authentication, so
//! any compatible gateway can be used by pointing `base_url` at it.

use super::{ChatMessage, Completion, CompletionProvider, FinishReason, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI provider configuration.
#[derive(Debug)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// OpenAI chat completion provider.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "OpenAI API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending request to completion API"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        completion_from_response(api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "OpenAI API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Take the first choice's text, rejecting filtered or empty responses.
fn completion_from_response(
    response: ChatCompletionResponse,
) -> Result<Completion, ProviderError> {
    let usage = response.usage.unwrap_or_default();

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ApiError("Response contained no choices".to_string()))?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Complete,
    };

    if finish_reason == FinishReason::ContentFilter {
        return Err(ProviderError::ContentFiltered);
    }

    let text = choice.message.content.ok_or_else(|| {
        ProviderError::ApiError("Response choice had no text content".to_string())
    })?;

    Ok(Completion {
        text,
        input_tokens: usage.prompt_tokens.unwrap_or(0),
        output_tokens: usage.completion_tokens.unwrap_or(0),
        finish_reason,
    })
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}
