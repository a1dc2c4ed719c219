//! Email drafting on top of a completion provider.

use crate::dtos::{EmailRequest, GenerationResult};
use crate::services::providers::{ChatMessage, CompletionProvider, ProviderError};
use service_core::error::AppError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Read the system prompt resource. Called once at startup.
pub fn load_system_prompt(path: &Path) -> Result<Arc<str>, AppError> {
    let prompt = std::fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Failed to read system prompt {}: {}",
            path.display(),
            e
        ))
    })?;

    if prompt.trim().is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "System prompt {} is empty",
            path.display()
        )));
    }

    Ok(Arc::from(prompt))
}

/// Render the user turn for a validated request.
pub fn build_user_message(request: &EmailRequest) -> String {
    format!(
        "Purpose: {}\nRecipient Name: {}\nTone: {}",
        request.purpose, request.recipient_name, request.tone
    )
}

/// Drafts emails with a fixed system prompt.
///
/// Cheap to clone; the prompt and provider are shared.
#[derive(Clone)]
pub struct EmailGenerator {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: Arc<str>,
}

impl EmailGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, system_prompt: Arc<str>) -> Self {
        Self {
            provider,
            system_prompt,
        }
    }

    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    /// Generate an email for `request`.
    ///
    /// `response_time_ms` covers the provider call only. Provider errors are
    /// returned as-is.
    pub async fn generate(
        &self,
        request: &EmailRequest,
    ) -> Result<GenerationResult, ProviderError> {
        let messages = [
            ChatMessage::system(self.system_prompt.as_ref()),
            ChatMessage::user(build_user_message(request)),
        ];

        let start = Instant::now();
        let completion = self.provider.complete(&messages).await?;
        let elapsed = start.elapsed();

        tracing::debug!(
            model = %self.provider.model(),
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            elapsed_ms = elapsed.as_millis() as u64,
            "Completion received"
        );

        Ok(GenerationResult {
            email: completion.text.trim().to_string(),
            response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
