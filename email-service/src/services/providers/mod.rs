//! Completion provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for chat completion
//! backends, allowing the OpenAI-compatible client to be swapped for a mock.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Conversation role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Text of the primary completion.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text, as returned by the provider (not trimmed).
    pub text: String,

    /// Input tokens consumed.
    pub input_tokens: u32,

    /// Output tokens generated.
    pub output_tokens: u32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Trait for chat completion providers (e.g., OpenAI).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Run one completion over `messages`, in order.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ProviderError>;

    /// Check the provider is usable without spending tokens.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
