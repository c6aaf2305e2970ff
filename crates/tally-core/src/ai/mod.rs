//! Pluggable AI provider abstraction
//!
//! This module provides a provider-agnostic interface for text completion.
//! The source of truth for advice text is always the user's own financial
//! data; providers only turn it into prose.
//!
//! # Architecture
//!
//! - `Provider` trait: defines the completion interface
//! - `AiClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Provider implementations: `OllamaProvider`, `OpenAiCompatProvider`
//!   (OpenAI, Groq, xAI presets), `HuggingFaceProvider`, `MockProvider`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_PROVIDER`: Provider to use (openai, groq, xai, ollama, huggingface,
//!   mock). Default: mock, so a fresh install never makes network calls.
//! - `OPENAI_API_KEY`, `GROQ_API_KEY`, `XAI_API_KEY`: keys for the hosted
//!   providers
//! - `OLLAMA_BASE_URL`: Ollama server URL (default: http://localhost:11434)
//! - `OLLAMA_MODEL`: Ollama model name (default: llama3.2)
//! - `HUGGINGFACE_API_KEY`, `HUGGINGFACE_MODEL`: Hugging Face inference API

mod huggingface;
mod mock;
mod ollama;
mod openai_compat;

pub use huggingface::HuggingFaceProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Role tag for a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged message in a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Sampling options for a completion request
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.7,
        }
    }
}

/// Generated text plus usage metadata
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    /// Total tokens reported by the provider (0 when not reported)
    pub total_tokens: u32,
    /// Name of the provider that produced the text
    pub provider: String,
}

/// Trait defining the interface for all AI providers
///
/// Providers should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for a list of role-tagged messages
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> bool;

    /// Provider identifier (for result attribution)
    fn name(&self) -> &str;

    /// Model name (for logging)
    fn model(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
/// All variants implement the same Provider operations.
#[derive(Clone)]
pub enum AiClient {
    /// Ollama (local HTTP API)
    Ollama(OllamaProvider),
    /// OpenAI-compatible chat completions API (OpenAI, Groq, xAI)
    OpenAiCompat(OpenAiCompatProvider),
    /// Hugging Face inference API
    HuggingFace(HuggingFaceProvider),
    /// Deterministic mock provider (default, and the fallback path)
    Mock(MockProvider),
}

impl AiClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_PROVIDER` to determine which provider to use. Unknown
    /// values and the unset case fall back to the mock provider so that
    /// advice generation works on a fresh install with no credentials.
    pub fn from_env() -> Self {
        let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        match provider.to_lowercase().as_str() {
            "openai" => AiClient::OpenAiCompat(OpenAiCompatProvider::openai_from_env()),
            "groq" => AiClient::OpenAiCompat(OpenAiCompatProvider::groq_from_env()),
            "xai" => AiClient::OpenAiCompat(OpenAiCompatProvider::xai_from_env()),
            "ollama" => AiClient::Ollama(OllamaProvider::from_env()),
            "huggingface" => AiClient::HuggingFace(HuggingFaceProvider::from_env()),
            "mock" => AiClient::Mock(MockProvider::new()),
            _ => {
                tracing::warn!(provider = %provider, "Unknown AI_PROVIDER, falling back to mock");
                AiClient::Mock(MockProvider::new())
            }
        }
    }

    /// Create a mock client for testing
    pub fn mock() -> Self {
        AiClient::Mock(MockProvider::new())
    }
}

// Implement Provider for AiClient by delegating to the inner provider
#[async_trait]
impl Provider for AiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion> {
        match self {
            AiClient::Ollama(p) => p.complete(messages, options).await,
            AiClient::OpenAiCompat(p) => p.complete(messages, options).await,
            AiClient::HuggingFace(p) => p.complete(messages, options).await,
            AiClient::Mock(p) => p.complete(messages, options).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::Ollama(p) => p.health_check().await,
            AiClient::OpenAiCompat(p) => p.health_check().await,
            AiClient::HuggingFace(p) => p.health_check().await,
            AiClient::Mock(p) => p.health_check().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            AiClient::Ollama(p) => p.name(),
            AiClient::OpenAiCompat(p) => p.name(),
            AiClient::HuggingFace(p) => p.name(),
            AiClient::Mock(p) => p.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            AiClient::Ollama(p) => p.model(),
            AiClient::OpenAiCompat(p) => p.model(),
            AiClient::HuggingFace(p) => p.model(),
            AiClient::Mock(p) => p.model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AiClient::mock();
        assert_eq!(client.name(), "mock");
        assert_eq!(client.model(), "mock");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AiClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_completion_not_empty() {
        let client = AiClient::mock();
        let completion = client
            .complete(
                &[ChatMessage::user("How can I save more money?")],
                &CompletionOptions::default(),
            )
            .await
            .unwrap();
        assert!(!completion.content.is_empty());
        assert_eq!(completion.provider, "mock");
    }
}
