//! OpenAI-compatible provider implementation
//!
//! One implementation covers every hosted provider that speaks the OpenAI
//! chat-completions wire format. Named presets configure the base URL,
//! default model, and API key variable for OpenAI, Groq, and xAI.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::{ChatMessage, Completion, CompletionOptions, Provider};

/// Hosted chat-completions provider (OpenAI, Groq, xAI)
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    http_client: Client,
    name: String,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    /// OpenAI preset (gpt-3.5-turbo unless OPENAI_MODEL overrides)
    pub fn openai_from_env() -> Self {
        Self::new(
            "openai",
            "https://api.openai.com/v1",
            std::env::var("OPENAI_API_KEY").ok(),
            &std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
        )
    }

    /// Groq preset (free tier with rate limits)
    pub fn groq_from_env() -> Self {
        Self::new(
            "groq",
            "https://api.groq.com/openai/v1",
            std::env::var("GROQ_API_KEY").ok(),
            &std::env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
        )
    }

    /// xAI (Grok) preset - uses the OpenAI-compatible API surface
    pub fn xai_from_env() -> Self {
        Self::new(
            "xai",
            "https://api.x.ai/v1",
            std::env::var("XAI_API_KEY").ok(),
            &std::env::var("XAI_MODEL").unwrap_or_else(|_| "grok-beta".to_string()),
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Provider(format!("No API key configured for provider {}", self.name))
        })?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "{} API error: {}",
                self.name,
                response.status()
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        debug!(provider = %self.name, model = %self.model, "Completion received");

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Provider(format!("{} returned no choices", self.name)))?;

        Ok(Completion {
            content,
            total_tokens: completion.usage.map(|u| u.total_tokens).unwrap_or(0),
            provider: self.name.clone(),
        })
    }

    async fn health_check(&self) -> bool {
        // A provider without a key can never complete
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}
