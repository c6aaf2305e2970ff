//! Hugging Face inference API provider
//!
//! Text-generation models on the hosted inference API. The API takes a bare
//! prompt, so only the last user message is sent.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{ChatMessage, Completion, CompletionOptions, Provider};

const INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

#[derive(Clone)]
pub struct HuggingFaceProvider {
    http_client: Client,
    api_key: Option<String>,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            model: model.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("HUGGINGFACE_API_KEY").ok(),
            &std::env::var("HUGGINGFACE_MODEL")
                .unwrap_or_else(|_| "microsoft/DialoGPT-medium".to_string()),
        )
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    generated_text: Option<String>,
}

#[async_trait]
impl Provider for HuggingFaceProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Provider("No Hugging Face API key configured".to_string()))?;

        // The inference API takes a bare prompt
        let prompt = messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_length: options.max_tokens,
                temperature: options.temperature,
            },
        };

        let response = self
            .http_client
            .post(format!("{}/{}", INFERENCE_BASE, self.model))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Hugging Face API error: {}",
                response.status()
            )));
        }

        let results: Vec<InferenceResponse> = response.json().await?;
        let content = results
            .into_iter()
            .next()
            .and_then(|r| r.generated_text)
            .unwrap_or_else(|| "No response generated".to_string());

        Ok(Completion {
            content,
            total_tokens: 0,
            provider: self.name().to_string(),
        })
    }

    async fn health_check(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_without_key_fails() {
        let provider = HuggingFaceProvider::new(None, "microsoft/DialoGPT-medium");
        let result = provider
            .complete(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await;
        assert!(result.is_err());
    }
}
