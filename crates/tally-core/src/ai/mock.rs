//! Mock provider for testing and the local fallback path
//!
//! Returns deterministic, keyword-driven responses so advice generation
//! works with no network and no credentials. The advisor also uses this
//! provider as the fallback when a configured provider fails, so the
//! keyword rules double as the offline advice engine.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{ChatMessage, ChatRole, Completion, CompletionOptions, Provider};

/// Fixed pool of one-line tips for the "tip/advice" rule
///
/// Selection is deterministic (indexed by prompt length) so identical
/// inputs always produce identical output.
const TIP_POOL: &[&str] = &[
    "Smart spending tip: divide an item's price by its expected uses. A $100 jacket worn 50 times costs $2 per wear.",
    "Budgeting hack: pay yourself first. Move money to savings the day you get paid, before any spending happens.",
    "Set spending alerts at 75% of each budget so an overage never takes you by surprise.",
    "Shop with a list and stick to it. Impulse purchases are where most budgets quietly leak.",
    "Hold a 15-minute weekly money review. Catching a drifting category early is far cheaper than catching it at month end.",
];

/// Mock AI provider
///
/// Healthy by default; `failing()` builds one that errors on every call,
/// which tests use to exercise the advisor's fallback path.
#[derive(Clone, Default)]
pub struct MockProvider {
    /// Whether completions succeed
    pub healthy: bool,
}

impl MockProvider {
    /// Create a new mock provider (healthy by default)
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create a mock provider that fails every completion
    pub fn failing() -> Self {
        Self { healthy: false }
    }

    /// Deterministic keyword-driven response for a prompt
    pub fn respond(prompt: &str) -> String {
        let prompt = prompt.to_lowercase();

        if prompt.contains("save") || prompt.contains("saving") {
            return "Here are some ways to save more:\n\n\
                - Review your subscriptions and cancel anything unused\n\
                - Apply the 24-hour rule before non-essential purchases\n\
                - Automate a transfer to savings on payday, even a small one\n\
                - Plan meals for the week to cut food spending\n\n\
                Small, repeated wins beat occasional big cuts."
                .to_string();
        }

        if prompt.contains("overspend") || prompt.contains("exceed") {
            return "Looking at overspending risk:\n\n\
                - Watch any budget sitting above 90% utilization\n\
                - Categories trending up month over month deserve a weekly cap\n\
                - A short no-spend stretch can reset a drifting category\n\n\
                Set an alert at 75% of each budget so overruns stop surprising you."
                .to_string();
        }

        if prompt.contains("biggest") || prompt.contains("largest") {
            return "Your biggest expense is usually the best lever:\n\n\
                - Check the top category in your dashboard's category breakdown\n\
                - A 10% trim of the largest category beats eliminating a small one\n\
                - Recurring charges hide in big categories; audit them first\n\n\
                Focus on the top two categories before touching anything else."
                .to_string();
        }

        if prompt.contains("tip") || prompt.contains("advice") {
            let index = prompt.len() % TIP_POOL.len();
            return TIP_POOL[index].to_string();
        }

        if prompt.contains("budget") {
            return "Evaluating your budget setup against common spending patterns:\n\n\
                - Allocations that match last month's actuals are realistic ones\n\
                - Keep a miscellaneous line for the expenses you never predict\n\
                - Revisit allocations monthly; a budget is a draft, not a contract\n\n\
                Start at 80% of your targets and adjust upward once real data comes in."
                .to_string();
        }

        // No keyword matched: generic guidance
        "Happy to help with your finances. A good starting routine:\n\n\
         - Create an allocation for each major spending area\n\
         - Log expenses as they happen so the dashboard stays honest\n\
         - Check utilization weekly and rebalance when a line runs hot\n\n\
         Ask about specific categories or goals any time."
            .to_string()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<Completion> {
        if !self.healthy {
            return Err(Error::Provider("mock provider unavailable".to_string()));
        }

        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let content = Self::respond(prompt);
        let total_tokens = (content.len() / 4) as u32;

        Ok(Completion {
            content,
            total_tokens,
            provider: self.name().to_string(),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_rules() {
        let provider = MockProvider::new();
        let options = CompletionOptions::default();

        let saving = provider
            .complete(&[ChatMessage::user("How do I save money?")], &options)
            .await
            .unwrap();
        assert!(saving.content.to_lowercase().contains("saving") || saving.content.contains("save"));

        let overspend = provider
            .complete(&[ChatMessage::user("Am I going to overspend?")], &options)
            .await
            .unwrap();
        assert!(overspend.content.contains("overspending") || overspend.content.contains("budget"));
    }

    #[tokio::test]
    async fn test_deterministic_responses() {
        let provider = MockProvider::new();
        let options = CompletionOptions::default();
        let messages = [ChatMessage::user("Give me a tip")];

        let first = provider.complete(&messages, &options).await.unwrap();
        let second = provider.complete(&messages, &options).await.unwrap();
        assert_eq!(first.content, second.content);
        assert!(TIP_POOL.contains(&first.content.as_str()));
    }

    #[tokio::test]
    async fn test_failing_provider_errors() {
        let provider = MockProvider::failing();
        let result = provider
            .complete(
                &[ChatMessage::user("anything")],
                &CompletionOptions::default(),
            )
            .await;
        assert!(result.is_err());
        assert!(!provider.health_check().await);
    }

    #[test]
    fn test_default_response_mentions_guidance() {
        let response = MockProvider::respond("xyzzy");
        assert!(response.contains("starting routine"));
    }
}
