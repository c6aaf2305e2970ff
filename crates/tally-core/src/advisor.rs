//! AI financial advisor
//!
//! Builds a textual context from the financial snapshot, delegates prose
//! generation to the configured provider, and falls back to the
//! deterministic mock generator on any provider failure. The outward-facing
//! calls never fail because of a misconfigured or down provider: advice
//! availability is prioritized over attribution accuracy, and the reported
//! provider name is annotated when a fallback occurred.

use serde::Serialize;
use tracing::warn;

use crate::ai::{AiClient, ChatMessage, CompletionOptions, MockProvider, Provider};
use crate::models::FinancialSnapshot;

const SYSTEM_PROMPT: &str = "You are a professional financial advisor AI assistant. \
You help users manage their personal finances by analyzing their budget and spending data.\n\n\
Your role is to:\n\
1. Provide personalized financial advice based on their actual data\n\
2. Identify spending patterns and potential issues\n\
3. Suggest practical money management strategies\n\
4. Help users optimize their budgets\n\
5. Answer questions about their financial health\n\n\
Always be supportive and encouraging, practical and actionable, clear and easy \
to understand, focused on their specific data, and professional but friendly.\n\n\
Use US dollars ($) for all monetary values.";

const TIPS_SYSTEM_PROMPT: &str = "You are a financial advisor. Based on the user's \
spending data, provide 3-5 quick, actionable financial tips. Each tip should be one \
sentence long, specific to their data, actionable, and encouraging. Format as a \
simple list, one tip per line.";

/// Result of an insight generation call
///
/// `success` is false only when even the local fallback failed, which the
/// deterministic generator cannot do in practice.
#[derive(Debug, Clone, Serialize)]
pub struct InsightReply {
    pub success: bool,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Provider that actually produced the text; suffixed with
    /// "-fallback-mock" when the primary provider failed
    pub provider: String,
    pub total_tokens: u32,
}

/// Result of a quick-tips call (always successful)
#[derive(Debug, Clone, Serialize)]
pub struct TipsReply {
    pub success: bool,
    pub tips: Vec<String>,
    pub provider: String,
}

/// Financial advisor over a pluggable AI client
pub struct Advisor {
    client: AiClient,
}

impl Advisor {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    /// Build an advisor from the AI_PROVIDER environment configuration
    pub fn from_env() -> Self {
        Self::new(AiClient::from_env())
    }

    /// Generate a financial analysis, optionally answering a user question
    pub async fn generate_insights(
        &self,
        data: &FinancialSnapshot,
        question: Option<&str>,
    ) -> InsightReply {
        let context = data_context(data);

        let user_prompt = match question {
            Some(q) => format!(
                "The user asked: \"{}\"\n\n\
                 Please answer their question based on their financial data and \
                 provide relevant insights and recommendations.",
                q
            ),
            None => "Please analyze this financial data and provide an overall \
                     financial health assessment, key observations about spending \
                     patterns, specific recommendations for improvement, and any \
                     areas of concern. Keep the response concise, around 300-400 words."
                .to_string(),
        };

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("{}\n\n{}", context, user_prompt)),
        ];

        let options = CompletionOptions {
            max_tokens: 800,
            temperature: 0.7,
        };

        match self.client.complete(&messages, &options).await {
            Ok(completion) => InsightReply {
                success: true,
                response: completion.content,
                error: None,
                provider: completion.provider,
                total_tokens: completion.total_tokens,
            },
            Err(e) => {
                warn!(
                    provider = %self.client.name(),
                    error = %e,
                    "Primary AI provider failed, falling back to mock"
                );

                match MockProvider::new().complete(&messages, &options).await {
                    Ok(completion) => InsightReply {
                        success: true,
                        response: completion.content,
                        error: None,
                        provider: format!("{}-fallback-mock", self.client.name()),
                        total_tokens: completion.total_tokens,
                    },
                    Err(fallback_err) => InsightReply {
                        success: false,
                        response: "I'm sorry, I couldn't analyze your financial data \
                                   at the moment. Please try again later."
                            .to_string(),
                        error: Some(fallback_err.to_string()),
                        provider: self.client.name().to_string(),
                        total_tokens: 0,
                    },
                }
            }
        }
    }

    /// Generate a short list of one-line tips.
    ///
    /// Never fails visibly: a provider failure yields a fixed set of
    /// generic tips and still reports success.
    pub async fn quick_tips(&self, data: &FinancialSnapshot) -> TipsReply {
        let overspent = data
            .budgets
            .iter()
            .filter(|b| b.utilization_percentage > 100.0)
            .count();
        let top_categories: Vec<&str> = data
            .category_totals
            .iter()
            .take(3)
            .map(|c| c.category.as_str())
            .collect();

        let context = format!(
            "Budget utilization: {:.1}%\n\
             Top spending categories: {}\n\
             Overspent budgets: {}\n\
             Total remaining budget: ${:.2}",
            data.summary.budget_utilization_percentage,
            top_categories.join(", "),
            overspent,
            data.summary.remaining_budget,
        );

        let messages = vec![
            ChatMessage::system(TIPS_SYSTEM_PROMPT),
            ChatMessage::user(context),
        ];

        let options = CompletionOptions {
            max_tokens: 300,
            temperature: 0.8,
        };

        match self.client.complete(&messages, &options).await {
            Ok(completion) => {
                let tips: Vec<String> = completion
                    .content
                    .lines()
                    .map(|line| line.trim_start_matches(['-', '•', '*', ' ']).trim())
                    .filter(|line| !line.is_empty())
                    .take(5)
                    .map(str::to_string)
                    .collect();

                TipsReply {
                    success: true,
                    tips,
                    provider: completion.provider,
                }
            }
            Err(e) => {
                warn!(
                    provider = %self.client.name(),
                    error = %e,
                    "Tip generation failed, using fixed fallback tips"
                );

                TipsReply {
                    success: true,
                    tips: vec![
                        "Track your spending regularly to stay within budget".to_string(),
                        "Consider setting up automatic savings transfers".to_string(),
                        "Review and adjust your budgets monthly".to_string(),
                    ],
                    provider: format!("{}-fallback", self.client.name()),
                }
            }
        }
    }
}

/// Render the snapshot as the textual context for the model
fn data_context(data: &FinancialSnapshot) -> String {
    let has_data = !data.budgets.is_empty() || !data.recent_transactions.is_empty();
    if !has_data {
        return "The user is brand new and has not created anything in the tracker yet. \
                There is no spending history to analyze."
            .to_string();
    }

    let budget_lines = if data.budgets.is_empty() {
        "No budgets created yet".to_string()
    } else {
        data.budgets
            .iter()
            .map(|b| {
                format!(
                    "- {} ({}): ${:.2}/${:.2} ({:.1}% used)",
                    b.name,
                    b.category.as_deref().unwrap_or("No category"),
                    b.total_spend,
                    b.amount,
                    b.utilization_percentage,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let category_lines = if data.category_totals.is_empty() {
        "No spending categories yet".to_string()
    } else {
        data.category_totals
            .iter()
            .map(|c| {
                format!(
                    "- {}: ${:.2} ({} transactions)",
                    c.category, c.total_amount, c.transaction_count
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let transaction_lines = if data.recent_transactions.is_empty() {
        "No recent transactions".to_string()
    } else {
        data.recent_transactions
            .iter()
            .take(10)
            .map(|t| {
                format!(
                    "- {}: ${:.2} ({}) - {}",
                    t.name,
                    t.amount,
                    t.category.as_deref().unwrap_or("No category"),
                    t.created_at.format("%Y-%m-%d"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let monthly_lines = if data.monthly_totals.is_empty() {
        "No spending history yet".to_string()
    } else {
        data.monthly_totals
            .iter()
            .map(|m| format!("- {}: ${:.2}", m.month, m.total_amount))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Here is the user's current financial data:\n\n\
         BUDGET SUMMARY:\n\
         - Total Budget: ${:.2}\n\
         - Total Spent: ${:.2}\n\
         - Remaining Budget: ${:.2}\n\
         - Budget Utilization: {:.1}%\n\
         - Total Transactions: {}\n\
         - Average Transaction: ${:.2}\n\n\
         BUDGETS BREAKDOWN:\n{}\n\n\
         SPENDING BY CATEGORY:\n{}\n\n\
         RECENT TRANSACTIONS (Last 30 days):\n{}\n\n\
         MONTHLY SPENDING TREND:\n{}",
        data.summary.total_budget,
        data.summary.total_spent,
        data.summary.remaining_budget,
        data.summary.budget_utilization_percentage,
        data.summary.total_transactions,
        data.summary.average_transaction_amount,
        budget_lines,
        category_lines,
        transaction_lines,
        monthly_lines,
    )
}
