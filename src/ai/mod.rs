//! AI query client with ordered model fallback.
//!
//! Every query walks the model list from the top and returns the first
//! answer it gets. Failed models are logged and skipped; there is no retry,
//! backoff or memory of which models were healthy last time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[cfg(test)]
pub mod mock;

/// Default OpenAI-compatible backend.
pub const DEFAULT_BASE_URL: &str = "https://api.onlysq.ru/ai/openai";
/// Shared credential accepted by the default backend.
pub const DEFAULT_API_KEY: &str = "openai";

/// Models in priority order. The order is the cost/reliability policy.
pub const MODELS: [&str; 14] = [
    "gpt-4o-mini",
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-3-flash",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-0125",
    "gpt-4",
    "gpt-4-turbo",
    "gpt-4o",
    "gpt-4.1",
    "grok-3",
];

/// Response length cap sent with every request.
pub const MAX_TOKENS: u32 = 1000;
/// Per-model request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Shown to the user when no model answered.
pub const EXHAUSTED_MESSAGE: &str = "❌ Failed to get a response from any AI model";
/// Longest message the chat platform accepts, in characters.
pub const MESSAGE_CHUNK_LIMIT: usize = 2000;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Result of a fallback query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// A model answered.
    Answered { model: &'static str, text: String },
    /// Every model failed.
    Exhausted,
}

impl FallbackOutcome {
    /// Model that produced the answer, if any.
    pub fn model(&self) -> Option<&'static str> {
        match self {
            FallbackOutcome::Answered { model, .. } => Some(*model),
            FallbackOutcome::Exhausted => None,
        }
    }

    /// Text to show the user: the answer or the exhaustion message.
    pub fn into_text(self) -> String {
        match self {
            FallbackOutcome::Answered { text, .. } => text,
            FallbackOutcome::Exhausted => EXHAUSTED_MESSAGE.to_string(),
        }
    }
}

/// Chat completion client that falls back through [`MODELS`].
pub struct ModelFallbackClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ModelFallbackClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }

    /// Ask each model in turn until one answers.
    pub async fn query(&self, prompt: &str) -> FallbackOutcome {
        for model in MODELS {
            tracing::info!("Trying model {}", model);

            match self.complete(model, prompt).await {
                Ok(text) => {
                    tracing::info!("Model {} answered", model);
                    return FallbackOutcome::Answered { model, text };
                }
                Err(e) => tracing::debug!("Model {} failed: {}", model, e),
            }
        }

        tracing::warn!("No answer from any of {} models", MODELS.len());
        FallbackOutcome::Exhausted
    }

    /// One chat completion attempt against a single model.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        let request = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::Upstream(format!("{} returned no message content", model)))
    }
}

/// Split `text` into chunks of at most `limit` characters.
///
/// Every chunk but the last is exactly `limit` characters long. Text that
/// already fits comes back as a single chunk.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars.chunks(limit).map(|chunk| chunk.iter().collect()).collect()
}
