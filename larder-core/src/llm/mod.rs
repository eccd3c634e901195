//! LLM provider abstraction for general chat messages.
//!
//! Messages that are not food-storage queries are answered by a hosted
//! model behind a trait, with a fake implementation for tests.

mod fake;
mod gemini;

pub use fake::FakeProvider;
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. The provider is
/// responsible for making the API call and returning the model's text
/// response; failure policy (the fixed apology) lives at the boundary.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt to the LLM and get a text response.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "gemini-2.5-pro").
    fn model_name(&self) -> &str;
}

/// Build a provider from environment variables.
///
/// - CHAT_PROVIDER: "gemini" | "fake" (default: "gemini")
/// - CHAT_MODEL: model name (default: "gemini-2.5-pro")
/// - GOOGLE_API_KEY: API key for Gemini
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, LlmError> {
    let provider = std::env::var("CHAT_PROVIDER").unwrap_or_else(|_| "gemini".to_string());

    match provider.as_str() {
        "fake" => Ok(Box::new(FakeProvider::default())),
        "gemini" => {
            let api_key = std::env::var("GOOGLE_API_KEY")
                .map_err(|_| LlmError::NotConfigured("GOOGLE_API_KEY not set".to_string()))?;
            let model =
                std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gemini-2.5-pro".to_string());
            Ok(Box::new(GeminiProvider::new(api_key, model)))
        }
        other => Err(LlmError::NotConfigured(format!(
            "Unknown provider: {}",
            other
        ))),
    }
}
