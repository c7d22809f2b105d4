//! LLM — hosted model adapter for the search assistant.
//!
//! DESIGN
//! ======
//! The assistant needs exactly one capability: send a prompt, get back a
//! JSON document constrained by a response schema. `LlmJson` is that seam;
//! `LlmClient` is the production implementation (Gemini), and tests
//! substitute a mock. The client is constructed explicitly and handed to
//! the session, never held in a global.

pub mod config;
pub mod gemini;
pub mod types;

#[cfg(test)]
pub mod mock;

use config::LlmConfig;
pub use types::{JsonResponse, LlmError, LlmJson};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client configured by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: gemini::GeminiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"gemini-2.5-flash"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmJson for LlmClient {
    async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<JsonResponse, LlmError> {
        self.inner.generate_json(&self.model, prompt, schema).await
    }
}
