//! LLM types — provider-neutral response shape, errors, and the client trait.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Result of a schema-constrained generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    /// Raw model output. Expected to be a JSON document but not yet parsed;
    /// may be empty when the provider returned no candidate.
    pub text: String,
    pub model: String,
    pub finish_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// =============================================================================
// LLM JSON TRAIT
// =============================================================================

/// Provider-neutral async trait for JSON-mode generation. Enables mocking in
/// tests.
#[async_trait::async_trait]
pub trait LlmJson: Send + Sync {
    /// Send one prompt and ask for a reply conforming to `schema`.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the provider response
    /// cannot be decoded.
    async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<JsonResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
