//! LLM Types
//!
//! Shared types for the completion-backend abstraction: chat messages,
//! provider configuration, responses, usage accounting, and the error
//! taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message sent to or received from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Token usage reported by the backend, when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageStats {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

/// A complete (non-streaming) completion from the backend.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The completion text. Empty string when the backend returned no content.
    pub content: String,
    /// Model label echoed by the backend, falling back to the configured one.
    pub model: String,
    /// Usage accounting, if the backend reported it.
    pub usage: UsageStats,
}

/// Per-request option overrides.
#[derive(Debug, Clone, Default)]
pub struct LlmRequestOptions {
    /// Override the configured sampling temperature for this request.
    pub temperature_override: Option<f64>,
}

/// Static configuration for a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chat-completions endpoint. `None` uses the provider default.
    pub base_url: Option<String>,
    /// Bearer token for the backend.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum completion tokens per request.
    pub max_tokens: u32,
    /// Upper bound on a single HTTP round trip, in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

/// Errors from the completion backend.
///
/// Cloneable on purpose: a single failed round trip is shared with every
/// caller coalesced onto the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Missing or rejected API key
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Backend rejected the request shape
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Requested model does not exist
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    /// Backend asked us to back off
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Backend-side failure (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Transport failure: connect error, timeout, TLS, etc.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Response body was not the expected JSON shape
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Anything else
    #[error("{message}")]
    Other { message: String },
}

/// Result type alias for backend calls
pub type LlmResult<T> = Result<T, LlmError>;
