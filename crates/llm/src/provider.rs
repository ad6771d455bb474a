//! Completion Provider Trait
//!
//! Defines the common interface the orchestrator uses to reach a
//! text-completion backend, plus shared HTTP error mapping.

use async_trait::async_trait;

use super::types::{LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message};

/// Trait that all completion backends must implement.
///
/// The pipeline only needs whole-message completions; streaming is a
/// non-goal. Implementations must map every transport and protocol failure
/// into `LlmError` instead of panicking.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send the message sequence and get a complete response.
    async fn complete(
        &self,
        messages: Vec<Message>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse>;

    /// Check if the provider is healthy and reachable.
    ///
    /// Default implementation issues a minimal completion request.
    async fn health_check(&self) -> LlmResult<()> {
        self.complete(
            vec![Message::user("ping")],
            LlmRequestOptions {
                temperature_override: Some(0.0),
            },
        )
        .await
        .map(|_| ())
    }
}

/// Helper function to create an error for a missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to map HTTP error status codes to `LlmError`
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            status,
            message: body.to_string(),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
