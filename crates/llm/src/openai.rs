//! OpenAI-Compatible Provider
//!
//! Implementation of the `CompletionProvider` trait for any backend that
//! speaks the OpenAI chat-completions protocol. The pipeline only ever sends
//! plain text messages and reads back a single choice.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{missing_api_key_error, parse_http_error, CompletionProvider};
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig, UsageStats,
};
use crate::http_client::build_http_client;

/// Default chat-completions endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible completion provider
pub struct OpenAiCompatProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

/// Typed response shapes (only the fields the pipeline reads)
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

impl OpenAiCompatProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_http_client(config.timeout_secs);
        Self { config, client }
    }

    /// Get the API endpoint URL
    fn endpoint(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": request_options
                .temperature_override
                .unwrap_or(self.config.temperature),
            "max_tokens": self.config.max_tokens,
            "stream": false,
        })
    }

    /// Parse a decoded response body into an `LlmResponse`
    fn parse_response(&self, response: ChatCompletionResponse) -> LlmResponse {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        let usage = response
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            model: response
                .model
                .unwrap_or_else(|| self.config.model.clone()),
            usage,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "openai-compat"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        messages: Vec<Message>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| missing_api_key_error(self.name()))?;

        let body = self.build_request_body(&messages, &request_options);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Network {
                        message: format!("request timed out after {}s", self.config.timeout_secs),
                    }
                } else {
                    LlmError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status.as_u16(), &body_text, self.name()));
        }

        let decoded: ChatCompletionResponse =
            response.json().await.map_err(|e| LlmError::MalformedResponse {
                message: e.to_string(),
            })?;

        Ok(self.parse_response(decoded))
    }
}
