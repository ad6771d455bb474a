//! TimeClerk LLM
//!
//! Completion-backend abstraction for the assistant pipeline:
//! - `provider` - the `CompletionProvider` trait every backend implements
//! - `openai` - OpenAI-compatible chat-completions implementation
//! - `http_client` - reqwest client factory with a bounded timeout
//! - `types` - shared message, response, configuration, and error types
//!
//! The backend is treated as unreliable: non-2xx statuses, malformed JSON,
//! and timeouts all surface as `LlmError`, never as a panic.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAiCompatProvider;
pub use provider::CompletionProvider;
pub use types::*;
