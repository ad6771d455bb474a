//! Chat Models
//!
//! Wire shapes exchanged with the chat frontend.

use serde::{Deserialize, Serialize};

use timeclerk_core::Role;
use timeclerk_tools::ActionCommand;

/// The authenticated user a turn runs on behalf of.
///
/// Both fields come from the host application's session, never from the
/// message body: the user id is the cache isolation boundary and the role
/// drives tool gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    #[serde(default)]
    pub role: Role,
}

/// One prior turn replayed for conversational context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

/// A chat turn request from the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Recent turns, oldest first; trimmed to the configured limit
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

/// The assistant's reply for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Natural-language reply with directive blocks stripped
    pub response: String,
    /// Model that produced the reply (echoed from cache on hits)
    pub model: String,
    /// Whether the reply came from the response cache
    pub cached: bool,
    /// Validated UI action for the client executor, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionCommand>,
}
