//! Data Models
//!
//! Request/response shapes for the chat surface plus assistant configuration.

pub mod chat;
pub mod settings;

pub use chat::{ChatRequest, ChatResponse, HistoryMessage, UserContext};
pub use settings::{AssistantConfig, AssistantConfigUpdate, WorkCalendar};
