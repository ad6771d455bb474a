//! Service Layer
//!
//! The assistant pipeline's services: the chat-turn orchestrator plus its
//! collaborators (response cache, request deduplication, action validation,
//! prompt construction).

pub mod action_gate;
pub mod assistant;
pub mod prompts;
pub mod response_cache;
pub mod singleflight;

pub use action_gate::ActionGate;
pub use assistant::AssistantService;
pub use response_cache::ResponseCache;
pub use singleflight::RequestDeduplicator;
