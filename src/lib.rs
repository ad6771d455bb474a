//! TimeClerk Assistant
//!
//! Conversational assistant pipeline for the TimeClerk timesheet application.
//! Wires a completion backend, the data-query tool layer, response/tool
//! caches, request deduplication, and UI-action validation into a single
//! chat-turn orchestrator.

pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
