//! Conversation Orchestrator
//!
//! Runs one chat turn end to end: response cache lookup, request
//! deduplication, backend call, directive handling, tool dispatch, the
//! summarization call, action validation, and the cache write.
//!
//! A turn makes at most two backend round trips: the initial call, plus one
//! summarization call when the first reply requested a tool. Tool failures
//! and denials degrade into the summarization input rather than failing the
//! turn; only a backend failure surfaces as an error, and then to every
//! coalesced caller of the same flight.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use timeclerk_core::{CacheStats, Role};
use timeclerk_llm::{CompletionProvider, LlmRequestOptions, Message};
use timeclerk_tools::{parse_directives, TimesheetQueries, ToolDispatcher};

use crate::models::chat::{ChatRequest, ChatResponse, HistoryMessage, UserContext};
use crate::models::settings::AssistantConfig;
use crate::services::action_gate::ActionGate;
use crate::services::prompts::{build_summarize_prompt, build_system_prompt};
use crate::services::response_cache::{CachedReply, ResponseCache};
use crate::services::singleflight::RequestDeduplicator;
use crate::utils::error::{AppError, AppResult};

/// Display text for any completion-backend failure. The raw provider error
/// never reaches the caller; it goes to the log instead.
const BACKEND_APOLOGY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Failure of one in-flight turn, cloneable so every coalesced waiter
/// receives it.
#[derive(Debug, Clone, Error)]
enum TurnError {
    #[error("{0}")]
    Backend(String),
    #[error("{0}")]
    Aborted(String),
}

impl From<String> for TurnError {
    fn from(msg: String) -> Self {
        TurnError::Aborted(msg)
    }
}

impl From<TurnError> for AppError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::Backend(msg) => AppError::Backend(msg),
            TurnError::Aborted(msg) => AppError::Internal(msg),
        }
    }
}

/// The chat-turn orchestrator.
pub struct AssistantService {
    provider: Arc<dyn CompletionProvider>,
    dispatcher: Arc<ToolDispatcher>,
    response_cache: Arc<ResponseCache>,
    dedup: RequestDeduplicator<CachedReply, TurnError>,
    config: AssistantConfig,
}

impl AssistantService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        queries: Arc<dyn TimesheetQueries>,
        config: AssistantConfig,
    ) -> Self {
        let dispatcher = Arc::new(ToolDispatcher::new(
            queries,
            Duration::from_secs(config.tool_cache_ttl_secs),
            config.work_calendar,
        ));
        let response_cache = Arc::new(ResponseCache::new(Duration::from_secs(
            config.response_cache_ttl_secs,
        )));
        Self {
            provider,
            dispatcher,
            response_cache,
            dedup: RequestDeduplicator::new(),
            config,
        }
    }

    /// Run one chat turn for `user`.
    pub async fn handle_chat(
        &self,
        user: &UserContext,
        request: ChatRequest,
    ) -> AppResult<ChatResponse> {
        let message = request.message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::validation("message must not be empty"));
        }

        let key = ResponseCache::key(&user.user_id, user.role, &message);
        if let Some(hit) = self.response_cache.get(&key) {
            tracing::debug!(user = %user.user_id, "chat turn served from response cache");
            return Ok(Self::to_response(hit, true));
        }

        // The whole miss path runs under one flight key, so concurrent
        // identical requests coalesce onto a single pipeline run
        let turn = TurnInput {
            provider: self.provider.clone(),
            dispatcher: self.dispatcher.clone(),
            response_cache: self.response_cache.clone(),
            cache_key: key.clone(),
            user_id: user.user_id.clone(),
            role: user.role,
            message,
            history: request.history,
            history_limit: self.config.history_limit,
        };
        let reply = self
            .dedup
            .run(&key, move || run_turn(turn))
            .await
            .map_err(AppError::from)?;

        Ok(Self::to_response(reply, false))
    }

    fn to_response(reply: CachedReply, cached: bool) -> ChatResponse {
        ChatResponse {
            response: reply.response,
            model: reply.model,
            cached,
            action: reply.action,
        }
    }

    /// Tool result cache health.
    pub fn tool_cache_stats(&self) -> CacheStats {
        self.dispatcher.cache_stats()
    }

    /// Response cache health.
    pub fn response_cache_stats(&self) -> CacheStats {
        self.response_cache.stats()
    }

    /// Drop every cached tool result and reply, e.g. after data changes.
    ///
    /// Cache administration is an admin operation; any other role is
    /// rejected without touching the caches.
    pub fn invalidate_caches(&self, role: Role) -> AppResult<()> {
        if !role.is_admin() {
            return Err(AppError::forbidden(
                "cache administration requires the admin role",
            ));
        }
        self.dispatcher.invalidate_cache();
        self.response_cache.invalidate_all();
        tracing::info!("all caches invalidated");
        Ok(())
    }

    /// Verify the completion backend is reachable.
    pub async fn health_check(&self) -> AppResult<()> {
        self.provider.health_check().await.map_err(AppError::from)
    }
}

/// Everything one turn needs, owned, so the flight outlives its caller.
struct TurnInput {
    provider: Arc<dyn CompletionProvider>,
    dispatcher: Arc<ToolDispatcher>,
    response_cache: Arc<ResponseCache>,
    cache_key: String,
    user_id: String,
    role: Role,
    message: String,
    history: Vec<HistoryMessage>,
    history_limit: usize,
}

/// The miss path of one turn: backend, directives, tools, summarize, cache.
async fn run_turn(input: TurnInput) -> Result<CachedReply, TurnError> {
    let TurnInput {
        provider,
        dispatcher,
        response_cache,
        cache_key,
        user_id,
        role,
        message,
        history,
        history_limit,
    } = input;

    let mut messages = vec![Message::system(build_system_prompt(role))];
    let start = history.len().saturating_sub(history_limit);
    for turn in &history[start..] {
        match turn.role.as_str() {
            "assistant" => messages.push(Message::assistant(&turn.content)),
            _ => messages.push(Message::user(&turn.content)),
        }
    }
    messages.push(Message::user(&message));

    let first = provider
        .complete(messages, LlmRequestOptions::default())
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "completion backend call failed");
            TurnError::Backend(BACKEND_APOLOGY.to_string())
        })?;
    let parsed = parse_directives(&first.content);
    let mut action = parsed.action;
    let mut model = first.model;
    let mut response = parsed.text;

    if let Some(invocation) = parsed.tool_call {
        let outcome = dispatcher.dispatch(&user_id, role, &invocation).await;
        tracing::debug!(user = %user_id, tool = %invocation.tool, "tool dispatched");

        let summary_messages = vec![
            Message::system(build_summarize_prompt(role, &invocation.tool)),
            Message::user(format!(
                "Question: {message}\n\nTool result:\n{}",
                outcome.to_content()
            )),
        ];
        let second = provider
            .complete(summary_messages, LlmRequestOptions::default())
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "summarization backend call failed");
                TurnError::Backend(BACKEND_APOLOGY.to_string())
            })?;

        // The summarization reply should be prose, but strip any stray
        // directive blocks it emits anyway
        let parsed_second = parse_directives(&second.content);
        if action.is_none() {
            action = parsed_second.action;
        }
        model = second.model;
        response = parsed_second.text;
    }

    if response.is_empty() {
        response = "Done.".to_string();
    }
    let action = action.and_then(|candidate| ActionGate::validate(candidate, role));

    let reply = CachedReply {
        response,
        model,
        action,
    };
    // Written inside the flight, so coalesced waiters find it cached next time
    response_cache.put(cache_key, reply.clone());
    Ok(reply)
}
