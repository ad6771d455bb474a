//! Shared test doubles: a scripted completion backend and an in-memory
//! data source with invocation counting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use timeclerk_assistant::models::chat::{ChatRequest, UserContext};
use timeclerk_assistant::models::settings::AssistantConfig;
use timeclerk_assistant::services::assistant::AssistantService;
use timeclerk_core::{CoreError, CoreResult, Role};
use timeclerk_llm::{
    CompletionProvider, LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, UsageStats,
};
use timeclerk_tools::{QueryPeriod, TimesheetQueries, WorkCalendar};

/// Scripted backend: pops replies front to back, counts calls, optionally
/// sleeps before answering to widen coalescing windows.
pub struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, LlmError>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(replies: Vec<Result<String, LlmError>>, delay: Duration) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn complete(
        &self,
        _messages: Vec<Message>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(LlmError::Other {
                    message: "script exhausted".to_string(),
                });
            }
            replies.remove(0)
        };
        next.map(|content| LlmResponse {
            content,
            model: "test-model".to_string(),
            usage: UsageStats::default(),
        })
    }
}

/// In-memory data source answering every query with a canned record and
/// counting total invocations. `failing` makes every query error.
pub struct RecordingQueries {
    calls: AtomicUsize,
    failing: bool,
}

impl RecordingQueries {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, payload: Value) -> CoreResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(CoreError::query("database unreachable"))
        } else {
            Ok(payload)
        }
    }
}

#[async_trait]
impl TimesheetQueries for RecordingQueries {
    async fn logged_hours(&self, user_id: &str, period: QueryPeriod) -> CoreResult<Value> {
        self.record(json!({"user": user_id, "period": period.as_str(), "total": 38.5}))
    }
    async fn timesheet_status(&self, _: &str, _: QueryPeriod) -> CoreResult<Value> {
        self.record(json!({"status": "submitted"}))
    }
    async fn missing_hours(
        &self,
        _: &str,
        _: QueryPeriod,
        calendar: WorkCalendar,
    ) -> CoreResult<Value> {
        self.record(json!({
            "expected_daily_hours": calendar.expected_daily_hours,
            "include_weekends": calendar.include_weekends,
            "short_days": ["2025-03-04"],
        }))
    }
    async fn overlapping_entries(&self, _: &str, _: QueryPeriod) -> CoreResult<Value> {
        self.record(json!({"overlaps": []}))
    }
    async fn task_list(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"tasks": ["write report", "review PR"]}))
    }
    async fn task_details(&self, _: &str, name: &str) -> CoreResult<Value> {
        self.record(json!({"task": name, "status": "open"}))
    }
    async fn leave_balance(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"vacation": 12, "sick": 5}))
    }
    async fn leave_requests(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"requests": []}))
    }
    async fn attendance_summary(&self, _: &str, _: QueryPeriod) -> CoreResult<Value> {
        self.record(json!({"present": 5, "remote": 2}))
    }
    async fn upcoming_holidays(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"holidays": ["2025-12-25"]}))
    }
    async fn notifications(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"unread": 1}))
    }
    async fn project_list(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"projects": ["Apollo"]}))
    }
    async fn weekly_summary(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"hours": 38.5, "tasks_done": 3}))
    }
    async fn profile(&self, user_id: &str) -> CoreResult<Value> {
        self.record(json!({"user": user_id, "department": "Engineering"}))
    }
    async fn pending_approvals(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"pending": 3}))
    }
    async fn team_members(&self, _: &str) -> CoreResult<Value> {
        self.record(json!({"members": ["ana", "ben"]}))
    }
    async fn team_timesheets(&self, _: &str, _: QueryPeriod) -> CoreResult<Value> {
        self.record(json!({"sheets": []}))
    }
    async fn employee_details(&self, _: &str, name: &str) -> CoreResult<Value> {
        self.record(json!({"employee": name}))
    }
    async fn project_hours(&self, _: &str, name: &str, _: QueryPeriod) -> CoreResult<Value> {
        self.record(json!({"project": name, "hours": 120}))
    }
    async fn user_accounts(&self, _: &str, role: Option<Role>) -> CoreResult<Value> {
        self.record(json!({"filter": role.map(|r| r.as_str())}))
    }
}

pub fn build_service(
    provider: Arc<ScriptedProvider>,
    queries: Arc<RecordingQueries>,
) -> AssistantService {
    AssistantService::new(provider, queries, AssistantConfig::default())
}

pub fn employee(user_id: &str) -> UserContext {
    UserContext {
        user_id: user_id.to_string(),
        role: Role::Employee,
    }
}

pub fn manager(user_id: &str) -> UserContext {
    UserContext {
        user_id: user_id.to_string(),
        role: Role::Manager,
    }
}

pub fn request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        history: Vec::new(),
    }
}

/// A first-call reply that requests the given tool.
pub fn tool_call_reply(tool: &str, params: &str) -> Result<String, LlmError> {
    Ok(format!(
        "```tool_call\n{{\"tool\": \"{tool}\", \"params\": {params}}}\n```"
    ))
}
