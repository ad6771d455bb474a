//! Tool Dispatcher
//!
//! Maps a parsed tool invocation onto the read-only data-query collaborator,
//! with role gating and transparent result caching.
//!
//! Outcomes are a tagged union rather than errors so the orchestrator can
//! always produce a response: a gated tool invoked by an ungated role is a
//! soft denial with an advisory message, not an authorization failure. Only
//! successful payloads are cached; error-shaped outcomes must never poison
//! future identical queries once a transient failure clears.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use timeclerk_core::{CacheStats, CacheStore, Role};

use crate::datasource::{QueryPeriod, TimesheetQueries, WorkCalendar};
use crate::directive::ToolInvocation;
use crate::registry::{find_tool, tool_cache_key, ToolSpec};

/// Advisory shown when a role fails a tool's gate.
const DENIED_ADVISORY: &str =
    "That information is only available to managers or administrators.";

/// Result union of one tool dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Structured payload from the data layer
    Ok(Value),
    /// Role gate not passed; advisory text for the summarization step
    Denied(String),
    /// Unknown tool, missing parameter, or data-layer I/O failure
    Error(String),
}

impl ToolOutcome {
    /// Text form fed into the summarization backend call.
    pub fn to_content(&self) -> String {
        match self {
            ToolOutcome::Ok(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ToolOutcome::Denied(advisory) => advisory.clone(),
            ToolOutcome::Error(_) => "tool result unavailable".to_string(),
        }
    }
}

/// Dispatches tool invocations against the data source, through the cache.
pub struct ToolDispatcher {
    queries: Arc<dyn TimesheetQueries>,
    cache: CacheStore<Value>,
    cache_ttl: Duration,
    /// Work-calendar policy consumed by getMissingHours
    work_calendar: WorkCalendar,
}

impl ToolDispatcher {
    pub fn new(
        queries: Arc<dyn TimesheetQueries>,
        cache_ttl: Duration,
        work_calendar: WorkCalendar,
    ) -> Self {
        Self {
            queries,
            cache: CacheStore::new(),
            cache_ttl,
            work_calendar,
        }
    }

    /// Execute one invocation on behalf of `user_id` with `role`.
    ///
    /// A repeated identical (tool, user, params) call inside the TTL window
    /// is served from cache without touching the data layer.
    pub async fn dispatch(
        &self,
        user_id: &str,
        role: Role,
        invocation: &ToolInvocation,
    ) -> ToolOutcome {
        let Some(spec) = find_tool(&invocation.tool) else {
            tracing::warn!(tool = %invocation.tool, "unknown tool requested");
            return ToolOutcome::Error(format!("unknown tool: {}", invocation.tool));
        };

        if !spec.gate.allows(role) {
            tracing::debug!(tool = spec.name, role = role.as_str(), "tool denied by role gate");
            return ToolOutcome::Denied(DENIED_ADVISORY.to_string());
        }

        let key = tool_cache_key(user_id, spec.name, &invocation.params);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(tool = spec.name, "tool result served from cache");
            return ToolOutcome::Ok(cached);
        }

        match self.execute(spec, user_id, &invocation.params).await {
            Ok(value) => {
                self.cache.put(key, value.clone(), self.cache_ttl);
                ToolOutcome::Ok(value)
            }
            Err(outcome) => outcome,
        }
    }

    /// Cache health for the administration surface.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached tool result.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    async fn execute(
        &self,
        spec: &ToolSpec,
        user_id: &str,
        params: &Map<String, Value>,
    ) -> Result<Value, ToolOutcome> {
        let period = || {
            params
                .get("period")
                .and_then(Value::as_str)
                .map(QueryPeriod::parse)
                .unwrap_or_default()
        };

        let queries = &self.queries;
        let result = match spec.name {
            "getLoggedHours" => queries.logged_hours(user_id, period()).await,
            "getTimesheetStatus" => queries.timesheet_status(user_id, period()).await,
            "getMissingHours" => {
                queries
                    .missing_hours(user_id, period(), self.work_calendar)
                    .await
            }
            "getOverlappingEntries" => queries.overlapping_entries(user_id, period()).await,
            "getTaskList" => queries.task_list(user_id).await,
            "getTaskDetails" => {
                let name = required_name(spec, params)?;
                queries.task_details(user_id, name).await
            }
            "getLeaveBalance" => queries.leave_balance(user_id).await,
            "getLeaveRequests" => queries.leave_requests(user_id).await,
            "getAttendanceSummary" => queries.attendance_summary(user_id, period()).await,
            "getUpcomingHolidays" => queries.upcoming_holidays(user_id).await,
            "getNotifications" => queries.notifications(user_id).await,
            "getProjectList" => queries.project_list(user_id).await,
            "getWeeklySummary" => queries.weekly_summary(user_id).await,
            "getProfile" => queries.profile(user_id).await,
            "getPendingApprovals" => queries.pending_approvals(user_id).await,
            "getTeamMembers" => queries.team_members(user_id).await,
            "getTeamTimesheets" => queries.team_timesheets(user_id, period()).await,
            "getEmployeeDetails" => {
                let name = required_name(spec, params)?;
                queries.employee_details(user_id, name).await
            }
            "getProjectHours" => {
                let name = required_name(spec, params)?;
                queries.project_hours(user_id, name, period()).await
            }
            "getUserAccounts" => {
                let role_filter = params
                    .get("role")
                    .and_then(Value::as_str)
                    .and_then(|label| serde_json::from_value(Value::String(label.to_string())).ok());
                queries.user_accounts(user_id, role_filter).await
            }
            // find_tool already vetted the name; a spec without a match arm
            // is a registry/dispatcher mismatch.
            other => {
                return Err(ToolOutcome::Error(format!(
                    "tool not wired to a query: {other}"
                )))
            }
        };

        result.map_err(|err| {
            tracing::warn!(tool = spec.name, error = %err, "data query failed");
            ToolOutcome::Error(err.to_string())
        })
    }
}

/// Extract the required `name` parameter or produce an error outcome.
fn required_name<'p>(
    spec: &ToolSpec,
    params: &'p Map<String, Value>,
) -> Result<&'p str, ToolOutcome> {
    params
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            ToolOutcome::Error(format!("{} requires a 'name' parameter", spec.name))
        })
}
