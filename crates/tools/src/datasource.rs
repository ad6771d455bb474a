//! Timesheet Data Source
//!
//! The read-only query collaborator behind every tool. The host application
//! implements this trait over its persistence layer; the pipeline never
//! mutates persisted state through it.
//!
//! Contract: "not found" is a normal structured payload (e.g. an empty list
//! or a `{"found": false}` record), never an error. Errors are reserved for
//! genuine I/O failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use timeclerk_core::{CoreResult, Role};

/// Work-calendar policy consumed by hour-gap queries.
///
/// Lives with the data-source contract so implementations and the dispatcher
/// agree on the shape; the host's configuration layer owns the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// Expected logged hours per working day
    pub expected_daily_hours: f64,
    /// Whether Saturday/Sunday count as working days
    pub include_weekends: bool,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            expected_daily_hours: 8.0,
            include_weekends: false,
        }
    }
}

/// Reporting period accepted by the period-scoped queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPeriod {
    Day,
    #[default]
    Week,
    Month,
}

impl QueryPeriod {
    /// Parse the wire label, falling back to the default for anything else.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "day" | "today" => QueryPeriod::Day,
            "month" => QueryPeriod::Month,
            _ => QueryPeriod::Week,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryPeriod::Day => "day",
            QueryPeriod::Week => "week",
            QueryPeriod::Month => "month",
        }
    }
}

/// Read-only queries over the TimeClerk data model.
///
/// Each method takes the subject user id plus optional scalar parameters and
/// returns a plain JSON record. Team- and account-level methods are invoked
/// only after the dispatcher's role gate has passed, but implementations may
/// scope results defensively as well.
#[async_trait]
pub trait TimesheetQueries: Send + Sync {
    // Personal scope
    async fn logged_hours(&self, user_id: &str, period: QueryPeriod) -> CoreResult<Value>;
    async fn timesheet_status(&self, user_id: &str, period: QueryPeriod) -> CoreResult<Value>;
    /// Days in the period logged below the expected daily hours.
    /// The work-calendar policy comes from configuration, not from here.
    async fn missing_hours(
        &self,
        user_id: &str,
        period: QueryPeriod,
        calendar: WorkCalendar,
    ) -> CoreResult<Value>;
    async fn overlapping_entries(&self, user_id: &str, period: QueryPeriod) -> CoreResult<Value>;
    async fn task_list(&self, user_id: &str) -> CoreResult<Value>;
    async fn task_details(&self, user_id: &str, name: &str) -> CoreResult<Value>;
    async fn leave_balance(&self, user_id: &str) -> CoreResult<Value>;
    async fn leave_requests(&self, user_id: &str) -> CoreResult<Value>;
    async fn attendance_summary(&self, user_id: &str, period: QueryPeriod) -> CoreResult<Value>;
    async fn upcoming_holidays(&self, user_id: &str) -> CoreResult<Value>;
    async fn notifications(&self, user_id: &str) -> CoreResult<Value>;
    async fn project_list(&self, user_id: &str) -> CoreResult<Value>;
    async fn weekly_summary(&self, user_id: &str) -> CoreResult<Value>;
    async fn profile(&self, user_id: &str) -> CoreResult<Value>;

    // Team scope (manager-gated at dispatch)
    async fn pending_approvals(&self, user_id: &str) -> CoreResult<Value>;
    async fn team_members(&self, user_id: &str) -> CoreResult<Value>;
    async fn team_timesheets(&self, user_id: &str, period: QueryPeriod) -> CoreResult<Value>;
    async fn employee_details(&self, user_id: &str, name: &str) -> CoreResult<Value>;
    async fn project_hours(
        &self,
        user_id: &str,
        name: &str,
        period: QueryPeriod,
    ) -> CoreResult<Value>;

    // Account scope (admin-gated at dispatch)
    async fn user_accounts(&self, user_id: &str, role: Option<Role>) -> CoreResult<Value>;
}
