//! Tool Registry
//!
//! The fixed table of data-query tools the assistant may invoke, with role
//! gates and parameter specs. Tool wire names are part of the directive
//! contract the system prompt teaches the model, so they never change at
//! runtime and are never derived from input.
//!
//! Also owns cache-key construction for tool results: a pure function of
//! (user, tool, parameters) with stable sorted-key parameter serialization.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use timeclerk_core::Role;

/// Who may invoke a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    /// Any authenticated user
    Any,
    /// Managers and admins
    Manager,
    /// Admins only
    Admin,
}

impl RoleGate {
    /// Whether `role` passes this gate.
    pub fn allows(&self, role: Role) -> bool {
        match self {
            RoleGate::Any => true,
            RoleGate::Manager => role.is_manager(),
            RoleGate::Admin => role.is_admin(),
        }
    }
}

/// A scalar parameter a tool accepts.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Static description of one tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    /// Wire name used in directives (part of the prompt contract)
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub gate: RoleGate,
}

const PERIOD_PARAM: ParamSpec = ParamSpec {
    name: "period",
    description: "Reporting period: day, week, or month (default week)",
    required: false,
};

const NAME_PARAM: ParamSpec = ParamSpec {
    name: "name",
    description: "Name or name fragment to look up",
    required: true,
};

/// Every tool the assistant can dispatch, in prompt order.
pub const TOOL_SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: "getLoggedHours",
        description: "Total hours the user logged in the period, broken down by day",
        params: &[PERIOD_PARAM],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getTimesheetStatus",
        description: "Draft/submitted/approved status of the user's timesheet for the period",
        params: &[PERIOD_PARAM],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getMissingHours",
        description: "Working days in the period where logged hours fall short of the expected workday",
        params: &[PERIOD_PARAM],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getOverlappingEntries",
        description: "Time entries in the period that overlap each other",
        params: &[PERIOD_PARAM],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getTaskList",
        description: "Open tasks assigned to the user",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getTaskDetails",
        description: "Details of one task matched by name",
        params: &[NAME_PARAM],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getLeaveBalance",
        description: "Remaining leave balance by leave type",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getLeaveRequests",
        description: "The user's leave requests and their approval state",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getAttendanceSummary",
        description: "Attendance (present/absent/remote) summary for the period",
        params: &[PERIOD_PARAM],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getUpcomingHolidays",
        description: "Upcoming company holidays",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getNotifications",
        description: "Unread notifications for the user",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getProjectList",
        description: "Projects the user is assigned to",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getWeeklySummary",
        description: "Digest of the user's current week: hours, tasks, leave",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getProfile",
        description: "The user's own profile and role information",
        params: &[],
        gate: RoleGate::Any,
    },
    ToolSpec {
        name: "getPendingApprovals",
        description: "Timesheets and leave requests awaiting the manager's approval",
        params: &[],
        gate: RoleGate::Manager,
    },
    ToolSpec {
        name: "getTeamMembers",
        description: "Members of the manager's team",
        params: &[],
        gate: RoleGate::Manager,
    },
    ToolSpec {
        name: "getTeamTimesheets",
        description: "Timesheet roll-up for the manager's team over the period",
        params: &[PERIOD_PARAM],
        gate: RoleGate::Manager,
    },
    ToolSpec {
        name: "getEmployeeDetails",
        description: "Details of one team member matched by name",
        params: &[NAME_PARAM],
        gate: RoleGate::Manager,
    },
    ToolSpec {
        name: "getProjectHours",
        description: "Hours booked to one project over the period",
        params: &[
            NAME_PARAM,
            PERIOD_PARAM,
        ],
        gate: RoleGate::Manager,
    },
    ToolSpec {
        name: "getUserAccounts",
        description: "User accounts, optionally filtered by role",
        params: &[ParamSpec {
            name: "role",
            description: "Filter by role: employee, manager, or admin",
            required: false,
        }],
        gate: RoleGate::Admin,
    },
];

/// Look up a tool spec by wire name.
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOL_SPECS.iter().find(|spec| spec.name == name)
}

/// Stable serialization of a parameter map: keys sorted, compact JSON.
///
/// A pure function of its input, so two semantically identical invocations
/// always produce the same cache key.
pub fn canonical_params(params: &Map<String, Value>) -> String {
    let sorted: BTreeMap<&String, &Value> = params.iter().collect();
    serde_json::to_string(&sorted).unwrap_or_else(|_| "{}".to_string())
}

/// Cache key for one (user, tool, parameters) invocation.
///
/// The user id is the isolation boundary: it is always present, so two users
/// can never collide on the same tool and parameters.
pub fn tool_cache_key(user_id: &str, tool_name: &str, params: &Map<String, Value>) -> String {
    format!("tool:{}:{}:{}", user_id, tool_name, canonical_params(params))
}
