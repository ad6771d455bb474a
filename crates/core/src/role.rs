//! Role Model
//!
//! The three roles TimeClerk knows about. Tool gating and cache
//! administration key off this enum; it deliberately carries no permission
//! mechanics (authentication/authorization live in the host application).

use serde::{Deserialize, Serialize};

/// Role of the user driving a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee: own timesheets, tasks, and leave only
    #[default]
    Employee,
    /// Manager: additionally team-level queries and approvals
    Manager,
    /// Admin: additionally account-level queries and cache administration
    Admin,
}

impl Role {
    /// Stable lowercase label used in cache keys and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Whether this role satisfies manager-gated access.
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// Whether this role satisfies admin-gated access.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}
