//! Action Gate
//!
//! Allow-list validation of UI action candidates before they reach the client
//! executor. The model's output is untrusted: an action naming a view,
//! element, or modal outside the fixed registries is discarded (logged at
//! warn), never forwarded and never an error. The registries mirror the
//! frontend's routes and interactive surfaces, so they are compile-time
//! constants.

use timeclerk_core::Role;
use timeclerk_tools::{ActionCommand, ActionKind};

/// Views the client router can navigate to.
const NAV_TARGETS: &[&str] = &[
    "employee-dashboard",
    "manager-dashboard",
    "admin-dashboard",
    "timesheet",
    "tasks",
    "leave",
    "attendance",
    "projects",
    "notifications",
    "profile",
    "team",
    "approvals",
    "reports",
    "settings",
];

/// Interactive elements the client executor can click.
const CLICK_ELEMENTS: &[&str] = &[
    "submit-timesheet-button",
    "add-entry-button",
    "request-leave-button",
    "approve-button",
    "reject-button",
    "refresh-button",
    "export-button",
];

/// Page sections the client executor can scroll to.
const SCROLL_SECTIONS: &[&str] = &[
    "timesheet-table",
    "task-board",
    "leave-history",
    "attendance-calendar",
    "project-summary",
    "notifications-panel",
    "team-overview",
];

/// Modals the client executor can open.
const MODALS: &[&str] = &[
    "log-hours-modal",
    "new-task-modal",
    "leave-request-modal",
    "entry-details-modal",
    "profile-edit-modal",
];

/// Dashboards that require an elevated role to navigate to.
const MANAGER_TARGETS: &[&str] = &["manager-dashboard", "team", "approvals"];
const ADMIN_TARGETS: &[&str] = &["admin-dashboard"];

/// Validates candidate UI actions against the fixed registries.
pub struct ActionGate;

impl ActionGate {
    /// Validate one candidate.
    ///
    /// Returns the action unchanged if its subject is registered for its kind
    /// and the role may reach it, `None` otherwise. Total: never errors.
    pub fn validate(candidate: ActionCommand, role: Role) -> Option<ActionCommand> {
        let Some(subject) = candidate.subject() else {
            tracing::warn!(action = ?candidate.action, "action candidate missing its subject field");
            return None;
        };

        let registry = match candidate.action {
            ActionKind::Navigate => NAV_TARGETS,
            ActionKind::Click => CLICK_ELEMENTS,
            ActionKind::Scroll => SCROLL_SECTIONS,
            ActionKind::OpenModal => MODALS,
        };

        if !registry.contains(&subject) {
            tracing::warn!(
                action = ?candidate.action,
                subject = subject,
                "discarding action outside the registry"
            );
            return None;
        }

        if candidate.action == ActionKind::Navigate && !role_may_navigate(subject, role) {
            tracing::warn!(
                subject = subject,
                role = role.as_str(),
                "discarding navigation above the user's role"
            );
            return None;
        }

        Some(candidate)
    }
}

fn role_may_navigate(target: &str, role: Role) -> bool {
    if ADMIN_TARGETS.contains(&target) {
        return role.is_admin();
    }
    if MANAGER_TARGETS.contains(&target) {
        return role.is_manager();
    }
    true
}
