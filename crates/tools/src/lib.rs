//! TimeClerk Tools
//!
//! The data-query tool layer of the assistant pipeline:
//! - `datasource` - the read-only `TimesheetQueries` collaborator trait
//! - `registry` - the fixed table of 20 tool specs with role gates
//! - `dispatcher` - name-to-query dispatch with transparent result caching
//! - `directive` - parser for tool/action directives embedded in model text

pub mod datasource;
pub mod directive;
pub mod dispatcher;
pub mod registry;

// Re-export main types
pub use datasource::{QueryPeriod, TimesheetQueries, WorkCalendar};
pub use directive::{
    parse_directives, ActionCommand, ActionKind, ParsedDirectives, ToolInvocation,
};
pub use dispatcher::{ToolDispatcher, ToolOutcome};
pub use registry::{find_tool, tool_cache_key, ParamSpec, RoleGate, ToolSpec, TOOL_SPECS};
