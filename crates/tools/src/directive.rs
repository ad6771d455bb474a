//! Directive Parser
//!
//! Extracts machine-actionable directives out of free-form completion text.
//! The model is taught (via the system prompt) to emit fenced blocks: a
//! `tool_call` fence holding `{"tool": <name>, "params": {...}}` and a
//! `ui_action` fence holding `{"action": <kind>, "target"|"element"|"modal":
//! <string>}`.
//!
//! The producer is a generative model, so nothing about the format is
//! guaranteed. Parsing honors at most the first well-formed occurrence of
//! each marker type, skips malformed payloads silently (logged at debug),
//! and never fails. Honored blocks are stripped from the residual text;
//! malformed blocks are left untouched. Stateless per call.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fence marker opening a tool-invocation directive
pub const TOOL_CALL_FENCE: &str = "```tool_call";
/// Fence marker opening a UI-action directive
pub const UI_ACTION_FENCE: &str = "```ui_action";

const FENCE_CLOSE: &str = "```";

/// A tool invocation parsed from completion text.
///
/// Only the directive parser constructs these; the dispatcher consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Wire name of the tool (validated against the registry at dispatch)
    pub tool: String,
    /// Scalar parameters; absent means empty
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// The four UI action kinds the client executor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    Click,
    Scroll,
    OpenModal,
}

/// A candidate UI action command.
///
/// Untrusted until it has passed the action gate; a command that fails
/// validation is discarded, never forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCommand {
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<String>,
}

impl ActionCommand {
    /// The identifier field this action kind operates on.
    pub fn subject(&self) -> Option<&str> {
        match self.action {
            ActionKind::Navigate => self.target.as_deref(),
            ActionKind::Click | ActionKind::Scroll => self.element.as_deref(),
            ActionKind::OpenModal => self.modal.as_deref(),
        }
    }
}

/// Outcome of one parsing pass over a completion.
#[derive(Debug, Clone)]
pub struct ParsedDirectives {
    /// At most one tool invocation
    pub tool_call: Option<ToolInvocation>,
    /// At most one action candidate (unvalidated)
    pub action: Option<ActionCommand>,
    /// Human-readable text with honored directive blocks stripped
    pub text: String,
}

/// Parse directives out of raw completion text.
pub fn parse_directives(raw: &str) -> ParsedDirectives {
    let tool = extract_first::<ToolInvocation>(raw, TOOL_CALL_FENCE);
    let action = extract_first::<ActionCommand>(raw, UI_ACTION_FENCE);

    let mut ranges: Vec<std::ops::Range<usize>> = Vec::new();
    if let Some((_, range)) = &tool {
        ranges.push(range.clone());
    }
    if let Some((_, range)) = &action {
        ranges.push(range.clone());
    }
    // Strip from the back so earlier offsets stay valid; clamp against the
    // previous start in case the two blocks share a closing fence
    ranges.sort_by_key(|r| std::cmp::Reverse(r.start));

    let mut text = raw.to_string();
    let mut min_start = text.len();
    for range in ranges {
        let end = range.end.min(min_start);
        if range.start < end {
            text.replace_range(range.start..end, "");
            min_start = range.start;
        }
    }
    let text = tidy_residual(&text);

    ParsedDirectives {
        tool_call: tool.map(|(value, _)| value),
        action: action.map(|(value, _)| value),
        text,
    }
}

/// Scan for `fence`, returning the first payload that deserializes cleanly
/// together with the byte range of its whole block (fences included).
///
/// Malformed payloads are skipped and scanning continues past them.
fn extract_first<T: DeserializeOwned>(
    text: &str,
    fence: &str,
) -> Option<(T, std::ops::Range<usize>)> {
    let mut search = 0;
    while let Some(rel) = text[search..].find(fence) {
        let start = search + rel;
        let content_start = start + fence.len();
        let Some(close_rel) = text[content_start..].find(FENCE_CLOSE) else {
            // Unclosed fence: nothing parseable beyond this point
            break;
        };
        let content = text[content_start..content_start + close_rel].trim();
        let block_end = content_start + close_rel + FENCE_CLOSE.len();

        match serde_json::from_str::<T>(content) {
            Ok(value) => return Some((value, start..block_end)),
            Err(err) => {
                tracing::debug!(marker = fence, error = %err, "skipping malformed directive");
                search = block_end;
            }
        }
    }
    None
}

/// Collapse the whitespace holes left behind by stripped blocks.
fn tidy_residual(text: &str) -> String {
    let mut cleaned = text.to_string();
    while cleaned.contains("\n\n\n") {
        cleaned = cleaned.replace("\n\n\n", "\n\n");
    }
    cleaned.trim().to_string()
}
