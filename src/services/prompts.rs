//! System Prompt Builder
//!
//! Builds the system prompts that teach the completion backend the directive
//! contract: which tools exist for the user's role, how to request one, and
//! how to propose a UI action.

use timeclerk_core::Role;
use timeclerk_tools::registry::{RoleGate, ToolSpec, TOOL_SPECS};

/// Build the system prompt for the first backend call of a turn.
///
/// Only tools the role passes are listed; the model is steered away from
/// gated tools it cannot use, though dispatch enforces the gate regardless.
pub fn build_system_prompt(role: Role) -> String {
    let tool_list = TOOL_SPECS
        .iter()
        .filter(|spec| spec.gate.allows(role))
        .map(describe_tool)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are TimeClerk's assistant. You help employees with their timesheets, tasks, leave, and attendance. You answer questions using the data tools below; you never invent numbers.

## Available Tools
{tool_list}

## Requesting a Tool
When you need data, emit exactly one fenced block and nothing else after it:

```tool_call
{{"tool": "<toolName>", "params": {{"<param>": "<value>"}}}}
```

Omit "params" when the tool takes none. You may request at most one tool per reply. After the tool result arrives you will be asked to summarize it for the user.

## Proposing a UI Action
When the user asks to go somewhere or open something in the app, append one fenced block:

```ui_action
{{"action": "navigate", "target": "<view>"}}
```

Action kinds: "navigate" (field "target"), "click" (field "element"), "scroll" (field "element"), "open_modal" (field "modal"). At most one per reply, and only when the user explicitly asked for it.

## Style
Be concise and friendly. Answer directly when no tool is needed. If asked about data you have no tool for, say so instead of guessing."#
    )
}

/// Build the system prompt for the summarization call after a tool ran.
pub fn build_summarize_prompt(role: Role, tool_name: &str) -> String {
    format!(
        r#"You are TimeClerk's assistant, replying to a {role} user. The data below is the result of the {tool_name} tool, fetched for their question. Summarize it in plain language: lead with the answer, keep numbers exact, and keep it short. Do not request another tool. If the result says the data is unavailable, apologize briefly and suggest trying again."#,
        role = role.as_str(),
    )
}

fn describe_tool(spec: &ToolSpec) -> String {
    let params = if spec.params.is_empty() {
        String::new()
    } else {
        let list = spec
            .params
            .iter()
            .map(|p| {
                let req = if p.required { "required" } else { "optional" };
                format!("{} ({req}): {}", p.name, p.description)
            })
            .collect::<Vec<_>>()
            .join("; ");
        format!(" Params: {list}.")
    };
    let gate = match spec.gate {
        RoleGate::Any => "",
        RoleGate::Manager => " [managers]",
        RoleGate::Admin => " [admins]",
    };
    format!("- **{}**{gate}: {}.{params}", spec.name, spec.description)
}
