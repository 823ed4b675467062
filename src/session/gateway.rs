//! Hook-gated tool invocation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hooks::{HookInput, HookPipeline};
use crate::tools::{CallContext, ToolArguments, Toolset};
use crate::types::ToolResult;

/// Prefix of the error result returned when `pre-tool-call` denies a call.
pub const TOOL_DENIED_PREFIX: &str = "Tool call denied: ";

/// Prefix of the error result returned when `post-tool-call` denies a result.
pub const RESULT_WITHHELD_PREFIX: &str = "Tool result withheld: ";

/// One tool call attempted by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: serde_json::Value,
}

/// The path every runtime tool call takes:
/// `pre-tool-call` hooks, then the tool, then `post-tool-call` hooks.
#[derive(Clone)]
pub struct ToolGateway {
    toolset: Arc<Toolset>,
    hooks: Arc<HookPipeline>,
}

impl ToolGateway {
    pub fn new(toolset: Arc<Toolset>, hooks: Arc<HookPipeline>) -> Self {
        Self { toolset, hooks }
    }

    pub fn toolset(&self) -> &Toolset {
        &self.toolset
    }

    pub fn hooks(&self) -> &Arc<HookPipeline> {
        &self.hooks
    }

    /// Resolve one call to a result. Never fails.
    pub async fn call_tool(&self, session_id: &str, call: &ToolCall) -> ToolResult {
        let pre = self
            .hooks
            .run(&HookInput::PreToolCall {
                session_id: session_id.to_string(),
                tool_name: call.name.clone(),
                tool_input: call.input.clone(),
            })
            .await;
        if !pre.is_continue() {
            let reason = pre.reason().unwrap_or_default();
            return ToolResult::error(format!("{TOOL_DENIED_PREFIX}{reason}"));
        }

        let result = match self.toolset.resolve(&call.name) {
            Some(tool) => {
                let ctx = CallContext {
                    session_id: Some(session_id.to_string()),
                    tool_call_id: (!call.id.is_empty()).then(|| call.id.clone()),
                };
                tool.execute(&ToolArguments::new(call.input.clone()), &ctx)
                    .await
            }
            None => {
                tracing::warn!(
                    session_id,
                    tool_name = %call.name,
                    "tool call for unavailable tool"
                );
                ToolResult::error(format!(
                    "Tool '{}' is not available in this session",
                    call.name
                ))
            }
        };

        let post = self
            .hooks
            .run(&HookInput::PostToolCall {
                session_id: session_id.to_string(),
                tool_name: call.name.clone(),
                tool_input: call.input.clone(),
                tool_output: result.clone(),
            })
            .await;
        if !post.is_continue() {
            let reason = post.reason().unwrap_or_default();
            return ToolResult::error(format!("{RESULT_WITHHELD_PREFIX}{reason}"));
        }
        result
    }
}

impl std::fmt::Debug for ToolGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolGateway")
            .field("toolset", &self.toolset)
            .field("hooks", &self.hooks)
            .finish()
    }
}
