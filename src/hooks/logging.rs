//! Built-in diagnostic handlers.
//!
//! They never deny. Fetch-tool calls get URL-focused log lines; any other
//! tool gets its raw input pretty-printed.

use std::sync::Arc;

use async_trait::async_trait;

use super::{HookDecision, HookHandler, HookInput, HookPhase, HookPipeline};
use crate::error::{BriefError, Result};

/// Logs session start and end.
#[derive(Debug, Default)]
pub struct SessionLogger;

#[async_trait]
impl HookHandler for SessionLogger {
    fn name(&self) -> &str {
        "session-logger"
    }

    async fn handle(&self, input: &HookInput) -> Result<HookDecision> {
        match input {
            HookInput::SessionStart { session_id } => {
                tracing::info!(session_id = %session_id, "briefing session started");
            }
            HookInput::SessionEnd { session_id } => {
                tracing::info!(session_id = %session_id, "briefing session ended");
            }
            _ => {}
        }
        Ok(HookDecision::Continue)
    }
}

/// Logs every tool call before and after it runs.
#[derive(Debug)]
pub struct ToolCallLogger {
    fetch_tool: regex::Regex,
}

impl ToolCallLogger {
    /// `fetch_tool_name` is the bare name; qualified names ending in
    /// `_{name}` are recognized too.
    pub fn new(fetch_tool_name: &str) -> Result<Self> {
        let pattern = format!("(^|_){}$", regex::escape(fetch_tool_name));
        let fetch_tool = regex::Regex::new(&pattern)
            .map_err(|e| BriefError::Configuration(format!("invalid tool name pattern: {e}")))?;
        Ok(Self { fetch_tool })
    }

    fn is_fetch(&self, tool_name: &str) -> bool {
        self.fetch_tool.is_match(tool_name)
    }
}

#[async_trait]
impl HookHandler for ToolCallLogger {
    fn name(&self) -> &str {
        "tool-call-logger"
    }

    async fn handle(&self, input: &HookInput) -> Result<HookDecision> {
        match input {
            HookInput::PreToolCall {
                tool_name,
                tool_input,
                ..
            } => {
                tracing::info!(tool_name = %tool_name, "calling tool");
                if self.is_fetch(tool_name) {
                    let url = tool_input.get("url").and_then(|u| u.as_str()).unwrap_or("");
                    tracing::info!(tool_name = %tool_name, url, "fetching page");
                } else {
                    let pretty = serde_json::to_string_pretty(tool_input)?;
                    tracing::info!(tool_name = %tool_name, input = %pretty, "tool input");
                }
            }
            HookInput::PostToolCall {
                tool_name,
                tool_input,
                tool_output,
                ..
            } => {
                tracing::info!(
                    tool_name = %tool_name,
                    is_error = tool_output.is_error,
                    "tool call finished"
                );
                if self.is_fetch(tool_name) && !tool_output.is_error {
                    let url = tool_input.get("url").and_then(|u| u.as_str()).unwrap_or("");
                    tracing::info!(tool_name = %tool_name, url, "page fetched");
                }
            }
            _ => {}
        }
        Ok(HookDecision::Continue)
    }
}

/// Register the standard logging handlers on all four phases.
pub fn register_defaults(pipeline: &mut HookPipeline, fetch_tool_name: &str) -> Result<()> {
    let session: Arc<dyn HookHandler> = Arc::new(SessionLogger);
    let tools: Arc<dyn HookHandler> = Arc::new(ToolCallLogger::new(fetch_tool_name)?);
    pipeline
        .register(HookPhase::SessionStart, session.clone())
        .register(HookPhase::PreToolCall, tools.clone())
        .register(HookPhase::PostToolCall, tools)
        .register(HookPhase::SessionEnd, session);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolResult;

    #[test]
    fn recognizes_bare_and_qualified_fetch_names() {
        let logger = ToolCallLogger::new("jinaReader").unwrap();
        assert!(logger.is_fetch("jinaReader"));
        assert!(logger.is_fetch("mcp__news-briefing-server__jinaReader"));
        assert!(!logger.is_fetch("mcp__news-briefing-server__jinaReaderX"));
        assert!(!logger.is_fetch("WebFetch"));
    }

    #[tokio::test]
    async fn defaults_cover_every_phase_and_continue() {
        let mut pipeline = HookPipeline::new();
        register_defaults(&mut pipeline, "jinaReader").unwrap();

        let inputs = [
            HookInput::SessionStart {
                session_id: "s".into(),
            },
            HookInput::PreToolCall {
                session_id: "s".into(),
                tool_name: "other".into(),
                tool_input: serde_json::json!({"q": 1}),
            },
            HookInput::PostToolCall {
                session_id: "s".into(),
                tool_name: "jinaReader".into(),
                tool_input: serde_json::json!({"url": "https://a"}),
                tool_output: ToolResult::text("# A"),
            },
            HookInput::SessionEnd {
                session_id: "s".into(),
            },
        ];
        for input in &inputs {
            let verdict = pipeline.run(input).await;
            assert!(verdict.is_continue());
            assert_eq!(verdict.handlers_run, 1);
        }
    }
}
