//! Convenience re-exports for common use.

pub use crate::config::BriefConfig;
pub use crate::error::{BriefError, Result};
pub use crate::hooks::{HookDecision, HookHandler, HookInput, HookPhase, HookPipeline};
pub use crate::runtime::{AgentRuntime, EventStream, ReplayRuntime, SessionRequest};
pub use crate::session::{
    ConsoleSink, EventDispatcher, Notice, OutputSink, SessionOutcome, ToolCall, ToolGateway,
};
pub use crate::tools::{FetchTool, FnTool, Tool, ToolArguments, ToolSchema, Toolset};
pub use crate::types::{SessionEvent, StreamEvent, ToolResult, Usage};
