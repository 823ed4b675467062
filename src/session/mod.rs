//! Session event processing: block tracking, delta throttling, hook-gated
//! tool calls, and result reporting.

pub mod blocks;
pub mod context;
pub mod dispatcher;
pub mod gateway;
pub mod report;
pub mod sink;
pub mod throttle;

pub use blocks::{BlockState, ContentBlockTracker};
pub use context::SessionContext;
pub use dispatcher::{EventDispatcher, SessionOutcome};
pub use gateway::{ToolCall, ToolGateway, RESULT_WITHHELD_PREFIX, TOOL_DENIED_PREFIX};
pub use report::{summarize, ResultReport};
pub use sink::{ConsoleSink, Notice, OutputSink};
pub use throttle::{DebugThrottle, ThrottleTick, TickReason, DELTA_BATCH, DELTA_LOG_INTERVAL};
