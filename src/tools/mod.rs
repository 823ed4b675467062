//! Tools exposed to the runtime.

pub mod arguments;
pub mod fetch;
pub mod tool;
pub mod toolset;
pub mod types;

pub use arguments::ToolArguments;
pub use fetch::{FetchTool, FETCH_FAILURE_PREFIX, TRUNCATION_MARKER};
pub use tool::{CallContext, FnTool, Tool};
pub use toolset::Toolset;
pub use types::{SchemaBuilder, ToolDescriptor, ToolSchema};
