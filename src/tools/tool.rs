//! The tool seam between the runtime and this crate.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::arguments::ToolArguments;
use super::types::{ToolDescriptor, ToolSchema};
use crate::types::ToolResult;

/// Identifies the call a tool is running for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    pub session_id: Option<String>,
    pub tool_call_id: Option<String>,
}

/// A tool the runtime may call.
///
/// `execute` has no error channel: implementations report every failure as
/// an error [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// Bare tool name, as registered on its server.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> &ToolSchema;

    async fn execute(&self, args: &ToolArguments, ctx: &CallContext) -> ToolResult;

    /// Listing entry under the given qualified name.
    fn descriptor(&self, qualified_name: String) -> ToolDescriptor {
        ToolDescriptor {
            name: qualified_name,
            description: self.description().to_string(),
            input_schema: self.input_schema().clone(),
        }
    }
}

type Handler = dyn Fn(ToolArguments, CallContext) -> BoxFuture<'static, ToolResult> + Send + Sync;

/// A tool backed by an async closure.
#[derive(Clone)]
pub struct FnTool {
    name: String,
    description: String,
    schema: ToolSchema,
    handler: Arc<Handler>,
}

impl FnTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(&self, args: &ToolArguments, ctx: &CallContext) -> ToolResult {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo() -> FnTool {
        FnTool::new(
            "echo",
            "Echo the message",
            ToolSchema::object()
                .required_string("message", "Text to echo")
                .build(),
            |args, ctx| async move {
                match args.required_str("message") {
                    Ok(message) => ToolResult::text(format!(
                        "{}: {message}",
                        ctx.session_id.as_deref().unwrap_or("-")
                    )),
                    Err(e) => ToolResult::error(e.to_string()),
                }
            },
        )
    }

    #[tokio::test]
    async fn closure_tool_sees_input_and_context() {
        let ctx = CallContext {
            session_id: Some("s-1".into()),
            tool_call_id: None,
        };
        let ok = echo()
            .execute(&ToolArguments::new(json!({"message": "hi"})), &ctx)
            .await;
        assert_eq!(ok, ToolResult::text("s-1: hi"));

        let missing = echo().execute(&ToolArguments::new(json!({})), &ctx).await;
        assert!(missing.is_error);
    }

    #[test]
    fn descriptor_carries_schema() {
        let descriptor = echo().descriptor("mcp__srv__echo".into());
        assert_eq!(descriptor.name, "mcp__srv__echo");
        assert_eq!(descriptor.input_schema.required(), ["message"]);
    }
}
