//! The seam to the external agent runtime.
//!
//! The runtime plans turns, picks models, and decides which tools to call;
//! this crate only hands it a [`SessionRequest`] and consumes the event
//! stream it returns. Runtimes route every tool call through the request's
//! [`ToolGateway`].

pub mod prompt;
pub mod replay;

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use bon::Builder;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::session::ToolGateway;
use crate::types::SessionEvent;

pub use prompt::{briefing_prompt, system_prompt};
pub use replay::ReplayRuntime;

/// The ordered event sequence of one session.
pub type EventStream = BoxStream<'static, Result<SessionEvent>>;

/// Everything the runtime needs to start a session.
#[derive(Debug, Clone, Builder)]
pub struct SessionRequest {
    #[builder(into)]
    pub prompt: String,
    #[builder(into)]
    pub system_prompt: Option<String>,
    #[builder(into)]
    pub cwd: PathBuf,
    /// Opaque to this crate; passed through to the runtime.
    #[builder(default)]
    pub env: BTreeMap<String, String>,
    pub gateway: ToolGateway,
    /// Ask for `stream_event` partial messages.
    #[builder(default = true)]
    pub include_partial_messages: bool,
}

impl SessionRequest {
    /// Runtime built-ins the session must not use.
    pub fn disallowed_tools(&self) -> &[String] {
        self.gateway.toolset().disallowed()
    }

    /// Tool names the runtime may call.
    pub fn allowed_tools(&self) -> Vec<String> {
        self.gateway.toolset().declared_tool_names()
    }
}

/// An agent runtime that can run one session per call.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn start(&self, request: SessionRequest) -> Result<EventStream>;
}
