//! Session event stream types.
//!
//! These mirror the JSON messages an agent runtime emits while a session is
//! running. Every level is a closed, serde-tagged enum so the dispatcher's
//! `match` arms are checked for completeness; unknown upstream kinds land in
//! an explicit `Unknown`/`Other` variant instead of failing deserialization.

use serde::{Deserialize, Serialize};

use super::usage::Usage;

/// One message from the runtime's session event sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    System(SystemEvent),
    Assistant {
        message: AssistantMessage,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
    #[serde(rename = "stream_event")]
    Stream {
        event: StreamEvent,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
    Result(ResultEvent),
    #[serde(other)]
    Unknown,
}

impl SessionEvent {
    /// Wrap a stream sub-event.
    pub fn stream(event: StreamEvent) -> Self {
        Self::Stream {
            event,
            session_id: None,
        }
    }

    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}

/// `system` messages, discriminated by `subtype`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "snake_case")]
pub enum SystemEvent {
    Init(SessionInit),
    CompactBoundary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        compact_metadata: Option<serde_json::Value>,
    },
    #[serde(other)]
    Other,
}

/// Metadata announced by the runtime when a session starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInit {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub mcp_servers: Vec<McpServerStatus>,
}

/// A tool server as reported in the init message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A completed assistant turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<AssistantContent>,
}

impl AssistantMessage {
    /// Tool calls requested in this turn, in order.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &serde_json::Value)> {
        self.content.iter().filter_map(|block| match block {
            AssistantContent::ToolUse { id, name, input } => {
                Some((id.as_str(), name.as_str(), input))
            }
            _ => None,
        })
    }
}

/// Content of an assembled assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantContent {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    Thinking {
        thinking: String,
    },
    #[serde(other)]
    Other,
}

/// Partial-message events nested inside `stream_event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    MessageStart {
        #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
        message: serde_json::Value,
    },
    ContentBlockStart {
        #[serde(default)]
        index: usize,
        content_block: BlockHeader,
    },
    ContentBlockDelta {
        #[serde(default)]
        index: usize,
        delta: BlockDelta,
    },
    ContentBlockStop {
        #[serde(default)]
        index: usize,
    },
    MessageDelta {
        #[serde(default)]
        delta: MessageDeltaBody,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
    },
    MessageStop,
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// `content_block_start` for a block of the given kind.
    pub fn block_start(kind: BlockKind) -> Self {
        Self::ContentBlockStart {
            index: 0,
            content_block: BlockHeader {
                kind,
                ..Default::default()
            },
        }
    }

    /// `content_block_delta` carrying a text fragment.
    pub fn text_delta(text: impl Into<String>) -> Self {
        Self::ContentBlockDelta {
            index: 0,
            delta: BlockDelta {
                kind: Some("text_delta".into()),
                text: Some(text.into()),
                ..Default::default()
            },
        }
    }

    /// `content_block_delta` carrying a reasoning fragment.
    pub fn thinking_delta(thinking: impl Into<String>) -> Self {
        Self::ContentBlockDelta {
            index: 0,
            delta: BlockDelta {
                kind: Some("thinking_delta".into()),
                thinking: Some(thinking.into()),
                ..Default::default()
            },
        }
    }

    /// `content_block_stop`.
    pub fn block_stop() -> Self {
        Self::ContentBlockStop { index: 0 }
    }
}

/// Kind of a content block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Text,
    ToolUse,
    Thinking,
    #[serde(other)]
    Other,
}

/// The `content_block` object of a `content_block_start` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Incremental fragment of an open block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDelta {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_json: Option<String>,
}

/// Top-level message changes reported in `message_delta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDeltaBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
}

/// Terminal `result` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
    pub subtype: ResultSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Everything else the runtime attached, kept for failure diagnostics.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResultEvent {
    pub fn success(duration_ms: u64, total_cost_usd: f64, num_turns: u32) -> Self {
        Self {
            subtype: ResultSubtype::Success,
            duration_ms: Some(duration_ms),
            total_cost_usd: Some(total_cost_usd),
            num_turns: Some(num_turns),
            session_id: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn failure(subtype: impl Into<String>) -> Self {
        Self {
            subtype: ResultSubtype::Failure(subtype.into()),
            duration_ms: None,
            total_cost_usd: None,
            num_turns: None,
            session_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// `success`, or any other subtype string meaning failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultSubtype {
    Success,
    Failure(String),
}

impl ResultSubtype {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure(kind) => kind,
        }
    }
}

impl From<String> for ResultSubtype {
    fn from(value: String) -> Self {
        if value == "success" {
            Self::Success
        } else {
            Self::Failure(value)
        }
    }
}

impl From<ResultSubtype> for String {
    fn from(value: ResultSubtype) -> Self {
        match value {
            ResultSubtype::Success => "success".to_string(),
            ResultSubtype::Failure(kind) => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_init_message() {
        let event: SessionEvent = serde_json::from_value(json!({
            "type": "system",
            "subtype": "init",
            "session_id": "abc",
            "model": "claude-sonnet-4-5",
            "cwd": "/tmp/briefs",
            "tools": ["mcp__news-briefing-server__jinaReader"],
            "mcp_servers": [{"name": "news-briefing-server", "status": "connected"}]
        }))
        .unwrap();

        let SessionEvent::System(SystemEvent::Init(init)) = event else {
            panic!("expected init, got {event:?}");
        };
        assert_eq!(init.session_id, "abc");
        assert_eq!(init.mcp_servers[0].name, "news-briefing-server");
    }

    #[test]
    fn parses_stream_delta_with_thinking() {
        let event: SessionEvent = serde_json::from_value(json!({
            "type": "stream_event",
            "event": {
                "type": "content_block_delta",
                "index": 1,
                "delta": {"type": "thinking_delta", "thinking": "hmm"}
            }
        }))
        .unwrap();

        match event {
            SessionEvent::Stream {
                event: StreamEvent::ContentBlockDelta { index, delta },
                ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(delta.thinking.as_deref(), Some("hmm"));
                assert!(delta.text.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn message_delta_with_null_token_counts() {
        let event: SessionEvent = serde_json::from_value(json!({
            "type": "stream_event",
            "event": {
                "type": "message_delta",
                "delta": {"stop_reason": "end_turn"},
                "usage": {"input_tokens": null, "output_tokens": 42}
            }
        }))
        .unwrap();

        match event {
            SessionEvent::Stream {
                event: StreamEvent::MessageDelta { usage: Some(usage), .. },
                ..
            } => {
                assert_eq!(usage.input_tokens, 0);
                assert_eq!(usage.output_tokens, 42);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_kinds_do_not_fail() {
        let top: SessionEvent =
            serde_json::from_value(json!({"type": "user", "message": {}})).unwrap();
        assert_eq!(top, SessionEvent::Unknown);

        let inner: StreamEvent =
            serde_json::from_value(json!({"type": "ping"})).unwrap();
        assert_eq!(inner, StreamEvent::Unknown);

        let header: BlockHeader =
            serde_json::from_value(json!({"type": "server_tool_use"})).unwrap();
        assert_eq!(header.kind, BlockKind::Other);
    }

    #[test]
    fn failure_result_keeps_diagnostics() {
        let event: SessionEvent = serde_json::from_value(json!({
            "type": "result",
            "subtype": "error_max_turns",
            "num_turns": 12,
            "errors": ["turn limit reached"]
        }))
        .unwrap();

        let SessionEvent::Result(result) = event else {
            panic!("expected result");
        };
        assert_eq!(
            result.subtype,
            ResultSubtype::Failure("error_max_turns".into())
        );
        assert_eq!(result.num_turns, Some(12));
        assert_eq!(result.extra["errors"][0], "turn limit reached");
        assert!(!result.extra.contains_key("type"));
    }

    #[test]
    fn assistant_tool_uses_in_order() {
        let message: AssistantMessage = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "Fetching"},
                {"type": "tool_use", "id": "t1", "name": "a", "input": {"url": "https://a"}},
                {"type": "tool_use", "id": "t2", "name": "b", "input": {}}
            ]
        }))
        .unwrap();

        let names: Vec<_> = message.tool_uses().map(|(_, name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
