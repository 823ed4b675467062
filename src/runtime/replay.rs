//! Transcript-driven runtime.
//!
//! Replays a newline-delimited JSON transcript of session events. Tool calls
//! found in `assistant` messages are executed through the session's gateway
//! before the message is yielded, so hooks and tools run exactly as they
//! would under a live runtime.

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

use crate::error::{BriefError, Result};
use crate::session::ToolCall;
use crate::types::{SessionEvent, SystemEvent};

use super::{AgentRuntime, EventStream, SessionRequest};

const RESULT_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Inline(String),
}

/// Runtime that replays a recorded session.
#[derive(Debug, Clone)]
pub struct ReplayRuntime {
    source: Source,
}

impl ReplayRuntime {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    pub fn from_ndjson(transcript: impl Into<String>) -> Self {
        Self {
            source: Source::Inline(transcript.into()),
        }
    }

    async fn open(&self) -> Result<Box<dyn AsyncBufRead + Send + Unpin>> {
        Ok(match &self.source {
            Source::File(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    BriefError::Configuration(format!(
                        "cannot open transcript {}: {e}",
                        path.display()
                    ))
                })?;
                Box::new(BufReader::new(file))
            }
            Source::Inline(text) => Box::new(Cursor::new(text.clone().into_bytes())),
        })
    }
}

#[async_trait]
impl AgentRuntime for ReplayRuntime {
    async fn start(&self, request: SessionRequest) -> Result<EventStream> {
        let reader = self.open().await?;
        tracing::debug!(
            cwd = %request.cwd.display(),
            allowed = ?request.allowed_tools(),
            disallowed = ?request.disallowed_tools(),
            env_keys = ?request.env.keys().collect::<Vec<_>>(),
            system_prompt_chars = request.system_prompt.as_deref().map_or(0, |p| p.chars().count()),
            include_partial_messages = request.include_partial_messages,
            "replaying session transcript"
        );
        tracing::debug!(prompt = %request.prompt, "session prompt");
        let gateway = request.gateway;

        let stream = async_stream::stream! {
            let mut lines = LinesStream::new(reader.lines());
            let mut session_id = String::new();
            let mut line_no = 0usize;
            while let Some(line) = lines.next().await {
                line_no += 1;
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(BriefError::from(e));
                        return;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let mut event: SessionEvent = match serde_json::from_str(&line) {
                    Ok(event) => event,
                    Err(e) => {
                        yield Err(BriefError::stream(format!("transcript line {line_no}: {e}")));
                        return;
                    }
                };

                match &mut event {
                    SessionEvent::System(SystemEvent::Init(init)) => {
                        if init.session_id.is_empty() {
                            init.session_id = uuid::Uuid::new_v4().to_string();
                        }
                        session_id = init.session_id.clone();
                    }
                    SessionEvent::Assistant { message, .. } => {
                        for (id, name, input) in message.tool_uses() {
                            let call = ToolCall {
                                id: id.to_string(),
                                name: name.to_string(),
                                input: input.clone(),
                            };
                            let result = gateway.call_tool(&session_id, &call).await;
                            let chars = result.text_content().chars().count();
                            let preview = result.preview(RESULT_PREVIEW_CHARS);
                            if result.is_error {
                                tracing::warn!(
                                    tool_call_id = id,
                                    tool_name = name,
                                    error = %preview,
                                    "replayed tool call failed"
                                );
                            } else {
                                tracing::info!(
                                    tool_call_id = id,
                                    tool_name = name,
                                    chars,
                                    preview = %preview,
                                    "replayed tool call"
                                );
                            }
                        }
                    }
                    _ => {}
                }
                yield Ok(event);
            }
        };
        Ok(Box::pin(stream))
    }
}
