//! Top-level consumer of a session's event stream.

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;

use crate::error::{BriefError, Result};
use crate::hooks::{HookInput, HookPhase, HookPipeline};
use crate::runtime::EventStream;
use crate::types::{
    AssistantMessage, BlockHeader, BlockKind, ResultEvent, SessionEvent, SessionInit, StreamEvent,
    SystemEvent,
};

use super::context::SessionContext;
use super::report::{summarize, ResultReport};
use super::sink::{Notice, OutputSink};
use super::throttle::TickReason;

/// How a session's event stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Succeeded(ResultReport),
    Failed(ResultReport),
    /// The stream ended without a `result` event.
    Exhausted,
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Routes session events to the block tracker, throttle, hooks and sink.
pub struct EventDispatcher<S: OutputSink> {
    ctx: SessionContext,
    hooks: Arc<HookPipeline>,
    sink: S,
}

impl<S: OutputSink> EventDispatcher<S> {
    pub fn new(hooks: Arc<HookPipeline>, sink: S, debug: bool) -> Self {
        Self {
            ctx: SessionContext::new(debug),
            hooks,
            sink,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Pull events until a terminal `result` or the end of the stream.
    ///
    /// A stream error (or a `session-start` deny) releases open block state,
    /// runs `session-end`, and is returned. No retry.
    pub async fn run(&mut self, mut events: EventStream) -> Result<SessionOutcome> {
        let outcome = loop {
            let Some(next) = events.next().await else {
                tracing::debug!(session_id = %self.ctx.session_label(), "event stream exhausted");
                break Ok(SessionOutcome::Exhausted);
            };
            let step = match next {
                Ok(event) => self.dispatch(event).await,
                Err(err) => Err(err),
            };
            match step {
                Ok(Some(outcome)) => break Ok(outcome),
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(
                        session_id = %self.ctx.session_label(),
                        error = %err,
                        "session aborted"
                    );
                    self.ctx.release();
                    break Err(err);
                }
            }
        };

        self.hooks
            .run(&HookInput::SessionEnd {
                session_id: self.ctx.session_label(),
            })
            .await;
        if self.ctx.debug() {
            tracing::debug!(
                session_id = %self.ctx.session_label(),
                elapsed_ms = self.ctx.elapsed_ms() as u64,
                input_tokens = self.ctx.usage.input_tokens,
                output_tokens = self.ctx.usage.output_tokens,
                "session closed"
            );
        }
        outcome
    }

    /// Handle one event; returns the outcome when the event is terminal.
    pub async fn dispatch(&mut self, event: SessionEvent) -> Result<Option<SessionOutcome>> {
        match event {
            SessionEvent::System(SystemEvent::Init(init)) => {
                self.on_init(init).await?;
            }
            SessionEvent::System(SystemEvent::CompactBoundary { compact_metadata }) => {
                tracing::info!(
                    session_id = %self.ctx.session_label(),
                    metadata = ?compact_metadata,
                    "history compacted by runtime"
                );
                self.render(&Notice::HistoryCompacted);
            }
            SessionEvent::System(SystemEvent::Other) => {
                tracing::debug!("ignoring unrecognized system event");
            }
            SessionEvent::Assistant { message, .. } => self.on_assistant(message),
            SessionEvent::Stream { event, .. } => self.on_stream(event),
            SessionEvent::Result(result) => return Ok(Some(self.on_result(&result))),
            SessionEvent::Unknown => {
                tracing::debug!("ignoring unrecognized session event");
            }
        }
        Ok(None)
    }

    async fn on_init(&mut self, init: SessionInit) -> Result<()> {
        self.ctx.begin(init.session_id.clone());
        tracing::info!(
            session_id = %init.session_id,
            model = %init.model,
            cwd = %init.cwd,
            tools = init.tools.len(),
            "session initialized"
        );
        let verdict = self
            .hooks
            .run(&HookInput::SessionStart {
                session_id: init.session_id.clone(),
            })
            .await;
        self.render(&Notice::SessionStarted(init));
        if !verdict.is_continue() {
            return Err(BriefError::SessionDenied {
                phase: HookPhase::SessionStart,
                reason: verdict.reason().unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn on_assistant(&mut self, message: AssistantMessage) {
        for (id, name, _) in message.tool_uses() {
            tracing::debug!(tool_call_id = id, tool_name = name, "assistant requested tool");
        }
        self.render(&Notice::AssistantTurn(message.content));
    }

    fn on_stream(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::ContentBlockStart { content_block, .. } => self.on_block_start(content_block),
            StreamEvent::ContentBlockDelta { delta, .. } => {
                if self.ctx.throttle.is_enabled() {
                    if let Some(tick) = self.ctx.throttle.on_delta(Instant::now()) {
                        tracing::debug!(
                            deltas = tick.deltas,
                            since_last_ms = tick.since_last.as_millis() as u64,
                            batch = matches!(tick.reason, TickReason::Batch),
                            "streaming deltas"
                        );
                    }
                }
                let Some(output) = self.ctx.tracker.delta(&delta) else {
                    tracing::trace!("delta with no open block");
                    return;
                };
                for fragment in output.fragments() {
                    if let Err(err) = self.sink.write_fragment(fragment) {
                        tracing::warn!(error = %err, "output sink write failed");
                    }
                }
            }
            StreamEvent::ContentBlockStop { .. } => match self.ctx.tracker.stop() {
                Some(closed) if closed.kind == BlockKind::Thinking && self.ctx.debug() => {
                    tracing::debug!(chars = closed.thinking.chars().count(), "thinking block closed");
                }
                Some(_) => {}
                None => tracing::trace!("stop with no open block"),
            },
            StreamEvent::MessageDelta { delta, usage } => {
                if let Some(usage) = &usage {
                    self.ctx.usage.merge(usage);
                }
                if self.ctx.debug() {
                    tracing::debug!(
                        stop_reason = delta.stop_reason.as_deref().unwrap_or("-"),
                        usage = ?usage,
                        "message delta"
                    );
                }
            }
            StreamEvent::MessageStart { .. } => {
                if self.ctx.debug() {
                    tracing::debug!("message start");
                }
            }
            StreamEvent::MessageStop => {
                if self.ctx.debug() {
                    tracing::debug!("message stop");
                }
            }
            StreamEvent::Unknown => tracing::trace!("ignoring unrecognized stream event"),
        }
    }

    fn on_block_start(&mut self, header: BlockHeader) {
        if let Some(dropped) = self.ctx.tracker.start(header.kind) {
            tracing::debug!(?dropped, "block started while another was open");
        }
        match header.kind {
            BlockKind::Thinking => self.render(&Notice::ThinkingStarted),
            BlockKind::ToolUse => {
                tracing::debug!(tool_name = header.name.as_deref().unwrap_or("-"), "tool use block");
            }
            BlockKind::Text | BlockKind::Other => {}
        }
    }

    fn on_result(&mut self, result: &ResultEvent) -> SessionOutcome {
        let report = summarize(result);
        if report.is_success() {
            self.render(&Notice::Completed(report.clone()));
            SessionOutcome::Succeeded(report)
        } else {
            tracing::warn!(subtype = report.subtype.as_str(), "session failed");
            self.render(&Notice::Failed(report.clone()));
            SessionOutcome::Failed(report)
        }
    }

    fn render(&mut self, notice: &Notice) {
        if let Err(err) = self.sink.render(notice) {
            tracing::warn!(error = %err, "output sink render failed");
        }
    }
}
