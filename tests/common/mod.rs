//! Shared test helpers: recording sink, recording hooks, event builders.
#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;
use tracing_subscriber::fmt::MakeWriter;

use newsbrief::error::Result;
use newsbrief::hooks::{HookDecision, HookHandler, HookInput, HookPhase};
use newsbrief::runtime::EventStream;
use newsbrief::session::{Notice, OutputSink};
use newsbrief::types::*;

/// Sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub fragments: Vec<String>,
    pub notices: Vec<Notice>,
}

impl RecordingSink {
    /// All fragments concatenated in write order.
    pub fn output(&self) -> String {
        self.fragments.concat()
    }
}

impl OutputSink for RecordingSink {
    fn write_fragment(&mut self, text: &str) -> io::Result<()> {
        self.fragments.push(text.to_string());
        Ok(())
    }

    fn render(&mut self, notice: &Notice) -> io::Result<()> {
        self.notices.push(notice.clone());
        Ok(())
    }
}

/// Collects formatted log lines emitted while its guard is held.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route debug-and-above events on this thread into the capture.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Sink whose every write fails.
#[derive(Debug, Default)]
pub struct BrokenSink;

impl OutputSink for BrokenSink {
    fn write_fragment(&mut self, _text: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn render(&mut self, _notice: &Notice) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

/// One observed hook invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct HookCall {
    pub handler: String,
    pub phase: HookPhase,
    pub session_id: String,
    pub tool_name: Option<String>,
}

pub type HookLog = Arc<Mutex<Vec<HookCall>>>;

/// Handler that records each call and answers with a fixed decision.
pub struct RecordingHook {
    name: String,
    decision: HookDecision,
    log: HookLog,
}

impl RecordingHook {
    pub fn new(name: &str, decision: HookDecision, log: &HookLog) -> Arc<dyn HookHandler> {
        Arc::new(Self {
            name: name.to_string(),
            decision,
            log: log.clone(),
        })
    }

    pub fn continuing(name: &str, log: &HookLog) -> Arc<dyn HookHandler> {
        Self::new(name, HookDecision::Continue, log)
    }
}

#[async_trait]
impl HookHandler for RecordingHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, input: &HookInput) -> Result<HookDecision> {
        self.log.lock().unwrap().push(HookCall {
            handler: self.name.clone(),
            phase: input.phase(),
            session_id: input.session_id().to_string(),
            tool_name: input.tool_name().map(str::to_string),
        });
        Ok(self.decision.clone())
    }
}

pub fn new_log() -> HookLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn phases(log: &HookLog) -> Vec<HookPhase> {
    log.lock().unwrap().iter().map(|call| call.phase).collect()
}

// Event builders

pub fn init(session_id: &str) -> SessionEvent {
    SessionEvent::System(SystemEvent::Init(SessionInit {
        session_id: session_id.to_string(),
        model: "test-model".to_string(),
        cwd: "/tmp".to_string(),
        tools: vec!["mcp__news-briefing-server__jinaReader".to_string()],
        mcp_servers: vec![McpServerStatus {
            name: "news-briefing-server".to_string(),
            status: Some("connected".to_string()),
        }],
    }))
}

pub fn start(kind: BlockKind) -> SessionEvent {
    SessionEvent::stream(StreamEvent::block_start(kind))
}

pub fn text(text: &str) -> SessionEvent {
    SessionEvent::stream(StreamEvent::text_delta(text))
}

pub fn thinking(text: &str) -> SessionEvent {
    SessionEvent::stream(StreamEvent::thinking_delta(text))
}

pub fn stop() -> SessionEvent {
    SessionEvent::stream(StreamEvent::block_stop())
}

pub fn success(duration_ms: u64, cost: f64, turns: u32) -> SessionEvent {
    SessionEvent::Result(ResultEvent::success(duration_ms, cost, turns))
}

/// Stream that yields `events` in order.
pub fn events(events: Vec<SessionEvent>) -> EventStream {
    Box::pin(stream::iter(events.into_iter().map(Ok)))
}

/// Stream that yields arbitrary items, errors included.
pub fn items(items: Vec<Result<SessionEvent>>) -> EventStream {
    Box::pin(stream::iter(items))
}
