//! User-facing output.

use std::fmt;
use std::io::{self, Write};

use crate::types::{AssistantContent, SessionInit};

use super::report::ResultReport;

/// Line-oriented notices rendered between streamed fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    SessionStarted(SessionInit),
    HistoryCompacted,
    AssistantTurn(Vec<AssistantContent>),
    ThinkingStarted,
    Completed(ResultReport),
    Failed(ResultReport),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionStarted(init) => {
                let servers: Vec<&str> = init.mcp_servers.iter().map(|s| s.name.as_str()).collect();
                writeln!(f, "Session started, model: {}", init.model)?;
                writeln!(f, "  cwd: {}", init.cwd)?;
                writeln!(f, "  tools: {}", init.tools.join(", "))?;
                write!(f, "  servers: {}", servers.join(", "))
            }
            Self::HistoryCompacted => write!(f, "Conversation history compacted"),
            Self::AssistantTurn(content) => {
                write!(f, "Assistant:")?;
                for block in content {
                    match block {
                        AssistantContent::Text { text } => write!(f, " {text}")?,
                        AssistantContent::ToolUse { name, .. } => write!(f, " [tool_use {name}]")?,
                        AssistantContent::Thinking { .. } => write!(f, " [thinking]")?,
                        AssistantContent::Other => write!(f, " [other]")?,
                    }
                }
                Ok(())
            }
            Self::ThinkingStarted => write!(f, "Thinking..."),
            Self::Completed(report) | Self::Failed(report) => write!(f, "{report}"),
        }
    }
}

/// Where a session's visible output goes.
///
/// Fragments must be written in call order with nothing inserted between
/// them.
pub trait OutputSink: Send {
    fn write_fragment(&mut self, text: &str) -> io::Result<()>;

    fn render(&mut self, notice: &Notice) -> io::Result<()>;
}

/// Terminal sink: fragments and notices to `out`, failures to `err`.
pub struct ConsoleSink<O: Write + Send, E: Write + Send> {
    out: O,
    err: E,
    mid_line: bool,
}

impl ConsoleSink<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> ConsoleSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            mid_line: false,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> OutputSink for ConsoleSink<O, E> {
    fn write_fragment(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        self.mid_line = !text.ends_with('\n');
        Ok(())
    }

    fn render(&mut self, notice: &Notice) -> io::Result<()> {
        if self.mid_line {
            writeln!(self.out)?;
            self.mid_line = false;
        }
        match notice {
            Notice::Failed(_) => {
                self.out.flush()?;
                writeln!(self.err, "{notice}")
            }
            _ => writeln!(self.out, "{notice}"),
        }
    }
}
