//! Tool-call result payloads.

use serde::{Deserialize, Serialize};

/// A single piece of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    Text { text: String },
}

/// What every tool invocation resolves to, success or not.
///
/// Serializes to `{ "content": [{ "type": "text", "text": .. }], "isError": bool }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result with one text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Error result with a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// All text parts concatenated.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|part| match part {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect()
    }

    /// First non-blank line of the text, cut to `max_chars`.
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.text_content();
        let line = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();
        if line.chars().count() <= max_chars {
            line.to_string()
        } else {
            let cut: String = line.chars().take(max_chars).collect();
            format!("{cut}...")
        }
    }
}
