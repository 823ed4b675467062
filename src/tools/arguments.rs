//! Tool call input as sent by the runtime.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BriefError, Result};

/// Raw input of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments(Value);

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// A string field that must be present and not blank. Returned trimmed.
    pub fn required_str(&self, key: &str) -> Result<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim()),
            Some(Value::String(_)) => Err(BriefError::InvalidArgument(format!(
                "'{key}' must not be empty"
            ))),
            Some(other) => Err(BriefError::InvalidArgument(format!(
                "'{key}' must be a string, got {other}"
            ))),
            None => Err(BriefError::InvalidArgument(format!("missing '{key}'"))),
        }
    }

    /// Decode the whole input into a typed struct.
    ///
    /// Input that arrives as a JSON-encoded string is decoded first.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        let value = match &self.0 {
            Value::String(encoded) => serde_json::from_str(encoded)?,
            other => other.clone(),
        };
        serde_json::from_value(value)
            .map_err(|e| BriefError::InvalidArgument(format!("malformed tool input: {e}")))
    }
}

impl From<Value> for ToolArguments {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
