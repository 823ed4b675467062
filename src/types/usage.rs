//! Token usage reported in `message_delta` events.

use serde::{Deserialize, Deserializer, Serialize};

/// Token usage counters as the runtime reports them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Usage {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub input_tokens: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u64>,
}

impl Usage {
    /// Merge another usage into this one (accumulate).
    pub fn merge(&mut self, other: &Usage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        if let Some(v) = other.cache_read_input_tokens {
            let total = self.cache_read_input_tokens.get_or_insert(0);
            *total = total.saturating_add(v);
        }
        if let Some(v) = other.cache_creation_input_tokens {
            let total = self.cache_creation_input_tokens.get_or_insert(0);
            *total = total.saturating_add(v);
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Option::unwrap_or_default)
}
