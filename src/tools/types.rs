//! Input schemas and the descriptors a toolset advertises to the runtime.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON Schema for a tool's input object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolSchema(Value);

impl ToolSchema {
    /// A schema accepting an object with no declared properties.
    pub fn empty() -> Self {
        SchemaBuilder::default().build()
    }

    pub fn object() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Names of required properties, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.0["required"]
            .as_array()
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Accumulates string properties for a [`ToolSchema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    pub fn required_string(self, name: &str, description: &str) -> Self {
        self.property(name, description, true)
    }

    pub fn optional_string(self, name: &str, description: &str) -> Self {
        self.property(name, description, false)
    }

    fn property(mut self, name: &str, description: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> ToolSchema {
        ToolSchema(json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        }))
    }
}

/// One tool as listed to the runtime: `{name, description, inputSchema}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Qualified name (`mcp__{server}__{tool}`).
    pub name: String,
    pub description: String,
    pub input_schema: ToolSchema,
}
