//! Declared toolset for a session.

use std::sync::Arc;

use crate::config::BriefConfig;
use crate::error::Result;

use super::fetch::FetchTool;
use super::tool::Tool;
use super::types::ToolDescriptor;

const QUALIFIED_PREFIX: &str = "mcp__";

/// Tools exposed to the runtime under one logical server name, plus the
/// runtime built-ins the session must not reach.
#[derive(Clone)]
pub struct Toolset {
    server_name: String,
    server_version: String,
    tools: Vec<Arc<dyn Tool>>,
    disallowed: Vec<String>,
}

impl Toolset {
    pub fn new(server_name: impl Into<String>, server_version: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            server_version: server_version.into(),
            tools: Vec::new(),
            disallowed: Vec::new(),
        }
    }

    /// The standard session toolset: the fetch tool plus the configured deny-list.
    pub fn from_config(config: &BriefConfig) -> Result<Self> {
        Ok(
            Self::new(config.server_name.clone(), config.server_version.clone())
                .with_tool(Arc::new(FetchTool::new(config)?))
                .with_disallowed(config.disallowed_tools.clone()),
        )
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_disallowed(mut self, names: Vec<String>) -> Self {
        self.disallowed = names;
        self
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Name the runtime uses for a registered tool: `mcp__{server}__{tool}`.
    pub fn qualified_name(&self, tool: &str) -> String {
        format!("{QUALIFIED_PREFIX}{}__{tool}", self.server_name)
    }

    /// Qualified names of every registered tool.
    pub fn declared_tool_names(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|tool| self.qualified_name(tool.name()))
            .collect()
    }

    /// Listing of every registered tool under its qualified name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| tool.descriptor(self.qualified_name(tool.name())))
            .collect()
    }

    /// Strip this server's qualification from a tool name, if present.
    pub fn bare_name<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(QUALIFIED_PREFIX)
            .and_then(|rest| rest.strip_prefix(self.server_name.as_str()))
            .and_then(|rest| rest.strip_prefix("__"))
            .unwrap_or(name)
    }

    pub fn is_disallowed(&self, name: &str) -> bool {
        self.disallowed.iter().any(|denied| denied == name)
    }

    /// Find a registered tool by qualified or bare name.
    ///
    /// Deny-listed names never resolve.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        if self.is_disallowed(name) {
            return None;
        }
        let bare = self.bare_name(name);
        self.tools.iter().find(|tool| tool.name() == bare)
    }
}

impl std::fmt::Debug for Toolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolset")
            .field("server_name", &self.server_name)
            .field("tools", &self.declared_tool_names())
            .field("disallowed", &self.disallowed)
            .finish()
    }
}
