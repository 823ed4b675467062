//! Configuration system (layered: defaults < TOML file < env < CLI).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{BriefError, Result};

/// Runtime environment variables passed through to the agent runtime untouched.
pub const PASSTHROUGH_ENV_VARS: [&str; 7] = [
    "ANTHROPIC_AUTH_TOKEN",
    "ANTHROPIC_BASE_URL",
    "ANTHROPIC_MODEL",
    "ANTHROPIC_DEFAULT_HAIKU_MODEL",
    "ANTHROPIC_DEFAULT_OPUS_MODEL",
    "ANTHROPIC_DEFAULT_SONNET_MODEL",
    "CLAUDE_CODE_SUBAGENT_MODEL",
];

/// Built-in runtime tools that sessions never get access to.
pub const DEFAULT_DISALLOWED_TOOLS: [&str; 15] = [
    "WebFetch",
    "WebSearch",
    "Task",
    "Bash",
    "Glob",
    "Grep",
    "ExitPlanMode",
    "Read",
    "Edit",
    "Write",
    "NotebookEdit",
    "TodoWrite",
    "BashOutput",
    "KillShell",
    "SlashCommand",
];

/// Session configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```
/// use newsbrief::config::BriefConfig;
///
/// let config = BriefConfig::from_toml_str("fetch_timeout_ms = 5000\ndebug = true").unwrap();
/// assert_eq!(config.fetch_timeout().as_secs(), 5);
/// assert!(config.debug);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    /// Text-conversion endpoint; the target URL is appended as a path.
    pub reader_base_url: String,
    /// Value of the `X-Return-Format` header.
    pub return_format: String,
    pub fetch_timeout_ms: u64,
    /// Truncate fetched text to this many characters.
    pub max_content_chars: Option<usize>,
    pub server_name: String,
    pub server_version: String,
    pub tool_name: String,
    pub disallowed_tools: Vec<String>,
    pub target_dir: Option<PathBuf>,
    pub debug: bool,
    pub env: BTreeMap<String, String>,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            reader_base_url: "https://r.jina.ai".to_string(),
            return_format: "markdown".to_string(),
            fetch_timeout_ms: 30_000,
            max_content_chars: None,
            server_name: "news-briefing-server".to_string(),
            server_version: "1.0.0".to_string(),
            tool_name: "jinaReader".to_string(),
            disallowed_tools: DEFAULT_DISALLOWED_TOOLS
                .iter()
                .map(|tool| tool.to_string())
                .collect(),
            target_dir: None,
            debug: false,
            env: BTreeMap::new(),
        }
    }
}

/// Load `.env.local` then `.env` into the process env, ignoring missing files.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

impl BriefConfig {
    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BriefError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load `.env.local` / `.env` if present, then overlay process env vars.
    pub fn from_env(self) -> Result<Self> {
        load_dotenv();
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("NEWSBRIEF_READER_URL") {
            self.reader_base_url = url;
        }
        if let Some(raw) = lookup("NEWSBRIEF_FETCH_TIMEOUT_MS") {
            self.fetch_timeout_ms = raw.parse().map_err(|_| {
                BriefError::Configuration(format!(
                    "NEWSBRIEF_FETCH_TIMEOUT_MS must be an integer, got '{raw}'"
                ))
            })?;
        }
        if let Some(raw) = lookup("NEWSBRIEF_DEBUG") {
            self.debug = matches!(raw.as_str(), "1" | "true" | "yes");
        }
        if let Some(dir) = lookup("TARGET_DIR") {
            self.target_dir = Some(PathBuf::from(dir));
        }
        for key in PASSTHROUGH_ENV_VARS {
            if let Some(value) = lookup(key) {
                self.env.insert(key.to_string(), value);
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Working directory handed to the runtime.
    pub fn working_dir(&self) -> PathBuf {
        self.target_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_timeout_ms == 0 {
            return Err(BriefError::Configuration(
                "fetch_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.tool_name.trim().is_empty() || self.server_name.trim().is_empty() {
            return Err(BriefError::Configuration(
                "tool_name and server_name must not be empty".into(),
            ));
        }
        if !self.reader_base_url.starts_with("http://")
            && !self.reader_base_url.starts_with("https://")
        {
            return Err(BriefError::Configuration(format!(
                "reader_base_url must be an http(s) URL, got '{}'",
                self.reader_base_url
            )));
        }
        Ok(())
    }
}
