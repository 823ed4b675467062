//! Reader-endpoint fetch tool.
//!
//! Fetches a web page through a text-conversion endpoint (`{base}/{url}`)
//! and hands the converted text back as a [`ToolResult`]. Transport errors,
//! non-2xx responses, timeouts, and malformed input all come back as error
//! results; nothing is raised past [`Tool::execute`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::BriefConfig;
use crate::error::{BriefError, Result};
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{CallContext, Tool};
use crate::tools::types::ToolSchema;
use crate::types::ToolResult;
use crate::util::with_timeout;

/// Every fetch error result starts with this text.
pub const FETCH_FAILURE_PREFIX: &str = "Unable to fetch page content: ";

/// Appended when fetched text is cut at `max_content_chars`.
pub const TRUNCATION_MARKER: &str = "...(content truncated)";

const RETURN_FORMAT_HEADER: &str = "X-Return-Format";

/// Fetch-and-convert tool backed by a reader endpoint.
pub struct FetchTool {
    name: String,
    base_url: String,
    return_format: String,
    timeout: Duration,
    max_chars: Option<usize>,
    schema: ToolSchema,
    client: reqwest::Client,
}

impl FetchTool {
    pub fn new(config: &BriefConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()?;
        Ok(Self {
            name: config.tool_name.clone(),
            base_url: config.reader_base_url.trim_end_matches('/').to_string(),
            return_format: config.return_format.clone(),
            timeout: config.fetch_timeout(),
            max_chars: config.max_content_chars,
            schema: ToolSchema::object()
                .required_string("url", "URL of the web page to fetch")
                .build(),
            client,
        })
    }

    fn reader_url(&self, url: &str) -> String {
        format!("{}/{}", self.base_url, url)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(val) = HeaderValue::from_str(&self.return_format) {
            headers.insert(RETURN_FORMAT_HEADER, val);
        }
        headers
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        with_timeout(self.timeout, async {
            let response = self
                .client
                .get(self.reader_url(url))
                .headers(self.headers())
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(BriefError::ToolExecution {
                    tool_name: self.name.clone(),
                    message: format!("Failed to fetch {url}: {status}"),
                });
            }
            Ok(response.text().await?)
        })
        .await
    }

    fn truncate(&self, content: String) -> String {
        let Some(max) = self.max_chars else {
            return content;
        };
        match content.char_indices().nth(max) {
            Some((cutoff, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cutoff]),
            None => content,
        }
    }
}

fn failure_result(err: &BriefError) -> ToolResult {
    let detail = match err {
        BriefError::ToolExecution { message, .. } => message.clone(),
        BriefError::Timeout(ms) => format!("request timed out after {ms}ms"),
        other => other.to_string(),
    };
    ToolResult::error(format!("{FETCH_FAILURE_PREFIX}{detail}"))
}

#[async_trait]
impl Tool for FetchTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Fetch a web page and return its main content as markdown text"
    }

    fn input_schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(&self, args: &ToolArguments, ctx: &CallContext) -> ToolResult {
        let url = match args.required_str("url") {
            Ok(url) => url,
            Err(err) => return failure_result(&err),
        };

        tracing::info!(
            tool_name = %self.name,
            session_id = ctx.session_id.as_deref().unwrap_or("-"),
            url,
            "fetch started"
        );
        match self.fetch(url).await {
            Ok(content) => {
                tracing::info!(
                    tool_name = %self.name,
                    url,
                    chars = content.chars().count(),
                    "fetch completed"
                );
                ToolResult::text(self.truncate(content))
            }
            Err(err) => {
                tracing::warn!(tool_name = %self.name, url, error = %err, "fetch failed");
                failure_result(&err)
            }
        }
    }
}

impl std::fmt::Debug for FetchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchTool")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
