//! Lifecycle hooks around a session and its tool calls.
//!
//! A [`HookPipeline`] holds an ordered list of handlers per [`HookPhase`].
//! Running a phase folds over its handlers in registration order and stops
//! at the first [`HookDecision::Deny`]. A handler that returns `Err` is
//! logged and counted as `Continue`: observability code must not be able to
//! fail a session.

pub mod logging;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::Result;
use crate::types::ToolResult;

/// Fixed interception points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum HookPhase {
    SessionStart,
    PreToolCall,
    PostToolCall,
    SessionEnd,
}

/// Phase-specific input handed to each handler.
#[derive(Debug, Clone, PartialEq)]
pub enum HookInput {
    SessionStart {
        session_id: String,
    },
    PreToolCall {
        session_id: String,
        tool_name: String,
        tool_input: serde_json::Value,
    },
    PostToolCall {
        session_id: String,
        tool_name: String,
        tool_input: serde_json::Value,
        tool_output: ToolResult,
    },
    SessionEnd {
        session_id: String,
    },
}

impl HookInput {
    pub fn phase(&self) -> HookPhase {
        match self {
            Self::SessionStart { .. } => HookPhase::SessionStart,
            Self::PreToolCall { .. } => HookPhase::PreToolCall,
            Self::PostToolCall { .. } => HookPhase::PostToolCall,
            Self::SessionEnd { .. } => HookPhase::SessionEnd,
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            Self::SessionStart { session_id }
            | Self::PreToolCall { session_id, .. }
            | Self::PostToolCall { session_id, .. }
            | Self::SessionEnd { session_id } => session_id,
        }
    }

    /// Tool name for tool phases.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::PreToolCall { tool_name, .. } | Self::PostToolCall { tool_name, .. } => {
                Some(tool_name)
            }
            _ => None,
        }
    }
}

/// One handler's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HookResponse", into = "HookResponse")]
pub enum HookDecision {
    Continue,
    Deny { reason: Option<String> },
}

impl HookDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: Some(reason.into()),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Wire shape of a decision: `{ "continueExecution": bool, "reason"?: string }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HookResponse {
    continue_execution: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<HookResponse> for HookDecision {
    fn from(value: HookResponse) -> Self {
        if value.continue_execution {
            Self::Continue
        } else {
            Self::Deny {
                reason: value.reason,
            }
        }
    }
}

impl From<HookDecision> for HookResponse {
    fn from(value: HookDecision) -> Self {
        match value {
            HookDecision::Continue => Self {
                continue_execution: true,
                reason: None,
            },
            HookDecision::Deny { reason } => Self {
                continue_execution: false,
                reason,
            },
        }
    }
}

/// Aggregate outcome of one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookVerdict {
    pub phase: HookPhase,
    pub decision: HookDecision,
    /// Handlers actually invoked, including the denying one.
    pub handlers_run: usize,
    pub denied_by: Option<String>,
}

impl HookVerdict {
    fn allowed(phase: HookPhase, handlers_run: usize) -> Self {
        Self {
            phase,
            decision: HookDecision::Continue,
            handlers_run,
            denied_by: None,
        }
    }

    pub fn is_continue(&self) -> bool {
        self.decision.is_continue()
    }

    /// Deny reason, falling back to a generic one naming the handler.
    pub fn reason(&self) -> Option<String> {
        match &self.decision {
            HookDecision::Continue => None,
            HookDecision::Deny { reason: Some(reason) } => Some(reason.clone()),
            HookDecision::Deny { reason: None } => Some(format!(
                "denied by {} hook '{}'",
                self.phase,
                self.denied_by.as_deref().unwrap_or("unknown")
            )),
        }
    }
}

/// A named lifecycle handler.
#[async_trait]
pub trait HookHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, input: &HookInput) -> Result<HookDecision>;
}

type HookFnHandler =
    dyn Fn(HookInput) -> Pin<Box<dyn Future<Output = Result<HookDecision>> + Send>> + Send + Sync;

/// Closure-based hook handler.
pub struct HookFn {
    name: String,
    handler: Arc<HookFnHandler>,
}

impl HookFn {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HookInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HookDecision>> + Send + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(move |input| Box::pin(handler(input))),
        }
    }
}

#[async_trait]
impl HookHandler for HookFn {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, input: &HookInput) -> Result<HookDecision> {
        (self.handler)(input.clone()).await
    }
}

/// Filters which tool calls a registration sees.
#[derive(Debug, Clone, Default)]
pub struct HookMatcher {
    tool_pattern: Option<regex::Regex>,
}

impl HookMatcher {
    /// Matches every input.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches tool-phase inputs whose tool name matches `pattern`.
    ///
    /// Session phases have no tool name and always match.
    pub fn tool(pattern: &str) -> Result<Self> {
        let regex = regex::Regex::new(pattern).map_err(|e| {
            crate::error::BriefError::Configuration(format!("invalid hook matcher '{pattern}': {e}"))
        })?;
        Ok(Self {
            tool_pattern: Some(regex),
        })
    }

    pub fn matches(&self, input: &HookInput) -> bool {
        match (&self.tool_pattern, input.tool_name()) {
            (Some(pattern), Some(tool_name)) => pattern.is_match(tool_name),
            _ => true,
        }
    }
}

#[derive(Clone)]
struct Registration {
    matcher: HookMatcher,
    handler: Arc<dyn HookHandler>,
}

/// Ordered handlers for every phase.
#[derive(Clone, Default)]
pub struct HookPipeline {
    phases: HashMap<HookPhase, Vec<Registration>>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler that sees every input of `phase`.
    pub fn register(&mut self, phase: HookPhase, handler: Arc<dyn HookHandler>) -> &mut Self {
        self.register_matching(phase, HookMatcher::any(), handler)
    }

    /// Append a handler guarded by a matcher.
    pub fn register_matching(
        &mut self,
        phase: HookPhase,
        matcher: HookMatcher,
        handler: Arc<dyn HookHandler>,
    ) -> &mut Self {
        self.phases
            .entry(phase)
            .or_default()
            .push(Registration { matcher, handler });
        self
    }

    /// Handler names for a phase, in run order.
    pub fn handler_names(&self, phase: HookPhase) -> Vec<&str> {
        self.phases
            .get(&phase)
            .map(|regs| regs.iter().map(|r| r.handler.name()).collect())
            .unwrap_or_default()
    }

    /// Run the handlers of `input`'s phase sequentially; first deny wins.
    pub async fn run(&self, input: &HookInput) -> HookVerdict {
        let phase = input.phase();
        let registrations = self.phases.get(&phase).map(Vec::as_slice).unwrap_or(&[]);

        let folded = stream::iter(registrations.iter().filter(|r| r.matcher.matches(input)))
            .map(Ok::<_, HookVerdict>)
            .try_fold(0usize, move |handlers_run, registration| async move {
                let handlers_run = handlers_run + 1;
                match invoke(registration.handler.as_ref(), input).await {
                    HookDecision::Continue => Ok(handlers_run),
                    decision @ HookDecision::Deny { .. } => Err(HookVerdict {
                        phase,
                        decision,
                        handlers_run,
                        denied_by: Some(registration.handler.name().to_string()),
                    }),
                }
            })
            .await;

        let verdict = match folded {
            Ok(handlers_run) => HookVerdict::allowed(phase, handlers_run),
            Err(denied) => denied,
        };
        if !verdict.is_continue() {
            tracing::info!(
                %phase,
                session_id = input.session_id(),
                handler = verdict.denied_by.as_deref().unwrap_or("-"),
                reason = verdict.reason().as_deref().unwrap_or(""),
                "hook phase denied"
            );
        }
        verdict
    }
}

async fn invoke(handler: &dyn HookHandler, input: &HookInput) -> HookDecision {
    match handler.handle(input).await {
        Ok(decision) => decision,
        Err(err) => {
            tracing::warn!(
                phase = %input.phase(),
                handler = handler.name(),
                error = %err,
                "hook handler failed; continuing"
            );
            HookDecision::Continue
        }
    }
}

impl std::fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use strum::IntoEnumIterator;
        let mut map = f.debug_map();
        for phase in HookPhase::iter() {
            map.entry(&phase.to_string(), &self.handler_names(phase));
        }
        map.finish()
    }
}
