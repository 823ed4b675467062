//! Per-session mutable state.

use std::time::Instant;

use crate::types::Usage;

use super::blocks::ContentBlockTracker;
use super::throttle::DebugThrottle;

/// Everything a session mutates while its events are dispatched.
///
/// One instance per session; nothing here is shared between sessions.
#[derive(Debug)]
pub struct SessionContext {
    session_id: Option<String>,
    debug: bool,
    pub tracker: ContentBlockTracker,
    pub throttle: DebugThrottle,
    pub usage: Usage,
    started_at: Instant,
}

impl SessionContext {
    pub fn new(debug: bool) -> Self {
        let now = Instant::now();
        Self {
            session_id: None,
            debug,
            tracker: ContentBlockTracker::new(),
            throttle: DebugThrottle::new(debug, now),
            usage: Usage::default(),
            started_at: now,
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Session id for logs and hook inputs before the runtime assigned one.
    pub fn session_label(&self) -> String {
        self.session_id.clone().unwrap_or_default()
    }

    /// Record the runtime-assigned id and restart the throttle.
    pub fn begin(&mut self, session_id: impl Into<String>) {
        let now = Instant::now();
        self.session_id = Some(session_id.into());
        self.throttle.reset(now);
        self.started_at = now;
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// Drop open block state; used when the stream ends abnormally.
    pub fn release(&mut self) {
        self.tracker.release();
    }
}
