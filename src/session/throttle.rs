//! Rate limiting for per-delta diagnostics.

use std::time::{Duration, Instant};

/// A liveness line is due every this many deltas.
pub const DELTA_BATCH: u64 = 100;

/// ...or when this much time passed since the last one.
pub const DELTA_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Why a tick fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReason {
    Batch,
    Interval,
}

/// A diagnostic that should be emitted now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleTick {
    pub deltas: u64,
    pub reason: TickReason,
    pub since_last: Duration,
}

/// Counts deltas and decides when a diagnostic line is due.
///
/// A disabled throttle neither counts nor ticks.
#[derive(Debug, Clone)]
pub struct DebugThrottle {
    enabled: bool,
    deltas: u64,
    last_log: Instant,
}

impl DebugThrottle {
    pub fn new(enabled: bool, now: Instant) -> Self {
        Self {
            enabled,
            deltas: 0,
            last_log: now,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn deltas(&self) -> u64 {
        self.deltas
    }

    /// Zero the counter and restart the interval clock.
    pub fn reset(&mut self, now: Instant) {
        self.deltas = 0;
        self.last_log = now;
    }

    /// Record one delta event observed at `now`.
    pub fn on_delta(&mut self, now: Instant) -> Option<ThrottleTick> {
        if !self.enabled {
            return None;
        }
        self.deltas += 1;
        let since_last = now.saturating_duration_since(self.last_log);
        let reason = if self.deltas % DELTA_BATCH == 0 {
            TickReason::Batch
        } else if since_last > DELTA_LOG_INTERVAL {
            TickReason::Interval
        } else {
            return None;
        };
        self.last_log = now;
        Some(ThrottleTick {
            deltas: self.deltas,
            reason,
            since_last,
        })
    }
}
