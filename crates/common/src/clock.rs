//! Clock and timing utilities for the analysis session.
//!
//! Every observation handled by a session is stamped with monotonic
//! milliseconds relative to a fixed epoch (the moment tracking started).
//! This module provides:
//! - The session clock itself
//! - Conversions between milliseconds and seconds
//! - An interval gate for throttling expensive periodic work

use std::time::Instant;

/// Monotonic timestamp in milliseconds since session start.
pub type TimestampMs = u64;

/// A session clock that provides monotonic millisecond timestamps
/// relative to a fixed epoch.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant tracking started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since session start.
    pub fn elapsed_ms(&self) -> TimestampMs {
        self.epoch.elapsed().as_millis() as TimestampMs
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert milliseconds to fractional seconds.
    pub fn ms_to_secs(ms: TimestampMs) -> f64 {
        ms as f64 / 1_000.0
    }
}

/// Minimum-interval gate for throttled work such as object detection.
///
/// The first call always fires; afterwards the gate opens again once
/// `interval_ms` has elapsed since the last time it fired.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval_ms: u64,
    last_fired_ms: Option<TimestampMs>,
}

impl IntervalGate {
    /// Create a gate with the given minimum interval.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// Check whether the gate is open at `now_ms`.
    /// Returns true and records the firing time if so.
    pub fn try_fire(&mut self, now_ms: TimestampMs) -> bool {
        match self.last_fired_ms {
            None => {
                self.last_fired_ms = Some(now_ms);
                true
            }
            Some(last) if now_ms >= last.saturating_add(self.interval_ms) => {
                self.last_fired_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Check without firing.
    pub fn is_open(&self, now_ms: TimestampMs) -> bool {
        self.last_fired_ms
            .map_or(true, |last| now_ms >= last.saturating_add(self.interval_ms))
    }

    /// Forget the last firing time so the next call fires immediately.
    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }

    /// Minimum interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// When the gate last fired.
    pub fn last_fired_ms(&self) -> Option<TimestampMs> {
        self.last_fired_ms
    }
}
