//! Clock and timing utilities for screening sessions.
//!
//! Frame timestamps are milliseconds relative to a monotonic epoch
//! recorded when the session starts. This module provides:
//! - The session clock (epoch + wall-clock anchor)
//! - Frame timestamps for a fixed frame rate
//! - The analysis tick scheduler used for timestamp-driven replay

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the screening session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
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
    pub fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Timestamp of frame `index` for a fixed frame rate.
    pub fn frame_timestamp_ms(index: u64, frame_rate_hz: f64) -> u64 {
        if frame_rate_hz <= 0.0 {
            return 0;
        }
        ((index as f64) * 1_000.0 / frame_rate_hz).round() as u64
    }
}

/// Decides when the next scheduled analysis cycle is due.
///
/// Driven by frame timestamps instead of wall time so that replaying a
/// recording produces the same windows as the live session did.
#[derive(Debug)]
pub struct AnalysisTicker {
    interval_ms: u64,
    last_tick_ms: Option<u64>,
}

impl AnalysisTicker {
    /// Create a ticker with the given period.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            last_tick_ms: None,
        }
    }

    /// Returns true and records the tick if a full interval has passed.
    ///
    /// The first call only anchors the schedule; a cycle right at the
    /// first frame would always see an almost empty buffer.
    pub fn should_tick(&mut self, current_ms: u64) -> bool {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(current_ms);
                false
            }
            Some(last) if current_ms >= last + self.interval_ms => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            _ => false,
        }
    }

    /// Tick period in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
