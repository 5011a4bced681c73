//! MotionScreen Frame Tracker
//!
//! Feeds hand frames into a detection engine and schedules its analysis
//! cycles. Frames come from a pluggable source:
//!
//! - **Replay:** frames already in memory
//! - **JSONL:** a recording written by [`writer::FrameWriter`]
//! - **Oscillation:** synthetic rhythmic wrist motion
//!
//! Sessions can be recorded in append-only JSONL format for later replay.

pub mod replay;
pub mod sources;
pub mod writer;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use motionscreen_common::clock::SessionClock;
use motionscreen_common::config::EngineConfig;
use motionscreen_common::error::{MotionError, MotionResult};
use motionscreen_detection_core::MotionEngine;
use motionscreen_motion_model::report::SessionReport;
use motionscreen_motion_model::sample::{HandFrame, RecordingHeader, RECORDING_SCHEMA_VERSION};

pub use replay::{replay_offline, ReplayOutcome};

/// Trait for hand-frame sources.
pub trait FrameSource: Send {
    /// Poll for the next frame. Returns `None` if no frame is available.
    fn poll(&mut self) -> MotionResult<Option<HandFrame>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Check if the source can produce frames on this system.
    fn is_available(&self) -> bool;

    /// True once a finite source has nothing left to produce.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Drives one screening session: source -> engine (-> recording).
pub struct SessionRunner {
    source: Box<dyn FrameSource>,
    engine: MotionEngine,
    writer: Option<writer::FrameWriter>,
    clock: SessionClock,
    stop_flag: Arc<AtomicBool>,
    frames_ingested: u64,
    frames_since_cycle: u64,
    paced: bool,
    /// (first frame timestamp, session time it was released at)
    pace_anchor: Option<(u64, u64)>,
    pending: Option<HandFrame>,
}

impl SessionRunner {
    /// Create a runner; fails on invalid configuration or an unavailable source.
    pub fn new(source: Box<dyn FrameSource>, config: EngineConfig) -> MotionResult<Self> {
        if !source.is_available() {
            return Err(MotionError::ingest(format!(
                "Frame source '{}' is not available",
                source.name()
            )));
        }

        let engine = MotionEngine::new(config)?;

        Ok(Self {
            source,
            engine,
            writer: None,
            clock: SessionClock::start(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            frames_ingested: 0,
            frames_since_cycle: 0,
            paced: false,
            pace_anchor: None,
            pending: None,
        })
    }

    /// Record every polled frame to a JSONL file.
    pub fn record_to(mut self, path: PathBuf) -> MotionResult<Self> {
        let header = RecordingHeader {
            schema_version: RECORDING_SCHEMA_VERSION.to_string(),
            epoch_wall: self.clock.epoch_wall().to_string(),
            frame_rate_hz: self.engine.config().frame_rate_hz,
            source: self.source.name().to_string(),
        };
        self.writer = Some(writer::FrameWriter::create(path, &header)?);
        Ok(self)
    }

    /// Release frames no faster than their timestamps (replay at real speed).
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Run until the stop flag is set or the source is exhausted.
    ///
    /// A cycle runs every `analysis_interval_ms`, plus one final cycle
    /// for frames that arrived after the last tick.
    pub async fn run(&mut self) -> MotionResult<SessionReport> {
        let interval_ms = self.engine.config().analysis_interval_ms;
        tracing::info!(
            source = %self.source.name(),
            interval_ms,
            paced = self.paced,
            "Screening session started"
        );

        let mut ticker = tokio::time::interval(tokio::time::Duration::from_millis(interval_ms));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }
            if self.pending.is_none() && self.source.is_exhausted() {
                tracing::debug!(source = %self.source.name(), "Frame source exhausted");
                break;
            }

            tokio::select! {
                biased;
                _ = ticker.tick() => self.cycle(),
                result = self.step() => result?,
            }
        }

        if self.frames_since_cycle > 0 || self.engine.latest_result().is_none() {
            self.cycle();
        }
        if let Some(writer) = self.writer.take() {
            let recording = writer.finish()?;
            tracing::info!(
                path = %recording.path.display(),
                frames = recording.frames,
                "Session recording saved"
            );
        }

        let report = self.engine.report();
        tracing::info!(
            frames = self.frames_ingested,
            dropped = report.dropped_frames,
            windows = report.window_count,
            tier = %report.tier,
            elapsed_ms = self.clock.elapsed_ms(),
            "Screening session stopped"
        );
        Ok(report)
    }

    /// Ingest at most one frame.
    async fn step(&mut self) -> MotionResult<()> {
        let next = match self.pending.take() {
            Some(frame) => Some(frame),
            None => match self.source.poll() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(error = %e, "Frame source error");
                    None
                }
            },
        };

        let Some(frame) = next else {
            // No frame available, yield briefly
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
            return Ok(());
        };

        if self.paced && !self.is_due(&frame) {
            self.pending = Some(frame);
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
            return Ok(());
        }

        if let Some(writer) = self.writer.as_mut() {
            writer.write_frame(&frame)?;
        }
        self.engine.push_frame(frame);
        self.frames_ingested += 1;
        self.frames_since_cycle += 1;

        tokio::task::yield_now().await;
        Ok(())
    }

    fn is_due(&mut self, frame: &HandFrame) -> bool {
        let now = self.clock.elapsed_ms();
        let (first_ts, released_at) = *self
            .pace_anchor
            .get_or_insert((frame.timestamp_ms, now));
        let offset = frame.timestamp_ms.saturating_sub(first_ts);
        now >= released_at + offset
    }

    fn cycle(&mut self) {
        self.engine.run_cycle();
        self.frames_since_cycle = 0;
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Number of frames handed to the engine so far.
    pub fn frames_ingested(&self) -> u64 {
        self.frames_ingested
    }

    /// Mutable engine access, e.g. to register result observers.
    pub fn engine_mut(&mut self) -> &mut MotionEngine {
        &mut self.engine
    }
}
