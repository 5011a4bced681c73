//! Frame source implementations.
//!
//! Live landmark extraction happens in the tracking collaborator; these
//! sources cover replaying recordings and synthesizing motion.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use motionscreen_common::clock::SessionClock;
use motionscreen_common::error::{MotionError, MotionResult};
use motionscreen_motion_model::sample::{
    parse_frames, parse_header_line, HandFrame, Limb, RecordingHeader, WristSample,
};

use crate::FrameSource;

/// Replays a fixed list of frames, then reports exhaustion.
pub struct ReplaySource {
    frames: VecDeque<HandFrame>,
}

impl ReplaySource {
    pub fn new(frames: Vec<HandFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// A source that never produces frames.
    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl FrameSource for ReplaySource {
    fn poll(&mut self) -> MotionResult<Option<HandFrame>> {
        Ok(self.frames.pop_front())
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Replays a JSONL recording written by [`crate::writer::FrameWriter`].
pub struct JsonlFileSource {
    header: Option<RecordingHeader>,
    inner: ReplaySource,
}

impl JsonlFileSource {
    pub fn open(path: &Path) -> MotionResult<Self> {
        if !path.exists() {
            return Err(MotionError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let header = content.lines().next().and_then(parse_header_line);
        let frames = parse_frames(&content).map_err(|e| {
            MotionError::ingest(format!("Failed to parse frames in {}: {e}", path.display()))
        })?;

        tracing::debug!(
            path = %path.display(),
            frames = frames.len(),
            has_header = header.is_some(),
            "Loaded frame recording"
        );

        Ok(Self {
            header,
            inner: ReplaySource::new(frames),
        })
    }

    /// Recording metadata, if the file carried a header line.
    pub fn header(&self) -> Option<&RecordingHeader> {
        self.header.as_ref()
    }

    /// Drain the remaining frames without polling one by one.
    pub fn into_frames(self) -> Vec<HandFrame> {
        self.inner.frames.into()
    }
}

impl FrameSource for JsonlFileSource {
    fn poll(&mut self) -> MotionResult<Option<HandFrame>> {
        self.inner.poll()
    }

    fn name(&self) -> &str {
        "jsonl"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }
}

/// Parameters of synthetic rhythmic wrist motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillationConfig {
    /// Oscillation frequency (Hz).
    pub frequency_hz: f64,

    /// Peak displacement along the x axis (coordinate units).
    pub amplitude: f64,

    /// Frame rate of the synthetic tracker (Hz).
    pub frame_rate_hz: f64,

    /// Frames to produce; `None` runs until stopped.
    pub frames: Option<u64>,

    /// Detection confidence attached to every sample.
    pub confidence: f64,

    /// Leave the left wrist out of every frame.
    pub occlude_left: bool,

    /// Leave the right wrist out of every frame.
    pub occlude_right: bool,

    /// Resting wrist position the oscillation is centred on.
    pub rest_position: (f64, f64, f64),
}

impl Default for OscillationConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 3.0,
            amplitude: 50.0,
            frame_rate_hz: 25.0,
            frames: Some(250),
            confidence: 0.9,
            occlude_left: false,
            occlude_right: false,
            rest_position: (320.0, 240.0, 0.0),
        }
    }
}

/// Generates hand-flapping-like sinusoidal motion on both wrists.
pub struct OscillationSource {
    config: OscillationConfig,
    index: u64,
}

impl OscillationSource {
    pub fn new(config: OscillationConfig) -> Self {
        Self { config, index: 0 }
    }

    fn frame_at(&self, index: u64) -> HandFrame {
        let rate = self.config.frame_rate_hz;
        let t_ms = SessionClock::frame_timestamp_ms(index, rate);
        let t_secs = if rate > 0.0 { index as f64 / rate } else { 0.0 };
        let (x0, y0, z0) = self.config.rest_position;

        let wrist = |limb: Limb| {
            // Mirror the right wrist so both hands flap outward together.
            let direction = match limb {
                Limb::Left => 1.0,
                Limb::Right => -1.0,
            };
            let phase = 2.0 * std::f64::consts::PI * self.config.frequency_hz * t_secs + 0.3;
            let dx = direction * self.config.amplitude * phase.sin();
            let dy = 0.1 * self.config.amplitude * phase.cos();
            WristSample::new(x0 + dx, y0 + dy, z0, self.config.confidence, t_ms)
        };

        HandFrame::new(
            t_ms,
            (!self.config.occlude_left).then(|| wrist(Limb::Left)),
            (!self.config.occlude_right).then(|| wrist(Limb::Right)),
        )
    }
}

impl FrameSource for OscillationSource {
    fn poll(&mut self) -> MotionResult<Option<HandFrame>> {
        if self.is_exhausted() {
            return Ok(None);
        }
        let frame = self.frame_at(self.index);
        self.index += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "oscillation"
    }

    fn is_available(&self) -> bool {
        self.config.frame_rate_hz > 0.0
    }

    fn is_exhausted(&self) -> bool {
        self.config
            .frames
            .map(|limit| self.index >= limit)
            .unwrap_or(false)
    }
}

/// Collect every frame a finite source produces.
pub fn drain(source: &mut dyn FrameSource) -> MotionResult<Vec<HandFrame>> {
    let mut frames = Vec::new();
    while let Some(frame) = source.poll()? {
        frames.push(frame);
    }
    Ok(frames)
}
