//! JSONL recording of a screening session.
//!
//! The header sits on a `#` comment line so frame parsers skip it. Buffered
//! frames are flushed whenever another [`FLUSH_INTERVAL_MS`] of session time
//! has been recorded, so a crash loses at most that much of the session.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use motionscreen_common::error::MotionResult;
use motionscreen_motion_model::sample::{HandFrame, RecordingHeader, TimestampMs};

/// Session time between flushes.
pub const FLUSH_INTERVAL_MS: TimestampMs = 5_000;

/// What a finished recording contains.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSummary {
    pub path: PathBuf,
    pub frames: u64,
    /// Frames whose timestamp went backwards relative to the previous one.
    pub out_of_order: u64,
    pub duration_ms: TimestampMs,
}

/// Records hand frames to a JSONL file.
pub struct FrameWriter {
    out: BufWriter<File>,
    path: PathBuf,
    frames: u64,
    out_of_order: u64,
    first_ms: Option<TimestampMs>,
    last_ms: Option<TimestampMs>,
    flushed_at_ms: TimestampMs,
}

impl FrameWriter {
    /// Create (or truncate) a recording and write its header line.
    pub fn create(path: PathBuf, header: &RecordingHeader) -> MotionResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "# {}", serde_json::to_string(header)?)?;
        out.flush()?;

        tracing::debug!(path = %path.display(), source = %header.source, "Recording started");

        Ok(Self {
            out,
            path,
            frames: 0,
            out_of_order: 0,
            first_ms: None,
            last_ms: None,
            flushed_at_ms: 0,
        })
    }

    /// Append one frame exactly as the source produced it.
    ///
    /// Invalid or out-of-order frames are still recorded so a replay sees
    /// what the live engine saw.
    pub fn write_frame(&mut self, frame: &HandFrame) -> MotionResult<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.frames += 1;

        let t = frame.timestamp_ms;
        if self.last_ms.is_some_and(|last| t < last) {
            self.out_of_order += 1;
            tracing::warn!(timestamp_ms = t, "Recorded frame goes back in time");
        }
        let first = *self.first_ms.get_or_insert(t);
        self.last_ms = Some(self.last_ms.map_or(t, |last| last.max(t)));

        if t.saturating_sub(first) >= self.flushed_at_ms + FLUSH_INTERVAL_MS {
            self.flush()?;
            self.flushed_at_ms = t.saturating_sub(first);
        }
        Ok(())
    }

    /// Flush buffered frames to disk.
    pub fn flush(&mut self) -> MotionResult<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and close the recording, reporting what it holds.
    pub fn finish(mut self) -> MotionResult<RecordingSummary> {
        self.flush()?;
        let summary = self.summary();
        tracing::debug!(
            path = %summary.path.display(),
            frames = summary.frames,
            out_of_order = summary.out_of_order,
            "Recording finished"
        );
        Ok(summary)
    }

    pub fn summary(&self) -> RecordingSummary {
        RecordingSummary {
            path: self.path.clone(),
            frames: self.frames,
            out_of_order: self.out_of_order,
            duration_ms: match (self.first_ms, self.last_ms) {
                (Some(first), Some(last)) => last - first,
                _ => 0,
            },
        }
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to flush recording");
        }
    }
}
