//! Fixed-capacity frame storage.
//!
//! The buffer only stores and evicts; it never interprets motion. Invalid
//! frames are dropped at the door and counted so ingestion problems stay
//! observable without ever failing the caller.

use std::collections::VecDeque;

use motionscreen_common::error::{MotionError, MotionResult};
use motionscreen_motion_model::sample::{Axis, HandFrame, Limb, TimestampMs};

/// Ordered FIFO holding at most `capacity` items.
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the evicted oldest item once full.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> SlidingWindow<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

/// Sliding window of hand frames with ingestion diagnostics.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    frames: SlidingWindow<HandFrame>,
    frame_rate_hz: f64,
    accepted: u64,
    dropped: u64,
}

impl SampleBuffer {
    /// Create a buffer holding the most recent `capacity` frames.
    pub fn new(capacity: usize, frame_rate_hz: f64) -> MotionResult<Self> {
        if capacity == 0 {
            return Err(MotionError::config(
                "sample buffer capacity must be greater than zero",
            ));
        }
        Ok(Self {
            frames: SlidingWindow::new(capacity),
            frame_rate_hz,
            accepted: 0,
            dropped: 0,
        })
    }

    /// Store a copy of `frame`, evicting the oldest frame once full.
    ///
    /// Frames carrying a wrist with out-of-range confidence or non-finite
    /// coordinates are dropped. Returns whether the frame was stored.
    pub fn append(&mut self, frame: HandFrame) -> bool {
        if !frame.is_valid() {
            self.dropped += 1;
            tracing::debug!(
                timestamp_ms = frame.timestamp_ms,
                dropped = self.dropped,
                "Dropped invalid hand frame"
            );
            return false;
        }

        self.frames.push(frame);
        self.accepted += 1;
        true
    }

    /// Coordinate values of one limb along one axis, oldest first.
    ///
    /// Frames where the limb is absent or below `min_confidence` are
    /// skipped, never zero-filled.
    pub fn series(&self, limb: Limb, axis: Axis, min_confidence: f64) -> Vec<f64> {
        collect_series(self.frames.iter(), limb, axis, min_confidence)
    }

    /// Immutable copy of the current contents for one analysis cycle.
    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            frames: self.frames.to_vec(),
            frame_rate_hz: self.frame_rate_hz,
        }
    }

    /// Drop every stored frame and reset the counters.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.accepted = 0;
        self.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.frames.capacity()
    }

    pub fn frame_rate_hz(&self) -> f64 {
        self.frame_rate_hz
    }

    /// Timestamp of the newest stored frame, 0 when empty.
    pub fn latest_timestamp_ms(&self) -> TimestampMs {
        self.frames.latest().map(|f| f.timestamp_ms).unwrap_or(0)
    }

    /// Frames rejected by validation since the last clear.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }

    /// Frames accepted since the last clear, including evicted ones.
    pub fn total_frames(&self) -> u64 {
        self.accepted
    }

    /// Oldest to newest.
    pub fn frames(&self) -> impl Iterator<Item = &HandFrame> {
        self.frames.iter()
    }
}

/// Frozen buffer contents. Frames pushed after the snapshot was taken
/// are never visible through it.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSnapshot {
    frames: Vec<HandFrame>,
    frame_rate_hz: f64,
}

impl BufferSnapshot {
    pub fn new(frames: Vec<HandFrame>, frame_rate_hz: f64) -> Self {
        Self {
            frames,
            frame_rate_hz,
        }
    }

    pub fn series(&self, limb: Limb, axis: Axis, min_confidence: f64) -> Vec<f64> {
        collect_series(self.frames.iter(), limb, axis, min_confidence)
    }

    pub fn frames(&self) -> &[HandFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_rate_hz(&self) -> f64 {
        self.frame_rate_hz
    }

    /// Timestamp of the newest frame, 0 when empty.
    pub fn latest_timestamp_ms(&self) -> TimestampMs {
        self.frames.last().map(|f| f.timestamp_ms).unwrap_or(0)
    }
}

fn collect_series<'a>(
    frames: impl Iterator<Item = &'a HandFrame>,
    limb: Limb,
    axis: Axis,
    min_confidence: f64,
) -> Vec<f64> {
    frames
        .filter_map(|frame| frame.wrist(limb))
        .filter(|wrist| wrist.confidence >= min_confidence)
        .map(|wrist| wrist.coordinate(axis))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionscreen_motion_model::sample::WristSample;

    fn frame(t: u64, x: f64, confidence: f64) -> HandFrame {
        HandFrame::new(t, None, Some(WristSample::new(x, 0.0, 0.0, confidence, t)))
    }

    #[test]
    fn test_sliding_window_evicts_oldest() {
        let mut window = SlidingWindow::new(3);
        assert_eq!(window.push(1), None);
        assert_eq!(window.push(2), None);
        assert_eq!(window.push(3), None);
        assert_eq!(window.len(), window.capacity());
        assert_eq!(window.push(4), Some(1));
        assert_eq!(window.to_vec(), vec![2, 3, 4]);
        assert_eq!(window.latest(), Some(&4));
    }

    #[test]
    fn test_zero_capacity_buffer_is_rejected() {
        let err = SampleBuffer::new(0, 25.0).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_frames_are_dropped_and_counted() {
        let mut buffer = SampleBuffer::new(10, 25.0).unwrap();
        assert!(buffer.append(frame(0, 1.0, 0.9)));
        assert!(!buffer.append(frame(40, 1.0, 1.2)));
        assert!(!buffer.append(frame(80, f64::NAN, 0.9)));
        assert!(!buffer.append(HandFrame::new(
            120,
            Some(WristSample::new(0.0, f64::NEG_INFINITY, 0.0, 0.5, 120)),
            Some(WristSample::new(0.0, 0.0, 0.0, 0.5, 120)),
        )));

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.dropped_frames(), 3);
        assert_eq!(buffer.total_frames(), 1);
    }

    #[test]
    fn test_series_skips_absent_and_low_confidence() {
        let mut buffer = SampleBuffer::new(10, 25.0).unwrap();
        buffer.append(frame(0, 1.0, 0.9));
        buffer.append(HandFrame::empty(40));
        buffer.append(frame(80, 2.0, 0.1));
        buffer.append(frame(120, 3.0, 0.3));

        assert_eq!(
            buffer.series(Limb::Right, Axis::X, 0.3),
            vec![1.0, 3.0]
        );
        assert!(buffer
            .series(Limb::Left, Axis::X, 0.3)
            .is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_appends() {
        let mut buffer = SampleBuffer::new(3, 25.0).unwrap();
        buffer.append(frame(0, 1.0, 0.9));
        buffer.append(frame(40, 2.0, 0.9));

        let snapshot = buffer.snapshot();
        buffer.append(frame(80, 3.0, 0.9));
        buffer.append(frame(120, 4.0, 0.9));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.latest_timestamp_ms(), 40);
        assert_eq!(snapshot.series(Limb::Right, Axis::X, 0.3), vec![1.0, 2.0]);
        assert_eq!(buffer.series(Limb::Right, Axis::X, 0.3), vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest_timestamp_ms(), 120);
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut buffer = SampleBuffer::new(2, 25.0).unwrap();
        buffer.append(frame(0, 1.0, 0.9));
        buffer.append(frame(40, 1.0, 2.0));
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.dropped_frames(), 0);
        assert_eq!(buffer.total_frames(), 0);
        assert_eq!(buffer.latest_timestamp_ms(), 0);
        assert_eq!(buffer.snapshot().latest_timestamp_ms(), 0);
    }
}
