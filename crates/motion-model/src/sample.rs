//! Wrist samples and hand frames produced by the tracking collaborator.
//!
//! Frames are recorded in append-only JSONL format, one frame per line.
//! A wrist that was not detected in a frame is `None`; it is never
//! represented by a zero-valued sample.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in milliseconds since session start.
pub type TimestampMs = u64;

/// Which wrist a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    Left,
    Right,
}

impl Limb {
    pub const ALL: [Limb; 2] = [Limb::Left, Limb::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Limb::Left => "left",
            Limb::Right => "right",
        }
    }
}

impl std::fmt::Display for Limb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Limb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Limb::Left),
            "right" | "r" => Ok(Limb::Right),
            other => Err(format!("unknown limb '{other}' (expected left or right)")),
        }
    }
}

/// Coordinate axis of a wrist position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("unknown axis '{other}' (expected x, y or z)")),
        }
    }
}

/// A single 3D wrist position with detection confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WristSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Detection confidence in [0.0, 1.0].
    pub confidence: f64,
    /// Milliseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,
}

impl WristSample {
    pub fn new(x: f64, y: f64, z: f64, confidence: f64, timestamp_ms: TimestampMs) -> Self {
        Self {
            x,
            y,
            z,
            confidence,
            timestamp_ms,
        }
    }

    /// Coordinate value along one axis.
    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Finite coordinates and a confidence inside [0, 1].
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Both wrists as observed in one tracking frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    /// Milliseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    #[serde(rename = "left", default, skip_serializing_if = "Option::is_none")]
    pub left_wrist: Option<WristSample>,

    #[serde(rename = "right", default, skip_serializing_if = "Option::is_none")]
    pub right_wrist: Option<WristSample>,
}

impl HandFrame {
    pub fn new(
        timestamp_ms: TimestampMs,
        left_wrist: Option<WristSample>,
        right_wrist: Option<WristSample>,
    ) -> Self {
        Self {
            timestamp_ms,
            left_wrist,
            right_wrist,
        }
    }

    /// A frame in which neither wrist was detected.
    pub fn empty(timestamp_ms: TimestampMs) -> Self {
        Self::new(timestamp_ms, None, None)
    }

    /// The sample for one limb, if it was detected.
    pub fn wrist(&self, limb: Limb) -> Option<&WristSample> {
        match limb {
            Limb::Left => self.left_wrist.as_ref(),
            Limb::Right => self.right_wrist.as_ref(),
        }
    }

    /// Every present wrist sample is valid. Absent wrists are fine.
    pub fn is_valid(&self) -> bool {
        Limb::ALL
            .iter()
            .filter_map(|limb| self.wrist(*limb))
            .all(WristSample::is_valid)
    }

    /// Number of limbs present in this frame.
    pub fn limb_count(&self) -> usize {
        Limb::ALL
            .iter()
            .filter(|limb| self.wrist(**limb).is_some())
            .count()
    }
}

/// Metadata written as the first (comment) line of a frame recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    /// Nominal frame rate of the tracking collaborator (Hz).
    pub frame_rate_hz: f64,

    /// Name of the frame source that produced the recording.
    #[serde(default)]
    pub source: String,
}

/// Current recording schema version.
pub const RECORDING_SCHEMA_VERSION: &str = "1.0";

/// Parse the header from a `# {...}` comment line, if the line is one.
pub fn parse_header_line(line: &str) -> Option<RecordingHeader> {
    let json = line.trim().strip_prefix('#')?.trim();
    serde_json::from_str(json).ok()
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<HandFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[HandFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
