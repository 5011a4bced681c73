//! Classification results produced per analysis window and per session.
//!
//! All result types are plain values. Callers receive owned clones, so a
//! session reset never alters a result that was already handed out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sample::{Limb, TimestampMs};

/// Discrete motion severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityTier {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Error returned when a tier string is not one of the four labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity tier '{0}' (expected NONE, LOW, MEDIUM or HIGH)")]
pub struct TierParseError(pub String);

impl SeverityTier {
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::None,
        SeverityTier::Low,
        SeverityTier::Medium,
        SeverityTier::High,
    ];

    /// Stable string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::None => "NONE",
            SeverityTier::Low => "LOW",
            SeverityTier::Medium => "MEDIUM",
            SeverityTier::High => "HIGH",
        }
    }

    /// Whether this tier counts as a detection (LOW or above).
    pub fn is_detection(&self) -> bool {
        *self >= SeverityTier::Low
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SeverityTier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeverityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TierParseError(s.to_string()))
    }
}

/// Outcome of classifying one analysis window (or a whole session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Normalized severity score in [0.0, 1.0].
    pub score: f64,

    pub tier: SeverityTier,

    /// Human-readable summary of the tier.
    pub description: String,

    /// Dominant oscillation frequency (Hz) of every limb that had enough data.
    pub dominant_frequencies: BTreeMap<Limb, f64>,

    /// Tier-keyed follow-up suggestions. Never empty.
    pub recommendations: Vec<String>,

    /// Timestamp of the newest frame that contributed (ms since session start).
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// False when no limb had enough samples to form an opinion.
    pub sufficient: bool,
}

impl ClassificationResult {
    /// Whether this result is a "no opinion" result rather than a measurement.
    pub fn is_insufficient(&self) -> bool {
        !self.sufficient
    }
}

/// Score from the low-latency single-series path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealTimeScore {
    pub score: f64,
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,
}

/// Every window result of a session plus the derived summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    /// Window results in recording order. Append-only within a session.
    pub window_results: Vec<ClassificationResult>,

    /// Session-level result: smoothed score, worst observed tier.
    pub summary: ClassificationResult,
}

/// Read-only aggregate view over a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Number of recorded window results.
    pub window_count: usize,

    /// Fraction of windows classified LOW or above, in [0.0, 1.0].
    pub detection_rate: f64,

    /// Frames accepted into the session so far.
    pub total_frames: u64,

    /// Worst tier observed.
    pub max_tier: SeverityTier,

    /// Recommendations of the worst observed window.
    pub recommendations: Vec<String>,
}

impl DetectionStats {
    /// Stats for a session with no windows yet.
    pub fn empty(total_frames: u64) -> Self {
        Self {
            window_count: 0,
            detection_rate: 0.0,
            total_frames,
            max_tier: SeverityTier::None,
            recommendations: Vec::new(),
        }
    }
}
