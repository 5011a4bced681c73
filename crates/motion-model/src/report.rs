//! Flat session report for the reporting collaborator.
//!
//! The report is the persistence/transmission contract: field names and
//! types stay stable across versions, and fields added later must carry
//! `#[serde(default)]` so older payloads still parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::result::{ClassificationResult, DetectionStats, SeverityTier};

/// Current report schema version.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Serializable summary of one screening session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time the report was produced (RFC 3339).
    pub generated_at: String,

    /// Worst observed tier as a string enum ("NONE", "LOW", ...).
    pub tier: String,

    /// Smoothed session score.
    pub score: f64,

    pub description: String,

    /// Dominant frequency per limb name ("left", "right").
    pub dominant_frequencies: BTreeMap<String, f64>,

    pub recommendations: Vec<String>,

    /// Number of analysis windows in the session.
    pub window_count: usize,

    /// Fraction of windows at LOW or above.
    pub detection_rate: f64,

    /// Frames accepted into the session.
    pub total_frames: u64,

    /// Frames rejected at ingestion (invalid confidence or coordinates).
    #[serde(default)]
    pub dropped_frames: u64,

    /// Whether the summary rests on enough data.
    #[serde(default)]
    pub sufficient: bool,
}

impl SessionReport {
    /// Build a report from a session summary and its stats.
    pub fn new(summary: &ClassificationResult, stats: &DetectionStats, dropped_frames: u64) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            tier: summary.tier.as_str().to_string(),
            score: summary.score,
            description: summary.description.clone(),
            dominant_frequencies: summary
                .dominant_frequencies
                .iter()
                .map(|(limb, hz)| (limb.as_str().to_string(), *hz))
                .collect(),
            recommendations: summary.recommendations.clone(),
            window_count: stats.window_count,
            detection_rate: stats.detection_rate,
            total_frames: stats.total_frames,
            dropped_frames,
            sufficient: summary.sufficient,
        }
    }

    /// The tier parsed back into its enum form.
    pub fn severity(&self) -> Option<SeverityTier> {
        self.tier.parse().ok()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
