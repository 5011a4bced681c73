//! Severity classification.
//!
//! Variance alone is ambiguous (it could be incidental movement), so the
//! normalized variance score is boosted when a limb oscillates inside the
//! stereotypy band and dampened otherwise, then bucketed into a tier.

use std::collections::BTreeMap;

use motionscreen_common::config::ClassifierConfig;
use motionscreen_motion_model::result::{ClassificationResult, SeverityTier};
use motionscreen_motion_model::sample::TimestampMs;

use crate::features::LimbFeatures;

/// Description used when no limb had enough samples.
pub const INSUFFICIENT_DATA_DESCRIPTION: &str =
    "Insufficient data: not enough reliable wrist samples in this window to assess motion.";

/// Maps limb features to a classification result.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifier with the reference calibration.
    pub fn with_defaults() -> Self {
        Self::new(ClassifierConfig::default())
    }

    /// Classify one window. Limbs without enough samples are ignored.
    pub fn classify(&self, limbs: &[LimbFeatures], timestamp_ms: TimestampMs) -> ClassificationResult {
        let participating: Vec<&LimbFeatures> = limbs.iter().filter(|l| l.sufficient()).collect();

        if participating.is_empty() {
            return insufficient_result(timestamp_ms);
        }

        let avg_variance = participating.iter().map(|l| l.variance()).sum::<f64>()
            / participating.len() as f64;
        // f64::min would turn a NaN into a full score
        if !avg_variance.is_finite() {
            return insufficient_result(timestamp_ms);
        }
        let raw = (avg_variance / self.config.normalization_constant).min(1.0);

        let dominant_frequencies: BTreeMap<_, _> = participating
            .iter()
            .map(|l| (l.limb, l.dominant_frequency_hz()))
            .collect();

        let in_band = dominant_frequencies.values().any(|hz| self.in_band(*hz));
        let score = if in_band {
            (raw * self.config.in_band_boost).min(1.0)
        } else {
            (raw * self.config.out_of_band_dampen).min(1.0)
        };

        let tier = self.tier_for_score(score);

        ClassificationResult {
            score,
            tier,
            description: description_for(tier).to_string(),
            dominant_frequencies,
            recommendations: recommendations_for(tier),
            timestamp_ms,
            sufficient: true,
        }
    }

    /// Bucket a score; every lower bound is inclusive.
    pub fn tier_for_score(&self, score: f64) -> SeverityTier {
        if score >= self.config.high_threshold {
            SeverityTier::High
        } else if score >= self.config.medium_threshold {
            SeverityTier::Medium
        } else if score >= self.config.low_threshold {
            SeverityTier::Low
        } else {
            SeverityTier::None
        }
    }

    /// Whether a frequency lies in the stereotypy band (bounds inclusive).
    pub fn in_band(&self, frequency_hz: f64) -> bool {
        frequency_hz >= self.config.stereotypy_band_low_hz
            && frequency_hz <= self.config.stereotypy_band_high_hz
    }
}

/// Classify with the reference calibration.
pub fn classify(limbs: &[LimbFeatures], timestamp_ms: TimestampMs) -> ClassificationResult {
    Classifier::with_defaults().classify(limbs, timestamp_ms)
}

/// The "no opinion" result.
pub fn insufficient_result(timestamp_ms: TimestampMs) -> ClassificationResult {
    ClassificationResult {
        score: 0.0,
        tier: SeverityTier::None,
        description: INSUFFICIENT_DATA_DESCRIPTION.to_string(),
        dominant_frequencies: BTreeMap::new(),
        recommendations: vec![
            "Make sure both hands are visible to the camera.".to_string(),
            "Improve lighting or move closer so the wrists can be tracked reliably.".to_string(),
        ],
        timestamp_ms,
        sufficient: false,
    }
}

pub fn description_for(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::None => "No repetitive motion detected.",
        SeverityTier::Low => {
            "Mild repetitive motion detected; occasional rhythmic hand movement was observed."
        }
        SeverityTier::Medium => {
            "Moderate repetitive motion detected; rhythmic hand movement recurs during the session."
        }
        SeverityTier::High => {
            "Pronounced repetitive motion detected; sustained rhythmic hand movement in the stereotypy range."
        }
    }
}

pub fn recommendations_for(tier: SeverityTier) -> Vec<String> {
    let lines: &[&str] = match tier {
        SeverityTier::None => &["No action needed based on hand motion."],
        SeverityTier::Low => &[
            "Keep observing; mild repetitive movement is common and often incidental.",
            "Repeat the screening at a later time to compare.",
        ],
        SeverityTier::Medium => &[
            "Note when the repetitive movement occurs (excitement, stress, concentration).",
            "Discuss the observed motion patterns with a pediatrician.",
        ],
        SeverityTier::High => &[
            "Consider a follow-up assessment with a developmental specialist.",
            "Share this report with a qualified clinician; it is not a diagnosis.",
        ],
    };
    lines.iter().map(|s| s.to_string()).collect()
}
