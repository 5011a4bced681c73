//! Low-latency scoring of a single coordinate series.
//!
//! Bypasses the buffer and the session aggregator but runs the exact same
//! [`extract`] and [`Classifier::classify`] as the session path, so both
//! agree on any identical trailing slice.

use motionscreen_common::config::EngineConfig;
use motionscreen_common::error::MotionResult;
use motionscreen_motion_model::result::{ClassificationResult, RealTimeScore};
use motionscreen_motion_model::sample::{Limb, TimestampMs};

use crate::classify::Classifier;
use crate::features::{extract, LimbFeatures};

/// Default trailing-sample count.
pub const DEFAULT_REAL_TIME_WINDOW: usize = 50;

/// Score the trailing `window` values of `coordinates` with the reference calibration.
pub fn analyze_real_time(
    coordinates: &[f64],
    window: usize,
    frame_rate_hz: f64,
    timestamp_ms: TimestampMs,
) -> RealTimeScore {
    RealTimeAnalyzer::new(window, frame_rate_hz, Classifier::with_defaults())
        .analyze(coordinates, timestamp_ms)
}

/// Real-time scorer bound to one window size, frame rate and calibration.
#[derive(Debug, Clone)]
pub struct RealTimeAnalyzer {
    window: usize,
    frame_rate_hz: f64,
    classifier: Classifier,
}

impl RealTimeAnalyzer {
    pub fn new(window: usize, frame_rate_hz: f64, classifier: Classifier) -> Self {
        Self {
            window,
            frame_rate_hz,
            classifier,
        }
    }

    /// Build from engine settings, validating them first.
    pub fn from_config(config: &EngineConfig) -> MotionResult<Self> {
        config.validate()?;
        Ok(Self::new(
            config.real_time_window,
            config.frame_rate_hz,
            Classifier::new(config.classifier.clone()),
        ))
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn analyze(&self, coordinates: &[f64], timestamp_ms: TimestampMs) -> RealTimeScore {
        let result = self.classify_series(Limb::Right, coordinates, timestamp_ms);
        RealTimeScore {
            score: result.score,
            timestamp_ms,
        }
    }

    /// Full classification of the trailing slice, attributed to `limb`.
    pub fn classify_series(
        &self,
        limb: Limb,
        coordinates: &[f64],
        timestamp_ms: TimestampMs,
    ) -> ClassificationResult {
        let features = extract(trailing(coordinates, self.window), self.frame_rate_hz);
        self.classifier.classify(
            &[LimbFeatures::from_single_series(limb, features)],
            timestamp_ms,
        )
    }
}

/// The last `window` elements, or the whole slice when shorter.
fn trailing(coordinates: &[f64], window: usize) -> &[f64] {
    &coordinates[coordinates.len().saturating_sub(window)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::MIN_SAMPLES;

    #[test]
    fn test_trailing_slice() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing(&values, 2), &[3.0, 4.0]);
        assert_eq!(trailing(&values, 10), &values);
        assert!(trailing(&values, 0).is_empty());
    }

    #[test]
    fn test_short_series_scores_zero() {
        let values: Vec<f64> = (0..MIN_SAMPLES - 1)
            .map(|i| (i % 2) as f64 * 100.0)
            .collect();
        let score = analyze_real_time(&values, 50, 25.0, 7);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.timestamp_ms, 7);
    }

    #[test]
    fn test_non_finite_coordinates_do_not_raise_severity() {
        let clean: Vec<f64> = (0..50)
            .map(|i| 0.1 * (2.0 * std::f64::consts::PI * 3.0 * i as f64 / 25.0 + 0.3).sin())
            .collect();
        let baseline = analyze_real_time(&clean, 50, 25.0, 0).score;
        assert!(baseline < 0.01);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut values = clean.clone();
            values[10] = bad;
            let score = analyze_real_time(&values, 50, 25.0, 0).score;
            assert!(score.is_finite());
            assert!(score < 0.01, "{bad} scored {score}");

            let analyzer = RealTimeAnalyzer::new(50, 25.0, Classifier::with_defaults());
            let result = analyzer.classify_series(Limb::Right, &values, 0);
            assert_eq!(result.tier, motionscreen_motion_model::result::SeverityTier::None);
        }
    }

    #[test]
    fn test_only_trailing_window_counts() {
        // Violent motion followed by 50 still samples.
        let mut values: Vec<f64> = (0..100)
            .map(|i| if i % 2 == 0 { -100.0 } else { 100.0 })
            .collect();
        values.extend(std::iter::repeat(3.0).take(50));

        assert_eq!(analyze_real_time(&values, 50, 25.0, 0).score, 0.0);
        assert!(analyze_real_time(&values, 150, 25.0, 0).score > 0.0);
    }

    #[test]
    fn test_from_config_rejects_invalid_settings() {
        let config = EngineConfig {
            real_time_window: 0,
            ..Default::default()
        };
        assert!(RealTimeAnalyzer::from_config(&config).is_err());
        assert_eq!(
            RealTimeAnalyzer::from_config(&EngineConfig::default())
                .unwrap()
                .window(),
            DEFAULT_REAL_TIME_WINDOW
        );
    }
}
