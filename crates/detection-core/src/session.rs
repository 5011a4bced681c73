//! Session-level aggregation of window results.
//!
//! The summary pairs a smoothed score (EMA over every window) with the
//! worst tier ever observed: one high-severity window is never diluted
//! away by calmer windows that follow it.

use motionscreen_common::error::{MotionError, MotionResult};
use motionscreen_motion_model::result::{
    ClassificationResult, DetectionStats, SessionAnalysis, SeverityTier,
};

/// Reference EMA smoothing factor.
pub const DEFAULT_EMA_ALPHA: f64 = 0.3;

/// Accumulates window results for one screening session.
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    alpha: f64,
    window_results: Vec<ClassificationResult>,
    smoothed_score: Option<f64>,
    /// Index of the result holding the worst tier (sufficient data preferred).
    max_index: Option<usize>,
    summary: Option<ClassificationResult>,
    total_frames: u64,
}

impl SessionAggregator {
    pub fn new(alpha: f64) -> MotionResult<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(MotionError::config(format!(
                "ema_alpha must lie in (0, 1], got {alpha}"
            )));
        }
        Ok(Self {
            alpha,
            window_results: Vec::new(),
            smoothed_score: None,
            max_index: None,
            summary: None,
            total_frames: 0,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            alpha: DEFAULT_EMA_ALPHA,
            window_results: Vec::new(),
            smoothed_score: None,
            max_index: None,
            summary: None,
            total_frames: 0,
        }
    }

    /// Append a window result and recompute the summary.
    pub fn record(&mut self, result: ClassificationResult) -> &ClassificationResult {
        let smoothed = match self.smoothed_score {
            None => result.score,
            Some(previous) => self.alpha * result.score + (1.0 - self.alpha) * previous,
        };
        self.smoothed_score = Some(smoothed);

        let index = self.window_results.len();
        let replaces_max = match self.max_index {
            None => true,
            Some(current) => severity_key(&result) > severity_key(&self.window_results[current]),
        };
        if replaces_max {
            self.max_index = Some(index);
        }

        let timestamp_ms = result.timestamp_ms;
        self.window_results.push(result);

        let worst = &self.window_results[self.max_index.unwrap_or(index)];
        let summary = ClassificationResult {
            score: smoothed,
            timestamp_ms,
            ..worst.clone()
        };

        tracing::debug!(
            windows = self.window_results.len(),
            smoothed_score = smoothed,
            tier = %summary.tier,
            "Session summary updated"
        );

        self.summary.insert(summary)
    }

    /// Count frames that entered the session.
    pub fn add_frames(&mut self, count: u64) {
        self.total_frames += count;
    }

    pub fn summary(&self) -> Option<&ClassificationResult> {
        self.summary.as_ref()
    }

    pub fn window_results(&self) -> &[ClassificationResult] {
        &self.window_results
    }

    pub fn window_count(&self) -> usize {
        self.window_results.len()
    }

    /// Owned snapshot of the session, `None` before the first window.
    pub fn analysis(&self) -> Option<SessionAnalysis> {
        self.summary.as_ref().map(|summary| SessionAnalysis {
            window_results: self.window_results.clone(),
            summary: summary.clone(),
        })
    }

    pub fn max_tier(&self) -> SeverityTier {
        self.max_index
            .map(|i| self.window_results[i].tier)
            .unwrap_or_default()
    }

    pub fn detection_stats(&self) -> DetectionStats {
        let Some(max_index) = self.max_index else {
            return DetectionStats::empty(self.total_frames);
        };

        let detections = self
            .window_results
            .iter()
            .filter(|r| r.tier.is_detection())
            .count();
        let worst = &self.window_results[max_index];

        DetectionStats {
            window_count: self.window_results.len(),
            detection_rate: detections as f64 / self.window_results.len() as f64,
            total_frames: self.total_frames,
            max_tier: worst.tier,
            recommendations: worst.recommendations.clone(),
        }
    }

    /// Clear every result, the summary and the frame count together.
    pub fn reset(&mut self) {
        self.window_results.clear();
        self.smoothed_score = None;
        self.max_index = None;
        self.summary = None;
        self.total_frames = 0;
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Worst tier first; on equal tiers a measured result beats "no opinion".
fn severity_key(result: &ClassificationResult) -> (SeverityTier, bool) {
    (result.tier, result.sufficient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{description_for, insufficient_result, recommendations_for};
    use std::collections::BTreeMap;

    fn window(score: f64, tier: SeverityTier, t: u64) -> ClassificationResult {
        ClassificationResult {
            score,
            tier,
            description: description_for(tier).to_string(),
            dominant_frequencies: BTreeMap::new(),
            recommendations: recommendations_for(tier),
            timestamp_ms: t,
            sufficient: true,
        }
    }

    #[test]
    fn test_invalid_alpha_is_rejected() {
        assert!(SessionAggregator::new(0.0).is_err());
        assert!(SessionAggregator::new(1.5).is_err());
        assert!(SessionAggregator::new(f64::NAN).is_err());
        assert!(SessionAggregator::new(1.0).is_ok());
    }

    #[test]
    fn test_ema_over_scores() {
        let mut session = SessionAggregator::with_defaults();
        session.record(window(1.0, SeverityTier::High, 1_000));
        let summary = session.record(window(0.0, SeverityTier::None, 2_000)).clone();
        assert!((summary.score - 0.7).abs() < 1e-12);
        assert_eq!(summary.timestamp_ms, 2_000);

        let summary = session.record(window(0.5, SeverityTier::Medium, 3_000));
        assert!((summary.score - (0.3 * 0.5 + 0.7 * 0.7)).abs() < 1e-12);
    }

    #[test]
    fn test_summary_keeps_worst_tier() {
        let mut session = SessionAggregator::with_defaults();
        session.record(window(0.9, SeverityTier::High, 1_000));
        for i in 0..9 {
            session.record(window(0.0, SeverityTier::None, 2_000 + i * 1_000));
        }

        let summary = session.summary().unwrap();
        assert_eq!(summary.tier, SeverityTier::High);
        assert_eq!(summary.description, description_for(SeverityTier::High));
        assert!(summary.score < 0.9 * 0.7_f64.powi(8));
        assert_eq!(session.max_tier(), SeverityTier::High);
    }

    #[test]
    fn test_measured_none_beats_insufficient_none() {
        let mut session = SessionAggregator::with_defaults();
        session.record(insufficient_result(1_000));
        assert!(!session.summary().unwrap().sufficient);

        session.record(window(0.05, SeverityTier::None, 2_000));
        let summary = session.summary().unwrap();
        assert!(summary.sufficient);
        assert_eq!(summary.description, description_for(SeverityTier::None));
    }

    #[test]
    fn test_detection_stats() {
        let mut session = SessionAggregator::with_defaults();
        assert_eq!(session.detection_stats(), DetectionStats::empty(0));

        session.add_frames(75);
        session.record(window(0.1, SeverityTier::None, 1_000));
        session.record(window(0.5, SeverityTier::Medium, 2_000));
        session.record(window(0.2, SeverityTier::Low, 3_000));
        session.record(window(0.0, SeverityTier::None, 4_000));

        let stats = session.detection_stats();
        assert_eq!(stats.window_count, 4);
        assert!((stats.detection_rate - 0.5).abs() < 1e-12);
        assert_eq!(stats.total_frames, 75);
        assert_eq!(stats.max_tier, SeverityTier::Medium);
        assert_eq!(stats.recommendations, recommendations_for(SeverityTier::Medium));
    }

    #[test]
    fn test_reset_leaves_returned_results_intact() {
        let mut session = SessionAggregator::with_defaults();
        session.add_frames(10);
        let held = session.record(window(0.8, SeverityTier::High, 1_000)).clone();
        let analysis = session.analysis().unwrap();

        session.reset();

        assert!(session.summary().is_none());
        assert!(session.analysis().is_none());
        assert_eq!(session.window_count(), 0);
        assert_eq!(session.detection_stats().total_frames, 0);
        assert_eq!(held.tier, SeverityTier::High);
        assert_eq!(analysis.window_results.len(), 1);

        let summary = session.record(window(0.1, SeverityTier::None, 5_000));
        assert_eq!(summary.tier, SeverityTier::None);
        assert!((summary.score - 0.1).abs() < 1e-12);
    }
}
