//! Deterministic offline replay of a recorded session.
//!
//! Analysis ticks are derived from frame timestamps, so the same
//! recording always yields the same sequence of windows.

use motionscreen_common::clock::AnalysisTicker;
use motionscreen_common::config::EngineConfig;
use motionscreen_common::error::MotionResult;
use motionscreen_detection_core::{CycleResult, MotionEngine};
use motionscreen_motion_model::report::SessionReport;
use motionscreen_motion_model::sample::HandFrame;

/// Every cycle of a replayed session plus its final report.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub cycles: Vec<CycleResult>,
    pub report: SessionReport,
}

/// Replay frames through a fresh engine.
///
/// A cycle runs whenever a frame's timestamp reaches the next tick (before
/// that frame is buffered), and once more at the end for trailing frames.
pub fn replay_offline<I>(frames: I, config: &EngineConfig) -> MotionResult<ReplayOutcome>
where
    I: IntoIterator<Item = HandFrame>,
{
    let mut engine = MotionEngine::new(config.clone())?;
    let mut ticker = AnalysisTicker::new(config.analysis_interval_ms);
    let mut cycles = Vec::new();
    let mut since_cycle = 0usize;
    let mut seen = 0usize;

    for frame in frames {
        if ticker.should_tick(frame.timestamp_ms) {
            cycles.push(engine.run_cycle());
            since_cycle = 0;
        }
        engine.push_frame(frame);
        since_cycle += 1;
        seen += 1;
    }

    if since_cycle > 0 || cycles.is_empty() {
        cycles.push(engine.run_cycle());
    }

    let report = engine.report();
    tracing::debug!(
        frames = seen,
        cycles = cycles.len(),
        tier = %report.tier,
        "Offline replay complete"
    );

    Ok(ReplayOutcome { cycles, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{drain, OscillationConfig, OscillationSource};
    use motionscreen_motion_model::result::SeverityTier;

    fn oscillation(config: OscillationConfig) -> Vec<HandFrame> {
        drain(&mut OscillationSource::new(config)).unwrap()
    }

    #[test]
    fn test_ticks_follow_timestamps() {
        // 250 frames at 25 fps span 0..=9960 ms: ticks at 1 s .. 9 s, then a final cycle
        let frames = oscillation(OscillationConfig::default());
        let outcome = replay_offline(frames, &EngineConfig::default()).unwrap();

        assert_eq!(outcome.cycles.len(), 10);
        assert_eq!(outcome.cycles[0].window.timestamp_ms, 960);
        assert_eq!(outcome.report.window_count, 10);
        assert_eq!(outcome.report.total_frames, 250);
        assert_eq!(outcome.report.severity(), Some(SeverityTier::High));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let frames = oscillation(OscillationConfig {
            frequency_hz: 1.3,
            amplitude: 12.0,
            ..Default::default()
        });
        let first = replay_offline(frames.clone(), &EngineConfig::default()).unwrap();
        let second = replay_offline(frames, &EngineConfig::default()).unwrap();

        assert_eq!(first.cycles, second.cycles);
        assert_eq!(first.report.score.to_bits(), second.report.score.to_bits());
    }

    #[test]
    fn test_empty_replay_reports_insufficient() {
        let outcome = replay_offline(Vec::new(), &EngineConfig::default()).unwrap();
        assert_eq!(outcome.cycles.len(), 1);
        assert!(!outcome.cycles[0].window.sufficient);
        assert!(!outcome.report.sufficient);
    }

    #[test]
    fn test_invalid_config_fails_replay() {
        let config = EngineConfig {
            ema_alpha: 0.0,
            ..Default::default()
        };
        assert!(replay_offline(Vec::new(), &config).unwrap_err().is_config());
    }
}
