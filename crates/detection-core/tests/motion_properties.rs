use motionscreen_common::config::EngineConfig;
use motionscreen_detection_core::buffer::SampleBuffer;
use motionscreen_detection_core::features::{extract, MIN_SAMPLES};
use motionscreen_detection_core::realtime::analyze_real_time;
use motionscreen_detection_core::MotionEngine;
use motionscreen_motion_model::result::SeverityTier;
use motionscreen_motion_model::sample::{Axis, HandFrame, Limb, WristSample};
use proptest::prelude::*;

const FPS: f64 = 25.0;

fn frame_time(i: usize) -> u64 {
    (i as f64 * 1_000.0 / FPS).round() as u64
}

fn right_wrist_frame(i: usize, x: f64, confidence: f64) -> HandFrame {
    let t = frame_time(i);
    HandFrame::new(t, None, Some(WristSample::new(x, 120.0, -4.0, confidence, t)))
}

fn sine(i: usize, frequency_hz: f64, amplitude: f64) -> f64 {
    let t = i as f64 / FPS;
    amplitude * (2.0 * std::f64::consts::PI * frequency_hz * t + 0.3).sin()
}

fn engine_with_window(window_size: usize) -> MotionEngine {
    MotionEngine::new(EngineConfig {
        window_size,
        ..Default::default()
    })
    .expect("valid config")
}

#[test]
fn constant_series_scores_zero() {
    for value in [0.0, 0.1, -37.25, 1_000.0] {
        let mut engine = engine_with_window(100);
        for i in 0..MIN_SAMPLES + 5 {
            engine.push_frame(right_wrist_frame(i, value, 0.9));
        }
        let result = engine.analyze_window();
        assert!(result.sufficient);
        assert_eq!(result.score, 0.0, "value {value}");
        assert_eq!(result.tier, SeverityTier::None);
    }
}

#[test]
fn three_hertz_oscillation_is_recovered() {
    let series: Vec<f64> = (0..100).map(|i| sine(i, 3.0, 50.0)).collect();
    let features = extract(&series, FPS);
    assert!((features.dominant_frequency_hz - 3.0).abs() <= 0.5);

    let mut engine = engine_with_window(100);
    for (i, x) in series.iter().enumerate() {
        engine.push_frame(right_wrist_frame(i, *x, 0.95));
    }
    let result = engine.run_cycle().window;

    assert!(result.tier >= SeverityTier::Medium);
    let hz = result.dominant_frequencies[&Limb::Right];
    assert!((hz - 3.0).abs() <= 0.5, "dominant frequency {hz}");
}

#[test]
fn buffer_keeps_most_recent_frames_in_order() {
    let mut buffer = SampleBuffer::new(100, FPS).unwrap();
    for i in 0..130 {
        buffer.append(right_wrist_frame(i, i as f64, 0.9));
    }
    assert_eq!(buffer.len(), 100);
    let expected: Vec<f64> = (30..130).map(|i| i as f64).collect();
    assert_eq!(buffer.series(Limb::Right, Axis::X, 0.3), expected);
}

#[test]
fn analysis_cycle_is_idempotent() {
    let mut engine = engine_with_window(100);
    for i in 0..80 {
        engine.push_frame(right_wrist_frame(i, sine(i, 2.2, 18.0), 0.8));
    }
    let first = engine.run_cycle().window;
    let second = engine.run_cycle().window;

    assert_eq!(first, second);
    assert_eq!(first.score.to_bits(), second.score.to_bits());
}

#[test]
fn real_time_and_session_paths_agree() {
    let window = 50;
    let mut engine = MotionEngine::new(EngineConfig {
        window_size: window,
        real_time_window: window,
        ..Default::default()
    })
    .unwrap();

    let mut xs = Vec::new();
    for i in 0..90 {
        let x = sine(i, 2.7, 12.0) + 0.05 * (i % 7) as f64;
        xs.push(x);
        engine.push_frame(right_wrist_frame(i, x, 0.9));
    }

    let session_score = engine.analyze_window().score;
    let real_time = analyze_real_time(&xs, window, FPS, frame_time(89));
    let via_engine = engine.real_time_score(Limb::Right, Axis::X);

    assert!((session_score - real_time.score).abs() < 1e-9);
    assert!((session_score - via_engine.score).abs() < 1e-9);
    assert!(session_score > 0.0);
}

#[test]
fn one_high_window_dominates_the_session_tier() {
    let mut engine = engine_with_window(25);
    let mut frame = 0;

    for _ in 0..25 {
        engine.push_frame(right_wrist_frame(frame, sine(frame, 3.0, 60.0), 0.9));
        frame += 1;
    }
    let first = engine.run_cycle();
    assert_eq!(first.window.tier, SeverityTier::High);

    let mut scores = vec![first.summary.score];
    for _ in 0..9 {
        for _ in 0..25 {
            engine.push_frame(right_wrist_frame(frame, 5.0, 0.9));
            frame += 1;
        }
        let outcome = engine.run_cycle();
        assert_eq!(outcome.window.tier, SeverityTier::None);
        scores.push(outcome.summary.score);
    }

    let summary = engine.session_analysis().unwrap().summary;
    assert_eq!(summary.tier, SeverityTier::High);
    assert!(scores.windows(2).all(|w| w[1] < w[0]));
    assert!(summary.score < 0.05);

    let stats = engine.detection_stats();
    assert_eq!(stats.window_count, 10);
    assert!((stats.detection_rate - 0.1).abs() < 1e-12);
    assert_eq!(stats.total_frames, 250);
    assert_eq!(stats.max_tier, SeverityTier::High);
}

#[test]
fn low_confidence_frames_give_no_opinion() {
    let mut engine = engine_with_window(100);
    for i in 0..20 {
        engine.push_frame(right_wrist_frame(i, sine(i, 3.0, 50.0), 0.1));
    }
    assert!(engine.buffer().series(Limb::Right, Axis::X, 0.3).is_empty());

    let result = engine.analyze_window();
    assert!(!result.sufficient);
    assert_eq!(result.tier, SeverityTier::None);
    assert!(result.dominant_frequencies.is_empty());
}

#[test]
fn occluded_limb_does_not_count_as_still() {
    let mut engine = engine_with_window(100);
    for i in 0..60 {
        let t = frame_time(i);
        let left = (i % 3 != 0).then(|| WristSample::new(sine(i, 3.0, 40.0), 0.0, 0.0, 0.9, t));
        engine.push_frame(HandFrame::new(t, left, None));
    }
    let result = engine.analyze_window();
    assert!(result.sufficient);
    assert!(result.dominant_frequencies.contains_key(&Limb::Left));
    assert!(!result.dominant_frequencies.contains_key(&Limb::Right));
    assert!(result.tier >= SeverityTier::Medium);
}

#[test]
fn cycle_result_serializes_for_the_ui() {
    let mut engine = engine_with_window(100);
    for i in 0..40 {
        engine.push_frame(right_wrist_frame(i, sine(i, 3.0, 50.0), 0.9));
    }
    let outcome = engine.run_cycle();
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["window"]["tier"], "HIGH");
    assert_eq!(value["summary"]["tier"], "HIGH");
}

proptest! {
    #[test]
    fn larger_amplitude_never_lowers_score(
        small in 0.5f64..80.0,
        factor in 1.0f64..5.0,
    ) {
        let large = small * factor;
        let series = |amplitude: f64| -> Vec<f64> {
            (0..100).map(|i| sine(i, 3.0, amplitude)).collect()
        };

        let low = analyze_real_time(&series(small), 100, FPS, 0).score;
        let high = analyze_real_time(&series(large), 100, FPS, 0).score;
        prop_assert!(high >= low, "amplitude {} -> {}, {} -> {}", small, low, large, high);
    }

    #[test]
    fn buffer_length_is_capped_at_capacity(capacity in 1usize..200, extra in 1usize..200) {
        let mut buffer = SampleBuffer::new(capacity, FPS).unwrap();
        for i in 0..capacity + extra {
            buffer.append(right_wrist_frame(i, i as f64, 0.9));
        }
        prop_assert_eq!(buffer.len(), capacity);

        let kept: Vec<u64> = buffer.frames().map(|f| f.timestamp_ms).collect();
        let expected: Vec<u64> = (extra..capacity + extra).map(frame_time).collect();
        prop_assert_eq!(kept, expected);
    }
}
