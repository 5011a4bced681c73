//! Real-time score over the trailing samples of one series.

use std::path::PathBuf;

use motionscreen_detection_core::{Classifier, RealTimeAnalyzer, SampleBuffer};
use motionscreen_motion_model::sample::{Axis, Limb};

pub fn run(
    file: PathBuf,
    limb: Limb,
    axis: Axis,
    window: Option<usize>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let app_config = super::load_config(config.as_deref())?;
    let source = super::open_recording(&file)?;

    let mut engine_config = app_config.engine;
    if let Some(header) = source.header() {
        engine_config.frame_rate_hz = header.frame_rate_hz;
    }
    if let Some(window) = window {
        engine_config.real_time_window = window;
    }
    engine_config.validate()?;

    let frames = source.into_frames();
    let mut buffer = SampleBuffer::new(frames.len().max(1), engine_config.frame_rate_hz)?;
    for frame in frames {
        buffer.append(frame);
    }
    let series = buffer.series(limb, axis, engine_config.min_confidence);
    let timestamp_ms = buffer.latest_timestamp_ms();

    let analyzer = RealTimeAnalyzer::new(
        engine_config.real_time_window,
        engine_config.frame_rate_hz,
        Classifier::new(engine_config.classifier.clone()),
    );
    let result = analyzer.classify_series(limb, &series, timestamp_ms);

    println!("Real-time analysis: {}", file.display());
    println!("  Series: {limb} wrist, {axis:?} axis ({} samples)", series.len());
    println!("  Window: {} samples", analyzer.window());
    if buffer.dropped_frames() > 0 {
        println!("  Dropped frames: {}", buffer.dropped_frames());
    }
    println!("  Score: {:.3}", result.score);
    println!("  Tier: {}", result.tier);
    if let Some(hz) = result.dominant_frequencies.get(&limb) {
        println!("  Dominant frequency: {hz:.2} Hz");
    }
    println!("  {}", result.description);

    Ok(())
}
