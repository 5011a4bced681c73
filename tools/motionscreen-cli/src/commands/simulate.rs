//! Generate a synthetic oscillation recording.

use std::path::PathBuf;

use motionscreen_common::clock::SessionClock;
use motionscreen_frame_tracker::sources::{OscillationConfig, OscillationSource};
use motionscreen_frame_tracker::writer::FrameWriter;
use motionscreen_frame_tracker::FrameSource;
use motionscreen_motion_model::sample::{RecordingHeader, RECORDING_SCHEMA_VERSION};

pub fn run(output: PathBuf, config: OscillationConfig) -> anyhow::Result<()> {
    if !(config.frame_rate_hz.is_finite() && config.frame_rate_hz > 0.0) {
        anyhow::bail!("Frame rate must be positive, got {}", config.frame_rate_hz);
    }
    if !(0.0..=1.0).contains(&config.confidence) {
        anyhow::bail!("Confidence must lie in [0, 1], got {}", config.confidence);
    }

    println!("Simulating oscillation: {}", output.display());
    println!("  Frequency: {} Hz", config.frequency_hz);
    println!("  Amplitude: {}", config.amplitude);
    println!("  Frames: {}", config.frames.unwrap_or(0));
    println!("  FPS: {}", config.frame_rate_hz);

    let header = RecordingHeader {
        schema_version: RECORDING_SCHEMA_VERSION.to_string(),
        epoch_wall: SessionClock::start().epoch_wall().to_string(),
        frame_rate_hz: config.frame_rate_hz,
        source: "oscillation".to_string(),
    };

    let mut source = OscillationSource::new(config);
    let mut writer = FrameWriter::create(output, &header)?;
    while let Some(frame) = source.poll()? {
        writer.write_frame(&frame)?;
    }
    let recording = writer.finish()?;

    println!(
        "\nWrote {} frames ({:.2}s) to: {}",
        recording.frames,
        recording.duration_ms as f64 / 1_000.0,
        recording.path.display()
    );
    Ok(())
}
