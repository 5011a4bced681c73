//! Replay a frame recording through the detection engine.

use std::path::PathBuf;

use motionscreen_common::config::EngineConfig;
use motionscreen_detection_core::CycleResult;
use motionscreen_frame_tracker::{replay_offline, SessionRunner};
use motionscreen_motion_model::report::SessionReport;

pub async fn run(
    file: PathBuf,
    json: bool,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    live: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let app_config = super::load_config(config.as_deref())?;
    let source = super::open_recording(&file)?;

    let mut engine_config = app_config.engine;
    if let Some(header) = source.header() {
        if (header.frame_rate_hz - engine_config.frame_rate_hz).abs() > f64::EPSILON {
            tracing::info!(
                configured = engine_config.frame_rate_hz,
                recorded = header.frame_rate_hz,
                "Using frame rate from recording header"
            );
            engine_config.frame_rate_hz = header.frame_rate_hz;
        }
    }
    engine_config.validate()?;

    if !json {
        println!("Analyzing recording: {}", file.display());
    }

    let report = if live {
        run_live(source, engine_config, verbose && !json).await?
    } else {
        let outcome = replay_offline(source.into_frames(), &engine_config)?;
        if verbose && !json {
            for (i, cycle) in outcome.cycles.iter().enumerate() {
                print_cycle(i, cycle);
            }
        }
        outcome.report
    };

    let report_json = report.to_json_pretty()?;
    if json {
        println!("{report_json}");
    } else {
        print_report(&report);
    }

    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out, &report_json)?;
        if !json {
            println!("\nReport saved to: {}", out.display());
        }
    }

    Ok(())
}

async fn run_live(
    source: motionscreen_frame_tracker::sources::JsonlFileSource,
    config: EngineConfig,
    print_cycles: bool,
) -> anyhow::Result<SessionReport> {
    let mut runner = SessionRunner::new(Box::new(source), config)?.paced(true);

    if print_cycles {
        let mut index = 0;
        runner.engine_mut().on_result(move |cycle| {
            print_cycle(index, cycle);
            index += 1;
        });
    }

    let stop = runner.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    });

    println!("Replaying at recorded speed. Press Ctrl+C to stop...");
    Ok(runner.run().await?)
}

fn print_cycle(index: usize, cycle: &CycleResult) {
    let window = &cycle.window;
    let frequencies: Vec<String> = window
        .dominant_frequencies
        .iter()
        .map(|(limb, hz)| format!("{limb}={hz:.2}Hz"))
        .collect();
    println!(
        "  [{index:>3}] t={:>7}ms  {:<6} score={:.3}  session={:<6} {}",
        window.timestamp_ms,
        window.tier.as_str(),
        window.score,
        cycle.summary.tier.as_str(),
        if window.is_insufficient() {
            "(insufficient data)".to_string()
        } else {
            frequencies.join(" ")
        }
    );
}

fn print_report(report: &SessionReport) {
    println!();
    println!("Session tier: {}", report.tier);
    println!("  Score: {:.3}", report.score);
    println!("  {}", report.description);
    println!(
        "  Windows: {} ({:.0}% with detections)",
        report.window_count,
        report.detection_rate * 100.0
    );
    println!(
        "  Frames: {} accepted, {} dropped",
        report.total_frames, report.dropped_frames
    );
    for (limb, hz) in &report.dominant_frequencies {
        println!("  Dominant frequency ({limb}): {hz:.2} Hz");
    }
    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for recommendation in &report.recommendations {
            println!("  - {recommendation}");
        }
    }
}
