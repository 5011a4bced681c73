//! Validate a frame recording.

use std::path::PathBuf;

use motionscreen_motion_model::sample::Limb;

pub fn run(file: PathBuf) -> anyhow::Result<()> {
    println!("Validating recording: {}", file.display());

    let source = super::open_recording(&file)?;
    match source.header() {
        Some(header) => {
            println!("  Schema version: {}", header.schema_version);
            println!("  Recorded at: {}", header.epoch_wall);
            println!("  Frame rate: {} Hz", header.frame_rate_hz);
            if !header.source.is_empty() {
                println!("  Source: {}", header.source);
            }
        }
        None => println!("  Header: missing"),
    }

    let frames = source.into_frames();
    println!("  Frames: {}", frames.len());

    let mut issues = Vec::new();

    let invalid = frames.iter().filter(|f| !f.is_valid()).count();
    if invalid > 0 {
        issues.push(format!(
            "{invalid} frame(s) with invalid confidence or coordinates will be dropped"
        ));
    }

    let untracked = frames.iter().filter(|f| f.limb_count() == 0).count();
    if untracked > 0 {
        println!("  Frames without any wrist: {untracked}");
    }

    let out_of_order = frames
        .windows(2)
        .filter(|pair| pair[1].timestamp_ms < pair[0].timestamp_ms)
        .count();
    if out_of_order > 0 {
        issues.push(format!("{out_of_order} timestamp(s) go backwards"));
    }

    for limb in Limb::ALL {
        let present = frames.iter().filter(|f| f.wrist(limb).is_some()).count();
        let pct = if frames.is_empty() {
            0.0
        } else {
            present as f64 / frames.len() as f64 * 100.0
        };
        println!("  {limb} wrist present: {present} ({pct:.0}%)");
    }

    if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
        println!(
            "  Duration: {:.2}s",
            last.timestamp_ms.saturating_sub(first.timestamp_ms) as f64 / 1_000.0
        );
    }

    if frames.is_empty() {
        issues.push("recording contains no frames".to_string());
    }

    if issues.is_empty() {
        println!("\nRecording is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Analysis may be unreliable.",
            issues.len()
        );
    }

    Ok(())
}
