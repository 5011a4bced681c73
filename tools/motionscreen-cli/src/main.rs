//! MotionScreen CLI — Command-line interface for screening sessions.
//!
//! Usage:
//!   motionscreen analyze <FILE>    Replay a frame recording and report severity
//!   motionscreen simulate          Generate a synthetic oscillation recording
//!   motionscreen realtime <FILE>   Score the trailing window of one limb/axis
//!   motionscreen validate <FILE>   Check a frame recording for problems
//!   motionscreen config            Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use motionscreen_common::config::AppConfig;
use motionscreen_frame_tracker::sources::OscillationConfig;
use motionscreen_motion_model::sample::{Axis, Limb};

mod commands;

#[derive(Parser)]
#[command(
    name = "motionscreen",
    about = "Repetitive motion screening from hand-tracking data",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a frame recording through the detection engine
    Analyze {
        /// Path to the JSONL frame recording
        file: PathBuf,

        /// Print the session report as JSON
        #[arg(long)]
        json: bool,

        /// Write the JSON report to this file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Configuration file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Replay at recorded speed with wall-clock analysis ticks (Ctrl+C stops)
        #[arg(long)]
        live: bool,
    },

    /// Generate a synthetic oscillation recording
    Simulate {
        /// Output file
        #[arg(short, long, default_value = "simulated.jsonl")]
        output: PathBuf,

        /// Oscillation frequency (Hz)
        #[arg(long, default_value = "3.0")]
        frequency: f64,

        /// Peak displacement (coordinate units)
        #[arg(long, default_value = "50.0")]
        amplitude: f64,

        /// Number of frames
        #[arg(long, default_value = "250")]
        frames: u64,

        /// Frame rate (Hz)
        #[arg(long, default_value = "25.0")]
        fps: f64,

        /// Detection confidence of every sample
        #[arg(long, default_value = "0.9")]
        confidence: f64,

        /// Leave the left wrist undetected
        #[arg(long)]
        occlude_left: bool,

        /// Leave the right wrist undetected
        #[arg(long)]
        occlude_right: bool,
    },

    /// Real-time score over the trailing samples of one series
    Realtime {
        /// Path to the JSONL frame recording
        file: PathBuf,

        /// Limb to score: left|right
        #[arg(long, default_value = "right")]
        limb: Limb,

        /// Coordinate axis: x|y|z
        #[arg(long, default_value = "x")]
        axis: Axis,

        /// Trailing window size (defaults to the configured value)
        #[arg(long)]
        window: Option<usize>,

        /// Configuration file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check a frame recording for problems
    Validate {
        /// Path to the JSONL frame recording
        file: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Configuration file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the default configuration to the standard location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from the standard config; --verbose raises the level
    let mut logging = AppConfig::load().logging;
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    motionscreen_common::logging::init_logging(&logging)?;

    match cli.command {
        Commands::Analyze {
            file,
            json,
            out,
            config,
            live,
        } => commands::analyze::run(file, json, out, config, live, cli.verbose).await,
        Commands::Simulate {
            output,
            frequency,
            amplitude,
            frames,
            fps,
            confidence,
            occlude_left,
            occlude_right,
        } => commands::simulate::run(
            output,
            OscillationConfig {
                frequency_hz: frequency,
                amplitude,
                frame_rate_hz: fps,
                frames: Some(frames),
                confidence,
                occlude_left,
                occlude_right,
                ..Default::default()
            },
        ),
        Commands::Realtime {
            file,
            limb,
            axis,
            window,
            config,
        } => commands::realtime::run(file, limb, axis, window, config),
        Commands::Validate { file } => commands::validate::run(file),
        Commands::Config { config, init } => commands::config::run(config, init),
    }
}
