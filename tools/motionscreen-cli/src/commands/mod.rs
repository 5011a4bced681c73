pub mod analyze;
pub mod config;
pub mod realtime;
pub mod simulate;
pub mod validate;

use std::path::Path;

use motionscreen_common::config::AppConfig;
use motionscreen_frame_tracker::sources::JsonlFileSource;

/// Explicit config file, or the standard location with default fallback.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

/// Open a frame recording, mapping errors for display.
pub fn open_recording(path: &Path) -> anyhow::Result<JsonlFileSource> {
    JsonlFileSource::open(path).map_err(|e| anyhow::anyhow!("Failed to load recording: {e}"))
}
