//! Application and engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MotionError, MotionResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where frame recordings and reports are stored.
    pub recordings_dir: PathBuf,

    /// Detection engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for one motion detection engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the frame buffer (frames).
    pub window_size: usize,

    /// Scheduled analysis tick period (ms).
    pub analysis_interval_ms: u64,

    /// Frame rate of the tracking collaborator, used for frequency conversion.
    pub frame_rate_hz: f64,

    /// Trailing-sample count for real-time scoring.
    pub real_time_window: usize,

    /// Minimum wrist confidence for a sample to enter a coordinate series.
    pub min_confidence: f64,

    /// Smoothing factor for the session score EMA, in (0, 1].
    pub ema_alpha: f64,

    /// Calibration of the classifier.
    pub classifier: ClassifierConfig,
}

/// Calibration constants for motion classification.
///
/// These are tuning defaults, not clinically validated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Variance that maps to a raw score of 1.0 (coordinate units squared).
    pub normalization_constant: f64,

    /// Inclusive lower bound of the stereotypy frequency band (Hz).
    pub stereotypy_band_low_hz: f64,

    /// Inclusive upper bound of the stereotypy frequency band (Hz).
    pub stereotypy_band_high_hz: f64,

    /// Multiplier applied when a limb oscillates inside the band.
    pub in_band_boost: f64,

    /// Multiplier applied when no limb oscillates inside the band.
    pub out_of_band_dampen: f64,

    /// Lowest score classified as LOW.
    pub low_threshold: f64,

    /// Lowest score classified as MEDIUM.
    pub medium_threshold: f64,

    /// Lowest score classified as HIGH.
    pub high_threshold: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "motionscreen=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            analysis_interval_ms: 1000,
            frame_rate_hz: 25.0,
            real_time_window: 50,
            min_confidence: 0.3,
            ema_alpha: 0.3,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            normalization_constant: 1000.0,
            stereotypy_band_low_hz: 2.0,
            stereotypy_band_high_hz: 5.0,
            in_band_boost: 1.2,
            out_of_band_dampen: 0.8,
            low_threshold: 0.15,
            medium_threshold: 0.40,
            high_threshold: 0.70,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl EngineConfig {
    /// Check every parameter; the engine refuses to start on the first violation.
    pub fn validate(&self) -> MotionResult<()> {
        if self.window_size == 0 {
            return Err(MotionError::config("window_size must be greater than zero"));
        }
        if self.analysis_interval_ms == 0 {
            return Err(MotionError::config(
                "analysis_interval_ms must be greater than zero",
            ));
        }
        if !(self.frame_rate_hz.is_finite() && self.frame_rate_hz > 0.0) {
            return Err(MotionError::config(format!(
                "frame_rate_hz must be a positive number, got {}",
                self.frame_rate_hz
            )));
        }
        if self.real_time_window == 0 {
            return Err(MotionError::config(
                "real_time_window must be greater than zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MotionError::config(format!(
                "min_confidence must lie in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(MotionError::config(format!(
                "ema_alpha must lie in (0, 1], got {}",
                self.ema_alpha
            )));
        }
        self.classifier.validate()
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> MotionResult<()> {
        if !(self.normalization_constant.is_finite() && self.normalization_constant > 0.0) {
            return Err(MotionError::config(
                "normalization_constant must be a positive number",
            ));
        }
        if !(self.stereotypy_band_low_hz >= 0.0
            && self.stereotypy_band_low_hz <= self.stereotypy_band_high_hz)
        {
            return Err(MotionError::config(format!(
                "stereotypy band [{}, {}] Hz is not an ordered range",
                self.stereotypy_band_low_hz, self.stereotypy_band_high_hz
            )));
        }
        if self.in_band_boost < 0.0 || self.out_of_band_dampen < 0.0 {
            return Err(MotionError::config("score multipliers must not be negative"));
        }
        if !(0.0 < self.low_threshold
            && self.low_threshold < self.medium_threshold
            && self.medium_threshold < self.high_threshold
            && self.high_threshold <= 1.0)
        {
            return Err(MotionError::config(format!(
                "tier thresholds must satisfy 0 < low < medium < high <= 1, got {}/{}/{}",
                self.low_threshold, self.medium_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> MotionResult<Self> {
        if !path.exists() {
            return Err(MotionError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("motionscreen").join("config.json")
}

/// Default recordings directory.
fn default_recordings_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("motionscreen").join("recordings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 100);
        assert_eq!(config.analysis_interval_ms, 1000);
        assert_eq!(config.real_time_window, 50);
        assert!((config.frame_rate_hz - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_window_size_is_rejected() {
        let config = EngineConfig {
            window_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("window_size"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = EngineConfig {
            analysis_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_bad_frame_rate_is_rejected() {
        for rate in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig {
                frame_rate_hz: rate,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_unordered_thresholds_are_rejected() {
        let config = EngineConfig {
            classifier: ClassifierConfig {
                medium_threshold: 0.8,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_engine_json_uses_defaults() {
        let raw = r#"{
            "recordings_dir": "/tmp/motionscreen",
            "engine": { "window_size": 150 }
        }"#;
        let parsed: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.engine.window_size, 150);
        assert_eq!(parsed.engine.analysis_interval_ms, 1000);
        assert_eq!(parsed.engine.classifier, ClassifierConfig::default());
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_invalid_engine() {
        let dir = std::env::temp_dir().join("motionscreen_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"recordings_dir":"/tmp/x","engine":{"analysis_interval_ms":0}}"#,
        )
        .unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.is_config());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("motionscreen_no_such_config.json");
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, MotionError::FileNotFound { .. }));
    }
}
