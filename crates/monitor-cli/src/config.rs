//! Host configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `DROWSY_*`
//! environment variables (`DROWSY_` prefix, `__` between section and key,
//! e.g. `DROWSY_DMS__ALERT_THRESHOLD_SECS=2.5`).

use alerting::AlertConfig;
use config::{Config, ConfigError, Environment, File};
use dms::DmsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Demo frames are stamped in whole milliseconds
const MAX_DEMO_FPS: u32 = 1000;

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Complete host configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dms: DmsConfig,
    pub alert: AlertConfig,
    pub feed: FeedConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// JSON-lines recording (`-` for stdin); the demo script runs when unset
    pub input: Option<String>,
    /// Pace frames by their timestamps and drop stale ones
    pub realtime: bool,
    /// Frame rate of the demo script
    pub demo_fps: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            input: None,
            realtime: false,
            demo_fps: 30,
        }
    }
}

/// Overlay output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Write one JSON snapshot per frame to stdout
    pub json_snapshots: bool,
    /// Pixel size used to project overlay markers
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            json_snapshots: false,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then `path` (if given), then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            debug!("Loading configuration from: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("DROWSY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Check every section before a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dms
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        self.alert
            .validate()
            .map_err(|e| ConfigError::Message(format!("alert: {}", e)))?;

        if !(1..=MAX_DEMO_FPS).contains(&self.feed.demo_fps) {
            return Err(ConfigError::Message(format!(
                "feed.demo_fps must be between 1 and {}, got {}",
                MAX_DEMO_FPS, self.feed.demo_fps
            )));
        }
        if self.render.frame_width == 0 || self.render.frame_height == 0 {
            return Err(ConfigError::Message(format!(
                "render frame size must be non-zero, got {}x{}",
                self.render.frame_width, self.render.frame_height
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Message(format!(
                "logging.format must be one of {}, got '{}'",
                LOG_FORMATS.join(", "),
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Serializes tests that read or write the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_without_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.dms, DmsConfig::default());
        assert_eq!(config.feed.demo_fps, 30);
        assert_eq!(config.alert.message, "Both eyes closed!");
    }

    #[test]
    fn test_file_overrides() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[dms]
eye_open_threshold = 0.015
alert_threshold_secs = 2.5

[dms.mouth_pair]
upper = 0
lower = 17

[alert]
sink = "bell"
repeat_interval_secs = 1.0

[feed]
input = "session.jsonl"
realtime = true
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!((config.dms.eye_open_threshold - 0.015).abs() < 1e-6);
        assert_eq!(config.dms.alert_threshold_secs, 2.5);
        assert_eq!(config.dms.mouth_pair.lower, 17);
        // Untouched keys keep their defaults
        assert_eq!(config.dms.mouth_open_threshold, 0.05);
        assert_eq!(config.dms.left_eye_pair.upper, 386);
        assert_eq!(config.alert.sink, alerting::SinkKind::Bell);
        assert_eq!(config.feed.input.as_deref(), Some("session.jsonl"));
        assert!(config.feed.realtime);
    }

    #[test]
    fn test_missing_file_is_error() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        assert!(AppConfig::load(Some(Path::new("/nonexistent/drowsy.toml"))).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("DROWSY_DMS__ALERT_THRESHOLD_SECS", "2.5");
        std::env::set_var("DROWSY_FEED__DEMO_FPS", "60");
        let loaded = AppConfig::load(None);
        std::env::remove_var("DROWSY_DMS__ALERT_THRESHOLD_SECS");
        std::env::remove_var("DROWSY_FEED__DEMO_FPS");

        let config = loaded.unwrap();
        assert_eq!(config.dms.alert_threshold_secs, 2.5);
        assert_eq!(config.feed.demo_fps, 60);
        assert_eq!(config.dms.eye_open_threshold, 0.02);
    }

    #[test]
    fn test_validate_sections() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.dms.alert_threshold_secs = 1e20;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.alert.repeat_interval_secs = -2.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.feed.demo_fps = 2000;
        assert!(config.validate().is_err());
        config.feed.demo_fps = 0;
        assert!(config.validate().is_err());
        config.feed.demo_fps = 1000;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.render.frame_height = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[dms]"));
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
