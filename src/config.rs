use anyhow::{Context, Result};
use config::builder::{ConfigBuilder, DefaultState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ui: UiConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval for the TUI loop
    pub refresh_rate_ms: u64,
    /// How long the "Copied!" confirmation stays visible (default: 2000)
    #[serde(default = "default_copied_display_ms")]
    pub copied_display_ms: u64,
}

fn default_copied_display_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for log files
    pub state: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

/// Reference content source
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContentConfig {
    /// TOML file replacing the bundled call script and objections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Clipboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Command line that reads text on stdin (e.g. "xclip -selection clipboard").
    /// Unset = auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Helper must exit within this many milliseconds or the export falls back
    /// to manual copy (default: 2000)
    #[serde(default = "default_clipboard_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_clipboard_timeout_ms() -> u64 {
    2000
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_ms: default_clipboard_timeout_ms(),
        }
    }
}

fn default_state_dir() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("callsheet").to_string_lossy().to_string())
        .unwrap_or_else(|| ".callsheet".to_string())
}

impl Config {
    /// Path to the user config file in ~/.config/callsheet/
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("callsheet").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Self::defaults_builder()?;

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. CALLSHEET__UI__REFRESH_RATE_MS
        builder = builder.add_source(
            config::Environment::with_prefix("CALLSHEET")
                .separator("__")
                .try_parsing(true),
        );

        Self::build(builder)
    }

    /// Builder seeded with embedded defaults so callsheet works without config files
    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>> {
        let defaults_json =
            serde_json::to_string(&Config::default()).context("Failed to serialize default config")?;

        Ok(config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        )))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Resolved content file, if one is configured
    pub fn content_path(&self) -> Option<PathBuf> {
        let raw = self.content.path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let path = PathBuf::from(raw);
        Some(if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        })
    }

    pub fn refresh_rate(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ui.refresh_rate_ms)
    }

    pub fn copied_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ui.copied_display_ms)
    }

    pub fn clipboard_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.clipboard.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                refresh_rate_ms: 250,
                copied_display_ms: default_copied_display_ms(),
            },
            paths: PathsConfig {
                state: default_state_dir(),
            },
            logging: LoggingConfig::default(),
            content: ContentConfig::default(),
            clipboard: ClipboardConfig::default(),
        }
    }
}
