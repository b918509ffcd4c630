//! Configuration for the chat client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/sana/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;


/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Caller identifier shipped as the default; matches the test user seeded
/// into the backend's development database.
const DEFAULT_USER_ID: &str = "cc6ecc1f-0b3d-441a-8f5c-8bb8fb03a724";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the chat backend; requests go to {api_url}/api/chatbot
    pub api_url: String,

    /// Fixed caller identifier sent with every request
    pub user_id: String,

    /// Theme name: "dark" or "light"
    pub theme: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000".to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            theme: "dark".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter for the sana target: trace, debug, info, warn, error
    pub level: String,

    /// Whether to also write logs to rotating files
    pub file_enabled: bool,

    /// Directory for log files
    pub file_dir: PathBuf,

    /// Log file name prefix
    pub file_prefix: String,

    /// Rotation policy for log files
    pub file_rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_prefix: "sana".to_string(),
            file_rotation: LogRotation::Daily,
        }
    }
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "hourly" => Some(LogRotation::Hourly),
            "daily" => Some(LogRotation::Daily),
            "never" => Some(LogRotation::Never),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        }
    }
}

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub user_id: Option<String>,
    pub theme: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

/// The [logging] section of the config file
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_prefix: Option<String>,
    pub file_rotation: Option<String>,
}

impl LoggingConfig {
    fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.file_dir),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
            file_rotation: file
                .file_rotation
                .as_deref()
                .and_then(LogRotation::parse)
                .unwrap_or(defaults.file_rotation),
        }
    }
}

impl Config {
    /// Get the config file path: ~/.config/sana/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("sana").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Use Config::default().to_toml() as single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be parsed fails fast with a clear
    /// error rather than silently falling back to defaults while the user
    /// debugs the wrong thing.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Config error: failed to parse {}", path.display());
                    eprintln!();
                    eprintln!("  {}", e);
                    eprintln!();
                    eprintln!("  To reset, run: sana config --reset");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("Config error: cannot read {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        let defaults = Self::default();

        let api_url = std::env::var("SANA_API_URL")
            .ok()
            .or(file.api_url)
            .unwrap_or(defaults.api_url);

        let user_id = std::env::var("SANA_USER_ID")
            .ok()
            .or(file.user_id)
            .unwrap_or(defaults.user_id);

        let theme = std::env::var("SANA_THEME")
            .ok()
            .or(file.theme)
            .unwrap_or(defaults.theme);

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            api_url,
            user_id,
            theme,
            logging,
        }
    }

    /// Render this config as a commented TOML template. Single source of
    /// truth for `ensure_config_exists` and `config --reset`.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# sana configuration
# Environment variables override these values:
#   SANA_API_URL, SANA_USER_ID, SANA_THEME

# Base URL of the chat backend
api_url = "{api_url}"

# Caller identifier sent with every request
user_id = "{user_id}"

# Theme: "dark" or "light"
theme = "{theme}"

[logging]
# Level for the sana target: trace, debug, info, warn, error
level = "{level}"

# Also write JSON logs to rotating files
file_enabled = {file_enabled}
file_dir = "{file_dir}"
file_prefix = "{file_prefix}"
# Rotation: "hourly", "daily", "never"
file_rotation = "{file_rotation}"
"#,
            api_url = self.api_url,
            user_id = self.user_id,
            theme = self.theme,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display(),
            file_prefix = self.logging.file_prefix,
            file_rotation = self.logging.file_rotation.as_str(),
        )
    }
}
