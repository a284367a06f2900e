//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$EMLSHELL_CONFIG` (environment variable)
//! 2. `~/.config/emlshell/config.toml` (Linux/macOS)
//!    `%APPDATA%\emlshell\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::viewer::present::is_valid_date_format;
use crate::viewer::ViewerOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Display settings.
    pub display: DisplayConfig,
    /// Where attachments go.
    pub attachments: AttachmentsConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Color theme: "dark" or "light".
    pub theme: String,
    /// Width HTML bodies are rendered at (0 = terminal width).
    pub message_text_width: usize,
    /// `strftime` format for the message date. Empty means the localized short date.
    pub date_format: String,
}

/// Attachment handling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Directory downloads are saved to.
    pub download_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            message_text_width: 0,
            date_format: String::new(),
        }
    }
}

impl Config {
    /// Viewer options for a terminal `terminal_width` columns wide.
    pub fn viewer_options(&self, terminal_width: usize) -> ViewerOptions {
        let text_width = match self.display.message_text_width {
            0 => terminal_width,
            width => width,
        };
        ViewerOptions {
            text_width,
            date_format: Some(self.display.date_format.clone()).filter(|f| !f.is_empty()),
        }
    }

    /// Reset settings that cannot be used to their defaults, with a warning.
    pub fn validate(&mut self) {
        let format = &self.display.date_format;
        if !format.is_empty() && !is_valid_date_format(format) {
            tracing::warn!(
                date_format = %format,
                "Invalid date_format, using the localized date"
            );
            self.display.date_format.clear();
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(mut cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        cfg.validate();
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("EMLSHELL_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("emlshell").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("emlshell")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("emlshell.log")
}

/// Directory downloads are written to.
///
/// Configured directory, then the platform download directory, then home,
/// then the current directory.
pub fn download_dir(config: &Config) -> PathBuf {
    config
        .attachments
        .download_dir
        .clone()
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.display.theme, "dark");
        assert!(cfg.attachments.download_dir.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[display]
theme = "light"

[attachments]
download_dir = "/tmp/mail"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.display.theme, "light");
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(download_dir(&cfg), PathBuf::from("/tmp/mail"));
    }

    #[test]
    fn test_viewer_options() {
        let mut cfg = Config::default();
        let opts = cfg.viewer_options(120);
        assert_eq!(opts.text_width, 120);
        assert!(opts.date_format.is_none());

        cfg.display.message_text_width = 72;
        cfg.display.date_format = "%Y-%m-%d".into();
        let opts = cfg.viewer_options(120);
        assert_eq!(opts.text_width, 72);
        assert_eq!(opts.date_format.as_deref(), Some("%Y-%m-%d"));
    }

    #[test]
    fn test_invalid_date_format_is_dropped() {
        let mut cfg: Config = toml::from_str("[display]\ndate_format = \"%Q\"\n").expect("parse");
        cfg.validate();
        assert!(cfg.display.date_format.is_empty());
        assert!(cfg.viewer_options(80).date_format.is_none());

        cfg.display.date_format = "%d.%m.%Y".into();
        cfg.validate();
        assert_eq!(cfg.display.date_format, "%d.%m.%Y");
    }

    #[test]
    fn test_log_file_in_cache_dir() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/cache"));
        assert_eq!(log_file_path(&cfg), PathBuf::from("/tmp/cache/emlshell.log"));
    }
}
