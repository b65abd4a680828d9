// EstateHub - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for EstateHub data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/estatehub/).
    pub config_dir: PathBuf,

    /// Full path of config.toml.
    pub config_file: PathBuf,

    /// Data directory holding the persisted session.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            // config.toml sits one level above config/ on platforms where the
            // config dir is nested (%APPDATA%\EstateHub\config\).
            let config_file = config_dir
                .parent()
                .unwrap_or(&config_dir)
                .join(constants::CONFIG_FILE_NAME);
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_file.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                config_file,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_file: fallback.join(constants::CONFIG_FILE_NAME),
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Apply `--config-dir` / `--data-dir` overrides on top of `resolve()`.
    ///
    /// An overridden config dir holds config.toml directly.
    pub fn with_overrides(config_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let mut paths = Self::resolve();
        if let Some(dir) = config_dir {
            paths.config_file = dir.join(constants::CONFIG_FILE_NAME);
            paths.config_dir = dir;
        }
        if let Some(dir) = data_dir {
            paths.data_dir = dir;
        }
        paths
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub api: ApiSection,
    pub listings: ListingsSection,
    pub chat: ChatSection,
    pub logging: LoggingSection,
}

/// `[api]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Backend base URL, without a trailing slash.
    pub base_url: Option<String>,
}

/// `[listings]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ListingsSection {
    /// Cards per page in listing views.
    pub page_size: Option<usize>,
}

/// `[chat]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ChatSection {
    pub reply_delay_min_ms: Option<u64>,
    pub reply_delay_max_ms: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            page_size: constants::DEFAULT_PAGE_SIZE,
            reply_delay_min_ms: constants::DEFAULT_REPLY_DELAY_MIN_MS,
            reply_delay_max_ms: constants::DEFAULT_REPLY_DELAY_MAX_MS,
            log_level: None,
            log_file: None,
        }
    }
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
    .to_string()
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, field_warnings) = validate(raw);
    warnings.extend(field_warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

/// Check each field against its bounds, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- API: base_url --
    if let Some(url) = raw.api.base_url {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            config.api_base_url = trimmed.to_string();
        } else {
            warnings.push(out_of_range(
                "api.base_url",
                &url,
                format!("an http(s) URL. Using default ({})", constants::DEFAULT_API_BASE_URL),
            ));
        }
    }

    // -- Listings: page_size --
    if let Some(size) = raw.listings.page_size {
        if (constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE).contains(&size) {
            config.page_size = size;
        } else {
            warnings.push(out_of_range(
                "listings.page_size",
                size,
                format!(
                    "{}-{}. Using default ({})",
                    constants::MIN_PAGE_SIZE,
                    constants::MAX_PAGE_SIZE,
                    constants::DEFAULT_PAGE_SIZE
                ),
            ));
        }
    }

    // -- Chat: reply delay bounds --
    let delay_range = 0..=constants::MAX_REPLY_DELAY_MS;
    let mut min = config.reply_delay_min_ms;
    let mut max = config.reply_delay_max_ms;
    for (field, value, slot) in [
        ("chat.reply_delay_min_ms", raw.chat.reply_delay_min_ms, &mut min),
        ("chat.reply_delay_max_ms", raw.chat.reply_delay_max_ms, &mut max),
    ] {
        if let Some(ms) = value {
            if delay_range.contains(&ms) {
                *slot = ms;
            } else {
                warnings.push(out_of_range(
                    field,
                    ms,
                    format!("0-{}", constants::MAX_REPLY_DELAY_MS),
                ));
            }
        }
    }
    if min <= max {
        config.reply_delay_min_ms = min;
        config.reply_delay_max_ms = max;
    } else {
        warnings.push(out_of_range(
            "chat.reply_delay_min_ms",
            min,
            format!(
                "at most reply_delay_max_ms ({max}). Using defaults ({}-{})",
                constants::DEFAULT_REPLY_DELAY_MIN_MS,
                constants::DEFAULT_REPLY_DELAY_MAX_MS
            ),
        ));
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "logging.level",
                &level,
                "error, warn, info, debug, trace. Using default (info)".to_string(),
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(PathBuf::from(file));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_str(toml_text: &str) -> (AppConfig, Vec<String>) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, toml_text).unwrap();
        load_config(&path)
    }

    #[test]
    fn test_missing_file_gives_defaults_without_warnings() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(config.api_base_url, constants::DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = load_str(
            r#"
            [api]
            base_url = "https://estates.example.com/api/"
            [listings]
            page_size = 12
            [chat]
            reply_delay_min_ms = 0
            reply_delay_max_ms = 50
            [logging]
            level = "DEBUG"
            [unknown]
            ignored = true
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.api_base_url, "https://estates.example.com/api");
        assert_eq!(config.page_size, 12);
        assert_eq!((config.reply_delay_min_ms, config.reply_delay_max_ms), (0, 50));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = load_str(
            "[listings]\npage_size = 0\n[chat]\nreply_delay_max_ms = 999999\n",
        );
        assert_eq!(warnings.len(), 2);
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(config.reply_delay_max_ms, constants::DEFAULT_REPLY_DELAY_MAX_MS);
    }

    #[test]
    fn test_inverted_delay_bounds_fall_back() {
        let (config, warnings) =
            load_str("[chat]\nreply_delay_min_ms = 500\nreply_delay_max_ms = 100\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.reply_delay_min_ms, constants::DEFAULT_REPLY_DELAY_MIN_MS);
        assert_eq!(config.reply_delay_max_ms, constants::DEFAULT_REPLY_DELAY_MAX_MS);
    }

    #[test]
    fn test_unparseable_file_still_starts() {
        let (config, warnings) = load_str("this is = = not toml");
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
    }
}
