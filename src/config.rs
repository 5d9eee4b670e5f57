use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Days a release may be late before a project is reported stale
pub const DEFAULT_GRACE_DAYS: u32 = 14;

/// Log level used when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Catalog configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Directory of project modules; falls back to `<data dir>/datasets`
    pub datasets_dir: Option<PathBuf>,
    /// Abort on finalize errors instead of skipping the offending registrations
    pub strict: bool,
    pub freshness: FreshnessConfig,
    pub logging: LoggingConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            datasets_dir: None,
            strict: true,
            freshness: FreshnessConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FreshnessConfig {
    pub grace_days: u32,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            grace_days: DEFAULT_GRACE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
    /// Emit one JSON object per line instead of plain text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl CatalogConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn datasets_dir(&self) -> PathBuf {
        self.datasets_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("datasets"))
    }
}

/// Returns the path to the data directory for release-catalog.
/// Uses $XDG_DATA_HOME/release-catalog if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-catalog,
/// or ./release-catalog if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("release-catalog.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-catalog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn catalog_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<CatalogConfig>(json!({
            "freshness": {
                "graceDays": 30
            }
        }))
        .unwrap();

        assert_eq!(result.freshness.grace_days, 30);
        assert!(result.strict);
        assert_eq!(result.logging, LoggingConfig::default());
        assert_eq!(result.datasets_dir, None);
    }

    #[test]
    fn catalog_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<CatalogConfig>(json!({
            "datasetsDir": "/srv/catalog/datasets",
            "strict": false,
            "freshness": { "graceDays": 7 },
            "logging": { "level": "debug", "json": true }
        }))
        .unwrap();

        assert_eq!(
            result,
            CatalogConfig {
                datasets_dir: Some(PathBuf::from("/srv/catalog/datasets")),
                strict: false,
                freshness: FreshnessConfig { grace_days: 7 },
                logging: LoggingConfig {
                    level: "debug".to_string(),
                    json: true,
                },
            }
        );
    }

    #[test]
    fn load_reads_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "strict": false }"#).unwrap();

        let config = CatalogConfig::load(&path).unwrap();

        assert!(!config.strict);
        assert_eq!(config.freshness.grace_days, DEFAULT_GRACE_DAYS);
    }

    #[test]
    fn load_returns_json_error_for_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ strict: false }").unwrap();

        let err = CatalogConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn datasets_dir_prefers_configured_directory() {
        let config = CatalogConfig {
            datasets_dir: Some(PathBuf::from("/srv/datasets")),
            ..CatalogConfig::default()
        };

        assert_eq!(config.datasets_dir(), PathBuf::from("/srv/datasets"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/release-catalog"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/release-catalog"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./release-catalog"));
    }
}
