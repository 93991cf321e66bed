//! Application configuration management.
//!
//! Configuration is stored at `~/.config/clubswipe/config.json` and is
//! optional; every field falls back to a default. The `CLUBSWIPE_DATA` and
//! `CLUBSWIPE_EXPORT_DIR` environment variables (also read from `.env`)
//! override the file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "clubswipe";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Data file name inside the data directory
const DATA_FILE: &str = "glee_data.json";

const DATA_ENV: &str = "CLUBSWIPE_DATA";
const EXPORT_DIR_ENV: &str = "CLUBSWIPE_EXPORT_DIR";

const DEFAULT_CLUB_NAME: &str = "ClubSwipe";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub club_name: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read a config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the dataset is saved.
    pub fn data_path(&self) -> Result<PathBuf> {
        self.resolve_data_path(std::env::var_os(DATA_ENV))
    }

    fn resolve_data_path(&self, env_override: Option<OsString>) -> Result<PathBuf> {
        if let Some(path) = non_empty(env_override) {
            return Ok(path);
        }
        if let Some(ref path) = self.data_file {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(DATA_FILE))
    }

    /// Where spreadsheets are written. Defaults to the working directory.
    pub fn export_directory(&self) -> PathBuf {
        self.resolve_export_directory(std::env::var_os(EXPORT_DIR_ENV))
    }

    fn resolve_export_directory(&self, env_override: Option<OsString>) -> PathBuf {
        non_empty(env_override)
            .or_else(|| self.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Log files live next to the data file.
    pub fn log_dir(&self) -> Result<PathBuf> {
        let data_path = self.data_path()?;
        Ok(data_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn club_name(&self) -> &str {
        self.club_name.as_deref().unwrap_or(DEFAULT_CLUB_NAME)
    }
}

fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_wins_for_data_path() {
        let config = Config {
            data_file: Some(PathBuf::from("/from/config.json")),
            ..Config::default()
        };
        let path = config
            .resolve_data_path(Some(OsString::from("/from/env.json")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/from/env.json"));
    }

    #[test]
    fn test_config_file_used_without_env() {
        let config = Config {
            data_file: Some(PathBuf::from("/from/config.json")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_data_path(None).unwrap(),
            PathBuf::from("/from/config.json")
        );
        // Empty env var is ignored
        assert_eq!(
            config.resolve_data_path(Some(OsString::new())).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }

    #[test]
    fn test_export_directory_defaults_to_cwd() {
        let config = Config::default();
        assert_eq!(config.resolve_export_directory(None), PathBuf::from("."));

        let config = Config {
            export_dir: Some(PathBuf::from("/exports")),
            ..Config::default()
        };
        assert_eq!(config.resolve_export_directory(None), PathBuf::from("/exports"));
        assert_eq!(
            config.resolve_export_directory(Some(OsString::from("/env"))),
            PathBuf::from("/env")
        );
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.data_file.is_none());
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_load_from_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"data_file": "/club/glee_data.json",}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_from_reads_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"data_file": "/club/glee_data.json"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("/club/glee_data.json")));
    }

    #[test]
    fn test_config_parses_partial_json() {
        let config: Config = serde_json::from_str(r#"{"club_name": "Pitt Men's Glee Club"}"#).unwrap();
        assert_eq!(config.club_name(), "Pitt Men's Glee Club");
        assert!(config.data_file.is_none());
        assert_eq!(Config::default().club_name(), "ClubSwipe");
    }
}
