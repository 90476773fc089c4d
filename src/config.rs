//! Configuration with layered hierarchy
//!
//! Built-in defaults, then the user's `config.json`, then environment
//! variables. Command-line flags are applied last by the caller.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::writer::DEFAULT_EXPORT_FILE;

pub const DATA_DIR_ENV: &str = "DMC_DB_DATA_DIR";
pub const LOG_ENV: &str = "DMC_DB_LOG";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the four CSV files
    pub data_dir: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `dmc_db=debug`
    pub log_filter: Option<String>,

    /// File the browser writes mission exports to
    pub export_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Result<Self> {
        Self::layered(Self::global_config_path().as_deref(), Self::from_env())
    }

    /// Defaults, then the file at `global` if there is one, then `env`.
    /// A config file that exists but does not parse is an error.
    pub fn layered(global: Option<&Path>, env: Config) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = global.filter(|p| p.exists()) {
            config.merge(Self::from_path(path)?);
        }

        config.merge(env);
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))
    }

    fn from_env() -> Self {
        Self::from_vars(|key| std::env::var_os(key))
    }

    /// The environment layer, reading variables through `var`
    fn from_vars(var: impl Fn(&str) -> Option<OsString>) -> Self {
        Config {
            data_dir: var(DATA_DIR_ENV).map(PathBuf::from),
            log_filter: var(LOG_ENV).and_then(|v| v.into_string().ok()),
            export_file: None,
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dmc-db")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the interactive browser writes its log
    pub fn log_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dmc-db")
            .map(|dirs| dirs.cache_dir().join("dmc-db.log"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.log_filter.is_some() {
            self.log_filter = other.log_filter;
        }
        if other.export_file.is_some() {
            self.export_file = other.export_file;
        }
    }

    pub fn export_file(&self) -> PathBuf {
        self.export_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
    }

    /// Export destination: the `-o` flag, then the configured file, then the default
    pub fn export_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.export_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            data_dir: Some("a".into()),
            log_filter: Some("info".into()),
            export_file: None,
        };
        base.merge(Config {
            data_dir: Some("b".into()),
            log_filter: None,
            export_file: Some("out.csv".into()),
        });
        assert_eq!(base.data_dir, Some(PathBuf::from("b")));
        assert_eq!(base.log_filter.as_deref(), Some("info"));
        assert_eq!(base.export_file(), PathBuf::from("out.csv"));
    }

    #[test]
    fn test_from_path_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "data_dir": "/srv/dmc" }"#).unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/dmc")));
        assert_eq!(config.log_filter, None);
        assert_eq!(config.export_file(), PathBuf::from(DEFAULT_EXPORT_FILE));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let pairs: Vec<(String, OsString)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_env_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "data_dir": "/from/file", "log_filter": "info", "export_file": "file.csv" }"#,
        )
        .unwrap();

        let env = Config::from_vars(vars(&[(DATA_DIR_ENV, "/from/env"), (LOG_ENV, "dmc_db=trace")]));
        let config = Config::layered(Some(&path), env).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/env")));
        assert_eq!(config.log_filter.as_deref(), Some("dmc_db=trace"));
        // Not settable from the environment, so the file value stays
        assert_eq!(config.export_file(), PathBuf::from("file.csv"));

        let config = Config::layered(Some(&path), Config::from_vars(vars(&[]))).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/file")));
        assert_eq!(config.log_filter.as_deref(), Some("info"));
    }

    #[test]
    fn test_layered_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");

        let config = Config::layered(Some(&missing), Config::from_vars(vars(&[]))).unwrap();
        assert_eq!(config.data_dir, None);
        let config = Config::layered(None, Config::from_vars(vars(&[(DATA_DIR_ENV, "d")]))).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("d")));
    }

    #[test]
    fn test_layered_fails_on_malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "data_dir = 1").unwrap();

        let err = Config::layered(Some(&path), Config::from_vars(vars(&[]))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"), "{:#}", err);
    }

    #[test]
    fn test_export_path_prefers_flag_then_config() {
        let config = Config {
            export_file: Some("configured.csv".into()),
            ..Config::default()
        };
        assert_eq!(config.export_path(Some("-".into())), PathBuf::from("-"));
        assert_eq!(config.export_path(None), PathBuf::from("configured.csv"));
        assert_eq!(
            Config::default().export_path(None),
            PathBuf::from(DEFAULT_EXPORT_FILE)
        );
    }

    #[test]
    fn test_from_path_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "data_dir = 1").unwrap();
        assert!(Config::from_path(&path).is_err());
    }
}
