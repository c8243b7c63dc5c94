// crates/showcut-core/src/config.rs
//
// Front-end configuration, loaded from `showcut.json` in the working
// directory. Every field has a default, so a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::{ParamError, TaskParameters};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "showcut.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error(transparent)]
    Params(#[from] ParamError),
}

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned for source images and videos.
    pub source_dir: PathBuf,

    /// Directory the slices are written to.
    pub output_dir: PathBuf,

    /// File name inside `source_dir` to process. First scanned file when unset.
    pub source_file: Option<String>,

    /// 1–10, higher keeps more frames.
    pub sampling_rate: u8,

    /// 0 fastest … 3 best.
    pub quality: u8,

    /// Put the showcase console snippet on the clipboard after a successful run.
    pub copy_snippet: bool,

    /// Open `output_dir` in the system file browser after a successful run.
    pub open_output_dir: bool,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "showcut_media=debug,warn").
    pub level: String,

    /// Log file, truncated at start-up. Warnings also go to stderr; with no
    /// file everything does.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_dir:      PathBuf::from("target_resource"),
            output_dir:      PathBuf::from("output"),
            source_file:     None,
            sampling_rate:   10,
            quality:         2,
            copy_snippet:    true,
            open_output_dir: true,
            logging:         LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file:  Some(PathBuf::from("log").join("debug.log")),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a malformed one
    /// is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        let config: Self = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the numeric settings without building a full parameter set.
    pub fn validate(&self) -> Result<(), ParamError> {
        TaskParameters::new("", "", self.sampling_rate, self.quality).map(|_| ())
    }

    /// Parameters for a run over `source`.
    pub fn task_for(&self, source: PathBuf) -> Result<TaskParameters, ParamError> {
        TaskParameters::new(source, self.output_dir.clone(), self.sampling_rate, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join(CONFIG_FILE);
        std::fs::write(&p, r#"{ "sampling_rate": 4, "logging": { "level": "debug" } }"#).unwrap();

        let cfg = AppConfig::load(&p).unwrap();
        assert_eq!(cfg.sampling_rate, 4);
        assert_eq!(cfg.quality, 2);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn desktop_actions_can_be_switched_off() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join(CONFIG_FILE);

        let cfg = AppConfig::load(&p).unwrap();
        assert!(cfg.copy_snippet && cfg.open_output_dir);

        std::fs::write(&p, r#"{ "copy_snippet": false, "open_output_dir": false }"#).unwrap();
        let cfg = AppConfig::load(&p).unwrap();
        assert!(!cfg.copy_snippet);
        assert!(!cfg.open_output_dir);
        assert_eq!(cfg.quality, 2);
    }

    #[test]
    fn out_of_range_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join(CONFIG_FILE);
        std::fs::write(&p, r#"{ "quality": 9 }"#).unwrap();
        assert!(matches!(AppConfig::load(&p), Err(ConfigError::Params(ParamError::Quality(9)))));
    }

    #[test]
    fn malformed_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join(CONFIG_FILE);
        std::fs::write(&p, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&p), Err(ConfigError::Parse { .. })));
    }
}
