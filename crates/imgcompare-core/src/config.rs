use crate::error::{Error, Result};
use crate::types::ComparisonKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for a comparison run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metrics to compute for every pair, in output order
    pub comparisons: Vec<ComparisonKind>,

    /// Root directory for diff images, source copies and meta.json
    pub export_dir: Option<PathBuf>,

    /// Number of jobs in flight at once (0 = one per CPU)
    pub threads: usize,

    /// Whether to draw a progress bar while jobs run
    pub show_progress: bool,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comparisons: ComparisonKind::ALL.to_vec(),
            export_dir: None,
            threads: 1,
            show_progress: true,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.comparisons.is_empty() {
            return Err(Error::Configuration("No comparison type set".to_string()));
        }

        if let Some(dir) = &self.export_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(Error::Configuration(format!(
                    "Export destination is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Worker count with `0` resolved to the number of CPUs
    pub fn effective_threads(&self) -> usize {
        match self.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.threads, 1);
        assert_eq!(config.comparisons.len(), 5);
    }

    #[test]
    fn test_empty_comparisons_rejected() {
        let config = Config {
            comparisons: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_export_dir_must_be_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let config = Config {
            export_dir: Some(file),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_threads() {
        let auto = Config {
            threads: 0,
            ..Default::default()
        };
        assert!(auto.effective_threads() >= 1);

        let fixed = Config {
            threads: 3,
            ..Default::default()
        };
        assert_eq!(fixed.effective_threads(), 3);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("imgcompare.json");

        let config = Config {
            comparisons: vec![ComparisonKind::Quad, ComparisonKind::Mse],
            export_dir: Some(PathBuf::from("out")),
            threads: 4,
            show_progress: false,
            log_level: LogLevel::Debug,
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.comparisons, config.comparisons);
        assert_eq!(loaded.export_dir, config.export_dir);
        assert_eq!(loaded.threads, 4);
        assert!(!loaded.show_progress);
        assert_eq!(loaded.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"threads": 2}"#).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.threads, 2);
        assert_eq!(loaded.comparisons, ComparisonKind::ALL.to_vec());
    }
}
