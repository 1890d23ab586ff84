//! Loading of the `config.json` file that points at the database.

use crate::error::{Result, SchedulerError};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Shown to the user when the config file is missing
pub const EXAMPLE_CONFIG: &str = r#"{
    "database": "student_course_schedule.db"
}"#;

/// Connection settings for the scheduler database
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    pub database: PathBuf,
}

impl Config {
    pub fn new<P: AsRef<Path>>(database: P) -> Self {
        Config {
            database: database.as_ref().to_path_buf(),
        }
    }

    /// Read and parse a config file. Unknown keys such as `host` or
    /// `password` are ignored. A relative `database` path is taken relative
    /// to the config file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SchedulerError::ConfigMissing(path.to_path_buf()),
            _ => SchedulerError::Io(e),
        })?;

        let mut config: Config =
            serde_json::from_str(&contents).map_err(|e| SchedulerError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if config.database.as_os_str().is_empty() {
            return Err(SchedulerError::InvalidConfig {
                path: path.to_path_buf(),
                reason: "'database' must not be empty".to_string(),
            });
        }

        if config.database.is_relative() {
            if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                config.database = dir.join(&config.database);
            }
        }

        tracing::debug!(config = %path.display(), database = %config.database.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_relative_database() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"database": "school.db"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, temp.path().join("school.db"));
    }

    #[test]
    fn test_load_ignores_server_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "host": "localhost",
                "user": "root",
                "password": "yourpassword",
                "database": "/var/lib/school.db"
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("/var/lib/school.db"));
    }

    #[test]
    fn test_missing_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.json");

        let result = Config::load(&path);
        assert!(matches!(result, Err(SchedulerError::ConfigMissing(p)) if p == path));
    }

    #[test]
    fn test_malformed_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(SchedulerError::InvalidConfig { .. })
        ));

        fs::write(&path, r#"{"host": "localhost"}"#).unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(SchedulerError::InvalidConfig { .. })
        ));

        fs::write(&path, r#"{"database": ""}"#).unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(SchedulerError::InvalidConfig { .. })
        ));
    }
}
