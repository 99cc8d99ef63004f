//! Gradebook configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{StoreOptions, DEFAULT_FIRST_ID};

/// Top-level gradebook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// Directory holding the account files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Teacher accounts file, relative to `data_dir`.
    #[serde(default = "default_teachers_file")]
    pub teachers_file: String,
    /// Student accounts file, relative to `data_dir`.
    #[serde(default = "default_students_file")]
    pub students_file: String,
    /// First identifier handed out on an empty data set.
    #[serde(default = "default_first_id")]
    pub first_id: u64,
    /// Reject grades outside 0–100 and ratings outside 1–5.
    #[serde(default = "default_true")]
    pub enforce_ranges: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_teachers_file() -> String {
    "teachers.txt".to_string()
}
fn default_students_file() -> String {
    "students.txt".to_string()
}
fn default_first_id() -> u64 {
    DEFAULT_FIRST_ID
}
fn default_true() -> bool {
    true
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            teachers_file: default_teachers_file(),
            students_file: default_students_file(),
            first_id: default_first_id(),
            enforce_ranges: true,
        }
    }
}

impl GradebookConfig {
    pub fn teachers_path(&self) -> PathBuf {
        self.data_dir.join(&self.teachers_file)
    }

    pub fn students_path(&self) -> PathBuf {
        self.data_dir.join(&self.students_file)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            first_id: self.first_id,
            enforce_ranges: self.enforce_ranges,
        }
    }
}

/// Name of the config file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "gradebook.toml";

/// Load config from an explicit path, or search the current directory.
///
/// Environment override: `GRADEBOOK_DATA_DIR` replaces `data_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            local.exists().then_some(local)
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradebookConfig::default(),
    };

    if let Ok(dir) = std::env::var("GRADEBOOK_DATA_DIR") {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<GradebookConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GradebookConfig::default();
        assert_eq!(config.first_id, 1000);
        assert!(config.enforce_ranges);
        assert_eq!(config.teachers_path(), PathBuf::from("data/teachers.txt"));
        assert_eq!(config.students_path(), PathBuf::from("data/students.txt"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
data_dir = "/var/lib/gradebook"
enforce_ranges = false
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/gradebook"));
        assert!(!config.enforce_ranges);
        assert_eq!(config.students_file, "students.txt");
        assert!(!config.store_options().enforce_ranges);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/gradebook.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "first_id = 1\nteachers_file = \"t.csv\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.first_id, 1);
        assert_eq!(config.teachers_file, "t.csv");
    }

    #[test]
    fn bad_toml_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "first_id = \"many\"").unwrap();

        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }
}
