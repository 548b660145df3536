//! Checker configuration (.grading-checker.toml)
//!
//! Precedence: built-in defaults → project file → CLI flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the optional per-project checker configuration.
pub const CONFIG_FILE_NAME: &str = ".grading-checker.toml";

/// Default name of grading configuration files.
pub const GRADING_FILE_NAME: &str = "grading.yml";

/// Default name of submit descriptor files.
pub const SUBMIT_FILE_NAME: &str = "submit.yml";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Checker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Base name of grading configuration files
    pub grading_file_name: String,

    /// Base name of submit descriptor files
    pub submit_file_name: String,

    /// Descend into symlinked directories while discovering files
    pub follow_links: bool,

    /// Directory names skipped during discovery (e.g. [".git", "target"])
    pub ignore_dirs: Vec<String>,

    /// Report every invalid configuration instead of stopping at the first
    pub keep_going: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            grading_file_name: GRADING_FILE_NAME.to_string(),
            submit_file_name: SUBMIT_FILE_NAME.to_string(),
            follow_links: false,
            ignore_dirs: Vec::new(),
            keep_going: false,
        }
    }
}

impl CheckerConfig {
    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.grading-checker.toml` from the project root, or defaults if absent.
    ///
    /// An explicit path must exist.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = project_root.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    log::debug!("loading checker config from {}", path.display());
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("grading_file_name", &self.grading_file_name),
            ("submit_file_name", &self.submit_file_name),
        ] {
            if value.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "'{}' must not be empty",
                    field
                )));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(ConfigError::ValidationError(format!(
                    "'{}' must be a file name, not a path: {}",
                    field, value
                )));
            }
        }

        if self.grading_file_name == self.submit_file_name {
            return Err(ConfigError::ValidationError(
                "'grading_file_name' and 'submit_file_name' must differ".to_string(),
            ));
        }

        Ok(())
    }
}
