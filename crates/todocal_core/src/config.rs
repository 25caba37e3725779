//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Resolve the backing file path and logging settings.
//! - Apply caller overrides over platform defaults.
//!
//! # Invariants
//! - The resolved `log_dir` is always absolute.
//! - Explicit overrides always win over defaults.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "todocal";
const DATA_FILE_NAME: &str = "todo_data.json";
const LOG_DIR_NAME: &str = "logs";

/// Caller-supplied values, typically from CLI flags or environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    /// No override given and the platform has no data directory.
    NoDataDir,
    /// Current directory is needed to absolutize a relative path.
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(f, "no platform data directory; pass an explicit path"),
            Self::CurrentDir(err) => write!(f, "failed to read current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::CurrentDir(err) => Some(err),
        }
    }
}

impl AppConfig {
    /// Resolves configuration against platform directories.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, dirs::data_dir(), dirs::data_local_dir())
    }

    /// Resolves configuration against explicit base directories.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        data_dir: Option<PathBuf>,
        data_local_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let data_path = match overrides.data_path {
            Some(path) => path,
            None => data_dir
                .ok_or(ConfigError::NoDataDir)?
                .join(APP_DIR_NAME)
                .join(DATA_FILE_NAME),
        };

        let log_dir = match overrides.log_dir {
            Some(path) => absolutize(&path)?,
            None => {
                let base = data_local_dir.ok_or(ConfigError::NoDataDir)?;
                absolutize(&base.join(APP_DIR_NAME).join(LOG_DIR_NAME))?
            }
        };

        let log_level = overrides
            .log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            data_path,
            log_level,
            log_dir,
        })
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
