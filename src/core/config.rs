//! Settings from the environment (`.env` is loaded by the binary first).

use std::env;
use std::path::PathBuf;

use crate::core::paths;
use crate::core::storage::FileStorage;

pub const DATA_DIR_VAR: &str = "CHAT_ENHANCE_DATA_DIR";
pub const EXPORT_DIR_VAR: &str = "CHAT_ENHANCE_EXPORT_DIR";
pub const EXPORT_TITLE_VAR: &str = "CHAT_ENHANCE_EXPORT_TITLE";
pub const FILE_PREFIX_VAR: &str = "CHAT_ENHANCE_FILE_PREFIX";

pub const DEFAULT_EXPORT_TITLE: &str = "Chat History";
pub const DEFAULT_FILE_PREFIX: &str = "chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of the storage file (theme, preferences).
    pub data_dir: PathBuf,
    /// Where exports are written unless `--out` is given.
    pub export_dir: PathBuf,
    pub export_title: String,
    pub file_prefix: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine a data directory; set {DATA_DIR_VAR}")]
    NoDataDir,
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{FILE_PREFIX_VAR} must not contain path separators: '{0}'")]
    InvalidPrefix(String),
}

impl Config {
    /// Storage backing the theme and preferences.
    pub fn storage(&self) -> FileStorage {
        FileStorage::in_dir(&self.data_dir)
    }
}

/// Load configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration through `lookup`. Unset and blank variables take their default.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let data_dir = match var(DATA_DIR_VAR) {
        Some(dir) => PathBuf::from(dir),
        None => paths::config_dir().ok_or(ConfigError::NoDataDir)?,
    };
    let export_dir = var(EXPORT_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(paths::current_dir);
    let export_title = var(EXPORT_TITLE_VAR).unwrap_or_else(|| DEFAULT_EXPORT_TITLE.to_string());

    let file_prefix = match lookup(FILE_PREFIX_VAR) {
        None => DEFAULT_FILE_PREFIX.to_string(),
        Some(p) if p.trim().is_empty() => return Err(ConfigError::Empty(FILE_PREFIX_VAR)),
        Some(p) if p.contains(['/', '\\']) => return Err(ConfigError::InvalidPrefix(p)),
        Some(p) => p.trim().to_string(),
    };

    Ok(Config {
        data_dir,
        export_dir,
        export_title,
        file_prefix,
    })
}
