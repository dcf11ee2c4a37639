use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::{CONFIG_FILE_NAME, ConfigError, DashboardConfig, map_app_dir_error};

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<DashboardConfig, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load configuration from a specific TOML file, returning defaults if missing.
pub fn load_from_path(path: &Path) -> Result<DashboardConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}; using defaults", path.display());
        return Ok(DashboardConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<DashboardConfig>(&text)
        .map(DashboardConfig::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}
