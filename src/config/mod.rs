//! Dashboard configuration stored as TOML in the app directory.
//!
//! Every field carries a serde default, so a missing or partial file still
//! yields a usable configuration.

use crate::app_dirs;

mod defaults;
mod errors;
mod load;
mod save;
mod types;

#[cfg(test)]
mod tests;

/// Default filename used to store the dashboard configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub use errors::ConfigError;
pub use load::{config_path, load_from_path, load_or_default};
pub use save::{save, save_to_path};
pub use types::{ChartSettings, DashboardConfig, DatasetSettings, LoggingSettings, TrainingSettings};

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
