//! Where the dashboard keeps its files.
//!
//! ```text
//! <config base>/.supplydash/
//!     config.toml
//!     logs/supplydash_<timestamp>.log
//! ```
//!
//! The config base is the OS config directory unless `SUPPLYDASH_CONFIG_HOME`
//! points somewhere else.

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

pub const APP_DIR_NAME: &str = ".supplydash";

/// Relocates the whole `.supplydash` tree, e.g. for portable installs.
pub const CONFIG_HOME_ENV: &str = "SUPPLYDASH_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";

static BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("Could not determine a config directory for the dashboard")]
    NoBaseDir,
    #[error("Could not create dashboard directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.supplydash` directory holding `config.toml`; created on demand.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = resolve_base().ok_or(AppDirError::NoBaseDir)?;
    create_all(base.join(APP_DIR_NAME))
}

/// Per-run log files live here; created on demand.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    create_all(app_root_dir()?.join(LOGS_DIR_NAME))
}

fn create_all(path: PathBuf) -> Result<PathBuf, AppDirError> {
    match std::fs::create_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(AppDirError::CreateDir { path, source }),
    }
}

/// In-process override first, then the environment, then the OS default.
fn resolve_base() -> Option<PathBuf> {
    let overridden = BASE_OVERRIDE
        .lock()
        .map(|slot| slot.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
    overridden
        .or_else(|| std::env::var_os(CONFIG_HOME_ENV).map(PathBuf::from))
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
}

#[cfg(test)]
fn set_base_override(path: Option<&std::path::Path>) {
    let mut slot = BASE_OVERRIDE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = path.map(std::path::Path::to_path_buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    static SERIAL: Mutex<()> = Mutex::new(());

    struct BaseOverride {
        _serial: std::sync::MutexGuard<'static, ()>,
    }

    impl BaseOverride {
        fn at(path: &Path) -> Self {
            let serial = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            set_base_override(Some(path));
            Self { _serial: serial }
        }
    }

    impl Drop for BaseOverride {
        fn drop(&mut self) {
            set_base_override(None);
        }
    }

    #[test]
    fn config_and_logs_share_one_tree() {
        let base = tempdir().unwrap();
        let _override = BaseOverride::at(base.path());

        let root = app_root_dir().unwrap();
        let logs = logs_dir().unwrap();
        assert_eq!(root, base.path().join(".supplydash"));
        assert_eq!(logs, root.join("logs"));
        assert!(logs.is_dir());
    }

    #[test]
    fn blocked_root_reports_the_path() {
        let base = tempdir().unwrap();
        std::fs::write(base.path().join(APP_DIR_NAME), b"not a directory").unwrap();
        let _override = BaseOverride::at(base.path());

        match app_root_dir() {
            Err(AppDirError::CreateDir { path, .. }) => {
                assert_eq!(path, base.path().join(APP_DIR_NAME));
            }
            other => panic!("expected create error, got {other:?}"),
        }
    }
}
