use std::io::Write;
use std::path::Path;

use super::{ConfigError, DashboardConfig, config_path};

/// Persist configuration to the app directory, overwriting previous contents.
pub fn save(config: &DashboardConfig) -> Result<(), ConfigError> {
    save_to_path(config, &config_path()?)
}

/// Save configuration to a specific path, creating parent directories as needed.
///
/// The TOML is written to a sibling temp file and renamed over the target so a
/// crash never leaves a half-written config behind.
pub fn save_to_path(config: &DashboardConfig, path: &Path) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(dir, path, data.as_bytes())
}

fn atomic_write(dir: &Path, path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    use rand::TryRngCore;
    let file_name = path.file_name().ok_or_else(|| ConfigError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other("config path has no file name"),
    })?;

    let mut last_err = None;
    for _ in 0..5 {
        let mut bytes = [0u8; 6];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::other(format!(
                    "failed to generate temporary file suffix: {source}"
                )),
            })?;
        let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let tmp_path = dir.join(format!("{}.tmp-{suffix}", file_name.to_string_lossy()));

        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(source) => return Err(ConfigError::Write { path: tmp_path, source }),
        };

        let written = file.write_all(data).and_then(|_| file.sync_all());
        drop(file);
        if let Err(source) = written.and_then(|_| std::fs::rename(&tmp_path, path)) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        return Ok(());
    }

    Err(ConfigError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(format!(
            "failed to create temporary file for {}: {}",
            path.display(),
            last_err
                .map(|err| err.to_string())
                .unwrap_or_else(|| "unknown error".into())
        )),
    })
}
