// src/core/paths.rs

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref DEFAULT_CONFIG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find a config directory: no home directory found.")]
    ConfigDirNotFound,
    #[error("Could not create config file at '{path}': {source}")]
    ConfigFileCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not expand config path '{path}': {message}")]
    Expansion { path: String, message: String },
}

/// Returns the default configuration file path: `$XDG_CONFIG_HOME/xopen.conf`, or
/// `~/.config/xopen.conf` when the variable is unset.
///
/// Memoized: only the first call asks the system.
pub fn default_config_path() -> Result<PathBuf, PathError> {
    let mut cached = DEFAULT_CONFIG_FILE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_FILENAME);
    *cached = Some(path.clone());
    Ok(path)
}

/// Creates an empty file at `path` if there is none, along with its parent directory.
/// An existing file is left untouched.
pub fn ensure_config_file(path: &Path) -> Result<(), PathError> {
    let creation_error = |source| PathError::ConfigFileCreation {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(creation_error)?;
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(creation_error)?;
    Ok(())
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_config_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        path: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Flag(String),
    /// Given through the environment.
    Environment(String),
    /// The per-user default location.
    Default,
}

/// Applies the precedence `--config`, then the environment variable, then the default.
pub fn pick_config_source(flag: Option<&str>, env_value: Option<String>) -> ConfigSource {
    if let Some(path) = flag {
        return ConfigSource::Flag(path.to_string());
    }
    match env_value {
        Some(path) if !path.trim().is_empty() => ConfigSource::Environment(path),
        _ => ConfigSource::Default,
    }
}

/// Resolves the configuration file to read.
///
/// Explicit paths are only expanded. The default file is created empty on first use, so
/// a fresh installation reads an empty configuration instead of failing.
pub fn resolve_config_path(flag: Option<&str>) -> Result<PathBuf, PathError> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    match pick_config_source(flag, env_value) {
        ConfigSource::Flag(path) | ConfigSource::Environment(path) => expand_config_path(&path),
        ConfigSource::Default => {
            let path = default_config_path()?;
            ensure_config_file(&path)?;
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flag_beats_environment() {
        assert_eq!(
            pick_config_source(Some("a.conf"), Some("b.conf".to_string())),
            ConfigSource::Flag("a.conf".to_string())
        );
        assert_eq!(
            pick_config_source(None, Some("b.conf".to_string())),
            ConfigSource::Environment("b.conf".to_string())
        );
        assert_eq!(
            pick_config_source(None, Some("  ".to_string())),
            ConfigSource::Default
        );
        assert_eq!(pick_config_source(None, None), ConfigSource::Default);
    }

    #[test]
    fn test_ensure_config_file_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);

        ensure_config_file(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_ensure_config_file_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "emacs\n").unwrap();

        ensure_config_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "emacs\n");
    }

    #[test]
    fn test_expand_plain_path_is_unchanged() {
        assert_eq!(
            expand_config_path("/etc/xopen.conf").unwrap(),
            PathBuf::from("/etc/xopen.conf")
        );
    }

    #[test]
    fn test_expand_unknown_variable_fails() {
        let result = expand_config_path("$XOPEN_TEST_SURELY_UNSET_VARIABLE/xopen.conf");
        assert!(matches!(result, Err(PathError::Expansion { .. })));
    }
}
