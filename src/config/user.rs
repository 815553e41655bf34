//! User configuration loading for vdoc-bridge.
//!
//! User config location: $XDG_CONFIG_HOME/vdoc-bridge/vdoc-bridge.toml
//! (the platform config directory when XDG_CONFIG_HOME is unset).

use super::settings::VdocSettings;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of both the user and the project configuration
pub const CONFIG_FILE_NAME: &str = "vdoc-bridge.toml";

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type UserConfigResult<T> = Result<T, UserConfigError>;

/// Returns the path to the user configuration file.
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => dirs::config_dir()?,
    };
    Some(base.join("vdoc-bridge").join(CONFIG_FILE_NAME))
}

/// Load the user configuration, `Ok(None)` when no file exists
pub fn load_user_config() -> UserConfigResult<Option<VdocSettings>> {
    match user_config_path() {
        Some(path) => load_config_file(&path),
        None => Ok(None),
    }
}

/// Load a TOML configuration file, `Ok(None)` when it does not exist
pub fn load_config_file(path: &Path) -> UserConfigResult<Option<VdocSettings>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(UserConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| UserConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let loaded = load_config_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn parses_camel_case_language_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r##"
            cleanupStaleSessions = false

            [languages.python]
            emptyLine = "#"
            reuseVdoc = true

            [languages.html]
            type = "content"
            "##,
        )
        .unwrap();

        let settings = load_config_file(&path).unwrap().unwrap();

        let python = &settings.languages["python"];
        assert_eq!(python.empty_line.as_deref(), Some("#"));
        assert_eq!(python.reuse_vdoc, Some(true));
        assert_eq!(python.inject, None);
        assert_eq!(
            settings.languages["html"].resource,
            Some(crate::language::ResourceKind::Content)
        );
        assert_eq!(settings.cleanup_stale_sessions, Some(false));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[languages.python\n").unwrap();

        let err = load_config_file(&path).unwrap_err();

        assert!(matches!(err, UserConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME), "{err}");
    }
}
