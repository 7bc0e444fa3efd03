//! Platform directory resolution.
//!
//! The configuration and debug logs live under the OS configuration directory
//! (XDG on Linux, Known Folders on Windows, Library on macOS).

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during platform operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    /// An I/O error occurred (e.g., directory creation failed).
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// OS-specific directories used by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Debug-build JSON logs.
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "tilemaker";

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&config_base))
    }

    /// Resolve directories rooted under a custom base path.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Use an explicit configuration directory, keeping logs beside it.
    pub fn with_config_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            log_dir: config_dir.join("logs"),
        }
    }

    /// Create all directories on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if any directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root() {
        let dirs = PlatformDirs::resolve_with_root(Path::new("base"));
        assert_eq!(dirs.config_dir, Path::new("base").join("tilemaker").join("config"));
        assert_eq!(dirs.log_dir, Path::new("base").join("tilemaker").join("logs"));
    }

    #[test]
    fn test_explicit_config_dir() {
        let dirs = PlatformDirs::with_config_dir(Path::new("cfg"));
        assert_eq!(dirs.config_dir, PathBuf::from("cfg"));
        assert_eq!(dirs.log_dir, Path::new("cfg").join("logs"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
