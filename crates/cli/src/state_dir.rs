//! Platform-specific state directory management

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the CLI keeps its session file and logs
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// Use `override_dir` when given, else `<data dir>/gallery`
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        match override_dir {
            Some(path) => Self::with_override(path),
            None => Self {
                root: dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("gallery"),
            },
        }
    }

    /// Create a StateDir rooted at a fixed path
    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self { root: path.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted session keys
    pub fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("cli.log")
    }

    /// Create the directory if it does not exist
    pub fn create(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create directory: {}", self.root.display()))?;
        debug!("Using state directory: {}", self.root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_directory() {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = StateDir::resolve(Some(temp_dir.path().to_path_buf()));

        assert_eq!(state_dir.root(), temp_dir.path());
        assert_eq!(state_dir.session_path(), temp_dir.path().join("session.json"));
        assert_eq!(state_dir.log_path(), temp_dir.path().join("cli.log"));
    }

    #[test]
    fn test_create_directories() {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = StateDir::with_override(temp_dir.path().join("nested").join("gallery"));

        state_dir.create().unwrap();
        state_dir.create().unwrap();

        assert!(state_dir.root().is_dir());
    }
}
