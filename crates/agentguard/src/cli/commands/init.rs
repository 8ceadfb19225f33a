//! # Init Command
//!
//! `agentguard init` writes the commented default configuration from
//! [`Config::default_toml`] to `~/.agentguard/config.toml`, or to the path
//! given with `--config`.
//!
//! ```no_run
//! use agentguard::cli::commands::init::InitCommand;
//!
//! InitCommand::new(false, None).run().expect("initialization failed");
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use agentguard_core::config::Config;
use agentguard_core::error::ConfigError;

use super::config_file_path;

/// Errors that can occur during initialization.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// A configuration file exists and --force was not specified.
    #[error("{} already exists. Use --force to overwrite it.", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The target location could not be determined.
    #[error("Failed to locate configuration: {0}")]
    Location(#[from] ConfigError),

    /// Failed to create the parent directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation {
        /// The directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// The `agentguard init` command handler.
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// Overwrite an existing file.
    pub force: bool,
    /// Explicit target path.
    pub config: Option<PathBuf>,
}

impl InitCommand {
    /// Create a new `InitCommand`.
    #[must_use]
    pub const fn new(force: bool, config: Option<PathBuf>) -> Self {
        Self { force, config }
    }

    /// Write the default configuration and print where it went.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::AlreadyInitialized`] if the file exists and
    /// `force` is not set, or an I/O error if it cannot be written.
    pub fn run(&self) -> Result<(), InitError> {
        let path = config_file_path(self.config.as_deref())?;
        self.write_to(&path)?;

        println!("Wrote default configuration to {}", path.display());
        println!();
        println!("Next steps:");
        println!("  1. Add trusted destinations to policy.whitelist");
        println!("  2. Try it: agentguard check --to <ADDRESS> --amount 0.5");
        Ok(())
    }

    /// Write the default configuration to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn write_to(&self, path: &Path) -> Result<(), InitError> {
        if path.exists() && !self.force {
            return Err(InitError::AlreadyInitialized(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, Config::default_toml()).map_err(|source| InitError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), force = self.force, "configuration initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use agentguard_core::config_loader::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        InitCommand::new(false, None).write_to(&path).unwrap();

        let config = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# mine\n").unwrap();

        let err = InitCommand::new(false, None).write_to(&path).unwrap_err();
        assert!(matches!(err, InitError::AlreadyInitialized(_)));
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");
    }

    #[test]
    fn test_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "garbage").unwrap();

        InitCommand::new(true, None).write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), Config::default_toml());
    }

    #[test]
    fn test_run_with_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");

        InitCommand::new(false, Some(path.clone())).run().unwrap();
        assert!(path.exists());
    }
}
