//! Configuration loader for the `AgentGuard` policy guard.
//!
//! Reads and writes the TOML configuration file, expands `~` in paths, and
//! falls back to defaults when no file exists. Every configuration returned by
//! this module has passed [`Config::validate`].
//!
//! # Default Location
//!
//! Configuration is stored at `~/.agentguard/config.toml` by default.
//!
//! # Examples
//!
//! ```no_run
//! use agentguard_core::config_loader::ConfigLoader;
//!
//! let loader = ConfigLoader::new().expect("failed to create loader");
//!
//! if loader.exists() {
//!     let config = loader.load().expect("failed to load config");
//!     println!("whitelist has {} entries", config.policy.whitelist.len());
//! } else {
//!     loader.write_default().expect("failed to write default config");
//! }
//! ```
//!
//! ## Explicit file
//!
//! ```no_run
//! use agentguard_core::config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from(Path::new("/etc/agentguard/config.toml"))
//!     .expect("failed to load config");
//! ```

use crate::config::Config;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// The default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// The default base directory name within the home directory.
const BASE_DIR_NAME: &str = ".agentguard";

/// Configuration loader that handles reading and writing configuration files.
///
/// # Examples
///
/// ```
/// use agentguard_core::config_loader::ConfigLoader;
/// use std::path::PathBuf;
///
/// let loader = ConfigLoader::with_base_dir(PathBuf::from("/tmp/agentguard-doc"));
/// assert!(loader.config_path().ends_with("config.toml"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for `AgentGuard` files (default: ~/.agentguard).
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new `ConfigLoader` with the default base directory (`~/.agentguard`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let base_dir = default_base_dir()?;
        Ok(Self { base_dir })
    }

    /// Creates a `ConfigLoader` with a custom base directory.
    #[must_use]
    pub const fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Returns the path to the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Returns the base directory for `AgentGuard` files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Loads configuration from the file.
    ///
    /// If the configuration file doesn't exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] if the file contains invalid TOML or
    /// an invalid policy.
    /// Returns [`ConfigError::InvalidValue`] if a field fails validation.
    /// Returns [`ConfigError::Io`] if there's an I/O error reading the file.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from the file, failing if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the configuration file doesn't exist,
    /// plus everything [`load`](Self::load) can return.
    pub fn load_required(&self) -> Result<Config, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Err(ConfigError::file_not_found(
                config_path.display().to_string(),
            ));
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if `path` does not exist,
    /// [`ConfigError::Io`] if it cannot be read, [`ConfigError::ParseFailed`]
    /// for invalid TOML, and any error from [`Config::validate`].
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::file_not_found(path.display().to_string())
            } else {
                ConfigError::io(format!("failed to read {}", path.display()), e)
            }
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_failed(format!("invalid TOML in {}: {e}", path.display()))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to the file.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if there's an I/O error writing the file.
    /// Returns [`ConfigError::ParseFailed`] if the configuration cannot be serialized.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        self.ensure_base_dir()?;

        let config_path = self.config_path();

        let toml_str = toml::to_string_pretty(config).map_err(|e| {
            ConfigError::parse_failed(format!("failed to serialize configuration: {e}"))
        })?;

        fs::write(&config_path, toml_str).map_err(|e| {
            ConfigError::io(
                format!("failed to write configuration to {}", config_path.display()),
                e,
            )
        })?;

        Ok(())
    }

    /// Writes the commented default configuration from [`Config::default_toml`].
    ///
    /// Creates the base directory if it doesn't exist. An existing file is
    /// overwritten; callers decide whether that is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if there's an I/O error writing the file.
    pub fn write_default(&self) -> Result<(), ConfigError> {
        self.ensure_base_dir()?;

        let config_path = self.config_path();

        fs::write(&config_path, Config::default_toml()).map_err(|e| {
            ConfigError::io(
                format!(
                    "failed to write default configuration to {}",
                    config_path.display()
                ),
                e,
            )
        })?;

        Ok(())
    }

    /// Checks if the configuration file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    fn ensure_base_dir(&self) -> Result<(), ConfigError> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                ConfigError::io(
                    format!(
                        "failed to create base directory {}",
                        self.base_dir.display()
                    ),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// Expands `~` in paths to the home directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the path starts with `~` and
/// the home directory cannot be determined.
///
/// # Examples
///
/// ```
/// use agentguard_core::config_loader::expand_path;
///
/// let path = expand_path("/etc/agentguard/config.toml").expect("failed to expand path");
/// assert_eq!(path.to_string_lossy(), "/etc/agentguard/config.toml");
/// ```
pub fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
        Ok(home.join(rest))
    } else if path == "~" {
        dirs::home_dir().ok_or_else(ConfigError::no_home_directory)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Returns the default base directory (`~/.agentguard`).
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be determined.
pub fn default_base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
    Ok(home.join(BASE_DIR_NAME))
}

/// Loads configuration from the default location, with defaults when the
/// file is missing.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be
/// determined, plus everything [`ConfigLoader::load`] can return.
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new()?.load()
}
