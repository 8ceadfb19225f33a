//! # Config Command
//!
//! ```text
//! agentguard config           # Print the effective configuration
//! agentguard config show      # Same
//! agentguard config path      # Print the configuration file path
//! ```
//!
//! The effective configuration is what every other command evaluates with:
//! the file if present, otherwise the built-in defaults.

use std::path::PathBuf;

use agentguard_core::config::Config;
use agentguard_core::error::{ConfigError, PolicyError};

use super::{build_engine, config_file_path, load_effective_config};
use crate::cli::args::ConfigAction;

/// Errors that can occur during config command execution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigCommandError {
    /// Failed to locate or load configuration.
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] ConfigError),

    /// The loaded policy could not be turned into an engine.
    #[error("Invalid policy: {0}")]
    Policy(#[from] PolicyError),

    /// Failed to render the configuration.
    #[error("Failed to format configuration: {0}")]
    Format(String),
}

/// The `agentguard config` command handler.
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    /// The action to perform (None = show config).
    pub action: Option<ConfigAction>,
    /// Explicit configuration path.
    pub config: Option<PathBuf>,
}

impl ConfigCommand {
    /// Create a new `ConfigCommand`.
    #[must_use]
    pub const fn new(action: Option<ConfigAction>, config: Option<PathBuf>) -> Self {
        Self { action, config }
    }

    /// Run the config command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be located, loaded or
    /// rendered.
    pub fn run(&self) -> Result<(), ConfigCommandError> {
        match self.action {
            None | Some(ConfigAction::Show) => {
                println!("{}", self.render()?);
            }
            Some(ConfigAction::Path) => {
                println!("{}", config_file_path(self.config.as_deref())?.display());
            }
        }
        Ok(())
    }

    /// The effective configuration as TOML, preceded by the active check order.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn render(&self) -> Result<String, ConfigCommandError> {
        let config = load_effective_config(self.config.as_deref())?;
        let checks = build_engine(config.policy.clone())?.check_names().join(" -> ");
        let body = format_toml_output(&config)?;
        Ok(format!("# checks: {checks}\n{body}"))
    }
}

fn format_toml_output(config: &Config) -> Result<String, ConfigCommandError> {
    toml::to_string_pretty(config).map_err(|e| ConfigCommandError::Format(e.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use agentguard_core::config_loader::ConfigLoader;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_lists_checks_and_parses_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, Config::default_toml()).unwrap();

        let rendered = ConfigCommand::new(None, Some(path)).render().unwrap();
        assert!(rendered
            .starts_with("# checks: address_format -> tx_limit -> fee_ceiling -> whitelist"));

        let reparsed_path = dir.path().join("reparsed.toml");
        fs::write(&reparsed_path, &rendered).unwrap();
        assert_eq!(ConfigLoader::load_from(&reparsed_path).unwrap(), Config::default());
    }

    #[test]
    fn test_render_without_fee_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[policy]\nmax_fee_threshold = \"off\"\n").unwrap();

        let rendered = ConfigCommand::new(Some(ConfigAction::Show), Some(path))
            .render()
            .unwrap();
        assert!(rendered.starts_with("# checks: address_format -> tx_limit -> whitelist\n"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[policy]\nwhitelist = [\"0xnope\"]\n").unwrap();

        let err = ConfigCommand::new(None, Some(path)).render().unwrap_err();
        assert!(matches!(err, ConfigCommandError::LoadError(_)));
    }

    #[test]
    fn test_path_action_with_explicit_path() {
        let dir = TempDir::new().unwrap();
        let cmd = ConfigCommand::new(Some(ConfigAction::Path), Some(dir.path().join("x.toml")));
        cmd.run().unwrap();
    }
}
