//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Control plane URL; empty until one is configured
    pub target: String,

    /// Enable verbose diagnostics by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            verbose: false,
            timeout: 10,
        }
    }
}

impl CliConfig {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read CLI config file")?;

            toml::from_str(&content).context("Failed to parse CLI config file")
        } else {
            // Create default config and save it
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(&config_path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config")
        } else {
            return Err(anyhow::anyhow!("Cannot determine config directory"));
        };

        Ok(config_dir.join("gantry").join("cli.toml"))
    }

    /// Update a single setting by key, validating the new value
    ///
    /// The stored target loses any trailing slashes so URLs join
    /// cleanly later.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "target" => {
                ConfigBuilder::validate_target(value)?;
                self.target = value.trim_end_matches('/').to_string();
            }
            "verbose" => {
                self.verbose = match value.to_lowercase().as_str() {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => {
                        return Err(anyhow::anyhow!(
                            "Invalid value '{}' for verbose. Must be 'true' or 'false'",
                            value
                        ))
                    }
                };
            }
            "timeout" => {
                let timeout: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout value '{}'", value))?;
                ConfigBuilder::validate_timeout(timeout)?;
                self.timeout = timeout;
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown configuration key '{}'. Valid keys: target, verbose, timeout",
                    key
                ))
            }
        }

        Ok(())
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    target: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set target URL (with validation)
    pub fn with_target(mut self, target: impl Into<String>) -> Result<Self> {
        let target = target.into();
        Self::validate_target(&target)?;
        self.target = Some(target);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Load configuration from file
    pub fn with_config_file(self, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        match CliConfig::load() {
            Ok(config) => {
                let builder = self;
                // Only use file values if they weren't already set (preserving priority)
                Ok(Self {
                    target: builder.target.or(Some(config.target)),
                    verbose: builder.verbose.or(Some(config.verbose)),
                    timeout: builder.timeout.or(Some(config.timeout)),
                })
            }
            Err(_) => {
                // If file doesn't exist or can't be loaded, continue with current builder
                Ok(self)
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Environment values replace anything loaded from the config file;
    /// CLI flags are applied after this step and win over both.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(target) = std::env::var("GANTRY_TARGET") {
            // Validate before applying
            if Self::validate_target(&target).is_ok() {
                self.target = Some(target);
            }
        }

        if let Ok(verbose) = std::env::var("GANTRY_VERBOSE") {
            self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
        }

        if let Ok(timeout) = std::env::var("GANTRY_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                // Validate before applying
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let target = self.target.unwrap_or(defaults.target);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values
        Self::validate_target(&target)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            target: target.trim_end_matches('/').to_string(),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
        })
    }

    /// Validate target URL format
    ///
    /// An empty target is allowed here; commands that need one fail
    /// with a dedicated error when the client is built.
    fn validate_target(target: &str) -> Result<()> {
        if target.is_empty() {
            return Ok(());
        }

        // Basic URL validation - must start with http:// or https://
        if !target.starts_with("http://") && !target.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Target must start with http:// or https://"
            ));
        }

        Ok(())
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}
