// Required external crates for configuration management and serialization
use serde::Deserialize;
use std::path::{Path, PathBuf};
use config::{Config, ConfigError, Environment, File};

use crate::summarizer::GenerationParams;

/// Configuration for the summarization model
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Identifier reported in logs and by the health endpoint
    pub name: String,
    /// Path to the GGUF model file
    pub path: PathBuf,
    /// Size of the context window for a summarization session
    pub context_size: u32,
    /// Number of layers to offload to the GPU (0 = CPU only)
    pub n_gpu_layers: u32,
    /// Memory-map the model file instead of reading it
    pub use_mmap: bool,
    /// Lock the model in RAM
    pub use_mlock: bool,
}

/// Configuration for the HTTP server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to listen on (0 picks an ephemeral port)
    pub port: u16,
    /// Development mode: raises logging to debug
    pub debug: bool,
}

/// Configuration for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Optional directory for rotated log files
    pub file: Option<PathBuf>,
    /// Emit the file log as JSON lines
    #[serde(default)]
    pub json: bool,
}

/// Main settings struct that contains all configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Server-related settings
    pub server: ServerConfig,
    /// Model-related settings
    pub model: ModelConfig,
    /// Logging-related settings
    pub logging: LoggingConfig,
}

impl Settings {
    /// Creates a new Settings instance from the `config` directory under the
    /// current working directory.
    ///
    /// Sources in order of precedence (highest to lowest):
    /// 1. Environment variables prefixed with SUMSERVE__
    /// 2. Local config file (local.toml) if present
    /// 3. Default config file (default.toml)
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::current_dir()
            .map_err(|e| ConfigError::Message(
                format!("Failed to get current directory: {}", e)
            ))?
            .join("config");

        Self::from_dir(&config_dir)
    }

    /// Loads settings from an explicit configuration directory.
    pub fn from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        if !config_dir.exists() {
            return Err(ConfigError::Message(
                format!("Config directory not found at: {}", config_dir.display())
            ));
        }

        let default_config = config_dir.join("default.toml");
        if !default_config.exists() {
            return Err(ConfigError::Message(
                format!("Default configuration file not found at: {}", default_config.display())
            ));
        }

        let local_config = config_dir.join("local.toml");

        // Convert paths to strings and keep them alive
        let default_config_path = default_config.to_string_lossy();
        let local_config_path = local_config.to_string_lossy();

        let settings = Config::builder()
            .add_source(File::with_name(&default_config_path))
            .add_source(File::with_name(&local_config_path).required(false))
            .add_source(
                Environment::with_prefix("SUMSERVE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        // The session must have room for at least one full-length summary
        let max_length = GenerationParams::SUMMARY.max_length;
        if (self.model.context_size as usize) <= max_length {
            return Err(ConfigError::Message(format!(
                "context_size must be greater than the summary length bound ({}), got: {}",
                max_length, self.model.context_size
            )));
        }

        if self.model.name.trim().is_empty() {
            return Err(ConfigError::Message("model.name must not be empty".to_string()));
        }

        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ConfigError::Message(
                format!("Invalid logging level: {}. Must be one of: error, warn, info, debug, trace",
                    self.logging.level)
            )),
        }?;

        Ok(())
    }

    /// Effective log level, taking debug mode into account.
    pub fn log_level(&self) -> String {
        let level = self.logging.level.to_lowercase();
        if self.server.debug && matches!(level.as_str(), "error" | "warn" | "info") {
            "debug".to_string()
        } else {
            level
        }
    }
}
