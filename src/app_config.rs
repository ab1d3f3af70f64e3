use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::chunking::ChunkOptions;
use crate::language_utils;
use crate::normalizer::MergePolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Caption language code (ISO) to select among downloaded tracks
    #[serde(default = "default_language")]
    pub language: String,

    /// Cue merge policy (join policy, case sensitivity, wrap width)
    #[serde(default)]
    pub merge: MergePolicy,

    /// Chunk split options
    #[serde(default)]
    pub chunking: ChunkOptions,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            merge: MergePolicy::default(),
            chunking: ChunkOptions::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to open config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Chunking preconditions are checked here, before any processing begins,
    /// so an invalid configuration is never discovered mid-scan.
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.language)
            .with_context(|| format!("Invalid caption language: {}", self.language))?;

        self.chunking
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid chunking configuration")?;

        if let Some(width) = self.merge.wrap_width {
            if width == 0 {
                return Err(anyhow::anyhow!("wrap_width must be positive when set"));
            }
        }

        Ok(())
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warn level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl LogLevel {
    /// Convert to a log crate level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
