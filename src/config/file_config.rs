//! Configuration file support for bibmerge.
//!
//! This module provides TOML configuration file parsing and support
//! for environment variable overrides.
//!
//! # Configuration File Format
//!
//! ```toml
//! [similarity]
//! strategy = "tfidf-cosine"
//! threshold = 0.8
//!
//! [compat]
//! surname_length_tolerance = 3
//!
//! [normalizer]
//! direction = "cyrillic-to-latin"
//!
//! [resolver]
//! transitive = false
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Environment Variables
//!
//! Every key can be overridden with a `BIBMERGE_`-prefixed variable,
//! applied after the file is read:
//!
//! - `BIBMERGE_SIMILARITY_STRATEGY`
//! - `BIBMERGE_SIMILARITY_THRESHOLD`
//! - `BIBMERGE_COMPAT_SURNAME_LENGTH_TOLERANCE`
//! - `BIBMERGE_NORMALIZER_DIRECTION`
//! - `BIBMERGE_RESOLVER_TRANSITIVE`
//! - `BIBMERGE_LOG_LEVEL`

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Config, NormalizerConfig, ResolverConfig, SimilarityConfig, StrategyKind};
use crate::resolver::compat::CompatibilityFilter;
use crate::resolver::normalize::Direction;

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Similarity section
    #[serde(default)]
    pub similarity: SimilarityConfig,

    /// Compatibility filter section
    #[serde(default)]
    pub compat: CompatibilityFilter,

    /// Normalizer section
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Resolver section
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &PathBuf) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &PathBuf) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Override file values from `BIBMERGE_`-prefixed environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("BIBMERGE_SIMILARITY_STRATEGY") {
            match StrategyKind::from_str(&value, true) {
                Ok(strategy) => self.similarity.strategy = strategy,
                Err(_) => warn!(%value, "ignoring invalid BIBMERGE_SIMILARITY_STRATEGY"),
            }
        }
        if let Some(value) = lookup("BIBMERGE_SIMILARITY_THRESHOLD") {
            match value.parse::<f64>() {
                Ok(threshold) => self.similarity.threshold = Some(threshold),
                Err(_) => warn!(%value, "ignoring invalid BIBMERGE_SIMILARITY_THRESHOLD"),
            }
        }
        if let Some(value) = lookup("BIBMERGE_COMPAT_SURNAME_LENGTH_TOLERANCE") {
            match value.parse::<usize>() {
                Ok(tolerance) => self.compat.surname_length_tolerance = tolerance,
                Err(_) => {
                    warn!(%value, "ignoring invalid BIBMERGE_COMPAT_SURNAME_LENGTH_TOLERANCE")
                }
            }
        }
        if let Some(value) = lookup("BIBMERGE_NORMALIZER_DIRECTION") {
            match Direction::from_str(&value, true) {
                Ok(direction) => self.normalizer.direction = direction,
                Err(_) => warn!(%value, "ignoring invalid BIBMERGE_NORMALIZER_DIRECTION"),
            }
        }
        if let Some(value) = lookup("BIBMERGE_RESOLVER_TRANSITIVE") {
            match value.parse::<bool>() {
                Ok(transitive) => self.resolver.transitive = transitive,
                Err(_) => warn!(%value, "ignoring invalid BIBMERGE_RESOLVER_TRANSITIVE"),
            }
        }
        if let Some(value) = lookup("BIBMERGE_LOG_LEVEL") {
            self.logging.level = value;
        }
    }

    /// Fold the file sections into a pipeline [`Config`]
    pub fn into_config(self) -> Config {
        Config {
            similarity: self.similarity,
            compat: self.compat,
            normalizer: self.normalizer,
            resolver: self.resolver,
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
