//! Configuration management.

mod file_config;

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::resolver::compat::CompatibilityFilter;
use crate::resolver::normalize::Direction;

pub use file_config::{ConfigFile, ConfigFileError, LoggingConfig};

/// Which surname similarity strategy the pipeline scores pairs with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Character n-gram TF-IDF vectors compared by cosine
    #[default]
    #[value(name = "tfidf-cosine")]
    TfIdfCosine,

    /// Normalized Levenshtein ratio over the distinct-surname set
    #[value(name = "edit-distance")]
    EditDistance,
}

/// Pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Similarity stage settings
    #[serde(default)]
    pub similarity: SimilarityConfig,

    /// Compatibility filter settings
    #[serde(default)]
    pub compat: CompatibilityFilter,

    /// Normalizer settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Similarity stage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Scoring strategy
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Merge-candidate threshold; the strategy default applies when unset
    /// (0.8 for the vector-space model, 0.92 for edit distance)
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Normalizer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Canonical script names are transliterated into
    #[serde(default)]
    pub direction: Direction,
}

/// Resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Flatten merge chains to one representative per equivalence class
    /// instead of the default first-assignment-wins mapping
    #[serde(default)]
    pub transitive: bool,
}

/// Locate a config file in the default locations.
///
/// Checks `./bibmerge.toml`, then `<config dir>/bibmerge/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("bibmerge.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("bibmerge").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load pipeline configuration from a TOML file.
///
/// `BIBMERGE_`-prefixed environment variables override file values (see
/// [`ConfigFile::apply_env_overrides`]).
pub fn load_config(path: &PathBuf) -> Result<Config, ConfigFileError> {
    let mut file = ConfigFile::load(path)?;
    file.apply_env_overrides();
    Ok(file.into_config())
}
