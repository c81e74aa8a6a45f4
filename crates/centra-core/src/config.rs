//! Analysis configuration (`centra.toml`).
//!
//! Every field has a default, so a missing file or a partial file is valid.
//! Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::edgelist::{EdgeListFormat, Separator};
use crate::error::ErrorCode;
use crate::graph::NodeId;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "centra.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::Invalid(_) => ErrorCode::InvalidParameter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Seed for the sampling routines. The centrality engines are
    /// deterministic and never read it.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub pagerank: PageRankSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            random_seed: default_random_seed(),
            input: InputConfig::default(),
            pagerank: PageRankSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub separator: Separator,
    #[serde(default)]
    pub source_column: usize,
    #[serde(default = "default_target_column")]
    pub target_column: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            source_column: 0,
            target_column: default_target_column(),
        }
    }
}

impl InputConfig {
    /// Edge-list layout described by this section.
    #[must_use]
    pub const fn format(&self) -> EdgeListFormat {
        EdgeListFormat {
            separator: self.separator,
            source_column: self.source_column,
            target_column: self.target_column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankSettings {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Prefer every node whose id is a multiple of this value.
    #[serde(default)]
    pub preference_modulo: Option<NodeId>,
    /// Explicit preference set; merged with `preference_modulo` if both are set.
    #[serde(default)]
    pub preference: Vec<NodeId>,
}

impl Default for PageRankSettings {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            preference_modulo: None,
            preference: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

const fn default_random_seed() -> u64 {
    42
}

const fn default_target_column() -> usize {
    1
}

const fn default_alpha() -> f64 {
    0.85
}

const fn default_max_iterations() -> usize {
    128
}

const fn default_tolerance() -> f64 {
    1e-9
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("centralities")
}

impl AnalysisConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pr = &self.pagerank;
        if !(0.0..1.0).contains(&pr.alpha) {
            return Err(ConfigError::Invalid(format!(
                "pagerank.alpha must be in [0, 1), got {}",
                pr.alpha
            )));
        }
        if !pr.tolerance.is_finite() || pr.tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pagerank.tolerance must be positive and finite, got {}",
                pr.tolerance
            )));
        }
        if let Some(m) = pr.preference_modulo.filter(|&m| m <= 0) {
            return Err(ConfigError::Invalid(format!(
                "pagerank.preference_modulo must be positive, got {m}"
            )));
        }
        if self.input.source_column == self.input.target_column {
            return Err(ConfigError::Invalid(
                "input.source_column and input.target_column must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate configuration from `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str::<AnalysisConfig>(&content).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    config.validate()?;
    Ok(config)
}

/// Load `centra.toml` from `dir`, or defaults if there is none.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but is invalid.
pub fn discover_config(dir: &Path) -> Result<AnalysisConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }
    tracing::debug!(path = %path.display(), "loading config");
    load_config(&path)
}
