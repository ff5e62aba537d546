//! Traversal configuration
//!
//! A [`TraversalConfig`] is the serializable form of a
//! [`TraversalDescription`]. It can be read from YAML or JSON; the defaults
//! reproduce the house-graph run (every `RELATION`, both directions, each
//! relationship at most once per path, paths of exactly 8 relationships).

use crate::graph::{Direction, TypeFilter};
use crate::traversal::{Evaluator, TraversalDescription, Uniqueness};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while reading configuration or fixture files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Serializable evaluator choice. Custom closures have no config form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluatorConfig {
    All,
    ExcludeStartPosition,
    AtLength { length: usize },
    ToLength { length: usize },
    FromLength { length: usize },
    LengthBetween { min: usize, max: usize },
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig::AtLength { length: 8 }
    }
}

impl From<&EvaluatorConfig> for Evaluator {
    fn from(config: &EvaluatorConfig) -> Self {
        match *config {
            EvaluatorConfig::All => Evaluator::All,
            EvaluatorConfig::ExcludeStartPosition => Evaluator::ExcludeStartPosition,
            EvaluatorConfig::AtLength { length } => Evaluator::AtLength(length),
            EvaluatorConfig::ToLength { length } => Evaluator::ToLength(length),
            EvaluatorConfig::FromLength { length } => Evaluator::FromLength(length),
            EvaluatorConfig::LengthBetween { min, max } => Evaluator::LengthBetween { min, max },
        }
    }
}

/// Traversal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Relationship types to follow; empty means any type
    pub relationship_types: Vec<String>,
    pub direction: Direction,
    pub uniqueness: Uniqueness,
    pub evaluator: EvaluatorConfig,
    /// Node property used to name nodes in output
    pub name_key: String,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            relationship_types: vec!["RELATION".to_string()],
            direction: Direction::Both,
            uniqueness: Uniqueness::RelationshipPath,
            evaluator: EvaluatorConfig::default(),
            name_key: "Name".to_string(),
        }
    }
}

impl TraversalConfig {
    pub fn from_yaml_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config: Self = read_document(path.as_ref())?;
        info!("Loaded traversal config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn type_filter(&self) -> TypeFilter {
        if self.relationship_types.is_empty() {
            TypeFilter::Any
        } else {
            TypeFilter::only(self.relationship_types.iter().map(String::as_str))
        }
    }

    pub fn to_description(&self) -> TraversalDescription {
        TraversalDescription::new()
            .types(self.type_filter())
            .direction(self.direction)
            .uniqueness(self.uniqueness)
            .evaluator(Evaluator::from(&self.evaluator))
    }
}

/// Read a YAML or JSON document, chosen by file extension.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let is_yaml = match extension.as_deref() {
        Some("yaml") | Some("yml") => true,
        Some("json") => false,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml {
        Ok(serde_yaml::from_str(&contents)?)
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}
