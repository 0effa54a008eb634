//! Engine configuration.
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration:
//!
//! ```yaml
//! build:
//!   id_scheme: typed
//!   default_source: warehouse
//! layout:
//!   node_size: { width: 200, height: 60 }
//!   spacing: { rank_gap: 80, order_gap: 30 }
//!   max_sweeps: 4
//! ```

use crate::error::{Error, Result};
use lineage_registry::{ObjectRecord, ProjectDefaults};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on barycenter ordering passes.
pub const MAX_SWEEPS: usize = 4;

/// How graph node ids are derived from object records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeIdScheme {
    /// The object name is the id; project object names are globally unique
    #[default]
    Name,

    /// `{type}:{name}`, keeping kinds apart when names may repeat across kinds
    Typed,
}

impl NodeIdScheme {
    /// Node id for a record under this scheme.
    #[must_use]
    pub fn node_id(self, record: &ObjectRecord) -> String {
        match self {
            Self::Name => record.name.clone(),
            Self::Typed => format!("{}:{}", record.object_type, record.name),
        }
    }
}

/// Options for graph construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Node id derivation
    pub id_scheme: NodeIdScheme,

    /// Source that models without an explicit source read from
    pub default_source: Option<String>,
}

impl BuildOptions {
    /// Fill in what these options leave unset from the project defaults.
    ///
    /// An explicitly configured default source wins over the project's.
    #[must_use]
    pub fn with_project_defaults(mut self, defaults: &ProjectDefaults) -> Self {
        if self.default_source.is_none() {
            self.default_source.clone_from(&defaults.source_name);
        }
        self
    }
}

/// Rendered size of every node, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Default for NodeSize {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 60.0,
        }
    }
}

/// Gaps between nodes, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Gap between adjacent ranks (columns)
    pub rank_gap: f64,
    /// Gap between nodes within a rank
    pub order_gap: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            rank_gap: 80.0,
            order_gap: 30.0,
        }
    }
}

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Node extent
    pub node_size: NodeSize,

    /// Gaps between nodes
    pub spacing: Spacing,

    /// Barycenter passes; values above [`MAX_SWEEPS`] are clamped
    pub max_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_size: NodeSize::default(),
            spacing: Spacing::default(),
            max_sweeps: MAX_SWEEPS,
        }
    }
}

impl LayoutConfig {
    /// Check that sizes and gaps are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("node_size.width", self.node_size.width),
            ("node_size.height", self.node_size.height),
            ("spacing.rank_gap", self.spacing.rank_gap),
            ("spacing.order_gap", self.spacing.order_gap),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{field} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        Ok(())
    }

    /// Sweep budget after clamping.
    #[must_use]
    pub fn sweep_budget(&self) -> usize {
        self.max_sweeps.min(MAX_SWEEPS)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Graph construction options
    pub build: BuildOptions,

    /// Layout parameters
    pub layout: LayoutConfig,
}

impl EngineConfig {
    /// Parse and validate a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] for malformed YAML and [`Error::Config`] for
    /// out-of-range values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(yaml)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
