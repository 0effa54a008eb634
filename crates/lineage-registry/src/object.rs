//! Project object records and the per-kind policy table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a project object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Database connection that models read from
    Source,

    /// SQL model over one or more sources
    Model,

    /// Named column expression on a model
    Dimension,

    /// Named aggregate expression on a model
    Metric,

    /// Join condition between models
    Relation,

    /// Query-backed visual insight
    Insight,

    /// Chart rendering traces or insights
    Chart,

    /// Tabular rendering of a model or insight
    Table,

    /// Dashboard laying out charts, tables and markdown
    Dashboard,

    /// Markdown block on a dashboard
    Markdown,

    /// Interactive dashboard input
    Input,
}

/// Coarse grouping of object kinds used for default lanes and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectLayer {
    /// Connections to data
    Data,

    /// Models and the semantic layer defined on them
    Semantic,

    /// Everything a dashboard viewer sees
    Presentation,
}

/// Behaviour attached to an object kind.
///
/// Every decision the graph engine makes per object kind is looked up here
/// through [`ObjectType::policy`] rather than by comparing type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectPolicy {
    /// Layer the kind belongs to
    pub layer: ObjectLayer,

    /// Whether an object of this kind without an explicit source reference
    /// reads from the project's default source
    pub infers_default_source: bool,
}

impl ObjectType {
    /// All object kinds, in declaration order.
    pub const ALL: [ObjectType; 11] = [
        Self::Source,
        Self::Model,
        Self::Dimension,
        Self::Metric,
        Self::Relation,
        Self::Insight,
        Self::Chart,
        Self::Table,
        Self::Dashboard,
        Self::Markdown,
        Self::Input,
    ];

    /// The lowercase tag used in project files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Model => "model",
            Self::Dimension => "dimension",
            Self::Metric => "metric",
            Self::Relation => "relation",
            Self::Insight => "insight",
            Self::Chart => "chart",
            Self::Table => "table",
            Self::Dashboard => "dashboard",
            Self::Markdown => "markdown",
            Self::Input => "input",
        }
    }

    /// The policy for this kind.
    #[must_use]
    pub fn policy(self) -> ObjectPolicy {
        let layer = match self {
            Self::Source => ObjectLayer::Data,
            Self::Model | Self::Dimension | Self::Metric | Self::Relation => ObjectLayer::Semantic,
            Self::Insight
            | Self::Chart
            | Self::Table
            | Self::Dashboard
            | Self::Markdown
            | Self::Input => ObjectLayer::Presentation,
        };

        ObjectPolicy {
            layer,
            infers_default_source: matches!(self, Self::Model),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| format!("unknown object type: {s}"))
    }
}

/// One named object in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Unique object name
    pub name: String,

    /// Object kind
    #[serde(rename = "type")]
    pub object_type: ObjectType,

    /// Names of the objects this object references, in declaration order
    #[serde(default, rename = "depends_on", alias = "dependency_names")]
    pub dependency_names: Vec<String>,
}

impl ObjectRecord {
    /// Create a record with no dependencies.
    pub fn new(name: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            name: name.into(),
            object_type,
            dependency_names: Vec::new(),
        }
    }

    /// Append dependency names to this record.
    #[must_use]
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependency_names
            .extend(names.into_iter().map(Into::into));
        self
    }
}
