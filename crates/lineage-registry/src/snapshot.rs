//! Loading registry snapshots from project documents.
//!
//! A snapshot document lists project objects and the project defaults the
//! lineage engine cares about:
//!
//! ```yaml
//! defaults:
//!   source_name: warehouse
//! objects:
//!   - name: warehouse
//!     type: source
//!   - name: orders
//!     type: model
//!     depends_on: [warehouse]
//! ```
//!
//! The same shape is accepted as JSON.

use crate::error::{Error, Result};
use crate::object::ObjectRecord;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Characters the selector language reserves.
const SELECTOR_RESERVED: [char; 2] = ['+', ','];

/// Separator the lineage graph uses in edge ids.
const EDGE_ID_SEPARATOR: &str = "->";

/// Project-wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDefaults {
    /// Source used by models that do not name one explicitly
    #[serde(default)]
    pub source_name: Option<String>,
}

/// Deserialized project document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Project defaults
    #[serde(default)]
    pub defaults: ProjectDefaults,

    /// Project objects in declaration order
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

impl ProjectSnapshot {
    /// Parse a JSON project document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML project document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the document is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a project document from disk.
    ///
    /// Files with a `.json` extension are parsed as JSON, everything else as
    /// YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or a parse error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!(path = %path.display(), is_json, "Loading project snapshot");

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Build the registry for this snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for a blank object name and
    /// [`Error::DuplicateObject`] when a name is declared twice.
    pub fn to_registry(&self) -> Result<Registry> {
        let mut seen = HashSet::new();

        for record in &self.objects {
            validate_name(&record.name)?;
            if !seen.insert(record.name.as_str()) {
                return Err(Error::DuplicateObject(record.name.clone()));
            }
        }

        Ok(self.objects.iter().cloned().collect())
    }

    /// Consume the snapshot, returning its registry and defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ProjectSnapshot::to_registry`].
    pub fn into_parts(self) -> Result<(Registry, ProjectDefaults)> {
        let registry = self.to_registry()?;
        Ok((registry, self.defaults))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }

    if name.contains(SELECTOR_RESERVED) {
        warn!(
            name,
            "Object name contains a selector operator and cannot be selected by name"
        );
    }

    if name.contains(EDGE_ID_SEPARATOR) {
        warn!(
            name,
            "Object name contains the edge id separator; its edge ids may be suffixed"
        );
    }

    Ok(())
}
