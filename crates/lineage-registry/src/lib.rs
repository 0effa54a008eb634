//! Project object registry for BI-as-code lineage graphs.
//!
//! A project is a flat collection of named objects (sources, models,
//! metrics, charts, dashboards, ...) that reference each other by name. This
//! crate models that collection as a read-only, insertion-ordered
//! [`Registry`] snapshot and knows how to load one from a JSON or YAML
//! project document.
//!
//! The lineage engine never edits a registry; it receives a snapshot, derives
//! a graph from it, and keys its caches on the snapshot's
//! [`RegistryFingerprint`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod object;
pub mod registry;
pub mod snapshot;

pub use error::{Error, Result};
pub use object::{ObjectLayer, ObjectPolicy, ObjectRecord, ObjectType};
pub use registry::{Registry, RegistryFingerprint};
pub use snapshot::{ProjectDefaults, ProjectSnapshot};
