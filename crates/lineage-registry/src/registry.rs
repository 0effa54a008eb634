//! Insertion-ordered registry of project objects.
//!
//! The registry behaves like a map keyed by object name, but iteration
//! follows insertion order. Graph construction and layout inherit their
//! ordering from here, so two equal registries always produce identical
//! graphs.

use crate::object::ObjectRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Separates fields of one record in the fingerprint input.
const FIELD_SEPARATOR: u8 = 0x1f;
/// Terminates each dependency name in the fingerprint input.
const DEPENDENCY_SEPARATOR: u8 = 0x1e;
/// Terminates each record in the fingerprint input.
const RECORD_SEPARATOR: u8 = 0x1d;

/// Content fingerprint of a registry snapshot.
///
/// SHA-256 over every record in iteration order, hex encoded. Use it as the
/// cache key for anything derived from a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryFingerprint(String);

impl RegistryFingerprint {
    /// Hex digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of all named project objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Records in insertion order
    records: Vec<ObjectRecord>,

    /// Name to position in `records`
    index: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record it replaced.
    ///
    /// A replaced record keeps its original position.
    pub fn insert(&mut self, record: ObjectRecord) -> Option<ObjectRecord> {
        if let Some(&position) = self.index.get(&record.name) {
            return Some(std::mem::replace(&mut self.records[position], record));
        }

        self.index.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        None
    }

    /// Remove a record by name.
    pub fn remove(&mut self, name: &str) -> Option<ObjectRecord> {
        let position = self.index.remove(name)?;
        let removed = self.records.remove(position);

        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }

        Some(removed)
    }

    /// Look up a record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ObjectRecord> {
        self.index
            .get(name)
            .map(|&position| &self.records[position])
    }

    /// Whether a record with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ObjectRecord> {
        self.records.iter()
    }

    /// Iterate object names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compute the content fingerprint of this snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> RegistryFingerprint {
        let mut hasher = Sha256::new();

        for record in &self.records {
            hasher.update(record.name.as_bytes());
            hasher.update([FIELD_SEPARATOR]);
            hasher.update(record.object_type.as_str().as_bytes());
            hasher.update([FIELD_SEPARATOR]);
            for dependency in &record.dependency_names {
                hasher.update(dependency.as_bytes());
                hasher.update([DEPENDENCY_SEPARATOR]);
            }
            hasher.update([RECORD_SEPARATOR]);
        }

        RegistryFingerprint(format!("{:x}", hasher.finalize()))
    }
}

impl FromIterator<ObjectRecord> for Registry {
    fn from_iter<I: IntoIterator<Item = ObjectRecord>>(iter: I) -> Self {
        let mut registry = Self::new();
        for record in iter {
            registry.insert(record);
        }
        registry
    }
}

impl Extend<ObjectRecord> for Registry {
    fn extend<I: IntoIterator<Item = ObjectRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ObjectRecord;
    type IntoIter = std::slice::Iter<'a, ObjectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
