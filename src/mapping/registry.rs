//! Property-mapping registry
//!
//! Maps the logical sort keys a client may use on an exposed resource to the
//! storage fields they stand for. A key may fan out to several storage fields
//! ("Name" → "FirstName", "LastName") and may reverse the requested direction
//! ("Age" → "DateOfBirth", since an older author has an earlier birth date).
//!
//! The registry is assembled once at startup with
//! [`PropertyMappingRegistryBuilder`] and is read-only afterwards, so it can
//! be shared across requests behind an `Arc` without locking.

use crate::core::error::MappingError;
use crate::core::shape::Shapeable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Storage fields behind one logical key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Storage fields, in tie-break order
    pub fields: Vec<String>,

    /// Invert the requested sort direction for this key
    #[serde(default)]
    pub revert: bool,
}

impl MappingEntry {
    pub fn new<I, S>(fields: I, revert: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            revert,
        }
    }
}

/// The logical keys of one (exposed, storage) pair
///
/// Keys are matched ignoring ASCII case, like field names when shaping,
/// and remember their declaration order.
#[derive(Debug, Clone, Default)]
pub struct PropertyMapping {
    /// ASCII-lowercased key -> (declared key, entry)
    entries: IndexMap<String, (String, MappingEntry)>,
}

impl PropertyMapping {
    /// Build a mapping, rejecting empty entries and keys declared twice
    pub fn new<I, K>(entries: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (K, MappingEntry)>,
        K: Into<String>,
    {
        let mut mapping = Self::default();
        for (key, entry) in entries {
            let key = key.into();
            if entry.fields.is_empty() {
                return Err(MappingError::EmptyEntry { key });
            }
            let folded = key.to_ascii_lowercase();
            if mapping.entries.contains_key(&folded) {
                return Err(MappingError::DuplicateKey { key });
            }
            mapping.entries.insert(folded, (key, entry));
        }
        Ok(mapping)
    }

    /// Look up a logical key, ignoring case
    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.get(&key.to_ascii_lowercase()).map(|(_, entry)| entry)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    /// Declared logical keys, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A mapping together with the type pair it belongs to
#[derive(Debug, Clone)]
pub struct MappingTable {
    /// Exposed (client-facing) resource name
    pub exposed: String,

    /// Storage model name
    pub storage: String,

    pub mapping: PropertyMapping,
}

impl MappingTable {
    fn matches(&self, exposed: &str, storage: &str) -> bool {
        self.exposed == exposed && self.storage == storage
    }
}

/// Collects mapping tables before freezing them into a registry
#[derive(Debug, Default)]
pub struct PropertyMappingRegistryBuilder {
    tables: Vec<MappingTable>,
}

impl PropertyMappingRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mapping for an (exposed, storage) pair
    ///
    /// Fails with [`MappingError::Duplicate`] if the pair is already present.
    pub fn register(
        &mut self,
        exposed: impl Into<String>,
        storage: impl Into<String>,
        mapping: PropertyMapping,
    ) -> Result<&mut Self, MappingError> {
        let exposed = exposed.into();
        let storage = storage.into();

        if self.tables.iter().any(|t| t.matches(&exposed, &storage)) {
            return Err(MappingError::Duplicate { exposed, storage });
        }

        self.tables.push(MappingTable {
            exposed,
            storage,
            mapping,
        });
        Ok(self)
    }

    /// Register the mapping for a shapeable resource, keyed by its type name
    pub fn register_for<E: Shapeable>(
        &mut self,
        storage: impl Into<String>,
        mapping: PropertyMapping,
    ) -> Result<&mut Self, MappingError> {
        self.register(E::TYPE_NAME, storage, mapping)
    }

    pub fn build(self) -> PropertyMappingRegistry {
        tracing::debug!(tables = self.tables.len(), "property mapping registry built");
        PropertyMappingRegistry {
            tables: self.tables,
        }
    }
}

/// Read-only registry of property mappings
#[derive(Debug, Clone, Default)]
pub struct PropertyMappingRegistry {
    tables: Vec<MappingTable>,
}

impl PropertyMappingRegistry {
    pub fn builder() -> PropertyMappingRegistryBuilder {
        PropertyMappingRegistryBuilder::new()
    }

    /// Get the mapping for an (exposed, storage) pair
    ///
    /// Both failures are programmer errors: the registry was built without the
    /// pair, or the pair is present more than once.
    pub fn lookup(&self, exposed: &str, storage: &str) -> Result<&PropertyMapping, MappingError> {
        let mut matching = self.tables.iter().filter(|t| t.matches(exposed, storage));

        match (matching.next(), matching.count()) {
            (Some(table), 0) => Ok(&table.mapping),
            (Some(_), more) => Err(MappingError::Ambiguous {
                exposed: exposed.to_string(),
                storage: storage.to_string(),
                matches: more + 1,
            }),
            (None, _) => Err(MappingError::NotFound {
                exposed: exposed.to_string(),
                storage: storage.to_string(),
            }),
        }
    }

    /// Get the mapping for a shapeable resource, keyed by its type name
    pub fn lookup_for<E: Shapeable>(
        &self,
        storage: &str,
    ) -> Result<&PropertyMapping, MappingError> {
        self.lookup(E::TYPE_NAME, storage)
    }

    pub fn tables(&self) -> impl Iterator<Item = &MappingTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
