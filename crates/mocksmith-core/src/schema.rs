use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::TypeDescriptor;

/// Top-level schema file: the entity map lives under `schema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    /// Entities to generate, keyed by name.
    pub schema: Schema,
    /// Any other top-level keys, kept as-is.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// One entry of the schema map.
///
/// Only descriptors are entities. Plain strings are metadata; any other value
/// (numbers, flags, mappings without `type`) is kept as-is and never generates
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SchemaEntry {
    Metadata(String),
    Entity(TypeDescriptor),
    Other(serde_json::Value),
}

impl SchemaEntry {
    pub fn as_entity(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Entity(descriptor) => Some(descriptor),
            Self::Metadata(_) | Self::Other(_) => None,
        }
    }
}

/// Ordered mapping from entity name to its root descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Schema {
    entries: IndexMap<String, SchemaEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.insert_entity(name, descriptor);
        self
    }

    pub fn with_entry(mut self, name: impl Into<String>, entry: SchemaEntry) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), SchemaEntry::Metadata(value.into()));
        self
    }

    pub fn insert_entity(&mut self, name: impl Into<String>, descriptor: TypeDescriptor) {
        self.entries
            .insert(name.into(), SchemaEntry::Entity(descriptor));
    }

    /// Entity names in declaration order; metadata entries are skipped.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities().map(|(name, _)| name).collect()
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| entry.as_entity().map(|desc| (name.as_str(), desc)))
    }

    pub fn entity(&self, name: &str) -> Option<&TypeDescriptor> {
        self.entries.get(name).and_then(SchemaEntry::as_entity)
    }

    /// Like [`Schema::entity`], returning the name borrowed from the schema.
    pub fn entity_entry(&self, name: &str) -> Option<(&str, &TypeDescriptor)> {
        let (key, entry) = self.entries.get_key_value(name)?;
        entry.as_entity().map(|descriptor| (key.as_str(), descriptor))
    }

    /// Raw entry for `name`, whether or not it is an entity.
    pub fn entry(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    /// Every entry in declaration order, entities and non-entities alike.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn contains_entity(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }

    pub fn metadata(&self, name: &str) -> Option<&str> {
        match self.entries.get(name)? {
            SchemaEntry::Metadata(value) => Some(value.as_str()),
            SchemaEntry::Entity(_) | SchemaEntry::Other(_) => None,
        }
    }
}
