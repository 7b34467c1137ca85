use indexmap::IndexMap;
use serde::Serialize;

use crate::generators::GeneratedValue;

/// Generated data keyed by entity name, in generation order.
///
/// Owned by a single generation run: the value pass inserts base data and the
/// relation pass rewrites reference fields in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    entities: IndexMap<String, GeneratedValue>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: impl Into<String>, value: GeneratedValue) {
        self.entities.insert(entity.into(), value);
    }

    pub fn get(&self, entity: &str) -> Option<&GeneratedValue> {
        self.entities.get(entity)
    }

    pub fn get_mut(&mut self, entity: &str) -> Option<&mut GeneratedValue> {
        self.entities.get_mut(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneratedValue)> {
        self.entities
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, GeneratedValue> {
        self.entities
    }
}
