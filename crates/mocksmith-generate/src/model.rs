use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mocksmith_core::SchemaIssue;

use crate::generators::ValueShape;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for leaf values and relation picks.
    pub seed: u64,
    /// Fail on relation cycles instead of logging them.
    pub strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            strict: false,
        }
    }
}

/// Summary of a generated entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    pub entity: String,
    pub depth: usize,
    pub shape: ValueShape,
    pub elements: usize,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub seed: u64,
    pub order: Vec<String>,
    pub entities: Vec<EntityReport>,
    pub relations_populated: u64,
    pub cycles: Vec<Vec<String>>,
    pub issues_by_code: BTreeMap<String, u64>,
    pub issues: Vec<SchemaIssue>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, started_at: DateTime<Utc>, seed: u64) -> Self {
        Self {
            run_id,
            started_at,
            seed,
            order: Vec::new(),
            entities: Vec::new(),
            relations_populated: 0,
            cycles: Vec::new(),
            issues_by_code: BTreeMap::new(),
            issues: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_issue(&mut self, issue: SchemaIssue) {
        *self.issues_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.issues.push(issue);
    }

    pub fn entity(&self, name: &str) -> Option<&EntityReport> {
        self.entities.iter().find(|entity| entity.entity == name)
    }
}
