use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use mocksmith_core::{Schema, SchemaIssue, inspect_schema};

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::faker_rs::FakerValueSource;
use crate::foreign::{RandomForeignContext, populate_relations};
use crate::generators::{ValueSource, generate_value};
use crate::model::{EntityReport, GenerateOptions, GenerationReport};
use crate::planner::plan_entities;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: Dataset,
    pub report: GenerationReport,
}

/// Entry point for generating a dataset from a schema.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate with the fake-data backed value source seeded from the options.
    pub fn run(&self, schema: &Schema) -> Result<GenerationResult, GenerationError> {
        let mut source = FakerValueSource::new(hash_seed(self.options.seed, "values"));
        self.run_with_source(schema, &mut source)
    }

    /// Generate base values for every entity in dependency order, then wire
    /// relation fields across the finished collections.
    pub fn run_with_source(
        &self,
        schema: &Schema,
        source: &mut dyn ValueSource,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report =
            GenerationReport::new(run_id.clone(), chrono::Utc::now(), self.options.seed);

        for issue in inspect_schema(schema) {
            log_issue(&issue);
            report.record_issue(issue);
        }

        let plan = match plan_entities(schema, self.options.strict) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(run_id = %run_id, error = %err, "generation failed");
                return Err(err);
            }
        };
        report.order = plan.order();
        report.cycles = plan.graph.cycles.clone();

        info!(
            run_id = %run_id,
            entities = plan.tasks.len(),
            seed = self.options.seed,
            strict = self.options.strict,
            "generation started"
        );

        let mut dataset = Dataset::new();
        for task in &plan.tasks {
            let Some(descriptor) = schema.entity(&task.entity) else {
                continue;
            };
            let value = generate_value(descriptor, source);

            info!(
                entity = %task.entity,
                depth = task.depth,
                elements = value.element_count(),
                "entity generated"
            );
            report.entities.push(EntityReport {
                entity: task.entity.clone(),
                depth: task.depth,
                shape: value.shape(),
                elements: value.element_count(),
            });
            dataset.insert(task.entity.clone(), value);
        }

        let relation_rng = ChaCha8Rng::seed_from_u64(hash_seed(self.options.seed, "relations"));
        let mut foreign = RandomForeignContext::new(relation_rng);
        report.relations_populated =
            match populate_relations(schema, &report.order, &mut dataset, &mut foreign) {
                Ok(assigned) => assigned,
                Err(err) => {
                    warn!(run_id = %run_id, error = %err, "generation failed");
                    return Err(err);
                }
            };
        info!(
            run_id = %run_id,
            fields = report.relations_populated,
            "relations populated"
        );

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            entities = report.entities.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { dataset, report })
    }
}

fn log_issue(issue: &SchemaIssue) {
    warn!(
        code = %issue.code,
        entity = %issue.entity,
        path = %issue.path,
        detail = %issue.message,
        "schema issue"
    );
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
