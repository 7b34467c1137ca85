//! Schema-driven mock data generation engine.
//!
//! This crate turns a [`mocksmith_core::Schema`] into a [`Dataset`]: entities
//! are generated in relation-dependency order, then relation fields are filled
//! with values picked from the related collections.

pub mod dataset;
pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod foreign;
pub mod generators;
pub mod model;
pub mod output;
pub mod planner;

pub use dataset::Dataset;
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use faker_rs::FakerValueSource;
pub use foreign::{ForeignContext, RandomForeignContext, populate_relations};
pub use generators::{GeneratedValue, Record, ValueShape, ValueSource, generate_value};
pub use model::{EntityReport, GenerateOptions, GenerationReport};
pub use output::{write_dataset_json, write_report_json};
pub use planner::{GenerationPlan, GenerationTask, plan_entities};
