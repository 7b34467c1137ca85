//! Core contracts for mocksmith.
//!
//! This crate defines the schema descriptor model, schema document loading,
//! and the relation graph used to order entity generation.

pub mod document;
pub mod error;
pub mod graph;
pub mod inspect;
pub mod schema;
pub mod types;

pub use document::{DocumentFormat, load_schema_document, parse_schema_document};
pub use error::{Error, Result};
pub use graph::{
    MissingTarget, RankedEntity, RelationGraphReport, RelationGraphSummary,
    build_relation_graph_report, resolve_generation_order,
};
pub use inspect::{SchemaIssue, inspect_schema};
pub use schema::{Schema, SchemaDocument, SchemaEntry};
pub use types::{DataKind, Relation, TextFlavor, TypeDescriptor};
