use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A relation cannot be wired to a non-empty related collection.
    #[error("unresolved relation '{relation}' on {entity}.{field}: {reason}")]
    UnresolvedRelationTarget {
        entity: String,
        field: String,
        relation: String,
        reason: String,
    },
    /// The relation graph contains a cycle and strict mode is on.
    #[error("cyclic relation graph: {}", .cycle.join(" -> "))]
    CyclicRelationGraph { cycle: Vec<String> },
    /// Two entities would be written to the same output file.
    #[error("entities '{first}' and '{second}' both write to '{file}'")]
    OutputCollision {
        file: String,
        first: String,
        second: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    pub(crate) fn unresolved(
        entity: &str,
        field: &str,
        relation: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvedRelationTarget {
            entity: entity.to_string(),
            field: field.to_string(),
            relation: relation.to_string(),
            reason: reason.into(),
        }
    }
}
