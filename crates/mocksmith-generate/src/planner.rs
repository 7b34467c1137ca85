use tracing::warn;

use mocksmith_core::{RelationGraphReport, Schema, build_relation_graph_report};

use crate::errors::GenerationError;

/// Planned generation task for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTask {
    pub entity: String,
    pub depth: usize,
}

/// Ordered tasks plus the relation graph they were derived from.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub tasks: Vec<GenerationTask>,
    pub graph: RelationGraphReport,
}

impl GenerationPlan {
    pub fn order(&self) -> Vec<String> {
        self.tasks.iter().map(|task| task.entity.clone()).collect()
    }
}

/// Build a deterministic generation plan for the schema's entities.
///
/// Relations to undeclared entities fail the plan. Cycles are logged and
/// tolerated unless `strict` is set.
pub fn plan_entities(schema: &Schema, strict: bool) -> Result<GenerationPlan, GenerationError> {
    let graph = build_relation_graph_report(schema);

    if let Some(missing) = graph.missing.first() {
        let relation = schema
            .entity(&missing.entity)
            .and_then(|descriptor| {
                descriptor
                    .direct_relations()
                    .find(|(field, _, _)| *field == missing.field)
                    .map(|(_, raw, _)| raw.to_string())
            })
            .unwrap_or_else(|| missing.target.clone());
        return Err(GenerationError::unresolved(
            &missing.entity,
            &missing.field,
            &relation,
            format!("entity '{}' is not declared in the schema", missing.target),
        ));
    }

    for cycle in &graph.cycles {
        if strict {
            return Err(GenerationError::CyclicRelationGraph {
                cycle: cycle.clone(),
            });
        }
        warn!(
            cycle = %cycle.join(" -> "),
            "relation cycle detected; generation order cannot respect it fully"
        );
    }

    let tasks = graph
        .order
        .iter()
        .map(|ranked| GenerationTask {
            entity: ranked.entity.clone(),
            depth: ranked.depth,
        })
        .collect();

    Ok(GenerationPlan { tasks, graph })
}
