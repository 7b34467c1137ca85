use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Summary of relation graph structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Entity with the depth the resolver assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntity {
    pub entity: String,
    pub depth: usize,
}

/// Relation whose target entity is not part of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTarget {
    pub entity: String,
    pub field: String,
    pub target: String,
}

/// Report for relation dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationGraphReport {
    pub summary: RelationGraphSummary,
    /// Generation order: ascending depth, ties in first-assignment order.
    pub order: Vec<RankedEntity>,
    /// Entity paths closing a cycle, e.g. `["A", "B", "A"]`.
    pub cycles: Vec<Vec<String>>,
    pub missing: Vec<MissingTarget>,
}

impl RelationGraphReport {
    pub fn has_cycle(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.order.iter().map(|ranked| ranked.entity.clone()).collect()
    }

    pub fn depth_of(&self, entity: &str) -> Option<usize> {
        self.order
            .iter()
            .find(|ranked| ranked.entity == entity)
            .map(|ranked| ranked.depth)
    }
}

/// Build a deterministic relation dependency report for a schema.
///
/// Every entity is visited depth-first in declaration order. The depth of an
/// entity is the height of its relation chain, measured from the leaves: an
/// entity with no resolvable relation targets gets depth 0, otherwise one
/// more than the deepest target. Sorting by ascending depth therefore puts
/// every target strictly before the entities that reference it, and two runs
/// over the same schema assign the same depths in the same order.
///
/// A target still on the traversal stack is a cycle: it is recorded and
/// contributes nothing to the depth, so the walk always terminates.
pub fn build_relation_graph_report(schema: &Schema) -> RelationGraphReport {
    let mut walker = DepthWalker::new(schema);
    for name in schema.entity_names() {
        walker.visit(name);
    }

    let DepthWalker {
        mut ranked,
        cycles,
        missing,
        edges,
        ..
    } = walker;

    ranked.sort_by_key(|entity| entity.depth);

    RelationGraphReport {
        summary: RelationGraphSummary {
            nodes: ranked.len(),
            edges,
        },
        order: ranked,
        cycles,
        missing,
    }
}

/// Entity names in generation order.
pub fn resolve_generation_order(schema: &Schema) -> Vec<String> {
    build_relation_graph_report(schema).entity_names()
}

#[derive(Clone, Copy)]
enum VisitState {
    InProgress,
    Done(usize),
}

struct DepthWalker<'a> {
    schema: &'a Schema,
    state: HashMap<&'a str, VisitState>,
    stack: Vec<&'a str>,
    ranked: Vec<RankedEntity>,
    cycles: Vec<Vec<String>>,
    missing: Vec<MissingTarget>,
    edges: usize,
}

impl<'a> DepthWalker<'a> {
    fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            state: HashMap::new(),
            stack: Vec::new(),
            ranked: Vec::new(),
            cycles: Vec::new(),
            missing: Vec::new(),
            edges: 0,
        }
    }

    fn visit(&mut self, name: &'a str) -> Option<usize> {
        match self.state.get(name) {
            Some(VisitState::Done(depth)) => return Some(*depth),
            Some(VisitState::InProgress) => {
                self.record_cycle(name);
                return None;
            }
            None => {}
        }

        let (name, descriptor) = self.schema.entity_entry(name)?;
        self.state.insert(name, VisitState::InProgress);
        self.stack.push(name);

        let mut depth = 0;
        for (field, _, relation) in descriptor.direct_relations() {
            let Some(relation) = relation else {
                continue;
            };
            let Some((target, _)) = self.schema.entity_entry(&relation.entity) else {
                self.missing.push(MissingTarget {
                    entity: name.to_string(),
                    field: field.to_string(),
                    target: relation.entity.clone(),
                });
                continue;
            };

            self.edges += 1;
            if let Some(target_depth) = self.visit(target) {
                depth = depth.max(target_depth + 1);
            }
        }

        self.stack.pop();
        self.state.insert(name, VisitState::Done(depth));
        self.ranked.push(RankedEntity {
            entity: name.to_string(),
            depth,
        });
        Some(depth)
    }

    fn record_cycle(&mut self, name: &str) {
        let Some(start) = self.stack.iter().position(|entry| *entry == name) else {
            return;
        };
        let mut cycle: Vec<String> = self.stack[start..]
            .iter()
            .map(|entry| entry.to_string())
            .collect();
        cycle.push(name.to_string());
        self.cycles.push(cycle);
    }
}
