use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use mocksmith_core::{Relation, Schema};

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::generators::GeneratedValue;

/// Strategy for drawing related values out of already generated data.
pub trait ForeignContext {
    /// Draw `count` values of `relation.field` from the related collection.
    ///
    /// The error string explains why the collection cannot serve the pick.
    fn pick_related(
        &mut self,
        dataset: &Dataset,
        relation: &Relation,
        count: usize,
    ) -> Result<Vec<GeneratedValue>, String>;
}

/// Independent uniform picks; the same related element may be reused.
#[derive(Debug, Clone)]
pub struct RandomForeignContext<R> {
    rng: R,
}

impl<R: Rng> RandomForeignContext<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ForeignContext for RandomForeignContext<R> {
    fn pick_related(
        &mut self,
        dataset: &Dataset,
        relation: &Relation,
        count: usize,
    ) -> Result<Vec<GeneratedValue>, String> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let candidates = related_values(dataset, relation)?;
        let mut picks = Vec::with_capacity(count);
        for _ in 0..count {
            let index = self.rng.random_range(0..candidates.len());
            picks.push(candidates[index].clone());
        }
        Ok(picks)
    }
}

/// Snapshot `relation.field` across the related collection.
fn related_values<'d>(
    dataset: &'d Dataset,
    relation: &Relation,
) -> Result<Vec<&'d GeneratedValue>, String> {
    let related = dataset
        .get(&relation.entity)
        .ok_or_else(|| format!("entity '{}' has no generated data", relation.entity))?;
    let items = related
        .as_list()
        .ok_or_else(|| format!("entity '{}' is not a list", relation.entity))?;
    if items.is_empty() {
        return Err(format!("entity '{}' has no elements", relation.entity));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.get(&relation.field).ok_or_else(|| {
                format!(
                    "element {index} of '{}' has no field '{}'",
                    relation.entity, relation.field
                )
            })
        })
        .collect()
}

/// Second pass: assign every direct relation field of list-of-record entities.
///
/// Entities are visited in `order`; each referencing element gets an
/// independent pick from the related collection. A target field that is
/// itself a relation must already be populated, otherwise the pick would copy
/// its placeholder. Returns the number of fields assigned.
pub fn populate_relations(
    schema: &Schema,
    order: &[String],
    dataset: &mut Dataset,
    foreign: &mut dyn ForeignContext,
) -> Result<u64, GenerationError> {
    let mut assigned = 0_u64;
    let mut populated: HashSet<(String, String)> = HashSet::new();

    for entity in order {
        let Some(descriptor) = schema.entity(entity) else {
            continue;
        };
        if !descriptor.is_record_list() {
            continue;
        }

        for (field, raw, relation) in descriptor.direct_relations() {
            let relation = relation.ok_or_else(|| {
                GenerationError::unresolved(entity, field, raw, "expected '<entity>.<field>'")
            })?;
            if !schema.contains_entity(&relation.entity) {
                return Err(GenerationError::unresolved(
                    entity,
                    field,
                    raw,
                    format!("entity '{}' is not declared in the schema", relation.entity),
                ));
            }

            let owner_len = dataset
                .get(entity)
                .and_then(GeneratedValue::as_list)
                .map_or(0, <[GeneratedValue]>::len);
            if owner_len > 0
                && is_relation_field(schema, &relation)
                && !populated.contains(&(relation.entity.clone(), relation.field.clone()))
            {
                return Err(GenerationError::unresolved(
                    entity,
                    field,
                    raw,
                    format!("target field '{relation}' is a relation that is not populated yet"),
                ));
            }

            let picks = foreign
                .pick_related(dataset, &relation, owner_len)
                .map_err(|reason| GenerationError::unresolved(entity, field, raw, reason))?;

            if let Some(GeneratedValue::List(items)) = dataset.get_mut(entity) {
                for (item, value) in items.iter_mut().zip(picks) {
                    if let GeneratedValue::Object(record) = item {
                        record.insert(field.to_string(), value);
                        assigned += 1;
                    }
                }
            }

            debug!(
                entity = %entity,
                field = %field,
                relation = %relation,
                elements = owner_len,
                "relation populated"
            );
            populated.insert((entity.clone(), field.to_string()));
        }
    }

    Ok(assigned)
}

fn is_relation_field(schema: &Schema, relation: &Relation) -> bool {
    schema
        .entity(&relation.entity)
        .and_then(|target| target.fields().find(|(name, _)| *name == relation.field))
        .is_some_and(|(_, descriptor)| descriptor.relation.is_some())
}

#[cfg(test)]
mod tests {
    use mocksmith_core::{DataKind, TypeDescriptor};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::generators::Record;

    fn record(fields: &[(&str, GeneratedValue)]) -> GeneratedValue {
        let mut record = Record::new();
        for (name, value) in fields {
            record.insert(name.to_string(), value.clone());
        }
        GeneratedValue::Object(record)
    }

    fn text(value: &str) -> GeneratedValue {
        GeneratedValue::Text(value.to_string())
    }

    fn context() -> RandomForeignContext<ChaCha8Rng> {
        RandomForeignContext::new(ChaCha8Rng::seed_from_u64(11))
    }

    fn blog_schema(relation: &str) -> Schema {
        Schema::new()
            .with_entity(
                "Users",
                TypeDescriptor::list_of_records(2, [("name", TypeDescriptor::text(Some("name")))]),
            )
            .with_entity(
                "Posts",
                TypeDescriptor::list_of_records(
                    3,
                    [(
                        "author",
                        TypeDescriptor::new(DataKind::Object).with_relation(relation),
                    )],
                ),
            )
    }

    fn blog_dataset(users: Vec<GeneratedValue>, posts: usize) -> Dataset {
        let mut dataset = Dataset::new();
        dataset.insert("Users", GeneratedValue::List(users));
        dataset.insert(
            "Posts",
            GeneratedValue::List(vec![record(&[("author", GeneratedValue::Null)]); posts]),
        );
        dataset
    }

    fn order() -> Vec<String> {
        vec!["Users".to_string(), "Posts".to_string()]
    }

    #[test]
    fn every_reference_points_at_a_related_value() {
        let schema = blog_schema("Users.name");
        let users = vec![record(&[("name", text("Ana"))]), record(&[("name", text("Rui"))])];
        let mut dataset = blog_dataset(users, 3);

        let assigned =
            populate_relations(&schema, &order(), &mut dataset, &mut context()).expect("populate");
        assert_eq!(assigned, 3);

        let posts = dataset.get("Posts").and_then(GeneratedValue::as_list).expect("posts");
        for post in posts {
            let author = post.get("author").and_then(GeneratedValue::as_str);
            assert!(matches!(author, Some("Ana") | Some("Rui")), "got {author:?}");
        }
    }

    #[test]
    fn empty_owner_never_touches_the_target() {
        let schema = blog_schema("Users.name");
        let mut dataset = blog_dataset(Vec::new(), 0);

        let assigned =
            populate_relations(&schema, &order(), &mut dataset, &mut context()).expect("populate");
        assert_eq!(assigned, 0);
    }

    #[test]
    fn empty_target_fails() {
        let schema = blog_schema("Users.name");
        let mut dataset = blog_dataset(Vec::new(), 2);

        let err = populate_relations(&schema, &order(), &mut dataset, &mut context())
            .expect_err("empty target must fail");
        assert!(err.to_string().contains("has no elements"), "{err}");
    }

    #[test]
    fn missing_entity_fails() {
        let schema = blog_schema("Authors.name");
        let mut dataset = blog_dataset(vec![record(&[("name", text("Ana"))])], 0);

        let err = populate_relations(&schema, &order(), &mut dataset, &mut context())
            .expect_err("missing entity must fail");
        match err {
            GenerationError::UnresolvedRelationTarget {
                entity,
                field,
                relation,
                ..
            } => {
                assert_eq!(entity, "Posts");
                assert_eq!(field, "author");
                assert_eq!(relation, "Authors.name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_field_fails() {
        let schema = blog_schema("Users.email");
        let mut dataset = blog_dataset(vec![record(&[("name", text("Ana"))])], 1);

        let err = populate_relations(&schema, &order(), &mut dataset, &mut context())
            .expect_err("missing field must fail");
        assert!(err.to_string().contains("no field 'email'"), "{err}");
    }

    #[test]
    fn non_list_target_fails() {
        let schema = blog_schema("Users.name");
        let mut dataset = blog_dataset(Vec::new(), 1);
        dataset.insert("Users", record(&[("name", text("Ana"))]));

        let err = populate_relations(&schema, &order(), &mut dataset, &mut context())
            .expect_err("record target must fail");
        assert!(err.to_string().contains("is not a list"), "{err}");
    }

    #[test]
    fn singleton_records_are_skipped() {
        let schema = Schema::new()
            .with_entity(
                "Users",
                TypeDescriptor::list_of_records(1, [("name", TypeDescriptor::text(None))]),
            )
            .with_entity(
                "Profile",
                TypeDescriptor::object([(
                    "owner",
                    TypeDescriptor::new(DataKind::Object).with_relation("Users.name"),
                )]),
            );
        let mut dataset = Dataset::new();
        dataset.insert("Users", GeneratedValue::List(vec![record(&[("name", text("Ana"))])]));
        dataset.insert("Profile", record(&[("owner", GeneratedValue::Null)]));

        let order = vec!["Users".to_string(), "Profile".to_string()];
        let assigned =
            populate_relations(&schema, &order, &mut dataset, &mut context()).expect("populate");
        assert_eq!(assigned, 0);
        let owner = dataset.get("Profile").and_then(|profile| profile.get("owner"));
        assert!(owner.is_some_and(GeneratedValue::is_null));
    }

    fn chained_schema(first: &str, second: &str) -> Schema {
        Schema::new()
            .with_entity(
                "A",
                TypeDescriptor::list_of_records(
                    2,
                    [
                        ("id", TypeDescriptor::number()),
                        ("b", TypeDescriptor::new(DataKind::Object).with_relation(first)),
                    ],
                ),
            )
            .with_entity(
                "B",
                TypeDescriptor::list_of_records(
                    2,
                    [("a", TypeDescriptor::new(DataKind::Object).with_relation(second))],
                ),
            )
    }

    fn chained_dataset() -> Dataset {
        let a = record(&[("id", GeneratedValue::Int(1)), ("b", GeneratedValue::Null)]);
        let b = record(&[("a", GeneratedValue::Null)]);
        let mut dataset = Dataset::new();
        dataset.insert("A", GeneratedValue::List(vec![a.clone(), a]));
        dataset.insert("B", GeneratedValue::List(vec![b.clone(), b]));
        dataset
    }

    #[test]
    fn relation_chains_copy_populated_values() {
        let schema = chained_schema("B.a", "A.id");
        let mut dataset = chained_dataset();

        let order = vec!["B".to_string(), "A".to_string()];
        let assigned =
            populate_relations(&schema, &order, &mut dataset, &mut context()).expect("populate");
        assert_eq!(assigned, 4);

        let a = dataset.get("A").and_then(GeneratedValue::as_list).expect("A");
        assert!(a.iter().all(|item| item.get("b") == Some(&GeneratedValue::Int(1))));
    }

    #[test]
    fn unpopulated_relation_targets_fail() {
        let schema = chained_schema("B.a", "A.b");
        let mut dataset = chained_dataset();

        let order = vec!["B".to_string(), "A".to_string()];
        let err = populate_relations(&schema, &order, &mut dataset, &mut context())
            .expect_err("placeholder must not be copied");
        assert!(err.to_string().contains("'A.b' is a relation"), "{err}");
    }

    #[test]
    fn picks_are_uniform_enough_to_reach_every_element() {
        let schema = blog_schema("Users.name");
        let users = (0..4)
            .map(|index| record(&[("name", text(&format!("user{index}")))]))
            .collect();
        let mut dataset = blog_dataset(users, 200);

        populate_relations(&schema, &order(), &mut dataset, &mut context()).expect("populate");

        let posts = dataset.get("Posts").and_then(GeneratedValue::as_list).expect("posts");
        for index in 0..4 {
            let name = format!("user{index}");
            let picked = posts
                .iter()
                .any(|post| post.get("author").and_then(GeneratedValue::as_str) == Some(&name));
            assert!(picked, "{name} never picked");
        }
    }
}
