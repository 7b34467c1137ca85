use serde::{Deserialize, Serialize};

use crate::schema::{Schema, SchemaEntry};
use crate::types::{DataKind, Relation, TypeDescriptor};

/// Non-fatal finding about a schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    pub code: String,
    pub entity: String,
    /// Dotted path from the entity root (`Posts.author`).
    pub path: String,
    pub message: String,
}

/// Inspect a schema for descriptors that generate lenient defaults.
///
/// This reports:
/// - lists with neither `items` nor `properties`, or with both
/// - objects without properties
/// - unknown kinds
/// - relation strings that do not parse
/// - relations that the relation pass never visits
/// - mappings that are not descriptors and are skipped as entities
pub fn inspect_schema(schema: &Schema) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();

    for (name, entry) in schema.entries() {
        if let SchemaEntry::Other(serde_json::Value::Object(_)) = entry {
            issues.push(SchemaIssue {
                code: "ignored_entry".to_string(),
                entity: name.to_string(),
                path: name.to_string(),
                message: "mapping is not a valid descriptor; it is not generated".to_string(),
            });
        }
    }

    for (entity, descriptor) in schema.entities() {
        let mut inspector = Inspector {
            entity,
            issues: &mut issues,
        };
        inspector.walk(entity, descriptor, Level::Root);

        if !descriptor.is_record_list() {
            for (field, raw, _) in descriptor.direct_relations() {
                inspector.push(
                    "unpopulated_relation",
                    &format!("{entity}.{field}"),
                    format!(
                        "relation '{raw}' sits on an entity that is not a list of records; \
                         it keeps its placeholder"
                    ),
                );
            }
        }
    }

    issues
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Root,
    Direct,
    Nested,
}

struct Inspector<'a> {
    entity: &'a str,
    issues: &'a mut Vec<SchemaIssue>,
}

impl Inspector<'_> {
    fn walk(&mut self, path: &str, descriptor: &TypeDescriptor, level: Level) {
        if let Some(raw) = descriptor.relation.as_deref() {
            if Relation::parse(raw).is_none() {
                self.push(
                    "invalid_relation",
                    path,
                    format!("relation '{raw}' is not of the form '<entity>.<field>'"),
                );
            } else if level != Level::Direct {
                self.push(
                    "nested_relation",
                    path,
                    format!(
                        "relation '{raw}' is not a direct property of '{}' and is never populated",
                        self.entity
                    ),
                );
            }
            // the relation pass owns this value; its shape is a placeholder
            return;
        }

        match &descriptor.kind {
            DataKind::List => {
                match (&descriptor.items, &descriptor.properties) {
                    (None, None) => self.push(
                        "malformed_list",
                        path,
                        "list declares neither items nor properties; elements are empty records"
                            .to_string(),
                    ),
                    (Some(_), Some(_)) => self.push(
                        "ambiguous_list",
                        path,
                        "list declares both items and properties; items are used".to_string(),
                    ),
                    _ => {}
                }
            }
            DataKind::Object => {
                if descriptor.properties.as_ref().is_none_or(|props| props.is_empty()) {
                    self.push(
                        "malformed_object",
                        path,
                        "object declares no properties; it generates an empty record".to_string(),
                    );
                }
            }
            DataKind::Other(kind) => self.push(
                "unknown_kind",
                path,
                format!("unknown kind '{kind}' generates null"),
            ),
            DataKind::Number | DataKind::Text | DataKind::Boolean => {}
        }

        let child_level = if level == Level::Root {
            Level::Direct
        } else {
            Level::Nested
        };
        for (field, child) in descriptor.fields() {
            self.walk(&format!("{path}.{field}"), child, child_level);
        }
        if let Some(items) = descriptor.items.as_deref() {
            self.walk(&format!("{path}[]"), items, Level::Nested);
        }
    }

    fn push(&mut self, code: &str, path: &str, message: String) {
        self.issues.push(SchemaIssue {
            code: code.to_string(),
            entity: self.entity.to_string(),
            path: path.to_string(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(issues: &[SchemaIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.code.as_str()).collect()
    }

    #[test]
    fn well_formed_schema_has_no_issues() {
        let schema = Schema::new()
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
                        TypeDescriptor::new(DataKind::Object).with_relation("Users.name"),
                    )],
                ),
            )
            .with_entity("Scores", TypeDescriptor::list_of(4, TypeDescriptor::number()));

        let issues = inspect_schema(&schema);
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn lenient_descriptors_are_reported() {
        let schema = Schema::new()
            .with_entity("Empty", TypeDescriptor::new(DataKind::List))
            .with_entity("Bare", TypeDescriptor::new(DataKind::Object))
            .with_entity("Dates", TypeDescriptor::new(DataKind::Other("date".to_string())));

        let issues = inspect_schema(&schema);
        assert_eq!(
            codes(&issues),
            vec!["malformed_list", "malformed_object", "unknown_kind"]
        );
        assert_eq!(issues[2].path, "Dates");
    }

    #[test]
    fn skipped_mappings_are_reported() {
        let schema = Schema::new()
            .with_entry("version", SchemaEntry::Other(serde_json::json!(2)))
            .with_entry(
                "Drafts",
                SchemaEntry::Other(serde_json::json!({"count": 3})),
            )
            .with_entity("Flag", TypeDescriptor::boolean());

        let issues = inspect_schema(&schema);
        assert_eq!(codes(&issues), vec!["ignored_entry"]);
        assert_eq!(issues[0].entity, "Drafts");
    }

    #[test]
    fn misplaced_relations_are_reported() {
        let schema = Schema::new()
            .with_entity(
                "Profile",
                TypeDescriptor::object([(
                    "owner",
                    TypeDescriptor::new(DataKind::Object).with_relation("Users.name"),
                )]),
            )
            .with_entity(
                "Posts",
                TypeDescriptor::list_of_records(
                    1,
                    [
                        (
                            "meta",
                            TypeDescriptor::object([(
                                "editor",
                                TypeDescriptor::text(None).with_relation("Users.name"),
                            )]),
                        ),
                        (
                            "broken",
                            TypeDescriptor::text(None).with_relation("Users"),
                        ),
                    ],
                ),
            );

        let issues = inspect_schema(&schema);
        assert_eq!(
            codes(&issues),
            vec!["unpopulated_relation", "nested_relation", "invalid_relation"]
        );
        assert_eq!(issues[0].path, "Profile.owner");
        assert_eq!(issues[1].path, "Posts.meta.editor");
        assert_eq!(issues[2].path, "Posts.broken");
    }
}
