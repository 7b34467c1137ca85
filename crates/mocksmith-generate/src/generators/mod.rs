use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use mocksmith_core::{DataKind, TextFlavor, TypeDescriptor};

/// Ordered record of generated fields.
pub type Record = IndexMap<String, GeneratedValue>;

/// Generated value tree for a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<GeneratedValue>),
    Object(Record),
}

/// Top-level shape of a generated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Null,
    Scalar,
    Record,
    List,
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GeneratedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[GeneratedValue]> {
        match self {
            GeneratedValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Record> {
        match self {
            GeneratedValue::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Field lookup on a record; `None` for anything else.
    pub fn get(&self, field: &str) -> Option<&GeneratedValue> {
        self.as_object().and_then(|record| record.get(field))
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            GeneratedValue::Null => ValueShape::Null,
            GeneratedValue::Bool(_) | GeneratedValue::Int(_) | GeneratedValue::Text(_) => {
                ValueShape::Scalar
            }
            GeneratedValue::Object(_) => ValueShape::Record,
            GeneratedValue::List(_) => ValueShape::List,
        }
    }

    /// Number of top-level elements: list length, 1 for other values, 0 for null.
    pub fn element_count(&self) -> usize {
        match self {
            GeneratedValue::Null => 0,
            GeneratedValue::List(items) => items.len(),
            _ => 1,
        }
    }
}

/// Supplier of primitive leaf values.
pub trait ValueSource {
    fn integer(&mut self) -> i64;
    fn boolean(&mut self) -> bool;
    fn text(&mut self, flavor: TextFlavor) -> String;
}

/// Materialize a descriptor into a value tree.
///
/// Relation-bearing properties get a `Null` placeholder; the relation pass
/// fills them once every entity has base data.
pub fn generate_value(descriptor: &TypeDescriptor, source: &mut dyn ValueSource) -> GeneratedValue {
    match &descriptor.kind {
        DataKind::Number => GeneratedValue::Int(source.integer()),
        DataKind::Boolean => GeneratedValue::Bool(source.boolean()),
        DataKind::Text => GeneratedValue::Text(source.text(descriptor.text_flavor())),
        DataKind::Object => GeneratedValue::Object(generate_record(descriptor, source)),
        DataKind::List => GeneratedValue::List(generate_list(descriptor, source)),
        DataKind::Other(_) => GeneratedValue::Null,
    }
}

fn generate_list(descriptor: &TypeDescriptor, source: &mut dyn ValueSource) -> Vec<GeneratedValue> {
    let mut items = Vec::new();
    for _ in 0..descriptor.count {
        let item = match descriptor.items.as_deref() {
            Some(items) => generate_value(items, source),
            None => GeneratedValue::Object(generate_record(descriptor, source)),
        };
        items.push(item);
    }
    items
}

fn generate_record(descriptor: &TypeDescriptor, source: &mut dyn ValueSource) -> Record {
    let mut record = Record::new();
    for (name, field) in descriptor.fields() {
        let value = if field.relation.is_some() {
            GeneratedValue::Null
        } else {
            generate_value(field, source)
        };
        record.insert(name.to_string(), value);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts up so every generated leaf is distinguishable.
    #[derive(Default)]
    struct CountingSource {
        next: i64,
    }

    impl ValueSource for CountingSource {
        fn integer(&mut self) -> i64 {
            self.next += 1;
            self.next
        }

        fn boolean(&mut self) -> bool {
            self.next += 1;
            self.next % 2 == 0
        }

        fn text(&mut self, flavor: TextFlavor) -> String {
            self.next += 1;
            format!("{flavor:?}-{}", self.next)
        }
    }

    #[test]
    fn list_of_numbers_has_exact_count() {
        let descriptor = TypeDescriptor::list_of(5, TypeDescriptor::number());
        let value = generate_value(&descriptor, &mut CountingSource::default());

        let items = value.as_list().expect("list");
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|item| item.as_i64().is_some()));
    }

    #[test]
    fn object_has_exactly_declared_keys() {
        let descriptor = TypeDescriptor::object([
            ("a", TypeDescriptor::number()),
            ("b", TypeDescriptor::text(None)),
        ]);
        let value = generate_value(&descriptor, &mut CountingSource::default());

        let record = value.as_object().expect("record");
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(record["a"].as_i64().is_some());
        assert_eq!(record["b"].as_str(), Some("Generic-2"));
    }

    #[test]
    fn zero_or_unset_count_is_empty() {
        let descriptor = TypeDescriptor::list_of(0, TypeDescriptor::number());
        assert_eq!(
            generate_value(&descriptor, &mut CountingSource::default()),
            GeneratedValue::List(Vec::new())
        );

        let descriptor = TypeDescriptor::list_of_records(0, [("id", TypeDescriptor::number())]);
        assert_eq!(
            generate_value(&descriptor, &mut CountingSource::default()),
            GeneratedValue::List(Vec::new())
        );
    }

    #[test]
    fn list_without_items_builds_records_from_properties() {
        let descriptor = TypeDescriptor::list_of_records(
            2,
            [
                ("name", TypeDescriptor::text(Some("name"))),
                ("active", TypeDescriptor::boolean()),
            ],
        );
        let value = generate_value(&descriptor, &mut CountingSource::default());

        let items = value.as_list().expect("list");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("name").and_then(GeneratedValue::as_str), Some("Name-1"));
        assert_eq!(items[1].get("active").and_then(GeneratedValue::as_bool), Some(true));
    }

    #[test]
    fn malformed_descriptors_fall_back_to_defaults() {
        let mut source = CountingSource::default();

        let bare_list = TypeDescriptor {
            count: 2,
            ..TypeDescriptor::new(DataKind::List)
        };
        let value = generate_value(&bare_list, &mut source);
        assert_eq!(
            value,
            GeneratedValue::List(vec![
                GeneratedValue::Object(Record::new()),
                GeneratedValue::Object(Record::new()),
            ])
        );

        let bare_object = TypeDescriptor::new(DataKind::Object);
        assert_eq!(
            generate_value(&bare_object, &mut source),
            GeneratedValue::Object(Record::new())
        );

        let unknown = TypeDescriptor::new(DataKind::Other("uuid".to_string()));
        assert!(generate_value(&unknown, &mut source).is_null());
        assert_eq!(source.next, 0);
    }

    #[test]
    fn relation_properties_get_placeholders() {
        let descriptor = TypeDescriptor::list_of_records(
            1,
            [
                ("title", TypeDescriptor::text(Some("sentence"))),
                (
                    "author",
                    TypeDescriptor::text(Some("name")).with_relation("Users.name"),
                ),
                ("score", TypeDescriptor::number()),
            ],
        );
        let value = generate_value(&descriptor, &mut CountingSource::default());

        let record = value.as_list().expect("list")[0]
            .as_object()
            .expect("record");
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "author", "score"]);
        assert!(record["author"].is_null());
    }

    #[test]
    fn items_take_precedence_over_properties() {
        let descriptor = TypeDescriptor {
            properties: TypeDescriptor::object([("ignored", TypeDescriptor::number())]).properties,
            ..TypeDescriptor::list_of(3, TypeDescriptor::boolean())
        };
        let value = generate_value(&descriptor, &mut CountingSource::default());
        let items = value.as_list().expect("list");
        assert!(items.iter().all(|item| item.as_bool().is_some()));
    }

    #[test]
    fn values_serialize_as_plain_json() {
        let mut record = Record::new();
        record.insert("id".to_string(), GeneratedValue::Int(7));
        record.insert(
            "tags".to_string(),
            GeneratedValue::List(vec![GeneratedValue::Text("a".to_string()), GeneratedValue::Null]),
        );
        record.insert("ok".to_string(), GeneratedValue::Bool(false));

        let json = serde_json::to_string(&GeneratedValue::Object(record)).expect("serialize");
        assert_eq!(json, r#"{"id":7,"tags":["a",null],"ok":false}"#);
    }
}
