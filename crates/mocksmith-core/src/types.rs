use std::fmt;

use indexmap::IndexMap;
use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema as JsonSchemaObject;
use serde::{Deserialize, Serialize};

/// Kind of value a descriptor generates.
///
/// The set is closed: anything outside it is kept as [`DataKind::Other`]
/// and generates a null value instead of failing the schema load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataKind {
    List,
    Number,
    Text,
    Object,
    Boolean,
    Other(String),
}

impl DataKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Number => "number",
            Self::Text => "string",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Other(name) => name.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for DataKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "list" => Self::List,
            "number" => Self::Number,
            "string" | "text" => Self::Text,
            "object" => Self::Object,
            "boolean" => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<DataKind> for String {
    fn from(value: DataKind) -> Self {
        match value {
            DataKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for DataKind {
    fn schema_name() -> String {
        "DataKind".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> JsonSchemaObject {
        String::json_schema(generator)
    }
}

/// Flavor hint for generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFlavor {
    Name,
    Word,
    Sentence,
    Paragraph,
    #[default]
    Generic,
}

impl TextFlavor {
    /// Unknown or missing hints fall back to a generic word.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("name") => Self::Name,
            Some("word") => Self::Word,
            Some("sentence") => Self::Sentence,
            Some("paragraph") => Self::Paragraph,
            _ => Self::Generic,
        }
    }
}

/// Parsed `"<entity>.<field>"` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub entity: String,
    pub field: String,
}

impl Relation {
    /// Split on the first `.`; both sides must be non-empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let (entity, field) = raw.split_once('.')?;
        let entity = entity.trim();
        let field = field.trim();
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some(Self {
            entity: entity.to_string(),
            field: field.to_string(),
        })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// A schema node declaring how to generate one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypeDescriptor {
    /// Value kind (`list`, `number`, `string`, `object`, `boolean`).
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Number of elements for `list` descriptors.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: u64,
    /// Record fields, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, TypeDescriptor>>,
    /// Element descriptor for `list` descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<TypeDescriptor>>,
    /// Text flavor hint (`name`, `word`, `sentence`, `paragraph`).
    #[serde(
        default,
        rename = "mock",
        alias = "text_flavor",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_flavor: Option<String>,
    /// Foreign reference in `"<entity>.<field>"` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl TypeDescriptor {
    pub fn new(kind: DataKind) -> Self {
        Self {
            kind,
            count: 0,
            properties: None,
            items: None,
            text_flavor: None,
            relation: None,
        }
    }

    pub fn number() -> Self {
        Self::new(DataKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(DataKind::Boolean)
    }

    pub fn text(flavor: Option<&str>) -> Self {
        Self {
            text_flavor: flavor.map(str::to_string),
            ..Self::new(DataKind::Text)
        }
    }

    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeDescriptor)>,
        K: Into<String>,
    {
        Self {
            properties: Some(collect_properties(properties)),
            ..Self::new(DataKind::Object)
        }
    }

    /// List whose elements are generated from a single element descriptor.
    pub fn list_of(count: u64, items: TypeDescriptor) -> Self {
        Self {
            count,
            items: Some(Box::new(items)),
            ..Self::new(DataKind::List)
        }
    }

    /// List whose elements are records built from `properties`.
    pub fn list_of_records<I, K>(count: u64, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeDescriptor)>,
        K: Into<String>,
    {
        Self {
            count,
            properties: Some(collect_properties(properties)),
            ..Self::new(DataKind::List)
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn text_flavor(&self) -> TextFlavor {
        TextFlavor::parse(self.text_flavor.as_deref())
    }

    /// Iterate `(field, descriptor)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.properties
            .iter()
            .flat_map(|properties| properties.iter())
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Direct properties carrying a relation marker, with the parsed relation
    /// (`None` when the relation string is malformed).
    pub fn direct_relations(&self) -> impl Iterator<Item = (&str, &str, Option<Relation>)> {
        self.fields().filter_map(|(name, descriptor)| {
            descriptor
                .relation
                .as_deref()
                .map(|raw| (name, raw, Relation::parse(raw)))
        })
    }

    /// A list whose elements are records sharing this descriptor's properties.
    pub fn is_record_list(&self) -> bool {
        self.kind == DataKind::List && self.items.is_none() && self.properties.is_some()
    }
}

fn collect_properties<I, K>(properties: I) -> IndexMap<String, TypeDescriptor>
where
    I: IntoIterator<Item = (K, TypeDescriptor)>,
    K: Into<String>,
{
    properties
        .into_iter()
        .map(|(name, descriptor)| (name.into(), descriptor))
        .collect()
}
