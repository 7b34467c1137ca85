use mocksmith_core::SchemaDocument;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(SchemaDocument);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
