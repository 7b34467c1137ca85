use mocksmith_core::{DataKind, Schema, TypeDescriptor};
use mocksmith_generate::{GenerateOptions, GenerationEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::new()
        .with_entity(
            "Users",
            TypeDescriptor::list_of_records(
                3,
                [
                    ("id", TypeDescriptor::number()),
                    ("name", TypeDescriptor::text(Some("name"))),
                ],
            ),
        )
        .with_entity(
            "Posts",
            TypeDescriptor::list_of_records(
                5,
                [
                    ("title", TypeDescriptor::text(Some("sentence"))),
                    (
                        "author",
                        TypeDescriptor::new(DataKind::Object).with_relation("Users.name"),
                    ),
                ],
            ),
        );

    let result = GenerationEngine::new(GenerateOptions::default()).run(&schema)?;
    println!("{}", serde_json::to_string_pretty(&result.dataset)?);
    Ok(())
}
