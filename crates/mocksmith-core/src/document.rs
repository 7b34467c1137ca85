use std::path::Path;

use crate::error::{Error, Result};
use crate::schema::SchemaDocument;

/// Serialized format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Load a schema document from disk, picking the format from the extension.
pub fn load_schema_document(path: &Path) -> Result<SchemaDocument> {
    let contents = std::fs::read_to_string(path)?;
    decode(&contents, DocumentFormat::from_path(path))
        .map_err(|message| Error::Parse(format!("{}: {message}", path.display())))
}

/// Parse a schema document held in memory.
pub fn parse_schema_document(input: &str, format: DocumentFormat) -> Result<SchemaDocument> {
    decode(input, format).map_err(Error::Parse)
}

fn decode(input: &str, format: DocumentFormat) -> std::result::Result<SchemaDocument, String> {
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(input).map_err(|err| err.to_string()),
        DocumentFormat::Json => serde_json::from_str(input).map_err(|err| err.to_string()),
    }
}
