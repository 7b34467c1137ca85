use std::collections::HashMap;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::generators::GeneratedValue;
use crate::model::GenerationReport;

/// Subdirectory holding run metadata. Entity files all end in `.json`, so
/// no entity can shadow it.
pub const REPORT_DIR: &str = "_run";
pub const REPORT_FILE_NAME: &str = "generation_report.json";

/// File name for an entity's output; path separators become `_`.
pub fn entity_file_name(entity: &str) -> String {
    let safe: String = entity
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("{safe}.json")
}

/// Write one pretty-printed `<entity>.json` per entity in `dataset`.
///
/// Fails before writing anything when two entities map to the same file
/// name, compared case-insensitively. Returns the total number of bytes
/// written.
pub fn write_dataset_json(dir: &Path, dataset: &Dataset) -> Result<u64, GenerationError> {
    let files = plan_entity_files(dataset)?;
    create_dir_all(dir)?;

    let mut bytes = 0u64;
    for (file, value) in files {
        bytes = bytes.saturating_add(write_json_atomic(&dir.join(file), value)?);
    }
    Ok(bytes)
}

/// Write the run report to `<dir>/_run/generation_report.json`.
pub fn write_report_json(dir: &Path, report: &GenerationReport) -> Result<PathBuf, GenerationError> {
    let report_dir = dir.join(REPORT_DIR);
    create_dir_all(&report_dir)?;
    let path = report_dir.join(REPORT_FILE_NAME);
    write_json_atomic(&path, report)?;
    Ok(path)
}

fn plan_entity_files(dataset: &Dataset) -> Result<Vec<(String, &GeneratedValue)>, GenerationError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut files = Vec::with_capacity(dataset.len());

    for (entity, value) in dataset.iter() {
        let file = entity_file_name(entity);
        if let Some(first) = seen.insert(file.to_lowercase(), entity) {
            return Err(GenerationError::OutputCollision {
                file,
                first: first.to_string(),
                second: entity.to_string(),
            });
        }
        files.push((file, value));
    }
    Ok(files)
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<u64, GenerationError> {
    let data = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &data)?;
    Ok(data.len() as u64)
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp_path = temp_path(path);
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{file_name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_replaced_in_file_names() {
        assert_eq!(entity_file_name("Users"), "Users.json");
        assert_eq!(entity_file_name("a/b\\c"), "a_b_c.json");
    }

    #[test]
    fn colliding_file_names_are_rejected() {
        let mut dataset = Dataset::new();
        dataset.insert("a/b", GeneratedValue::Int(1));
        dataset.insert("a_b", GeneratedValue::Int(2));

        let err = plan_entity_files(&dataset).expect_err("collision");
        assert_eq!(
            err.to_string(),
            "entities 'a/b' and 'a_b' both write to 'a_b.json'"
        );

        let mut dataset = Dataset::new();
        dataset.insert("Users", GeneratedValue::Int(1));
        dataset.insert("users", GeneratedValue::Int(2));
        assert!(plan_entity_files(&dataset).is_err());
    }
}
