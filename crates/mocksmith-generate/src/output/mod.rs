pub mod json;

pub use json::{REPORT_DIR, REPORT_FILE_NAME, entity_file_name, write_dataset_json, write_report_json};
