use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Write a JSON model definition file, creating parent directories.
pub fn write_model(dir: &Path, relative: &str, definition: Value) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create model dir");
    }
    fs::write(&path, definition.to_string()).expect("write model file");
    path
}
