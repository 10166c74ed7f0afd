//! Shared test-only helpers for attrlist_core.

use crate::{JsonFileStore, Record, RecordList};
use tempfile::TempDir;

/// Creates a JSON store in a fresh temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing file.
pub(crate) fn setup_temp_store() -> (JsonFileStore, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let store = JsonFileStore::new(temp_dir.path().join("blocks").join("attributes.json"));
    (store, temp_dir)
}

/// List of records with a single `title` field each.
pub(crate) fn titled(titles: &[&str]) -> RecordList<Record> {
    titles
        .iter()
        .map(|title| Record::new().with("title", *title))
        .collect()
}

/// The `title` of every record, `"?"` where missing.
pub(crate) fn titles(list: &RecordList<Record>) -> Vec<String> {
    list.iter()
        .map(|record| {
            record
                .get("title")
                .and_then(|value| value.as_str())
                .unwrap_or("?")
                .to_string()
        })
        .collect()
}
