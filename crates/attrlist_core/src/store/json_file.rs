//! JSON document store: one file mapping attribute names to record arrays.

use super::backup::backup_document;
use super::lock::DocumentLock;
use super::AttributeStore;
use crate::config::Config;
use crate::constants::{DOC_LOCK_EXTENSION, DOC_TMP_EXTENSION};
use crate::error::AppError;
use crate::list::RecordList;
use crate::models::Record;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

type Document = BTreeMap<String, RecordList<Record>>;

/// Append `.<extension>` to the full file name of `path`.
pub(crate) fn sibling_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Attribute store persisted as a single pretty-printed JSON object.
///
/// Plain reads never lock. Every write, including the read and transform of
/// [`AttributeStore::update`], runs under [`DocumentLock`] and replaces the
/// file through a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    auto_backup: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            auto_backup: false,
        }
    }

    /// Store at `config.doc_path` honoring `config.auto_backup`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.doc_path).with_auto_backup(config.auto_backup)
    }

    pub fn with_auto_backup(mut self, enabled: bool) -> Self {
        self.auto_backup = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        sibling_path(&self.path, DOC_LOCK_EXTENSION)
    }

    fn read_document(&self) -> Result<Document, AppError> {
        if !self.path.exists() {
            return Ok(Document::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Document::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_document(&self, document: &Document) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if self.auto_backup {
            backup_document(&self.path)?;
        }
        let tmp_path = sibling_path(&self.path, DOC_TMP_EXTENSION);
        let encoded = serde_json::to_string_pretty(document)?;
        fs::write(&tmp_path, encoded)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Locked read-modify-write. `edit` returns whether the document changed.
    fn modify<R, F>(&self, edit: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Document) -> Result<(R, bool), AppError>,
    {
        let _lock = DocumentLock::acquire(&self.lock_path())?;
        let mut document = self.read_document()?;
        let (result, changed) = edit(&mut document)?;
        if changed {
            self.write_document(&document)?;
        }
        Ok(result)
    }
}

impl AttributeStore for JsonFileStore {
    fn get(&self, attribute: &str) -> Result<RecordList<Record>, AppError> {
        self.read_document()?
            .remove(attribute)
            .ok_or_else(|| AppError::NotFound(attribute.to_string()))
    }

    fn set(&mut self, attribute: &str, list: RecordList<Record>) -> Result<(), AppError> {
        self.modify(|document| {
            document.insert(attribute.to_string(), list);
            Ok(((), true))
        })
    }

    fn update<F>(&mut self, attribute: &str, edit: F) -> Result<RecordList<Record>, AppError>
    where
        F: FnOnce(&RecordList<Record>) -> Result<RecordList<Record>, AppError>,
    {
        self.modify(|document| {
            let current = document
                .get_mut(attribute)
                .ok_or_else(|| AppError::NotFound(attribute.to_string()))?;
            let next = edit(current)?;
            if next == *current {
                tracing::debug!("'{}' unchanged; skipping write", attribute);
                return Ok((next, false));
            }
            *current = next.clone();
            Ok((next, true))
        })
    }

    fn contains(&self, attribute: &str) -> Result<bool, AppError> {
        Ok(self.read_document()?.contains_key(attribute))
    }

    fn remove(&mut self, attribute: &str) -> Result<Option<RecordList<Record>>, AppError> {
        self.modify(|document| {
            let removed = document.remove(attribute);
            let changed = removed.is_some();
            Ok((removed, changed))
        })
    }

    fn attributes(&self) -> Result<Vec<String>, AppError> {
        Ok(self.read_document()?.into_keys().collect())
    }
}
