//! Attribute stores the editor reads snapshots from and writes results to.

mod backup;
mod json_file;
mod lock;


pub use json_file::JsonFileStore;
pub use lock::DocumentLock;

use crate::error::AppError;
use crate::list::RecordList;
use crate::models::Record;
use std::collections::BTreeMap;

/// Holder of repeatable attributes, keyed by attribute name.
pub trait AttributeStore {
    /// Read the current snapshot of `attribute`.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the attribute does not exist.
    fn get(&self, attribute: &str) -> Result<RecordList<Record>, AppError>;

    /// Replace `attribute` with `list`, creating it when absent.
    fn set(&mut self, attribute: &str, list: RecordList<Record>) -> Result<(), AppError>;

    /// Read `attribute`, pass it to `edit` and store the result, as one step.
    ///
    /// Stores shared between writers hold their write lock across the whole
    /// call, so an edit always sees the latest committed snapshot. Nothing is
    /// written when `edit` fails or returns an equal list.
    ///
    /// # Returns
    /// The list `edit` produced.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for a missing attribute, the error of
    /// `edit`, or store write errors.
    fn update<F>(&mut self, attribute: &str, edit: F) -> Result<RecordList<Record>, AppError>
    where
        F: FnOnce(&RecordList<Record>) -> Result<RecordList<Record>, AppError>;

    fn contains(&self, attribute: &str) -> Result<bool, AppError>;

    /// Delete `attribute`, returning its last snapshot if it existed.
    fn remove(&mut self, attribute: &str) -> Result<Option<RecordList<Record>>, AppError>;

    /// Attribute names in sorted order.
    fn attributes(&self) -> Result<Vec<String>, AppError>;
}

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    attributes: BTreeMap<String, RecordList<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>, list: RecordList<Record>) -> Self {
        self.attributes.insert(attribute.into(), list);
        self
    }
}

impl AttributeStore for MemoryStore {
    fn get(&self, attribute: &str) -> Result<RecordList<Record>, AppError> {
        self.attributes
            .get(attribute)
            .cloned()
            .ok_or_else(|| AppError::NotFound(attribute.to_string()))
    }

    fn set(&mut self, attribute: &str, list: RecordList<Record>) -> Result<(), AppError> {
        self.attributes.insert(attribute.to_string(), list);
        Ok(())
    }

    fn update<F>(&mut self, attribute: &str, edit: F) -> Result<RecordList<Record>, AppError>
    where
        F: FnOnce(&RecordList<Record>) -> Result<RecordList<Record>, AppError>,
    {
        let current = self
            .attributes
            .get_mut(attribute)
            .ok_or_else(|| AppError::NotFound(attribute.to_string()))?;
        let next = edit(current)?;
        if next != *current {
            *current = next.clone();
        }
        Ok(next)
    }

    fn contains(&self, attribute: &str) -> Result<bool, AppError> {
        Ok(self.attributes.contains_key(attribute))
    }

    fn remove(&mut self, attribute: &str) -> Result<Option<RecordList<Record>>, AppError> {
        Ok(self.attributes.remove(attribute))
    }

    fn attributes(&self) -> Result<Vec<String>, AppError> {
        Ok(self.attributes.keys().cloned().collect())
    }
}
