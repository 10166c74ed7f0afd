//! Opt-in re-derivation of a positional display field.

use super::{Fields, RecordList};
use crate::constants::{DEFAULT_RENUMBER_START, DEFAULT_RENUMBER_WIDTH, MAX_RENUMBER_WIDTH};
use crate::error::ListError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_start() -> usize {
    DEFAULT_RENUMBER_START
}

fn default_width() -> usize {
    DEFAULT_RENUMBER_WIDTH
}

/// Writes `start + position`, zero padded to `width`, into `field` of every
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renumber {
    pub field: String,
    #[serde(default = "default_start")]
    pub start: usize,
    #[serde(default = "default_width")]
    pub width: usize,
}

impl Renumber {
    /// Renumber `field` from 1 with two digits (`01`, `02`, ...).
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            start: DEFAULT_RENUMBER_START,
            width: DEFAULT_RENUMBER_WIDTH,
        }
    }

    pub fn start_at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Check the policy before any record is touched.
    ///
    /// # Errors
    /// Returns [`ListError::InvalidRenumber`] when `width` exceeds
    /// [`MAX_RENUMBER_WIDTH`] or a list of `len` records would number past
    /// `usize::MAX`.
    pub fn validate(&self, len: usize) -> Result<(), ListError> {
        if self.width > MAX_RENUMBER_WIDTH {
            return Err(ListError::InvalidRenumber(format!(
                "width {} exceeds {}",
                self.width, MAX_RENUMBER_WIDTH
            )));
        }
        if len > 0 {
            self.label(len - 1)?;
        }
        Ok(())
    }

    /// Display label for the record at `position`.
    ///
    /// # Errors
    /// Returns [`ListError::InvalidRenumber`] when `start + position` overflows.
    pub fn label(&self, position: usize) -> Result<String, ListError> {
        let number = self.start.checked_add(position).ok_or_else(|| {
            ListError::InvalidRenumber(format!(
                "start {} overflows at position {}",
                self.start, position
            ))
        })?;
        Ok(format!("{:0width$}", number, width = self.width))
    }

    /// Return a copy of `list` with every positional label re-derived.
    ///
    /// Records that already carry the right label stay shared with `list`.
    ///
    /// # Errors
    /// Returns [`Renumber::validate`] failures, and propagates
    /// [`Fields::set_field`] failures for typed records.
    pub fn apply<T>(&self, list: &RecordList<T>) -> Result<RecordList<T>, ListError>
    where
        T: Fields + Clone,
        T::Value: From<String> + PartialEq,
    {
        self.validate(list.len())?;
        let mut records = list.records.clone();
        for (position, record) in records.iter_mut().enumerate() {
            let label = T::Value::from(self.label(position)?);
            if record.field(&self.field) == Some(&label) {
                continue;
            }
            Arc::make_mut(record).set_field(&self.field, label)?;
        }
        Ok(RecordList { records })
    }
}

impl<T> RecordList<T>
where
    T: Fields + Clone,
    T::Value: From<String> + PartialEq,
{
    /// [`RecordList::remove`] followed by [`Renumber::apply`].
    ///
    /// # Errors
    /// Returns [`ListError::IndexOutOfRange`] for a bad index and
    /// [`ListError::InvalidRenumber`] for an unusable policy.
    pub fn remove_renumbered(&self, index: usize, policy: &Renumber) -> Result<Self, ListError> {
        policy.apply(&self.remove(index)?)
    }
}
