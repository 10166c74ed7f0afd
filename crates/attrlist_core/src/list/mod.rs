//! Copy-on-write record lists backing repeatable block attributes.
//!
//! Every operation takes `&self` and returns a new [`RecordList`]. Records are
//! held behind [`Arc`], so a new list shares every record it did not touch
//! with the list it was derived from, and earlier snapshots never change.

mod renumber;

#[cfg(test)]
mod tests;

pub use renumber::Renumber;

use crate::error::ListError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Field access used by update and nested-list operations.
///
/// Implemented by [`crate::Record`] for dynamic records; typed record structs
/// can implement it to reuse the same list operations.
pub trait Fields {
    /// Value stored in a single field and in nested list entries.
    type Value;

    /// Read a field by name.
    fn field(&self, name: &str) -> Option<&Self::Value>;

    /// Replace (or insert) a field value.
    ///
    /// # Errors
    /// Implementations return [`ListError::UnknownField`] or
    /// [`ListError::TypeMismatch`] when the record cannot hold `value`.
    fn set_field(&mut self, name: &str, value: Self::Value) -> Result<(), ListError>;

    /// Borrow the entries of a list-valued field.
    ///
    /// # Errors
    /// Returns [`ListError::NotAList`] unless overridden.
    fn nested(&self, name: &str) -> Result<&[Self::Value], ListError> {
        Err(ListError::NotAList(name.to_string()))
    }

    /// Mutably borrow the entries of a list-valued field.
    ///
    /// # Errors
    /// Returns [`ListError::NotAList`] unless overridden.
    fn nested_mut(&mut self, name: &str) -> Result<&mut Vec<Self::Value>, ListError> {
        Err(ListError::NotAList(name.to_string()))
    }
}

/// Direction of a single-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "DirectionRepr")]
pub enum Direction {
    /// Towards index 0 (`-1`).
    Up,
    /// Towards the end of the list (`+1`).
    Down,
}

impl Direction {
    /// Signed index offset of this direction.
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = ListError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            other => Err(ListError::InvalidDirection(other.to_string())),
        }
    }
}

impl FromStr for Direction {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "-1" => Ok(Direction::Up),
            "down" | "1" | "+1" => Ok(Direction::Down),
            other => Err(ListError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectionRepr {
    Offset(i64),
    Word(String),
}

impl TryFrom<DirectionRepr> for Direction {
    type Error = ListError;

    fn try_from(value: DirectionRepr) -> Result<Self, Self::Error> {
        match value {
            DirectionRepr::Offset(offset) => Direction::try_from(offset),
            DirectionRepr::Word(word) => word.parse(),
        }
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), ListError> {
    if index < len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfRange { index, len })
    }
}

/// Index `index` would move to, or `None` when either end is out of range.
pub(crate) fn target_index(index: usize, direction: Direction, len: usize) -> Option<usize> {
    if index >= len {
        return None;
    }
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => (index + 1 < len).then_some(index + 1),
    }
}

/// Ordered, immutable list of records with structural sharing.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordList<T> {
    records: Vec<Arc<T>>,
}

impl<T> Clone for RecordList<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for RecordList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<T: fmt::Debug> fmt::Debug for RecordList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for RecordList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl<T> From<Vec<T>> for RecordList<T> {
    fn from(records: Vec<T>) -> Self {
        records.into_iter().collect()
    }
}

impl<T> RecordList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.iter().map(Arc::as_ref)
    }

    /// Returns `true` when both lists hold the same allocation at `index`.
    ///
    /// Used to observe structural sharing; equal values in distinct
    /// allocations return `false`.
    pub fn shares_record(&self, other: &Self, index: usize) -> bool {
        match (self.records.get(index), other.records.get(index)) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Append a record built from `template`.
    ///
    /// # Returns
    /// A list one record longer; never fails.
    pub fn add(&self, template: T) -> Self {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend(self.records.iter().cloned());
        records.push(Arc::new(template));
        Self { records }
    }

    /// Remove the record at `index`, shifting later records down.
    ///
    /// # Errors
    /// Returns [`ListError::IndexOutOfRange`] when `index >= len`.
    pub fn remove(&self, index: usize) -> Result<Self, ListError> {
        check_index(index, self.len())?;
        let mut records = self.records.clone();
        records.remove(index);
        Ok(Self { records })
    }

    /// Swap the record at `index` with its neighbour in `direction`.
    ///
    /// Moving past either end, or from an index outside the list, returns
    /// an unchanged copy instead of failing.
    pub fn move_record(&self, index: usize, direction: Direction) -> Self {
        let Some(target) = target_index(index, direction, self.len()) else {
            return self.clone();
        };
        let mut records = self.records.clone();
        records.swap(index, target);
        Self { records }
    }
}

impl<T: Clone> RecordList<T> {
    /// Copy the records out into an owned vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Rebuild the record at `index` through `edit`, sharing all others.
    fn modify<F>(&self, index: usize, edit: F) -> Result<Self, ListError>
    where
        F: FnOnce(&mut T) -> Result<(), ListError>,
    {
        check_index(index, self.len())?;
        let mut records = self.records.clone();
        edit(Arc::make_mut(&mut records[index]))?;
        Ok(Self { records })
    }
}

impl<T: Fields + Clone> RecordList<T> {
    /// Replace `field` of the record at `index` with `value`.
    ///
    /// # Errors
    /// Returns [`ListError::IndexOutOfRange`] for a bad index, or whatever
    /// [`Fields::set_field`] rejects.
    pub fn update(&self, index: usize, field: &str, value: T::Value) -> Result<Self, ListError> {
        self.modify(index, |record| record.set_field(field, value))
    }

    /// Replace one entry of the list-valued `field` of the record at `index`.
    ///
    /// # Errors
    /// Returns [`ListError::IndexOutOfRange`] when either index is out of
    /// range, or [`ListError::NotAList`] / [`ListError::UnknownField`] when
    /// `field` does not hold a list.
    pub fn update_nested(
        &self,
        index: usize,
        field: &str,
        nested_index: usize,
        value: T::Value,
    ) -> Result<Self, ListError> {
        self.modify(index, |record| {
            let entries = record.nested_mut(field)?;
            check_index(nested_index, entries.len())?;
            entries[nested_index] = value;
            Ok(())
        })
    }

    /// Append an entry to the list-valued `field` of the record at `index`.
    ///
    /// # Errors
    /// Same as [`RecordList::update_nested`], minus the nested index check.
    pub fn add_nested(&self, index: usize, field: &str, value: T::Value) -> Result<Self, ListError> {
        self.modify(index, |record| {
            record.nested_mut(field)?.push(value);
            Ok(())
        })
    }

    /// Remove one entry of the list-valued `field` of the record at `index`.
    ///
    /// # Errors
    /// Same as [`RecordList::update_nested`].
    pub fn remove_nested(
        &self,
        index: usize,
        field: &str,
        nested_index: usize,
    ) -> Result<Self, ListError> {
        self.modify(index, |record| {
            let entries = record.nested_mut(field)?;
            check_index(nested_index, entries.len())?;
            entries.remove(nested_index);
            Ok(())
        })
    }

    /// Swap a nested entry with its neighbour.
    ///
    /// Nested boundaries are a no-op like [`RecordList::move_record`]; the
    /// outer index is still checked.
    ///
    /// # Errors
    /// Returns [`ListError::IndexOutOfRange`] for a bad outer index or the
    /// field errors of [`Fields::nested`].
    pub fn move_nested(
        &self,
        index: usize,
        field: &str,
        nested_index: usize,
        direction: Direction,
    ) -> Result<Self, ListError> {
        check_index(index, self.len())?;
        let nested_len = self.records[index].nested(field)?.len();
        let Some(target) = target_index(nested_index, direction, nested_len) else {
            return Ok(self.clone());
        };
        self.modify(index, |record| {
            record.nested_mut(field)?.swap(nested_index, target);
            Ok(())
        })
    }
}
