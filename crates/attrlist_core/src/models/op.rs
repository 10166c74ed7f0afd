//! Serializable edit requests applied to a record list.

use super::record::{FieldValue, Record};
use crate::error::ListError;
use crate::list::{Direction, RecordList, Renumber};
use serde::{Deserialize, Serialize};

/// One list mutation, as accepted from the CLI or a JSON batch.
///
/// Serialized with an `op` tag, e.g.
/// `{"op": "move", "index": 0, "direction": "down"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Add {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<Record>,
    },
    Update {
        index: usize,
        field: String,
        value: FieldValue,
    },
    Remove {
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        renumber: Option<Renumber>,
    },
    Move {
        index: usize,
        direction: Direction,
    },
    UpdateNested {
        index: usize,
        field: String,
        nested_index: usize,
        value: FieldValue,
    },
    AddNested {
        index: usize,
        field: String,
        value: FieldValue,
    },
    RemoveNested {
        index: usize,
        field: String,
        nested_index: usize,
    },
    MoveNested {
        index: usize,
        field: String,
        nested_index: usize,
        direction: Direction,
    },
}

impl EditOp {
    /// The `op` tag of this request.
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Add { .. } => "add",
            EditOp::Update { .. } => "update",
            EditOp::Remove { .. } => "remove",
            EditOp::Move { .. } => "move",
            EditOp::UpdateNested { .. } => "update_nested",
            EditOp::AddNested { .. } => "add_nested",
            EditOp::RemoveNested { .. } => "remove_nested",
            EditOp::MoveNested { .. } => "move_nested",
        }
    }

    /// Apply this request to `list`.
    ///
    /// # Arguments
    /// - `attribute`: Attribute name, used in error messages.
    /// - `list`: Current snapshot.
    /// - `default_template`: Template for `add` when the request carries none.
    ///
    /// # Returns
    /// The new snapshot; `list` is left untouched.
    ///
    /// # Errors
    /// Returns the [`ListError`] of the underlying list operation, or
    /// [`ListError::MissingTemplate`] for `add` without any template.
    pub fn apply(
        &self,
        attribute: &str,
        list: &RecordList<Record>,
        default_template: Option<&Record>,
    ) -> Result<RecordList<Record>, ListError> {
        match self {
            EditOp::Add { template } => {
                let template = template
                    .as_ref()
                    .or(default_template)
                    .cloned()
                    .ok_or_else(|| ListError::MissingTemplate(attribute.to_string()))?;
                Ok(list.add(template))
            }
            EditOp::Update {
                index,
                field,
                value,
            } => list.update(*index, field, value.clone()),
            EditOp::Remove {
                index,
                renumber: Some(policy),
            } => list.remove_renumbered(*index, policy),
            EditOp::Remove {
                index,
                renumber: None,
            } => list.remove(*index),
            EditOp::Move { index, direction } => Ok(list.move_record(*index, *direction)),
            EditOp::UpdateNested {
                index,
                field,
                nested_index,
                value,
            } => list.update_nested(*index, field, *nested_index, value.clone()),
            EditOp::AddNested {
                index,
                field,
                value,
            } => list.add_nested(*index, field, value.clone()),
            EditOp::RemoveNested {
                index,
                field,
                nested_index,
            } => list.remove_nested(*index, field, *nested_index),
            EditOp::MoveNested {
                index,
                field,
                nested_index,
                direction,
            } => list.move_nested(*index, field, *nested_index, *direction),
        }
    }
}
