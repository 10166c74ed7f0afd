//! Core library for attrlist (copy-on-write record lists, stores, schemas).

/// Configuration loading and defaults.
pub mod config;
/// Shared defaults and environment variable names.
pub mod constants;
/// Editor facade applying operations against an attribute store.
pub mod editor;
/// Process-global environment mutation helpers.
pub mod env;
/// Error types for list operations and storage.
pub mod error;
/// Copy-on-write record lists.
pub mod list;
/// Dynamic records, field values and serializable edit operations.
pub mod models;
/// Per-attribute field kinds, templates and seeds.
pub mod schema;
/// Attribute stores (in-memory and JSON file).
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::*;
pub use editor::ListEditor;
pub use error::{AppError, ListError};
pub use list::{Direction, Fields, RecordList, Renumber};
pub use models::{EditOp, FieldValue, Record};
pub use schema::{AttributeSchema, FieldKind, SchemaSet};
pub use store::{AttributeStore, JsonFileStore, MemoryStore};
