//! Data models for attribute records and edit requests.

/// Serializable edit operations.
pub mod op;
/// Dynamic records and field values.
pub mod record;


pub use op::EditOp;
pub use record::{is_hex_color, FieldValue, Record};
