//! Per-attribute field kinds, default templates and insertion seeds.

use crate::error::{AppError, ListError};
use crate::list::RecordList;
use crate::models::{is_hex_color, EditOp, FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Declared shape of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Color,
    Number,
    Bool,
    List,
    Record,
}

impl FieldKind {
    /// Kind inferred from an example value. Text never infers [`FieldKind::Color`];
    /// `null` infers nothing.
    pub fn of(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => None,
            FieldValue::Bool(_) => Some(FieldKind::Bool),
            FieldValue::Number(_) => Some(FieldKind::Number),
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::List(_) => Some(FieldKind::List),
            FieldValue::Record(_) => Some(FieldKind::Record),
        }
    }

    /// Whether `value` fits this kind. `null` clears a field of any kind.
    pub fn accepts(self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Null) => true,
            (FieldKind::Text, FieldValue::Text(_)) => true,
            (FieldKind::Color, FieldValue::Text(text)) => is_hex_color(text),
            (FieldKind::Number, FieldValue::Number(_)) => true,
            (FieldKind::Bool, FieldValue::Bool(_)) => true,
            (FieldKind::List, FieldValue::List(_)) => true,
            (FieldKind::Record, FieldValue::Record(_)) => true,
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Color => "color",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::List => "list",
            FieldKind::Record => "record",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape and defaults of one repeatable attribute.
///
/// Fields not listed in `fields` fall back to the kind of the matching
/// template value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldKind>,
    pub template: Record,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed: Vec<Record>,
}

impl AttributeSchema {
    pub fn new(template: Record) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn with_seed(mut self, seed: Vec<Record>) -> Self {
        self.seed = seed;
        self
    }

    /// Declared (or template-inferred) kind of `field`.
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields
            .get(field)
            .copied()
            .or_else(|| self.template.get(field).and_then(FieldKind::of))
    }

    /// List a newly inserted block starts with.
    ///
    /// # Returns
    /// The configured seed, or a single template record when no seed is set.
    pub fn seed_list(&self) -> RecordList<Record> {
        if self.seed.is_empty() {
            RecordList::from(vec![self.template.clone()])
        } else {
            RecordList::from(self.seed.clone())
        }
    }

    /// Check that `value` may be stored in `field`.
    ///
    /// # Errors
    /// Returns [`ListError::UnknownField`] for undeclared fields and
    /// [`ListError::TypeMismatch`] when the kind does not accept `value`.
    pub fn validate(&self, field: &str, value: &FieldValue) -> Result<(), ListError> {
        let Some(kind) = self.kind_of(field) else {
            // A template `null` declares the field without fixing its kind.
            return match self.template.get(field) {
                Some(FieldValue::Null) => Ok(()),
                _ => Err(ListError::UnknownField(field.to_string())),
            };
        };
        if kind.accepts(value) {
            Ok(())
        } else {
            Err(ListError::TypeMismatch {
                field: field.to_string(),
                expected: kind.name().to_string(),
            })
        }
    }

    /// Check that `field` is a list-valued field.
    ///
    /// # Errors
    /// Returns [`ListError::UnknownField`] or [`ListError::NotAList`].
    pub fn validate_nested(&self, field: &str) -> Result<(), ListError> {
        match self.kind_of(field) {
            Some(FieldKind::List) => Ok(()),
            Some(_) => Err(ListError::NotAList(field.to_string())),
            None => Err(ListError::UnknownField(field.to_string())),
        }
    }

    /// Validate every field of `record`.
    ///
    /// # Errors
    /// Returns the first failure of [`AttributeSchema::validate`].
    pub fn validate_record(&self, record: &Record) -> Result<(), ListError> {
        record
            .fields()
            .try_for_each(|(name, value)| self.validate(name, value))
    }

    /// Validate the fields an edit request would write.
    ///
    /// Index bounds are not checked here; the list operation does that.
    ///
    /// # Errors
    /// Returns the first schema violation found.
    pub fn validate_op(&self, op: &EditOp) -> Result<(), ListError> {
        match op {
            EditOp::Add {
                template: Some(template),
            } => self.validate_record(template),
            EditOp::Add { template: None } | EditOp::Move { .. } => Ok(()),
            EditOp::Update { field, value, .. } => self.validate(field, value),
            EditOp::Remove {
                renumber: Some(policy),
                ..
            } => self.validate(&policy.field, &FieldValue::from(policy.label(0)?)),
            EditOp::Remove { renumber: None, .. } => Ok(()),
            EditOp::UpdateNested { field, .. }
            | EditOp::AddNested { field, .. }
            | EditOp::RemoveNested { field, .. }
            | EditOp::MoveNested { field, .. } => self.validate_nested(field),
        }
    }
}

/// Schemas keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaSet {
    schemas: BTreeMap<String, AttributeSchema>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a schema file (JSON object of attribute name to schema).
    ///
    /// # Errors
    /// Returns [`AppError::Io`] when the file cannot be read and
    /// [`AppError::Serialization`] when it is not a valid schema document.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn insert(&mut self, attribute: impl Into<String>, schema: AttributeSchema) {
        self.schemas.insert(attribute.into(), schema);
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeSchema> {
        self.schemas.get(attribute)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
