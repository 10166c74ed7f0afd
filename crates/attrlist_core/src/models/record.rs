//! Dynamic record shape shared by every repeatable attribute.

use crate::error::ListError;
use crate::list::Fields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single attribute field value.
///
/// Colors are carried as [`FieldValue::Text`]; schemas decide whether a text
/// field must hold a hex color (see [`is_hex_color`]). Numbers keep their
/// JSON form, so integers are written back without a fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<FieldValue>),
    Record(Record),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    /// Short lowercase name of the value's shape, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
            FieldValue::Record(_) => "record",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become [`FieldValue::Null`].
impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(FieldValue::Null, FieldValue::Number)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Record> for FieldValue {
    fn from(value: Record) -> Self {
        FieldValue::Record(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Number(value) => write!(f, "{}", value),
            other => match serde_json::to_string(other) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

/// Returns `true` for `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// One entry of a repeatable attribute: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl Fields for Record {
    type Value = FieldValue;

    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }

    // Unknown names are inserted, matching how blocks spread new keys into
    // an item; strict validation lives in the schema layer.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ListError> {
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    fn nested(&self, name: &str) -> Result<&[FieldValue], ListError> {
        match self.fields.get(name) {
            Some(FieldValue::List(entries)) => Ok(entries.as_slice()),
            Some(_) => Err(ListError::NotAList(name.to_string())),
            None => Err(ListError::UnknownField(name.to_string())),
        }
    }

    fn nested_mut(&mut self, name: &str) -> Result<&mut Vec<FieldValue>, ListError> {
        match self.fields.get_mut(name) {
            Some(FieldValue::List(entries)) => Ok(entries),
            Some(_) => Err(ListError::NotAList(name.to_string())),
            None => Err(ListError::UnknownField(name.to_string())),
        }
    }
}
