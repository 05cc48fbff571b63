//! ETL items and their routing tag
//!
//! An [`Item`] is a JSON object carrying a `type` field (e.g. `"block"`,
//! `"transaction"`, `"token_transfer"`). The tag routes the item to the table
//! registered for it; every other field is opaque to the exporter.

use crate::domain::{Result, SinkError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Storage-ready row produced by converting an item, keyed by column name
pub type Row = Map<String, Value>;

/// Item type tag newtype wrapper
///
/// Identifies both the semantic kind of an item and the table it is written to.
///
/// # Examples
///
/// ```
/// use chainsink::domain::item::ItemType;
/// use std::str::FromStr;
///
/// let item_type = ItemType::from_str("transaction").unwrap();
/// assert_eq!(item_type.as_str(), "transaction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemType(String);

impl ItemType {
    /// Creates a new ItemType, rejecting blank tags
    pub fn new(tag: impl Into<String>) -> std::result::Result<Self, String> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err("Item type cannot be empty".to_string());
        }
        Ok(Self(tag))
    }

    /// Returns the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ItemType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Anything that can be routed by its type tag
pub trait TypedItem {
    /// The routing tag, or `None` when the item carries no usable tag
    fn item_type(&self) -> Option<&str>;
}

/// A single ETL record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// Name of the routing field
    pub const TYPE_FIELD: &'static str = "type";

    /// Wraps an already-built field map
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds an item from an arbitrary JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(SinkError::Validation(format!(
                "Item must be a JSON object, got: {other}"
            ))),
        }
    }

    /// Parses one JSON document into an item
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Returns a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field value, returning the previous one
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Removes a field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Consumes the item, yielding its fields as a storage row
    pub fn into_row(self) -> Row {
        self.0
    }
}

impl TypedItem for Item {
    fn item_type(&self) -> Option<&str> {
        self.0
            .get(Self::TYPE_FIELD)
            .and_then(Value::as_str)
            .filter(|tag| !tag.trim().is_empty())
    }
}

impl From<Map<String, Value>> for Item {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Item {
    type Error = SinkError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
