//! Target table metadata

use serde::{Deserialize, Serialize};

/// Table identifier plus the column metadata needed to build an insert
///
/// The table name may be schema-qualified (`"public.blocks"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table identifier, optionally `schema.table`
    pub name: String,

    /// Primary-key column names (empty when the table has none)
    #[serde(default)]
    pub primary_key: Vec<String>,

    /// Columns to insert, in table order; empty means every table column
    #[serde(default)]
    pub columns: Vec<String>,
}

impl TableSchema {
    /// Create metadata for a table without primary key or column list
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Set the primary-key columns
    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the explicit column list
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// True when the table declares a primary key
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}
