//! Database abstraction traits
//!
//! This module defines the traits that storage adapters must implement to
//! receive exported items.

use crate::core::export::registry::InsertOperation;
use crate::domain::{Result, Row, TableSchema};
use async_trait::async_trait;

/// Storage driver used by insert tasks
///
/// Each call writes one chunk. Implementations acquire their own connection
/// per call; pooling, if any, lives beneath this trait.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Test the connection to the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Insert the rows of one chunk using the given operation
    ///
    /// All rows are written by a single statement, so a chunk is either
    /// committed as a whole or not at all. Rows skipped by the operation's
    /// conflict policy are not counted.
    ///
    /// # Arguments
    ///
    /// * `operation` - Precompiled insert for the chunk's item type
    /// * `rows` - Converted rows, in source order
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    async fn insert_rows(&self, operation: &InsertOperation, rows: Vec<Row>) -> Result<u64>;
}

/// Source of table metadata used to build insert operations
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Describe a table: primary-key columns and column list
    ///
    /// # Arguments
    ///
    /// * `table` - Table identifier, optionally `schema.table`
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or the lookup fails.
    async fn table_schema(&self, table: &str) -> Result<TableSchema>;
}
