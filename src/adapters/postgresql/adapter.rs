//! PostgreSQL adapter implementing the storage traits
//!
//! Wraps [`PostgreSQLClient`] as a [`StorageDriver`] for chunk inserts and a
//! [`TableCatalog`] for table reflection.

use crate::adapters::database::traits::{StorageDriver, TableCatalog};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::sql::quote_table;
use crate::core::export::registry::InsertOperation;
use crate::domain::{Result, Row, SinkError, TableSchema};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const PRIMARY_KEY_QUERY: &str = "\
SELECT a.attname::text \
FROM pg_index i \
JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey) \
WHERE i.indrelid = $1::text::regclass AND i.indisprimary \
ORDER BY array_position(i.indkey::int2[], a.attnum)";

const COLUMNS_QUERY: &str = "\
SELECT a.attname::text \
FROM pg_attribute a \
WHERE a.attrelid = $1::text::regclass \
  AND a.attnum > 0 \
  AND NOT a.attisdropped \
  AND a.attgenerated = '' \
ORDER BY a.attnum";

/// PostgreSQL implementation of the storage traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
    dry_run: bool,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
            dry_run: false,
        }
    }

    /// Log inserts instead of running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether inserts are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn column_names(&self, query: &str, table: &str) -> Result<Vec<String>> {
        let relation = quote_table(table);
        let rows = self.client.query(query, &[&relation]).await?;

        rows.iter()
            .map(|row| {
                row.try_get::<_, String>(0).map_err(|e| {
                    SinkError::Database(format!("Unexpected catalog row for {table}: {e}"))
                })
            })
            .collect()
    }
}

#[async_trait]
impl StorageDriver for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn insert_rows(&self, operation: &InsertOperation, rows: Vec<Row>) -> Result<u64> {
        if self.dry_run {
            tracing::info!(
                item_type = %operation.item_type(),
                table = %operation.table_name(),
                count = rows.len(),
                "DRY RUN: Would insert {} rows into {}",
                rows.len(),
                operation.table_name()
            );
            return Ok(rows.len() as u64);
        }

        if rows.is_empty() {
            return Ok(0);
        }

        let payload = Value::Array(rows.into_iter().map(Value::Object).collect());

        self.client
            .execute(operation.statement(), &[&payload])
            .await
            .map_err(|e| {
                SinkError::Database(format!(
                    "Insert into {} failed: {e}",
                    operation.table_name()
                ))
            })
    }
}

#[async_trait]
impl TableCatalog for PostgreSQLAdapter {
    async fn table_schema(&self, table: &str) -> Result<TableSchema> {
        let columns = self.column_names(COLUMNS_QUERY, table).await?;
        if columns.is_empty() {
            return Err(SinkError::Database(format!(
                "Table {table} has no insertable columns"
            )));
        }
        let primary_key = self.column_names(PRIMARY_KEY_QUERY, table).await?;

        tracing::debug!(
            table = %table,
            columns = columns.len(),
            primary_key = ?primary_key,
            "Reflected table metadata"
        );

        Ok(TableSchema::new(table)
            .with_primary_key(primary_key)
            .with_columns(columns))
    }
}
