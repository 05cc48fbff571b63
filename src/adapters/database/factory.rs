//! Exporter factory
//!
//! Builds a ready-to-use [`ItemExporter`] from configuration: PostgreSQL
//! client, table metadata, insert registry and engine options.

use crate::adapters::database::traits::{StorageDriver, TableCatalog};
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{ChainsinkConfig, TableMapping};
use crate::core::export::{ExporterOptions, InsertRegistry, ItemExporter};
use crate::domain::{ItemType, Result, SinkError};
use std::sync::Arc;

/// Build the insert registry for the configured table mappings
///
/// Mappings that leave out the primary key or the column list are completed
/// from `catalog`. When `catalog` is `None` only the explicit values are used.
///
/// # Errors
///
/// Returns an error if an item type is invalid or duplicated, or a table
/// lookup fails.
pub async fn build_registry(
    mappings: &[TableMapping],
    catalog: Option<&dyn TableCatalog>,
) -> Result<InsertRegistry> {
    let mut tables = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let item_type = ItemType::new(&mapping.item_type).map_err(SinkError::Configuration)?;

        let schema = match catalog {
            Some(catalog) if mapping.needs_reflection() => {
                let reflected = catalog.table_schema(&mapping.table).await?;
                mapping.merge_reflected(reflected)
            }
            _ => mapping.to_table_schema(),
        };

        tables.push((item_type, schema));
    }

    InsertRegistry::from_tables(tables)
}

/// Create an item exporter backed by PostgreSQL
///
/// In dry-run mode the database is never contacted: inserts are logged and
/// table metadata comes from configuration only.
///
/// # Errors
///
/// Returns an error if the client cannot be created, the connection test
/// fails, or table metadata cannot be resolved.
pub async fn create_item_exporter(config: &ChainsinkConfig) -> Result<ItemExporter> {
    let dry_run = config.application.dry_run;

    tracing::info!(dry_run, "Creating PostgreSQL client");
    let client = PostgreSQLClient::new(&config.postgresql).await?;
    let adapter = Arc::new(PostgreSQLAdapter::new(client).with_dry_run(dry_run));

    let catalog: Option<&dyn TableCatalog> = if dry_run {
        None
    } else {
        adapter.test_connection().await?;
        Some(&*adapter)
    };

    let registry = build_registry(&config.tables, catalog).await?;

    let options = ExporterOptions {
        chunk_size: config.export.chunk_size,
        worker_count: config.export.worker_count,
        print_sql: config.postgresql.print_sql,
    };

    let driver: Arc<dyn StorageDriver> = adapter;
    ItemExporter::new(driver, registry, Vec::new(), options)
}
