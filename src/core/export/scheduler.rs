//! Batch scheduler
//!
//! Turns one mixed batch of items into insert tasks. For every registered item
//! type, in registration order, the group is converted as a whole, split into
//! chunks and each chunk is submitted to the shared worker pool. Waiting only
//! starts after every type has been submitted, so chunks of different types
//! run side by side.
//!
//! Failures never cut a call short. Every submitted task runs to completion and
//! only then is the first failure reported, together with how many tasks failed.

use crate::adapters::database::traits::StorageDriver;
use crate::core::convert::ItemConverter;
use crate::core::export::chunk::into_chunks;
use crate::core::export::grouping::group_by_item_type;
use crate::core::export::pool::WorkerPool;
use crate::core::export::registry::{InsertOperation, InsertRegistry};
use crate::core::export::summary::{ExportSummary, TypeSummary};
use crate::domain::{Item, Result, Row, SinkError};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Tasks in flight for one item type
struct PendingType {
    operation: Arc<InsertOperation>,
    items: usize,
    chunks: usize,
    started: Instant,
    tasks: JoinSet<Result<u64>>,
}

/// Failure bookkeeping for one export call
#[derive(Default)]
struct Failures {
    count: usize,
    first: Option<SinkError>,
}

impl Failures {
    fn record(&mut self, error: SinkError) {
        self.count += 1;
        if self.first.is_none() {
            self.first = Some(error);
        }
    }
}

/// Schedules conversion and chunked inserts for export calls
pub struct BatchScheduler {
    registry: Arc<InsertRegistry>,
    converter: Arc<dyn ItemConverter>,
    driver: Arc<dyn StorageDriver>,
    pool: Arc<WorkerPool>,
    chunk_size: usize,
    print_sql: bool,
}

impl BatchScheduler {
    /// Create a scheduler
    pub fn new(
        registry: Arc<InsertRegistry>,
        converter: Arc<dyn ItemConverter>,
        driver: Arc<dyn StorageDriver>,
        pool: Arc<WorkerPool>,
        chunk_size: usize,
        print_sql: bool,
    ) -> Self {
        Self {
            registry,
            converter,
            driver,
            pool,
            chunk_size: chunk_size.max(1),
            print_sql,
        }
    }

    /// Export one batch of items
    ///
    /// Returns once every insert task for the batch has finished.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::PoolClosed`] when the pool was shut down before any
    /// task could be submitted, and [`SinkError::ExportFailed`] when at least
    /// one conversion or insert failed.
    pub async fn export_items(&self, items: Vec<Item>) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.total_items = items.len();

        if self.pool.is_closed() {
            return Err(SinkError::PoolClosed);
        }

        let mut groups = group_by_item_type(items);
        let mut pending = Vec::with_capacity(self.registry.len());
        let mut failures = Failures::default();
        let mut total_tasks = 0usize;

        for operation in self.registry.iter() {
            let Some(group) = groups.remove(&Some(operation.item_type().clone())) else {
                continue;
            };
            if group.is_empty() {
                continue;
            }

            let rows = match self.convert_group(group) {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(
                        run_id = %summary.run_id,
                        item_type = %operation.item_type(),
                        error = %e,
                        "Conversion failed, skipping item type for this batch"
                    );
                    total_tasks += 1;
                    failures.record(e);
                    continue;
                }
            };

            tracing::info!(
                run_id = %summary.run_id,
                item_type = %operation.item_type(),
                count = rows.len(),
                "Start exporting items"
            );

            let started = Instant::now();
            let item_count = rows.len();
            let chunks = into_chunks(rows, self.chunk_size);
            let chunk_count = chunks.len();
            let mut tasks = JoinSet::new();

            for (index, chunk) in chunks.into_iter().enumerate() {
                total_tasks += 1;
                let work = insert_chunk(
                    Arc::clone(&self.driver),
                    Arc::clone(operation),
                    chunk,
                    index,
                    self.print_sql,
                );
                if let Err(e) = self.pool.submit(&mut tasks, work) {
                    failures.record(e);
                }
            }

            pending.push(PendingType {
                operation: Arc::clone(operation),
                items: item_count,
                chunks: chunk_count,
                started,
                tasks,
            });
        }

        summary.unroutable_items = groups.values().map(Vec::len).sum();
        if summary.unroutable_items > 0 {
            tracing::debug!(
                run_id = %summary.run_id,
                count = summary.unroutable_items,
                "Dropped items without a registered table"
            );
        }

        for mut pending_type in pending {
            let mut rows_inserted = 0u64;

            while let Some(joined) = pending_type.tasks.join_next().await {
                match joined {
                    Ok(Ok(inserted)) => rows_inserted += inserted,
                    Ok(Err(e)) => {
                        tracing::error!(
                            run_id = %summary.run_id,
                            item_type = %pending_type.operation.item_type(),
                            error = %e,
                            "Insert task failed"
                        );
                        failures.record(e);
                    }
                    Err(join_error) => {
                        tracing::error!(
                            run_id = %summary.run_id,
                            item_type = %pending_type.operation.item_type(),
                            error = %join_error,
                            "Insert task panicked"
                        );
                        failures.record(SinkError::Export(format!(
                            "Insert task for '{}' did not complete: {join_error}",
                            pending_type.operation.item_type()
                        )));
                    }
                }
            }

            let type_summary = TypeSummary {
                item_type: pending_type.operation.item_type().clone(),
                table: pending_type.operation.table_name().to_string(),
                items: pending_type.items,
                chunks: pending_type.chunks,
                rows_inserted,
                duration: pending_type.started.elapsed(),
            };

            tracing::info!(
                run_id = %summary.run_id,
                item_type = %type_summary.item_type,
                count = type_summary.items,
                rows_inserted = type_summary.rows_inserted,
                elapsed_ms = type_summary.duration.as_millis() as u64,
                items_per_sec = type_summary.throughput(),
                "Finished exporting items"
            );

            summary.add_type(type_summary);
        }

        let summary = summary.with_duration(start_time.elapsed());

        match failures.first {
            Some(first) => Err(SinkError::ExportFailed {
                failed_tasks: failures.count,
                total_tasks,
                first: Box::new(first),
            }),
            None => Ok(summary),
        }
    }

    fn convert_group(&self, group: Vec<Item>) -> Result<Vec<Row>> {
        group
            .into_iter()
            .map(|item| self.converter.convert_item(item).map(Item::into_row))
            .collect()
    }
}

async fn insert_chunk(
    driver: Arc<dyn StorageDriver>,
    operation: Arc<InsertOperation>,
    rows: Vec<Row>,
    index: usize,
    print_sql: bool,
) -> Result<u64> {
    if print_sql {
        tracing::info!(
            item_type = %operation.item_type(),
            chunk = index,
            statement = %operation.statement(),
            "Executing insert"
        );
    }

    let row_count = rows.len();
    let inserted = driver.insert_rows(&operation, rows).await?;

    tracing::debug!(
        item_type = %operation.item_type(),
        chunk = index,
        rows = row_count,
        inserted,
        "Chunk inserted"
    );

    Ok(inserted)
}
