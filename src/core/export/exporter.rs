//! Item exporter facade
//!
//! Owns the registry, converter chain, worker pool and scheduler for one run.

use crate::adapters::database::traits::StorageDriver;
use crate::core::convert::{CompositeItemConverter, ItemConverter};
use crate::core::export::pool::WorkerPool;
use crate::core::export::registry::InsertRegistry;
use crate::core::export::scheduler::BatchScheduler;
use crate::core::export::summary::ExportSummary;
use crate::domain::{Item, Result, SinkError};
use std::sync::Arc;

/// Default number of rows per insert statement
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Default number of concurrent insert tasks
pub const DEFAULT_WORKER_COUNT: usize = 20;

/// Tuning knobs fixed for the lifetime of an exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExporterOptions {
    /// Rows per insert statement
    pub chunk_size: usize,

    /// Maximum concurrent insert tasks
    pub worker_count: usize,

    /// Log every statement before it runs
    pub print_sql: bool,
}

impl Default for ExporterOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            print_sql: false,
        }
    }
}

/// Batched concurrent exporter of typed items
pub struct ItemExporter {
    pool: Arc<WorkerPool>,
    scheduler: BatchScheduler,
}

impl ItemExporter {
    /// Create an exporter
    ///
    /// # Arguments
    ///
    /// * `driver` - Storage driver that executes chunk inserts
    /// * `registry` - Insert operation per item type
    /// * `converters` - Applied in order to every item; empty means identity
    /// * `options` - Chunk size, worker count and statement logging
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the chunk size or worker count is zero.
    pub fn new(
        driver: Arc<dyn StorageDriver>,
        registry: InsertRegistry,
        converters: Vec<Arc<dyn ItemConverter>>,
        options: ExporterOptions,
    ) -> Result<Self> {
        if options.chunk_size == 0 {
            return Err(SinkError::Configuration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        let registry = Arc::new(registry);
        let pool = Arc::new(WorkerPool::new(options.worker_count)?);
        let converter: Arc<dyn ItemConverter> = Arc::new(CompositeItemConverter::new(converters));

        let scheduler = BatchScheduler::new(
            Arc::clone(&registry),
            converter,
            driver,
            Arc::clone(&pool),
            options.chunk_size,
            options.print_sql,
        );

        tracing::debug!(
            item_types = registry.len(),
            chunk_size = options.chunk_size,
            worker_count = options.worker_count,
            "Item exporter created"
        );

        Ok(Self { pool, scheduler })
    }

    /// Prepare for exporting; nothing needs to happen before the first call
    pub async fn open(&self) -> Result<()> {
        Ok(())
    }

    /// Export one batch of items and wait for every write to be attempted
    ///
    /// # Errors
    ///
    /// See [`BatchScheduler::export_items`].
    pub async fn export_items(&self, items: Vec<Item>) -> Result<ExportSummary> {
        self.scheduler.export_items(items).await
    }

    /// Wait for in-flight tasks and release the worker pool
    ///
    /// A second call is a no-op.
    pub async fn close(&self) -> Result<()> {
        self.pool.shutdown().await
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
