//! Batched concurrent export engine
//!
//! This module provides the core export logic for Chainsink, including:
//! - Insert operation registry per item type
//! - Grouping and chunking of item batches
//! - Bounded worker pool and batch scheduling
//! - Summary and reporting

pub mod chunk;
pub mod exporter;
pub mod grouping;
pub mod pool;
pub mod registry;
pub mod scheduler;
pub mod summary;

pub use exporter::{ExporterOptions, ItemExporter, DEFAULT_CHUNK_SIZE, DEFAULT_WORKER_COUNT};
pub use pool::WorkerPool;
pub use registry::{build_insert_operation, ConflictPolicy, InsertOperation, InsertRegistry};
pub use scheduler::BatchScheduler;
pub use summary::{ExportSummary, TypeSummary};
