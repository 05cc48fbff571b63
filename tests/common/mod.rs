//! Shared helpers for integration tests
//!
//! [`MemoryStore`] stands in for PostgreSQL: it keeps rows per table, skips
//! rows whose primary key is already present when the operation asks for it,
//! and records how many inserts ran at the same time.

#![allow(dead_code)]

use async_trait::async_trait;
use chainsink::adapters::database::StorageDriver;
use chainsink::core::export::{ExporterOptions, InsertOperation, InsertRegistry, ItemExporter};
use chainsink::domain::{Item, ItemType, Result, Row, SinkError, TableSchema};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<Row>>,
    keys: HashMap<String, HashSet<String>>,
}

/// In-memory storage driver with conflict emulation and concurrency tracking
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    chunk_sizes: Mutex<Vec<(String, usize)>>,
    failing_table: Option<String>,
    delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every insert into `table` fails
    pub fn failing_on(mut self, table: &str) -> Self {
        self.failing_table = Some(table.to_string());
        self
    }

    /// Each insert sleeps before writing, to make overlap observable
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .rows
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Chunk lengths observed for `table`, sorted
    pub fn chunk_sizes(&self, table: &str) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .chunk_sizes
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == table)
            .map(|(_, n)| *n)
            .collect();
        sizes.sort_unstable();
        sizes
    }

    fn key_of(operation: &InsertOperation, row: &Row) -> Option<String> {
        let pk = &operation.table().primary_key;
        if pk.is_empty() {
            return None;
        }
        let parts: Vec<String> = pk
            .iter()
            .map(|column| row.get(column).cloned().unwrap_or(Value::Null).to_string())
            .collect();
        Some(parts.join("|"))
    }
}

#[async_trait]
impl StorageDriver for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_rows(&self, operation: &InsertOperation, rows: Vec<Row>) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let table = operation.table_name().to_string();
        self.chunk_sizes
            .lock()
            .unwrap()
            .push((table.clone(), rows.len()));

        let result = if self.failing_table.as_deref() == Some(table.as_str()) {
            Err(SinkError::Database(format!("relation \"{table}\" is unavailable")))
        } else {
            let mut tables = self.tables.lock().unwrap();
            let Tables { rows: stored, keys } = &mut *tables;
            let mut inserted = 0u64;
            for row in rows {
                if operation.is_idempotent() {
                    if let Some(key) = Self::key_of(operation, &row) {
                        if !keys.entry(table.clone()).or_default().insert(key) {
                            continue;
                        }
                    }
                }
                stored.entry(table.clone()).or_default().push(row);
                inserted += 1;
            }
            Ok(inserted)
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn item_type(tag: &str) -> ItemType {
    ItemType::new(tag).unwrap()
}

/// Registry with `a -> table_a (pk id)` and `b -> table_b (no pk)`
pub fn ab_registry() -> InsertRegistry {
    InsertRegistry::from_tables([
        (
            item_type("a"),
            TableSchema::new("table_a")
                .with_primary_key(["id"])
                .with_columns(["id", "value"]),
        ),
        (
            item_type("b"),
            TableSchema::new("table_b").with_columns(["id", "value"]),
        ),
    ])
    .unwrap()
}

pub fn item(tag: &str, id: u64) -> Item {
    Item::from_value(json!({"type": tag, "id": id, "value": format!("{tag}-{id}")})).unwrap()
}

pub fn items(tag: &str, ids: std::ops::Range<u64>) -> Vec<Item> {
    ids.map(|id| item(tag, id)).collect()
}

pub fn exporter(
    store: &Arc<MemoryStore>,
    registry: InsertRegistry,
    chunk_size: usize,
    worker_count: usize,
) -> ItemExporter {
    let driver: Arc<dyn StorageDriver> = store.clone();
    ItemExporter::new(
        driver,
        registry,
        Vec::new(),
        ExporterOptions {
            chunk_size,
            worker_count,
            print_sql: false,
        },
    )
    .unwrap()
}
