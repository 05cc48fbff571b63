//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::ItemType;
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Per-type outcome of an export call
#[derive(Debug, Clone)]
pub struct TypeSummary {
    /// Item type
    pub item_type: ItemType,

    /// Target table
    pub table: String,

    /// Number of items converted and submitted
    pub items: usize,

    /// Number of chunks (insert tasks) submitted
    pub chunks: usize,

    /// Rows actually written; lower than `items` when conflicts were skipped
    pub rows_inserted: u64,

    /// Wall-clock time from first submission until this type's tasks finished
    ///
    /// Types share the worker pool, so this overlaps with other types' work.
    pub duration: Duration,
}

impl TypeSummary {
    /// Items per second for this type; best-effort only
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.items as f64 / secs
        } else {
            0.0
        }
    }

    /// Rows skipped because their primary key already existed
    pub fn duplicates_skipped(&self) -> u64 {
        (self.items as u64).saturating_sub(self.rows_inserted)
    }

    fn absorb(&mut self, other: &TypeSummary) {
        self.items += other.items;
        self.chunks += other.chunks;
        self.rows_inserted += other.rows_inserted;
        self.duration += other.duration;
    }
}

/// Summary of one or more export calls
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Identifier used to correlate log lines of this export
    pub run_id: Uuid,

    /// When the export started
    pub started_at: DateTime<Utc>,

    /// Items received, routable or not
    pub total_items: usize,

    /// Items dropped because no table is registered for their type
    pub unroutable_items: usize,

    /// Per-type results, in registration order
    pub types: Vec<TypeSummary>,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_items: 0,
            unroutable_items: 0,
            types: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the result for one type
    pub fn add_type(&mut self, summary: TypeSummary) {
        self.types.push(summary);
    }

    /// Items handed to the store
    pub fn exported_items(&self) -> usize {
        self.types.iter().map(|t| t.items).sum()
    }

    /// Total chunks submitted
    pub fn total_chunks(&self) -> usize {
        self.types.iter().map(|t| t.chunks).sum()
    }

    /// Rows actually inserted
    pub fn rows_inserted(&self) -> u64 {
        self.types.iter().map(|t| t.rows_inserted).sum()
    }

    /// Rows skipped by conflict handling
    pub fn duplicates_skipped(&self) -> u64 {
        self.types.iter().map(TypeSummary::duplicates_skipped).sum()
    }

    /// Result for one type, if it was exported
    pub fn for_type(&self, item_type: &str) -> Option<&TypeSummary> {
        self.types.iter().find(|t| t.item_type.as_str() == item_type)
    }

    /// Fold the result of a later export call into this summary
    pub fn merge(&mut self, other: ExportSummary) {
        self.total_items += other.total_items;
        self.unroutable_items += other.unroutable_items;
        self.duration += other.duration;

        for incoming in other.types {
            match self
                .types
                .iter_mut()
                .find(|t| t.item_type == incoming.item_type)
            {
                Some(existing) => existing.absorb(&incoming),
                None => self.types.push(incoming),
            }
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total_items = self.total_items,
            exported = self.exported_items(),
            unroutable = self.unroutable_items,
            chunks = self.total_chunks(),
            rows_inserted = self.rows_inserted(),
            duplicates_skipped = self.duplicates_skipped(),
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}
