//! Insert statement registry
//!
//! Maps each item type to the insert operation for its target table. The
//! registry is built once, when the exporter is set up, and never changes.

use crate::adapters::postgresql::sql::render_insert;
use crate::domain::{ItemType, Result, SinkError, TableSchema};
use std::collections::HashMap;
use std::sync::Arc;

/// What happens when a row collides with an existing primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Silently skip rows whose key already exists
    DoNothing {
        /// Primary-key columns the conflict is detected on
        columns: Vec<String>,
    },
    /// Plain insert; duplicates are inserted again (or fail on other constraints)
    None,
}

/// Precompiled insert behavior for one item type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOperation {
    item_type: ItemType,
    table: TableSchema,
    conflict: ConflictPolicy,
    statement: String,
}

impl InsertOperation {
    /// Item type routed to this operation
    pub fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    /// Target table metadata
    pub fn table(&self) -> &TableSchema {
        &self.table
    }

    /// Target table identifier
    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    /// Conflict handling for this table
    pub fn conflict(&self) -> &ConflictPolicy {
        &self.conflict
    }

    /// Whether duplicate keys are skipped
    pub fn is_idempotent(&self) -> bool {
        matches!(self.conflict, ConflictPolicy::DoNothing { .. })
    }

    /// The rendered SQL statement
    pub fn statement(&self) -> &str {
        &self.statement
    }
}

/// Build the insert operation for one table
pub fn build_insert_operation(item_type: ItemType, table: TableSchema) -> InsertOperation {
    let conflict = if table.has_primary_key() {
        ConflictPolicy::DoNothing {
            columns: table.primary_key.clone(),
        }
    } else {
        ConflictPolicy::None
    };
    let statement = render_insert(&table);

    InsertOperation {
        item_type,
        table,
        conflict,
        statement,
    }
}

/// Item type to insert operation mapping, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct InsertRegistry {
    operations: Vec<Arc<InsertOperation>>,
    by_type: HashMap<ItemType, usize>,
}

impl InsertRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(item type, table)` pairs
    ///
    /// # Errors
    ///
    /// Returns a configuration error when an item type is registered twice.
    pub fn from_tables<I>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ItemType, TableSchema)>,
    {
        let mut registry = Self::new();
        for (item_type, table) in tables {
            registry.register(build_insert_operation(item_type, table))?;
        }
        Ok(registry)
    }

    /// Add an operation
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the item type is already registered.
    pub fn register(&mut self, operation: InsertOperation) -> Result<()> {
        if self.by_type.contains_key(operation.item_type()) {
            return Err(SinkError::Configuration(format!(
                "Item type '{}' is mapped to more than one table",
                operation.item_type()
            )));
        }

        tracing::debug!(
            item_type = %operation.item_type(),
            table = %operation.table_name(),
            idempotent = operation.is_idempotent(),
            "Registered insert operation"
        );

        self.by_type
            .insert(operation.item_type().clone(), self.operations.len());
        self.operations.push(Arc::new(operation));
        Ok(())
    }

    /// Look up the operation for an item type
    pub fn get(&self, item_type: &ItemType) -> Option<&Arc<InsertOperation>> {
        self.by_type.get(item_type).map(|&i| &self.operations[i])
    }

    /// Iterate operations in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<InsertOperation>> {
        self.operations.iter()
    }

    /// Number of registered item types
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
