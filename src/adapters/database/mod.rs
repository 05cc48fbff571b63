//! Database abstraction layer
//!
//! Traits the export engine writes through, plus the factory that wires the
//! PostgreSQL implementation into an exporter.

pub mod factory;
pub mod traits;

pub use factory::{build_registry, create_item_exporter};
pub use traits::{StorageDriver, TableCatalog};
