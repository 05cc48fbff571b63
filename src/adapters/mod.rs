//! External system integrations for Chainsink.
//!
//! - [`database`] - Storage traits and the exporter factory
//! - [`postgresql`] - PostgreSQL driver, catalog and SQL rendering
//!
//! The export engine only sees [`database::StorageDriver`], so tests can run
//! it against an in-memory implementation.

pub mod database;
pub mod postgresql;
