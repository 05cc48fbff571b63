//! PostgreSQL database integration
//!
//! This module provides the PostgreSQL storage driver, table catalog and the
//! SQL rendering used by insert operations.

pub mod adapter;
pub mod client;
pub mod sql;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
