// Chainsink - Batched PostgreSQL exporter for ETL items
// Copyright (c) 2025 Chainsink Contributors
// Licensed under the MIT License

//! # Chainsink - batched, duplicate-safe export into PostgreSQL
//!
//! Chainsink writes streams of typed records (blocks, transactions, logs,
//! token transfers and the like) into PostgreSQL. Records of mixed types are
//! grouped by their `type` field, converted, cut into fixed-size chunks and
//! inserted concurrently by a bounded worker pool. Tables with a primary key
//! get `ON CONFLICT DO NOTHING`, so replaying the same input is safe.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export engine (registry, grouping, chunking, pool, scheduler)
//! - [`adapters`] - Storage traits and the PostgreSQL implementation
//! - [`domain`] - Items, table metadata and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chainsink::adapters::database::create_item_exporter;
//! use chainsink::config::load_config;
//! use chainsink::domain::Item;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("chainsink.toml")?;
//!     let exporter = create_item_exporter(&config).await?;
//!
//!     exporter.open().await?;
//!     let items = vec![
//!         Item::from_json(r#"{"type": "block", "number": 1, "hash": "0xa"}"#)?,
//!         Item::from_json(r#"{"type": "transaction", "hash": "0xb", "block_number": 1}"#)?,
//!     ];
//!     let summary = exporter.export_items(items).await?;
//!     exporter.close().await?;
//!
//!     println!("Inserted {} rows", summary.rows_inserted());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom storage
//!
//! The engine only talks to [`adapters::database::StorageDriver`]. Any
//! implementation can be handed to [`core::export::ItemExporter::new`]
//! together with an [`core::export::InsertRegistry`].
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::SinkError`]. Failed insert tasks
//! do not stop an export call; once every task has finished the call returns
//! [`domain::SinkError::ExportFailed`] with the first failure.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
