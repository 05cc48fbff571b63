//! Core business logic for Chainsink.
//!
//! # Modules
//!
//! - [`convert`] - Item converter interface and the composite converter
//! - [`export`] - Registry, grouping, chunking, worker pool and scheduling
//!
//! # Export Workflow
//!
//! For every call to [`export::ItemExporter::export_items`]:
//!
//! 1. **Group**: Partition the batch by the `type` field
//! 2. **Convert**: Run each registered type's items through the converter chain
//! 3. **Chunk**: Slice converted rows into fixed-size chunks
//! 4. **Submit**: Spawn one insert task per chunk, gated by the worker pool
//! 5. **Wait**: Join every task, then report the first failure if any
//!
//! # Example
//!
//! ```rust,no_run
//! use chainsink::config::load_config;
//! use chainsink::adapters::database::create_item_exporter;
//! use chainsink::domain::Item;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("chainsink.toml")?;
//! let exporter = create_item_exporter(&config).await?;
//!
//! exporter.open().await?;
//! let item = Item::from_json(r#"{"type": "block", "number": 1}"#)?;
//! let summary = exporter.export_items(vec![item]).await?;
//! exporter.close().await?;
//!
//! println!("Inserted: {}", summary.rows_inserted());
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod export;
