//! Domain models and types for Chainsink.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Items and their routing tag** ([`Item`], [`ItemType`], [`Row`])
//! - **Target table metadata** ([`TableSchema`])
//! - **Error types** ([`SinkError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SinkError>`]:
//!
//! ```rust
//! use chainsink::domain::{Item, Result};
//!
//! fn example() -> Result<()> {
//!     let item = Item::from_json(r#"{"type": "block", "number": 1}"#)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod item;
pub mod result;
pub mod table;

// Re-export commonly used types for convenience
pub use errors::SinkError;
pub use item::{Item, ItemType, Row, TypedItem};
pub use result::Result;
pub use table::TableSchema;
