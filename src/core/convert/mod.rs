//! Item conversion
//!
//! Converters turn an ETL item into its storage-ready shape (renaming fields,
//! normalizing timestamps, and so on). The concrete conversions belong to the
//! pipeline that feeds the exporter; this module defines the seam and the
//! composite that chains them.

pub mod composite;

pub use composite::CompositeItemConverter;

use crate::domain::{Item, Result};

/// Converts one item into its storage representation
///
/// Implementations must be side-effect free so that items of one type can be
/// converted independently of any other type.
pub trait ItemConverter: Send + Sync {
    /// Convert a single item
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Conversion`](crate::domain::SinkError::Conversion)
    /// when a well-formed item cannot be converted.
    fn convert_item(&self, item: Item) -> Result<Item>;
}

impl<F> ItemConverter for F
where
    F: Fn(Item) -> Result<Item> + Send + Sync,
{
    fn convert_item(&self, item: Item) -> Result<Item> {
        self(item)
    }
}
