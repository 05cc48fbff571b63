//! Composite converter that applies a list of converters in order

use super::ItemConverter;
use crate::domain::{Item, Result};
use std::sync::Arc;

/// Chains zero or more converters; with none it returns items unchanged
#[derive(Clone, Default)]
pub struct CompositeItemConverter {
    converters: Vec<Arc<dyn ItemConverter>>,
}

impl CompositeItemConverter {
    /// Create a composite from an ordered list of converters
    pub fn new(converters: Vec<Arc<dyn ItemConverter>>) -> Self {
        Self { converters }
    }

    /// Append a converter to the end of the chain
    pub fn with(mut self, converter: Arc<dyn ItemConverter>) -> Self {
        self.converters.push(converter);
        self
    }

    /// Number of chained converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// True when no converters are chained
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl ItemConverter for CompositeItemConverter {
    fn convert_item(&self, item: Item) -> Result<Item> {
        self.converters
            .iter()
            .try_fold(item, |item, converter| converter.convert_item(item))
    }
}

impl std::fmt::Debug for CompositeItemConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeItemConverter")
            .field("converters", &self.converters.len())
            .finish()
    }
}
