use crate::state::{ItemDefinition, ItemId};

/// Read-only item catalog.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, id: &ItemId) -> Option<ItemDefinition>;

    /// Returns all item definitions available in this oracle.
    fn all_definitions(&self) -> Vec<ItemDefinition>;
}
