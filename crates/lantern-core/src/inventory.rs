use crate::entity::{InventoryId, ItemKey, LocationId};

/// A set of carried items with a weight capacity.
///
/// Exactly one inventory is the default; the others replace it while the
/// player stands at one of their `location_ids`.
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Identifier from the world description.
    pub id: InventoryId,
    /// Maximum total weight.
    pub capacity: u32,
    /// Whether this is the default inventory.
    pub default: bool,
    /// Locations where this inventory is active. Empty for the default one.
    pub location_ids: Vec<LocationId>,
    pub(crate) items: Vec<ItemKey>,
}

impl Inventory {
    /// The default inventory.
    pub fn new_default(id: InventoryId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            default: true,
            location_ids: Vec::new(),
            items: Vec::new(),
        }
    }

    /// An inventory bound to a set of locations.
    pub fn new_local(id: InventoryId, capacity: u32, location_ids: Vec<LocationId>) -> Self {
        Self {
            id,
            capacity,
            default: false,
            location_ids,
            items: Vec::new(),
        }
    }

    /// Items held, in the order they were picked up.
    pub fn items(&self) -> &[ItemKey] {
        &self.items
    }

    /// Whether this inventory applies at `location`.
    pub fn applies_at(&self, location: LocationId) -> bool {
        self.location_ids.contains(&location)
    }

    /// Whether `weight` more fits next to `carried`.
    pub fn fits(&self, carried: u32, weight: u32) -> bool {
        carried.saturating_add(weight) <= self.capacity
    }
}
