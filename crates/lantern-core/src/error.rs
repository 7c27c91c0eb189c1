use crate::entity::{InventoryId, ItemKey, LocationId};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by world primitives when handed a reference that does not
/// fit the graph. The engine checks preconditions before mutating, so these
/// indicate a broken world rather than a player mistake.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The item key does not exist in the arena.
    #[error("item not found: {0}")]
    ItemNotFound(ItemKey),

    /// The location id does not exist.
    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    /// The inventory id does not exist.
    #[error("inventory not found: {0}")]
    InventoryNotFound(InventoryId),

    /// The target item has no container facet.
    #[error("item {0} is not a container")]
    NotAContainer(ItemKey),

    /// The container's single slot is taken.
    #[error("container {container} already holds {occupant}")]
    ContainerOccupied {
        /// The container item.
        container: ItemKey,
        /// The item already inside it.
        occupant: ItemKey,
    },

    /// An item cannot be placed inside itself or its own contents.
    #[error("item {0} cannot contain itself")]
    SelfContainment(ItemKey),

    /// The item has no switch facet.
    #[error("item {0} is not switchable")]
    NotSwitchable(ItemKey),
}
