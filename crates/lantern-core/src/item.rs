use crate::attributes::{Attributed, ItemFlags, LocationFlags};
use crate::command::SwitchInfo;
use crate::entity::{DataId, InventoryId, ItemKey, Labels, LocationId};

/// Anything an item can be inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    /// Lying at a location.
    Location(LocationId),
    /// Inside a container item.
    Item(ItemKey),
    /// Held in an inventory.
    Inventory(InventoryId),
}

/// Single-slot container capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFacet {
    /// The one item inside, if any.
    pub contents: Option<ItemKey>,
}

/// The attribute bit a switch controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchTarget {
    /// A bit on an item, possibly the switch itself.
    Item {
        /// The switched item.
        key: ItemKey,
        /// The bit that represents "on".
        flag: ItemFlags,
    },
    /// A bit on a location.
    Location {
        /// The switched location.
        id: LocationId,
        /// The bit that represents "on".
        flag: LocationFlags,
    },
}

/// Switch capability. The on/off state lives on the target, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchFacet {
    /// What gets switched. `None` until cross-referencing succeeds.
    pub target: Option<SwitchTarget>,
    /// Words that switch it.
    pub vocabulary: SwitchInfo,
}

/// Wearable capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WearFacet {
    /// Currently worn.
    pub worn: bool,
    /// Attributes added to the item while worn.
    pub activated: ItemFlags,
}

/// An object in the world. Behaviour comes from flags and optional facets
/// rather than from subtypes, so one item can be both wearable and switchable.
#[derive(Debug, Clone)]
pub struct Item {
    /// Identifier from the world description.
    pub data_id: DataId,
    /// Base attribute flags.
    pub attributes: ItemFlags,
    /// Names and descriptions.
    pub labels: Labels,
    /// Size, which is also its weight.
    pub size: u32,
    /// Text written on the item.
    pub writing: Option<String>,
    /// Present when the item is a container.
    pub container_facet: Option<ContainerFacet>,
    /// Present when the item is switchable.
    pub switch_facet: Option<SwitchFacet>,
    /// Present when the item is wearable.
    pub wear_facet: Option<WearFacet>,
    /// The original this item was copied from.
    pub copy_of: Option<ItemKey>,
    pub(crate) container: Option<ContainerRef>,
}

impl Item {
    /// Create an item, attaching facets according to `attributes`.
    pub fn new(data_id: DataId, attributes: ItemFlags, labels: Labels, size: u32) -> Self {
        let container_facet = attributes
            .contains(ItemFlags::CONTAINER)
            .then(ContainerFacet::default);
        let switch_facet = attributes
            .contains(ItemFlags::SWITCHABLE)
            .then(|| SwitchFacet {
                target: None,
                vocabulary: SwitchInfo::default(),
            });
        let wear_facet = attributes
            .contains(ItemFlags::WEARABLE)
            .then(WearFacet::default);
        Self {
            data_id,
            attributes,
            labels,
            size,
            writing: None,
            container_facet,
            switch_facet,
            wear_facet,
            copy_of: None,
            container: None,
        }
    }

    /// Builder-style writing.
    pub fn with_writing(mut self, writing: impl Into<String>) -> Self {
        self.writing = Some(writing.into());
        self
    }

    /// Builder-style wear activation mask. Has no effect without a wear facet.
    pub fn with_activated(mut self, activated: ItemFlags) -> Self {
        if let Some(wear) = self.wear_facet.as_mut() {
            wear.activated = activated;
        }
        self
    }

    /// Builder-style switch target and vocabulary. Has no effect without a
    /// switch facet.
    pub fn with_switch(mut self, target: SwitchTarget, vocabulary: SwitchInfo) -> Self {
        if let Some(switch) = self.switch_facet.as_mut() {
            switch.target = Some(target);
            switch.vocabulary = vocabulary;
        }
        self
    }

    /// The container the item currently sits in.
    pub fn container(&self) -> Option<ContainerRef> {
        self.container
    }

    /// A copy that is no longer anywhere, e.g. water that was drunk.
    pub fn is_spent_copy(&self) -> bool {
        self.copy_of.is_some() && self.container.is_none()
    }

    /// Whether the item is worn.
    pub fn is_worn(&self) -> bool {
        self.wear_facet.as_ref().is_some_and(|w| w.worn)
    }

    /// Base attributes plus any activated while worn.
    pub fn effective_attributes(&self) -> ItemFlags {
        match &self.wear_facet {
            Some(wear) if wear.worn => self.attributes | wear.activated,
            _ => self.attributes,
        }
    }

    /// Whether the effective attributes contain `flag`.
    pub fn has_effective(&self, flag: ItemFlags) -> bool {
        self.effective_attributes().contains(flag)
    }

    /// Whether this item is a liquid.
    pub fn is_liquid(&self) -> bool {
        self.has_attribute(ItemFlags::LIQUID)
    }

    /// The single item inside, if this is a non-empty container.
    pub fn contents(&self) -> Option<ItemKey> {
        self.container_facet.as_ref().and_then(|c| c.contents)
    }
}

impl Attributed for Item {
    type Flags = ItemFlags;

    fn attributes(&self) -> ItemFlags {
        self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ItemFlags {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(name: &str) -> Labels {
        Labels::new(name, format!("a {name}"), "")
    }

    #[test]
    fn facets_follow_flags() {
        let bottle = Item::new(DataId(1), ItemFlags::CONTAINER, labels("bottle"), 3);
        assert!(bottle.container_facet.is_some());
        assert!(bottle.switch_facet.is_none());
        assert!(bottle.wear_facet.is_none());

        let helmet = Item::new(
            DataId(2),
            ItemFlags::SWITCHABLE | ItemFlags::WEARABLE,
            labels("helmet"),
            2,
        );
        assert!(helmet.switch_facet.is_some());
        assert!(helmet.wear_facet.is_some());
    }

    #[test]
    fn worn_item_ors_activated_mask() {
        let mut suit = Item::new(DataId(3), ItemFlags::WEARABLE, labels("suit"), 4)
            .with_activated(ItemFlags::GIVES_AIR);
        assert!(!suit.has_effective(ItemFlags::GIVES_AIR));

        suit.wear_facet.as_mut().unwrap().worn = true;
        assert!(suit.has_effective(ItemFlags::GIVES_AIR));
        assert!(!suit.has_attribute(ItemFlags::GIVES_AIR));
    }

    #[test]
    fn activated_ignored_without_wear_facet() {
        let rock = Item::new(DataId(4), ItemFlags::PORTABLE, labels("rock"), 1)
            .with_activated(ItemFlags::GIVES_LIGHT);
        assert!(rock.wear_facet.is_none());
        assert!(!rock.has_effective(ItemFlags::GIVES_LIGHT));
    }
}
