use std::collections::{BTreeMap, BTreeSet};

use crate::attributes::{Attributed, LocationFlags};
use crate::direction::Direction;
use crate::entity::{ItemKey, Labels, LocationId};

/// A place the player can stand in.
#[derive(Debug, Clone)]
pub struct Location {
    /// Identifier from the world description.
    pub id: LocationId,
    /// Attribute flags.
    pub attributes: LocationFlags,
    /// Names and descriptions.
    pub labels: Labels,
    /// Outbound links. Links are one-way unless declared on both ends.
    pub directions: BTreeMap<Direction, LocationId>,
    /// Whether the description declared an explicit `out` link.
    pub out_declared: bool,
    /// Whether the player has been here before.
    pub visited: bool,
    pub(crate) items: Vec<ItemKey>,
}

impl Location {
    /// Create an empty location.
    pub fn new(id: LocationId, labels: Labels) -> Self {
        Self {
            id,
            attributes: LocationFlags::empty(),
            labels,
            directions: BTreeMap::new(),
            out_declared: false,
            visited: false,
            items: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attributes(mut self, attributes: LocationFlags) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder-style link.
    pub fn with_link(mut self, direction: Direction, destination: LocationId) -> Self {
        if direction == Direction::Out {
            self.out_declared = true;
        }
        self.directions.insert(direction, destination);
        self
    }

    /// Items lying here, in insertion order.
    pub fn items(&self) -> &[ItemKey] {
        &self.items
    }

    /// The location's own light, ignoring items.
    pub fn gives_light(&self) -> bool {
        self.has_attribute(LocationFlags::GIVES_LIGHT)
    }

    /// Whether the location is breathable without help.
    pub fn gives_air(&self) -> bool {
        self.has_attribute(LocationFlags::GIVES_AIR)
    }

    /// The destination in a direction.
    pub fn destination(&self, direction: Direction) -> Option<LocationId> {
        self.directions.get(&direction).copied()
    }

    /// Whether any link leads to `destination`.
    pub fn exit_to(&self, destination: LocationId) -> bool {
        self.directions.values().any(|id| *id == destination)
    }

    /// Recompute the derived `out` link.
    ///
    /// `out` exists only when there is exactly one distinct destination among
    /// the declared links and no explicit `out` was declared.
    pub fn derive_out(&mut self) {
        if self.out_declared {
            return;
        }
        self.directions.remove(&Direction::Out);
        let mut destinations = self
            .directions
            .values()
            .copied()
            .collect::<BTreeSet<LocationId>>()
            .into_iter();
        if let (Some(only), None) = (destinations.next(), destinations.next()) {
            self.directions.insert(Direction::Out, only);
        }
    }

    /// Exit names for display, excluding the derived `out`.
    pub fn exit_names(&self) -> Vec<&'static str> {
        self.directions
            .keys()
            .filter(|dir| **dir != Direction::Out || self.out_declared)
            .map(|dir| dir.name())
            .collect()
    }
}

impl Attributed for Location {
    type Flags = LocationFlags;

    fn attributes(&self) -> LocationFlags {
        self.attributes
    }

    fn attributes_mut(&mut self) -> &mut LocationFlags {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall() -> Location {
        Location::new(LocationId(1), Labels::new("hall", "the hall", "A hall."))
    }

    #[test]
    fn out_derived_for_single_destination() {
        let mut loc = hall()
            .with_link(Direction::North, LocationId(2))
            .with_link(Direction::Up, LocationId(2));
        loc.derive_out();
        assert_eq!(loc.destination(Direction::Out), Some(LocationId(2)));
    }

    #[test]
    fn out_not_derived_for_two_destinations() {
        let mut loc = hall()
            .with_link(Direction::North, LocationId(2))
            .with_link(Direction::South, LocationId(3));
        loc.derive_out();
        assert_eq!(loc.destination(Direction::Out), None);
    }

    #[test]
    fn out_removed_when_links_change() {
        let mut loc = hall().with_link(Direction::North, LocationId(2));
        loc.derive_out();
        assert!(loc.destination(Direction::Out).is_some());

        loc.directions.insert(Direction::East, LocationId(3));
        loc.derive_out();
        assert!(loc.destination(Direction::Out).is_none());
    }

    #[test]
    fn declared_out_is_kept() {
        let mut loc = hall()
            .with_link(Direction::Out, LocationId(9))
            .with_link(Direction::North, LocationId(2));
        loc.derive_out();
        assert_eq!(loc.destination(Direction::Out), Some(LocationId(9)));
        assert!(loc.exit_names().contains(&"out"));
    }

    #[test]
    fn light_and_air_flags() {
        let loc = hall().with_attributes(LocationFlags::GIVES_LIGHT);
        assert!(loc.gives_light());
        assert!(!loc.gives_air());
    }
}
