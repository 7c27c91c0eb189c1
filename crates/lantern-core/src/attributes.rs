use std::num::ParseIntError;

use bitflags::{Flags, bitflags};

bitflags! {
    /// Behaviour flags carried by a command. They decide which resolver
    /// stages make up the command's chain.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandFlags: u32 {
        /// Moves the player along a direction link.
        const MOVEMENT = 0x001;
        /// Moves the player through the command's teleport table.
        const TELEPORT = 0x002;
        /// Switches a player attribute on or off ("verbose on").
        const SWITCHABLE = 0x004;
        /// Switches an item on or off ("switch lamp on").
        const SWITCHING = 0x008;
        /// Refuses to run when the player cannot see.
        const REQUIRES_VISION = 0x010;
        /// Describes the surroundings after the handler ran.
        const POST_VISION = 0x020;
        /// Hidden from the command listing and from suggestions.
        const SECRET = 0x040;
        /// The typed verb is passed to the handler as its first argument.
        const VERB_IS_FIRST_ARG = 0x080;
    }
}

bitflags! {
    /// Item attributes. Capability facets are attached from these at load time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemFlags: u32 {
        /// Can hold other items.
        const CONTAINER = 0x0001;
        /// As a container, accepts items that are not liquid.
        const HOLDS_SOLIDS = 0x0002;
        /// As a container, accepts liquids.
        const HOLDS_LIQUIDS = 0x0004;
        /// Can be picked up.
        const PORTABLE = 0x0008;
        /// Needs a liquid container and cannot lie on the ground.
        const LIQUID = 0x0010;
        /// Has an on/off switch.
        const SWITCHABLE = 0x0020;
        /// Can be worn, adding its activated attributes.
        const WEARABLE = 0x0040;
        /// Gives off light.
        const GIVES_LIGHT = 0x0080;
        /// Supplies air while held or worn.
        const GIVES_AIR = 0x0100;
        /// A creature. Items it contains are owned and cannot be taken.
        const SENTIENT = 0x0200;
        /// Blocks every exit except the way the player came in.
        const OBSTRUCTION = 0x0400;
        /// Inserting it creates a copy instead of moving it (lake water).
        const COPYABLE = 0x0800;
        /// Can be eaten or drunk.
        const EDIBLE = 0x1000;
        /// Marks a treasure.
        const TREASURE = 0x2000;
    }
}

bitflags! {
    /// Location attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LocationFlags: u32 {
        /// Lit without a light source.
        const GIVES_LIGHT = 0x01;
        /// Breathable.
        const GIVES_AIR = 0x02;
        /// The location has solid ground.
        const HAS_LAND = 0x04;
        /// The location has open water.
        const HAS_WATER = 0x08;
    }
}

bitflags! {
    /// Player attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PlayerFlags: u32 {
        /// Always print full location descriptions.
        const VERBOSE = 0x01;
        /// The player cannot die.
        const IMMUNE = 0x02;
    }
}

bitflags! {
    /// Event attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventFlags: u32 {
        /// Firing the event kills the player.
        const KILLS_PLAYER = 0x01;
        /// The event may fire more than once.
        const REPEATABLE = 0x02;
    }
}

/// Anything with a typed attribute set.
pub trait Attributed {
    /// The flag set type.
    type Flags: Flags + Copy;

    /// The current attribute set.
    fn attributes(&self) -> Self::Flags;

    /// Mutable access to the attribute set.
    fn attributes_mut(&mut self) -> &mut Self::Flags;

    /// Whether every bit of `flag` is set.
    fn has_attribute(&self, flag: Self::Flags) -> bool {
        self.attributes().contains(flag)
    }

    /// Set every bit of `flag`.
    fn set_attribute(&mut self, flag: Self::Flags) {
        self.attributes_mut().insert(flag);
    }

    /// Clear every bit of `flag`.
    fn unset_attribute(&mut self, flag: Self::Flags) {
        self.attributes_mut().remove(flag);
    }

    /// Flip every bit of `flag`.
    fn toggle_attribute(&mut self, flag: Self::Flags) {
        self.attributes_mut().toggle(flag);
    }
}

/// Parse a hexadecimal attribute string such as `"0x1a"` or `"1A"`.
///
/// Bits without a named flag are kept so that data written for a newer engine
/// still round-trips through attribute checks.
pub fn parse_attributes<F>(hex: &str) -> Result<F, ParseIntError>
where
    F: Flags<Bits = u32>,
{
    let trimmed = hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Ok(F::empty());
    }
    u32::from_str_radix(digits, 16).map(F::from_bits_retain)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing(ItemFlags);

    impl Attributed for Thing {
        type Flags = ItemFlags;

        fn attributes(&self) -> ItemFlags {
            self.0
        }

        fn attributes_mut(&mut self) -> &mut ItemFlags {
            &mut self.0
        }
    }

    #[test]
    fn parse_with_and_without_prefix() {
        let a: ItemFlags = parse_attributes("0x88").unwrap();
        let b: ItemFlags = parse_attributes("88").unwrap();
        assert_eq!(a, b);
        assert!(a.contains(ItemFlags::PORTABLE | ItemFlags::GIVES_LIGHT));
    }

    #[test]
    fn parse_empty_is_empty_set() {
        let flags: LocationFlags = parse_attributes("").unwrap();
        assert!(flags.is_empty());
    }

    #[test]
    fn parse_keeps_unknown_bits() {
        let flags: PlayerFlags = parse_attributes("0x100").unwrap();
        assert_eq!(flags.bits(), 0x100);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_attributes::<CommandFlags>("lamp").is_err());
    }

    #[test]
    fn set_unset_toggle() {
        let mut thing = Thing(ItemFlags::empty());
        thing.set_attribute(ItemFlags::GIVES_LIGHT);
        assert!(thing.has_attribute(ItemFlags::GIVES_LIGHT));
        thing.toggle_attribute(ItemFlags::GIVES_LIGHT | ItemFlags::PORTABLE);
        assert!(!thing.has_attribute(ItemFlags::GIVES_LIGHT));
        assert!(thing.has_attribute(ItemFlags::PORTABLE));
        thing.unset_attribute(ItemFlags::PORTABLE);
        assert!(thing.attributes().is_empty());
    }
}
