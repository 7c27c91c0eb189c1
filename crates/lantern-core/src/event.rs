use crate::attributes::{Attributed, EventFlags, ItemFlags, LocationFlags, PlayerFlags};
use crate::direction::Direction;
use crate::entity::{CommandId, DataId, EventId, ItemKey, LocationId};
use crate::item::ContainerRef;

/// A resolved argument as it appears in an event key.
///
/// Items match by data id so that copies of a copyable item trigger the same
/// events as the original. Text matches case-insensitively; keys store it
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    /// Literal text.
    Text(String),
    /// A specific item.
    Item(DataId),
}

impl ArgValue {
    /// Text value, normalised for lookup.
    pub fn text(text: impl AsRef<str>) -> Self {
        Self::Text(text.as_ref().to_lowercase())
    }
}

/// One argument matcher of an event. Matchers and resolved values share a
/// representation so matching is a plain hash lookup.
pub type ArgMatcher = ArgValue;

/// Lookup key of an event: the command plus its resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    /// The command that was run.
    pub command: CommandId,
    /// Its resolved arguments, in order.
    pub args: Vec<ArgValue>,
}

/// A condition that must hold for an event to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisite {
    /// The item sits directly in the container.
    ItemIn {
        /// The item.
        item: ItemKey,
        /// Where it must be.
        container: ContainerRef,
    },
    /// The player holds the item, possibly inside a held container.
    ItemHeld {
        /// The item.
        item: ItemKey,
    },
    /// The player stands at the location.
    PlayerAt {
        /// The location.
        location: LocationId,
    },
    /// Another event has fired.
    EventFired {
        /// The event.
        event: EventId,
    },
    /// Another event has not fired yet.
    EventNotFired {
        /// The event.
        event: EventId,
    },
}

/// A world mutation performed when an event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    /// Remove the item from the world.
    DestroyItem {
        /// The item.
        item: ItemKey,
    },
    /// Move the item into a container.
    MoveItem {
        /// The item.
        item: ItemKey,
        /// The destination.
        to: ContainerRef,
    },
    /// Put the item into the player's current inventory.
    GiveItem {
        /// The item.
        item: ItemKey,
    },
    /// Put `new` where `old` is and destroy `old`.
    ReplaceItem {
        /// The item that disappears.
        old: ItemKey,
        /// The item that takes its place.
        new: ItemKey,
    },
    /// Set or clear a player attribute.
    SetPlayerAttribute {
        /// The bit.
        flag: PlayerFlags,
        /// Set when true, clear when false.
        on: bool,
    },
    /// Set or clear a location attribute.
    SetLocationAttribute {
        /// The location.
        location: LocationId,
        /// The bit.
        flag: LocationFlags,
        /// Set when true, clear when false.
        on: bool,
    },
    /// Set or clear an item attribute.
    SetItemAttribute {
        /// The item.
        item: ItemKey,
        /// The bit.
        flag: ItemFlags,
        /// Set when true, clear when false.
        on: bool,
    },
    /// Create, change, or remove a direction link.
    LinkDirection {
        /// The location whose link changes.
        location: LocationId,
        /// The direction.
        direction: Direction,
        /// New destination; `None` removes the link.
        destination: Option<LocationId>,
    },
    /// Attach (or detach) an extended description to a location.
    DescribeLocation {
        /// The location.
        location: LocationId,
        /// Index into its extended descriptions.
        extension: Option<usize>,
    },
    /// Move the player.
    MovePlayer {
        /// The destination.
        location: LocationId,
    },
}

/// What happens when an event fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Response text. When empty the handler's text stands.
    pub text: String,
    /// Points awarded.
    pub score: u32,
    /// World mutations, applied in order.
    pub actions: Vec<EventAction>,
}

/// A scripted outcome keyed by a command and its arguments.
#[derive(Debug, Clone)]
pub struct Event {
    /// Identifier from the world description.
    pub id: EventId,
    /// Attribute flags.
    pub attributes: EventFlags,
    /// The command that triggers it.
    pub command: CommandId,
    /// Argument matchers, in order.
    pub matchers: Vec<ArgMatcher>,
    /// Conditions checked at fire time.
    pub prerequisites: Vec<Prerequisite>,
    /// The effect.
    pub outcome: Outcome,
    /// Whether the event has fired this session.
    pub fired: bool,
}

impl Event {
    /// A fresh event with no prerequisites and an empty outcome.
    pub fn new(id: EventId, command: CommandId, matchers: Vec<ArgMatcher>) -> Self {
        Self {
            id,
            attributes: EventFlags::empty(),
            command,
            matchers,
            prerequisites: Vec::new(),
            outcome: Outcome::default(),
            fired: false,
        }
    }

    /// Builder-style outcome.
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Builder-style prerequisites.
    pub fn with_prerequisites(mut self, prerequisites: Vec<Prerequisite>) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    /// Builder-style attributes.
    pub fn with_attributes(mut self, attributes: EventFlags) -> Self {
        self.attributes = attributes;
        self
    }

    /// The lookup key of this event.
    pub fn key(&self) -> EventKey {
        EventKey {
            command: self.command,
            args: self.matchers.clone(),
        }
    }

    /// Whether the event may still fire.
    pub fn is_armed(&self) -> bool {
        !self.fired || self.has_attribute(EventFlags::REPEATABLE)
    }
}

impl Attributed for Event {
    type Flags = EventFlags;

    fn attributes(&self) -> EventFlags {
        self.attributes
    }

    fn attributes_mut(&mut self) -> &mut EventFlags {
        &mut self.attributes
    }
}
