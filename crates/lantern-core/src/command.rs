use std::collections::BTreeMap;

use crate::attributes::{Attributed, CommandFlags, PlayerFlags};
use crate::direction::Direction;
use crate::entity::{CommandId, ItemKey, LocationId};

/// Where an item argument may be taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemSource {
    /// The player must be holding it.
    Inventory,
    /// It must be lying at the player's location, not held.
    Location,
    /// Either of the above.
    #[default]
    Either,
}

/// Descriptor of one expected command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgInfo {
    /// A missing mandatory argument suspends the command until the next input.
    pub mandatory: bool,
    /// The argument names an item rather than free text.
    pub is_item: bool,
    /// Where the item must come from.
    pub source: ItemSource,
    /// Connective words accepted before the argument ("into", "in").
    pub linkers: Vec<String>,
}

impl ArgInfo {
    /// A mandatory item argument.
    pub fn item(source: ItemSource) -> Self {
        Self {
            mandatory: true,
            is_item: true,
            source,
            linkers: Vec::new(),
        }
    }

    /// A mandatory text argument.
    pub fn text() -> Self {
        Self {
            mandatory: true,
            is_item: false,
            source: ItemSource::Either,
            linkers: Vec::new(),
        }
    }

    /// Mark the argument optional.
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// Set the accepted linker words.
    pub fn with_linkers<I, S>(mut self, linkers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.linkers = linkers.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `token` is one of this slot's linkers.
    pub fn is_linker(&self, token: &str) -> bool {
        self.linkers.iter().any(|l| l.eq_ignore_ascii_case(token))
    }

    /// The preferred linker, used when prompting for the argument.
    pub fn first_linker(&self) -> Option<&str> {
        self.linkers.first().map(String::as_str)
    }
}

/// A requested state change for a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Switch on.
    On,
    /// Switch off.
    Off,
    /// Flip the current state.
    Toggle,
}

impl Transition {
    /// The state after applying this transition to `current`.
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }
}

/// Vocabulary mapping switch words to states and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchInfo {
    /// Word for the on state.
    pub on: String,
    /// Word for the off state.
    pub off: String,
}

impl Default for SwitchInfo {
    fn default() -> Self {
        Self::new("on", "off")
    }
}

impl SwitchInfo {
    /// Word reserved for flipping the state in every vocabulary.
    pub const TOGGLE: &'static str = "toggle";

    /// Create a vocabulary.
    pub fn new(on: impl Into<String>, off: impl Into<String>) -> Self {
        Self {
            on: on.into(),
            off: off.into(),
        }
    }

    /// Look up a transition word.
    pub fn transition(&self, token: &str) -> Option<Transition> {
        if token.eq_ignore_ascii_case(&self.on) {
            Some(Transition::On)
        } else if token.eq_ignore_ascii_case(&self.off) {
            Some(Transition::Off)
        } else if token.eq_ignore_ascii_case(Self::TOGGLE) {
            Some(Transition::Toggle)
        } else {
            None
        }
    }

    /// The word describing `state`.
    pub fn text_for(&self, state: bool) -> &str {
        if state { &self.on } else { &self.off }
    }
}

/// Switch table of a switchable command: which player attribute it controls
/// and the words that control it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSwitch {
    /// Accepted words.
    pub vocabulary: SwitchInfo,
    /// The player attribute being switched.
    pub attribute: PlayerFlags,
}

/// A verb the player can type.
#[derive(Debug, Clone)]
pub struct Command {
    /// Identifier from the world description.
    pub id: CommandId,
    /// Behaviour flags.
    pub attributes: CommandFlags,
    /// Primary name.
    pub name: String,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Name of the handler that performs the verb.
    pub handler: String,
    /// Expected arguments, in order.
    pub arguments: Vec<ArgInfo>,
    /// Switch table for `SWITCHABLE` commands.
    pub switch: Option<CommandSwitch>,
    /// Source location to destination, for `TELEPORT` commands.
    pub teleport: BTreeMap<LocationId, LocationId>,
}

impl Command {
    /// Create a command whose handler shares its name.
    pub fn new(id: CommandId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            attributes: CommandFlags::empty(),
            handler: name.clone(),
            name,
            aliases: Vec::new(),
            arguments: Vec::new(),
            switch: None,
            teleport: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attributes(mut self, attributes: CommandFlags) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder-style handler override.
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = handler.into();
        self
    }

    /// Builder-style alias list.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style argument list.
    pub fn with_arguments(mut self, arguments: Vec<ArgInfo>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Builder-style switch table.
    pub fn with_switch(mut self, switch: CommandSwitch) -> Self {
        self.switch = Some(switch);
        self
    }

    /// Builder-style teleport entry.
    pub fn with_teleport(mut self, from: LocationId, to: LocationId) -> Self {
        self.teleport.insert(from, to);
        self
    }

    /// Primary name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether `token` is one of this command's names.
    pub fn matches(&self, token: &str) -> bool {
        self.names().any(|n| n.eq_ignore_ascii_case(token))
    }

    /// The direction a movement command travels, taken from its primary name.
    pub fn direction(&self) -> Option<Direction> {
        Direction::parse(&self.name)
    }

    /// Whether the command is hidden from listings.
    pub fn is_secret(&self) -> bool {
        self.has_attribute(CommandFlags::SECRET)
    }
}

impl Attributed for Command {
    type Flags = CommandFlags;

    fn attributes(&self) -> CommandFlags {
        self.attributes
    }

    fn attributes_mut(&mut self) -> &mut CommandFlags {
        &mut self.attributes
    }
}

/// A resolved command argument, threaded through the resolver chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// An item instance.
    Item(ItemKey),
    /// Free text, as typed.
    Text(String),
    /// A location, e.g. a movement destination.
    Location(LocationId),
    /// A direction.
    Direction(Direction),
    /// A switch transition.
    Transition(Transition),
}

impl Arg {
    /// The item key, if this is an item.
    pub fn as_item(&self) -> Option<ItemKey> {
        match self {
            Self::Item(key) => Some(*key),
            _ => None,
        }
    }

    /// The text, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The location, if this is a location.
    pub fn as_location(&self) -> Option<LocationId> {
        match self {
            Self::Location(id) => Some(*id),
            _ => None,
        }
    }

    /// The transition, if this is a transition.
    pub fn as_transition(&self) -> Option<Transition> {
        match self {
            Self::Transition(t) => Some(*t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_vocabulary_lookup() {
        let info = SwitchInfo::new("lit", "unlit");
        assert_eq!(info.transition("LIT"), Some(Transition::On));
        assert_eq!(info.transition("unlit"), Some(Transition::Off));
        assert_eq!(info.transition("toggle"), Some(Transition::Toggle));
        assert_eq!(info.transition("on"), None);
        assert_eq!(info.text_for(true), "lit");
        assert_eq!(info.text_for(false), "unlit");
    }

    #[test]
    fn transition_apply() {
        assert!(Transition::On.apply(false));
        assert!(!Transition::Off.apply(true));
        assert!(Transition::Toggle.apply(false));
        assert!(!Transition::Toggle.apply(true));
    }

    #[test]
    fn command_names_and_direction() {
        let cmd = Command::new(CommandId(1), "north").with_aliases(["n"]);
        assert!(cmd.matches("N"));
        assert!(!cmd.matches("south"));
        assert_eq!(cmd.direction(), Some(Direction::North));
        assert_eq!(cmd.handler, "north");
        assert_eq!(cmd.names().collect::<Vec<_>>(), vec!["north", "n"]);
    }

    #[test]
    fn linkers_are_case_insensitive() {
        let info = ArgInfo::item(ItemSource::Either).with_linkers(["into", "in"]);
        assert!(info.is_linker("INTO"));
        assert_eq!(info.first_linker(), Some("into"));
        assert!(!ArgInfo::text().is_linker("into"));
    }
}
