//! Serde records mirroring the JSON world description.
//!
//! Every record is a plain data mirror. Ids stay numeric here; the builder
//! turns them into references and reports the ones that dangle. Attribute
//! fields hold hexadecimal bit masks such as `"0x3"`; an empty string means
//! no bits.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The whole world description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldDocument {
    /// Display name of the world.
    #[serde(default = "default_name")]
    pub name: String,
    /// Every command the player can type.
    #[serde(default)]
    pub commands: Vec<CommandRecord>,
    /// Every item, including ones that only appear through events.
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    /// The map.
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
    /// Scripted events.
    #[serde(default)]
    pub events: Vec<EventRecord>,
    /// Player inventories; exactly one should be the default.
    #[serde(default)]
    pub inventories: Vec<InventoryRecord>,
    /// The player; exactly one record is required.
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    /// Named word sets, e.g. `"yes": ["y", "yes", "aye"]`.
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<String>>,
    /// Hint text keyed by topic.
    #[serde(default)]
    pub hints: BTreeMap<String, String>,
    /// Explanation text keyed by topic.
    #[serde(default)]
    pub explanations: BTreeMap<String, String>,
    /// Overrides for the built-in response templates.
    #[serde(default)]
    pub responses: BTreeMap<String, String>,
}

fn default_name() -> String {
    "Untitled".to_string()
}

/// Shortname, longname, description, and optional extensions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelsRecord {
    /// The word the player types to refer to the entity.
    pub shortname: String,
    /// Name used in listings; defaults to the shortname.
    #[serde(default)]
    pub longname: Option<String>,
    /// Full description.
    #[serde(default)]
    pub description: Option<String>,
    /// Extra sentences events can append to the description.
    #[serde(default)]
    pub extended_descriptions: Vec<String>,
}

/// A place on the map.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    /// Unique location id.
    pub data_id: u32,
    /// [`LocationFlags`](lantern_core::LocationFlags) bits.
    #[serde(default)]
    pub attributes: String,
    /// Names and description.
    pub labels: LabelsRecord,
    /// Direction word to destination location id.
    #[serde(default)]
    pub directions: BTreeMap<String, u32>,
}

/// Where an item starts. At most one field should be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRecord {
    /// On the ground at a location.
    Location(u32),
    /// Inside a container item.
    Item(u32),
    /// In an inventory.
    Inventory(u32),
}

/// What a switchable item switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchTargetRecord {
    /// Another item, or the switch itself.
    Item(u32),
    /// A location, e.g. a lever that lights a room.
    Location(u32),
}

/// The switch of a switchable item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemSwitchRecord {
    /// What the switch acts on.
    pub target: SwitchTargetRecord,
    /// The bit on the target that means "on".
    pub attribute: String,
    /// Word for the on state; defaults to "on".
    #[serde(default)]
    pub on: Option<String>,
    /// Word for the off state; defaults to "off".
    #[serde(default)]
    pub off: Option<String>,
}

/// An item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    /// Unique item id.
    pub data_id: u32,
    /// [`ItemFlags`](lantern_core::ItemFlags) bits.
    #[serde(default)]
    pub attributes: String,
    /// Names and description.
    pub labels: LabelsRecord,
    /// Space it takes up in a container or inventory.
    #[serde(default)]
    pub size: u32,
    /// Text shown when the item is read.
    #[serde(default)]
    pub writing: Option<String>,
    /// Starting place. Unplaced items wait for an event.
    #[serde(default)]
    pub placement: Option<PlacementRecord>,
    /// Present on switchable items.
    #[serde(default)]
    pub switch: Option<ItemSwitchRecord>,
    /// Attributes added while worn.
    #[serde(default)]
    pub activated: Option<String>,
}

/// Where an item argument may come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRecord {
    /// Must be held.
    Inventory,
    /// Must be here and not held.
    Location,
    /// Either held or here.
    #[default]
    Either,
}

/// One argument slot of a command.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentRecord {
    /// Missing mandatory arguments are asked for.
    #[serde(default = "yes")]
    pub mandatory: bool,
    /// Whether the slot names an item rather than free text.
    #[serde(default = "yes")]
    pub item: bool,
    /// Where an item argument may come from.
    #[serde(default)]
    pub source: SourceRecord,
    /// Words that may precede the argument ("into", "in").
    #[serde(default)]
    pub linkers: Vec<String>,
}

fn yes() -> bool {
    true
}

/// The switch of a command that toggles a player attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSwitchRecord {
    /// Word for the on state; defaults to "on".
    #[serde(default)]
    pub on: Option<String>,
    /// Word for the off state; defaults to "off".
    #[serde(default)]
    pub off: Option<String>,
    /// The player attribute the command switches.
    pub attribute: String,
}

/// One entry of a teleport table.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TeleportRecord {
    /// Location the command works in.
    pub from: u32,
    /// Where it takes the player.
    pub to: u32,
}

/// A command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRecord {
    /// Unique command id.
    pub data_id: u32,
    /// [`CommandFlags`](lantern_core::CommandFlags) bits.
    #[serde(default)]
    pub attributes: String,
    /// Primary verb.
    pub name: String,
    /// Other verbs for the same command.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Handler name; defaults to the command name.
    #[serde(default)]
    pub handler: Option<String>,
    /// Argument slots in order.
    #[serde(default)]
    pub arguments: Vec<ArgumentRecord>,
    /// Present on commands that switch a player attribute.
    #[serde(default)]
    pub switch: Option<CommandSwitchRecord>,
    /// Present on teleport commands.
    #[serde(default)]
    pub teleport: Vec<TeleportRecord>,
}

/// One argument matcher of an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRecord {
    /// Literal text, matched case-insensitively.
    Text(String),
    /// An item id; copies of the item match too.
    Item(u32),
}

/// A condition an event needs before it fires.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrerequisiteRecord {
    /// An item is directly inside a container.
    ItemIn {
        /// Item id.
        item: u32,
        /// The container.
        container: PlacementRecord,
    },
    /// The player holds an item.
    ItemHeld {
        /// Item id.
        item: u32,
    },
    /// The player is at a location.
    PlayerAt {
        /// Location id.
        location: u32,
    },
    /// Another event has fired.
    EventFired {
        /// Event id.
        event: u32,
    },
    /// Another event has not fired yet.
    EventNotFired {
        /// Event id.
        event: u32,
    },
}

/// A change an event makes to the world.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionRecord {
    /// Take an item out of play.
    DestroyItem {
        /// Item id.
        item: u32,
    },
    /// Put an item somewhere.
    MoveItem {
        /// Item id.
        item: u32,
        /// Destination container.
        to: PlacementRecord,
    },
    /// Put an item into the player's current inventory.
    GiveItem {
        /// Item id.
        item: u32,
    },
    /// Swap an item for another in the same place.
    ReplaceItem {
        /// Item id to remove.
        old: u32,
        /// Item id to put in its place.
        new: u32,
    },
    /// Set or clear a player attribute.
    SetPlayerAttribute {
        /// [`PlayerFlags`](lantern_core::PlayerFlags) bits.
        attribute: String,
        /// Set when true, clear when false.
        #[serde(default = "yes")]
        on: bool,
    },
    /// Set or clear a location attribute.
    SetLocationAttribute {
        /// Location id.
        location: u32,
        /// [`LocationFlags`](lantern_core::LocationFlags) bits.
        attribute: String,
        /// Set when true, clear when false.
        #[serde(default = "yes")]
        on: bool,
    },
    /// Set or clear an item attribute.
    SetItemAttribute {
        /// Item id.
        item: u32,
        /// [`ItemFlags`](lantern_core::ItemFlags) bits.
        attribute: String,
        /// Set when true, clear when false.
        #[serde(default = "yes")]
        on: bool,
    },
    /// Open, redirect, or close an exit.
    LinkDirection {
        /// Location id.
        location: u32,
        /// Direction word.
        direction: String,
        /// New destination; none closes the exit.
        #[serde(default)]
        destination: Option<u32>,
    },
    /// Show a location's description, optionally with one extension.
    DescribeLocation {
        /// Location id.
        location: u32,
        /// Index into the location's extended descriptions.
        #[serde(default)]
        extension: Option<usize>,
    },
    /// Move the player.
    MovePlayer {
        /// Location id.
        location: u32,
    },
}

/// A scripted event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    /// Unique event id.
    pub data_id: u32,
    /// [`EventFlags`](lantern_core::EventFlags) bits.
    #[serde(default)]
    pub attributes: String,
    /// Id of the command that triggers the event.
    pub command: u32,
    /// Argument matchers, in slot order.
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    /// Conditions that must all hold.
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteRecord>,
    /// Response that replaces the command's own; may be empty.
    #[serde(default)]
    pub text: String,
    /// Points awarded when it fires.
    #[serde(default)]
    pub score: u32,
    /// World changes, applied in order.
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

/// An inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryRecord {
    /// Unique inventory id.
    pub data_id: u32,
    /// Total size it holds.
    pub capacity: u32,
    /// Used wherever no local inventory applies.
    #[serde(default)]
    pub default: bool,
    /// Locations where this inventory replaces the default one.
    #[serde(default)]
    pub location_ids: Vec<u32>,
}

/// The player's starting state.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    /// Starting location id.
    pub location: u32,
    /// [`PlayerFlags`](lantern_core::PlayerFlags) bits.
    #[serde(default)]
    pub attributes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_uses_defaults() {
        let doc: WorldDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.name, "Untitled");
        assert!(doc.commands.is_empty());
        assert!(doc.players.is_empty());
    }

    #[test]
    fn argument_defaults_to_mandatory_item() {
        let arg: ArgumentRecord = serde_json::from_str("{}").unwrap();
        assert!(arg.mandatory);
        assert!(arg.item);
        assert_eq!(arg.source, SourceRecord::Either);
    }

    #[test]
    fn tagged_prerequisites_and_actions() {
        let pre: PrerequisiteRecord = serde_json::from_str(
            r#"{"kind": "item_in", "item": 4, "container": {"location": 2}}"#,
        )
        .unwrap();
        assert!(matches!(
            pre,
            PrerequisiteRecord::ItemIn {
                item: 4,
                container: PlacementRecord::Location(2)
            }
        ));

        let action: ActionRecord =
            serde_json::from_str(r#"{"kind": "set_player_attribute", "attribute": "0x2"}"#)
                .unwrap();
        assert!(matches!(
            action,
            ActionRecord::SetPlayerAttribute { on: true, .. }
        ));
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        assert!(serde_json::from_str::<WorldDocument>(r#"{"bogus": 1}"#).is_err());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = serde_json::from_str::<CommandRecord>(r#"{"data_id": 1}"#).unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
