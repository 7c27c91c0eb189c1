//! Core types for Lantern: the entity graph a text adventure runs on.
//!
//! This crate defines the in-memory world that the data loader builds and the
//! engine mutates. It is independent of the loader and of the resolver chain:
//! you can construct a [`World`] programmatically, which is how most tests in
//! the workspace do it.

/// Typed attribute flag sets and the [`Attributed`](attributes::Attributed) trait.
pub mod attributes;
/// Commands, argument descriptors, switch and teleport tables, resolved arguments.
pub mod command;
/// Compass and vertical directions.
pub mod direction;
/// Identifiers and display labels shared by every entity.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Scripted events: match keys, prerequisites, outcomes.
pub mod event;
/// Player inventories with weight capacity.
pub mod inventory;
/// Items and their capability facets.
pub mod item;
/// Locations and their direction links.
pub mod location;
/// The player and the pending multi-turn command state.
pub mod player;
/// Response, hint, and explanation text with positional templates.
pub mod text;
/// The central world model that owns the entity graph.
pub mod world;

pub use attributes::{
    Attributed, CommandFlags, EventFlags, ItemFlags, LocationFlags, PlayerFlags, parse_attributes,
};
pub use command::{Arg, ArgInfo, Command, CommandSwitch, ItemSource, SwitchInfo, Transition};
pub use direction::Direction;
pub use entity::{CommandId, DataId, EventId, InventoryId, ItemKey, Labels, LocationId};
pub use error::{CoreError, CoreResult};
pub use event::{ArgMatcher, ArgValue, Event, EventAction, EventKey, Outcome, Prerequisite};
pub use inventory::Inventory;
pub use item::{ContainerFacet, ContainerRef, Item, SwitchFacet, SwitchTarget, WearFacet};
pub use location::Location;
pub use player::{PendingCommand, Player};
pub use text::{InputVocabulary, Responses, TextTables, format_template, translate_positional};
pub use world::World;
