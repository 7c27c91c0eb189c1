use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::debug;

use crate::attributes::{Attributed, ItemFlags};
use crate::command::{Command, Transition};
use crate::direction::Direction;
use crate::entity::{CommandId, DataId, EventId, InventoryId, ItemKey, LocationId};
use crate::error::{CoreError, CoreResult};
use crate::event::{Event, EventKey};
use crate::inventory::Inventory;
use crate::item::{ContainerRef, Item, SwitchTarget};
use crate::location::Location;
use crate::player::Player;
use crate::text::TextTables;

/// The central world model. Owns every entity and the player.
///
/// Containment is stored on both ends: each item records its container and
/// each container lists its items. [`World::insert`] and [`World::remove`] are
/// the only ways to change it, which keeps the two sides consistent and makes
/// containment exclusive.
#[derive(Debug, Clone)]
pub struct World {
    /// Display name of the world.
    pub name: String,
    /// The player.
    pub player: Player,
    /// Responses, hints, explanations, input words.
    pub texts: TextTables,
    locations: BTreeMap<LocationId, Location>,
    items: Vec<Item>,
    item_index: HashMap<DataId, ItemKey>,
    inventories: BTreeMap<InventoryId, Inventory>,
    commands: BTreeMap<CommandId, Rc<Command>>,
    command_names: HashMap<String, CommandId>,
    events: BTreeMap<EventId, Event>,
    event_index: HashMap<EventKey, Vec<EventId>>,
}

impl World {
    /// An empty world with the player standing at `start`.
    pub fn new(name: impl Into<String>, start: LocationId) -> Self {
        Self {
            name: name.into(),
            player: Player::new(start),
            texts: TextTables::default(),
            locations: BTreeMap::new(),
            items: Vec::new(),
            item_index: HashMap::new(),
            inventories: BTreeMap::new(),
            commands: BTreeMap::new(),
            command_names: HashMap::new(),
            events: BTreeMap::new(),
            event_index: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Add a location, replacing any with the same id.
    pub fn add_location(&mut self, location: Location) -> Option<Location> {
        self.locations.insert(location.id, location)
    }

    /// Add an item to the arena. A later item with the same data id takes
    /// over lookups by id.
    pub fn add_item(&mut self, mut item: Item) -> ItemKey {
        item.container = None;
        let key = ItemKey(self.items.len());
        self.item_index.insert(item.data_id, key);
        self.items.push(item);
        key
    }

    /// Add an inventory, replacing any with the same id.
    pub fn add_inventory(&mut self, inventory: Inventory) -> Option<Inventory> {
        self.inventories.insert(inventory.id, inventory)
    }

    /// Add a command and register all of its names. Returns the command that
    /// previously held each clashing name.
    pub fn add_command(&mut self, command: Command) -> Vec<(String, CommandId)> {
        let id = command.id;
        let mut displaced = Vec::new();
        for name in command.names() {
            if let Some(previous) = self.command_names.insert(name.to_lowercase(), id) {
                displaced.push((name.to_string(), previous));
            }
        }
        self.commands.insert(id, Rc::new(command));
        displaced
    }

    /// Add an event and index it by its key. Events sharing a key are kept
    /// in insertion order.
    pub fn add_event(&mut self, event: Event) {
        let id = event.id;
        if let Some(old) = self.events.remove(&id) {
            if let Some(ids) = self.event_index.get_mut(&old.key()) {
                ids.retain(|e| *e != id);
            }
        }
        self.event_index.entry(event.key()).or_default().push(id);
        self.events.insert(id, event);
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// A location by id.
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    /// A mutable location by id.
    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(&id)
    }

    /// All locations, ordered by id.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// An item by key.
    pub fn item(&self, key: ItemKey) -> Option<&Item> {
        self.items.get(key.0)
    }

    /// A mutable item by key.
    pub fn item_mut(&mut self, key: ItemKey) -> Option<&mut Item> {
        self.items.get_mut(key.0)
    }

    /// The key of the original item declared with `data_id`.
    pub fn item_key(&self, data_id: DataId) -> Option<ItemKey> {
        self.item_index.get(&data_id).copied()
    }

    /// All item instances with their keys, copies included.
    pub fn items(&self) -> impl Iterator<Item = (ItemKey, &Item)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemKey(i), item))
    }

    /// Every item instance whose shortname is `name` (case-insensitive).
    /// Consumed copies are skipped; destroyed originals are not.
    pub fn find_items(&self, name: &str) -> Vec<ItemKey> {
        self.items()
            .filter(|(_, item)| !item.is_spent_copy())
            .filter(|(_, item)| item.labels.shortname.eq_ignore_ascii_case(name))
            .map(|(key, _)| key)
            .collect()
    }

    /// Shortname of an item, or a placeholder for dangling keys.
    pub fn item_name(&self, key: ItemKey) -> String {
        self.item(key)
            .map(|item| item.labels.shortname.clone())
            .unwrap_or_else(|| format!("item {key}"))
    }

    /// An inventory by id.
    pub fn inventory(&self, id: InventoryId) -> Option<&Inventory> {
        self.inventories.get(&id)
    }

    /// All inventories, ordered by id.
    pub fn inventories(&self) -> impl Iterator<Item = &Inventory> {
        self.inventories.values()
    }

    /// A command by id.
    pub fn command(&self, id: CommandId) -> Option<Rc<Command>> {
        self.commands.get(&id).cloned()
    }

    /// A command by any of its names.
    pub fn command_by_name(&self, name: &str) -> Option<Rc<Command>> {
        self.command_names
            .get(&name.to_lowercase())
            .and_then(|id| self.command(*id))
    }

    /// All commands, ordered by id.
    pub fn commands(&self) -> impl Iterator<Item = &Rc<Command>> {
        self.commands.values()
    }

    /// Every registered command name with the command it resolves to.
    pub fn command_names(&self) -> impl Iterator<Item = (&str, CommandId)> {
        self.command_names.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// An event by id.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// A mutable event by id.
    pub fn event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&id)
    }

    /// All events, ordered by id.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Events registered under `key`, in declaration order.
    pub fn events_for(&self, key: &EventKey) -> &[EventId] {
        self.event_index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    // -----------------------------------------------------------------------
    // Containment
    // -----------------------------------------------------------------------

    /// Items directly inside `container`.
    pub fn contents(&self, container: ContainerRef) -> Vec<ItemKey> {
        match container {
            ContainerRef::Location(id) => self
                .location(id)
                .map(|l| l.items.clone())
                .unwrap_or_default(),
            ContainerRef::Inventory(id) => self
                .inventory(id)
                .map(|i| i.items.clone())
                .unwrap_or_default(),
            ContainerRef::Item(key) => self
                .item(key)
                .and_then(Item::contents)
                .into_iter()
                .collect(),
        }
    }

    /// Whether `item` sits directly inside `container`.
    pub fn contains(&self, container: ContainerRef, item: ItemKey) -> bool {
        self.item(item)
            .is_some_and(|i| i.container == Some(container))
    }

    /// Detach `item` from whatever holds it. Returns the old container.
    pub fn remove(&mut self, item: ItemKey) -> CoreResult<Option<ContainerRef>> {
        let previous = self
            .item_mut(item)
            .ok_or(CoreError::ItemNotFound(item))?
            .container
            .take();
        match previous {
            Some(ContainerRef::Location(id)) => {
                if let Some(location) = self.locations.get_mut(&id) {
                    location.items.retain(|k| *k != item);
                }
            }
            Some(ContainerRef::Inventory(id)) => {
                if let Some(inventory) = self.inventories.get_mut(&id) {
                    inventory.items.retain(|k| *k != item);
                }
            }
            Some(ContainerRef::Item(key)) => {
                if let Some(facet) = self
                    .items
                    .get_mut(key.0)
                    .and_then(|c| c.container_facet.as_mut())
                {
                    if facet.contents == Some(item) {
                        facet.contents = None;
                    }
                }
            }
            None => {}
        }
        Ok(previous)
    }

    /// The structural rules of [`World::insert`], without moving anything.
    fn check_insert(&self, container: ContainerRef, item: ItemKey) -> CoreResult<()> {
        if self.item(item).is_none() {
            return Err(CoreError::ItemNotFound(item));
        }
        match container {
            ContainerRef::Location(id) if !self.locations.contains_key(&id) => {
                return Err(CoreError::LocationNotFound(id));
            }
            ContainerRef::Inventory(id) if !self.inventories.contains_key(&id) => {
                return Err(CoreError::InventoryNotFound(id));
            }
            ContainerRef::Item(key) => {
                if key == item || self.encloses(item, key) {
                    return Err(CoreError::SelfContainment(item));
                }
                let target = self.item(key).ok_or(CoreError::ItemNotFound(key))?;
                let facet = target
                    .container_facet
                    .as_ref()
                    .ok_or(CoreError::NotAContainer(key))?;
                if let Some(occupant) = facet.contents {
                    if occupant != item {
                        return Err(CoreError::ContainerOccupied {
                            container: key,
                            occupant,
                        });
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Put `item` into `container`, detaching it from its previous container.
    ///
    /// Capacity and size rules are not checked here; callers use the
    /// `can_accommodate` queries first. Structural rules are: the container
    /// must exist, a container item must have a free slot, and an item can
    /// never end up inside itself.
    pub fn insert(&mut self, container: ContainerRef, item: ItemKey) -> CoreResult<()> {
        self.check_insert(container, item)?;
        self.remove(item)?;
        match container {
            ContainerRef::Location(id) => {
                if let Some(location) = self.locations.get_mut(&id) {
                    location.items.push(item);
                }
            }
            ContainerRef::Inventory(id) => {
                if let Some(inventory) = self.inventories.get_mut(&id) {
                    inventory.items.push(item);
                }
            }
            ContainerRef::Item(key) => {
                if let Some(facet) = self
                    .items
                    .get_mut(key.0)
                    .and_then(|c| c.container_facet.as_mut())
                {
                    facet.contents = Some(item);
                }
            }
        }
        if let Some(moved) = self.item_mut(item) {
            moved.container = Some(container);
        }
        Ok(())
    }

    /// Take `item` out of the world. It stays in the arena, so events can
    /// bring it back.
    pub fn destroy(&mut self, item: ItemKey) -> CoreResult<()> {
        if let Some(worn) = self.item_mut(item).and_then(|i| i.wear_facet.as_mut()) {
            worn.worn = false;
        }
        self.remove(item).map(|_| ())
    }

    /// Create a detached copy of `item`, reusing the slot of an earlier copy
    /// that has left the world.
    pub fn copy_item(&mut self, item: ItemKey) -> CoreResult<ItemKey> {
        let mut copy = self.item(item).ok_or(CoreError::ItemNotFound(item))?.clone();
        copy.container = None;
        copy.copy_of = Some(item);
        if let Some(facet) = copy.container_facet.as_mut() {
            facet.contents = None;
        }
        let spent = self
            .items()
            .find(|(_, it)| it.copy_of == Some(item) && it.is_spent_copy())
            .map(|(key, _)| key);
        let key = match spent {
            Some(key) => {
                self.items[key.0] = copy;
                key
            }
            None => {
                self.items.push(copy);
                ItemKey(self.items.len() - 1)
            }
        };
        debug!(original = %item, copy = %key, reused = spent.is_some(), "copied item");
        Ok(key)
    }

    /// Put a fresh copy of `item` into `container`. Nothing is copied when
    /// the container would refuse it.
    pub fn copy_into(&mut self, container: ContainerRef, item: ItemKey) -> CoreResult<ItemKey> {
        self.check_insert(container, item)?;
        let copy = self.copy_item(item)?;
        self.insert(container, copy)?;
        Ok(copy)
    }

    /// Whether `outer` holds `inner` at any depth.
    fn encloses(&self, outer: ItemKey, inner: ItemKey) -> bool {
        let mut current = self.item(inner).and_then(Item::container);
        while let Some(ContainerRef::Item(key)) = current {
            if key == outer {
                return true;
            }
            current = self.item(key).and_then(Item::container);
        }
        false
    }

    /// The non-item container at the top of `item`'s nesting chain.
    pub fn outermost_container(&self, item: ItemKey) -> Option<ContainerRef> {
        let mut current = self.item(item)?.container?;
        let mut steps = 0;
        while let ContainerRef::Item(key) = current {
            current = self.item(key)?.container?;
            steps += 1;
            if steps > self.items.len() {
                return None;
            }
        }
        Some(current)
    }

    /// The sentient item `item` sits inside, if any.
    pub fn item_owner(&self, item: ItemKey) -> Option<ItemKey> {
        match self.item(item)?.container? {
            ContainerRef::Item(key) => self
                .item(key)
                .filter(|owner| owner.has_attribute(ItemFlags::SENTIENT))
                .map(|_| key),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Weight
    // -----------------------------------------------------------------------

    /// Weight of an item: zero while worn, otherwise its size plus contents.
    pub fn get_weight(&self, item: ItemKey) -> u32 {
        let Some(it) = self.item(item) else {
            return 0;
        };
        if it.is_worn() {
            return 0;
        }
        let inner = it.contents().map(|k| self.get_weight(k)).unwrap_or(0);
        it.size.saturating_add(inner)
    }

    /// Total weight held in an inventory.
    pub fn carried_weight(&self, inventory: InventoryId) -> u32 {
        self.inventory(inventory)
            .map(|inv| inv.items.iter().map(|k| self.get_weight(*k)).sum())
            .unwrap_or(0)
    }

    /// Whether `item` fits into `inventory` next to what it already holds.
    pub fn inventory_can_accommodate(&self, inventory: InventoryId, item: ItemKey) -> bool {
        self.inventory(inventory)
            .is_some_and(|inv| inv.fits(self.carried_weight(inventory), self.get_weight(item)))
    }

    /// Whether the container item can take `item`: a free slot, the right kind
    /// of contents, and strictly larger than the item.
    pub fn container_can_accommodate(&self, container: ItemKey, item: ItemKey) -> bool {
        let (Some(c), Some(i)) = (self.item(container), self.item(item)) else {
            return false;
        };
        let Some(facet) = &c.container_facet else {
            return false;
        };
        facet.contents.is_none()
            && container != item
            && self.accepts_kind(container, item)
            && c.size > i.size
    }

    /// Whether the container item holds this kind of thing (solid or liquid).
    pub fn accepts_kind(&self, container: ItemKey, item: ItemKey) -> bool {
        let (Some(c), Some(i)) = (self.item(container), self.item(item)) else {
            return false;
        };
        if i.is_liquid() {
            c.has_attribute(ItemFlags::HOLDS_LIQUIDS)
        } else {
            c.has_attribute(ItemFlags::HOLDS_SOLIDS)
        }
    }

    // -----------------------------------------------------------------------
    // Switches
    // -----------------------------------------------------------------------

    fn switch_target(&self, item: ItemKey) -> CoreResult<SwitchTarget> {
        self.item(item)
            .ok_or(CoreError::ItemNotFound(item))?
            .switch_facet
            .as_ref()
            .and_then(|s| s.target)
            .ok_or(CoreError::NotSwitchable(item))
    }

    /// Whether a switchable item is on, read from its target.
    pub fn is_switched_on(&self, item: ItemKey) -> CoreResult<bool> {
        match self.switch_target(item)? {
            SwitchTarget::Item { key, flag } => self
                .item(key)
                .map(|i| i.has_attribute(flag))
                .ok_or(CoreError::ItemNotFound(key)),
            SwitchTarget::Location { id, flag } => self
                .location(id)
                .map(|l| l.has_attribute(flag))
                .ok_or(CoreError::LocationNotFound(id)),
        }
    }

    /// Apply a transition to a switchable item's target. Returns the new state.
    pub fn switch(&mut self, item: ItemKey, transition: Transition) -> CoreResult<bool> {
        let target = self.switch_target(item)?;
        let state = transition.apply(self.is_switched_on(item)?);
        match target {
            SwitchTarget::Item { key, flag } => {
                let switched = self.item_mut(key).ok_or(CoreError::ItemNotFound(key))?;
                switched.attributes.set(flag, state);
            }
            SwitchTarget::Location { id, flag } => {
                let switched = self
                    .location_mut(id)
                    .ok_or(CoreError::LocationNotFound(id))?;
                switched.attributes.set(flag, state);
            }
        }
        debug!(item = %item, state, "switched");
        Ok(state)
    }

    /// Switch on.
    pub fn switch_on(&mut self, item: ItemKey) -> CoreResult<bool> {
        self.switch(item, Transition::On)
    }

    /// Switch off.
    pub fn switch_off(&mut self, item: ItemKey) -> CoreResult<bool> {
        self.switch(item, Transition::Off)
    }

    /// Flip the switch.
    pub fn switch_toggle(&mut self, item: ItemKey) -> CoreResult<bool> {
        self.switch(item, Transition::Toggle)
    }

    // -----------------------------------------------------------------------
    // Player surroundings
    // -----------------------------------------------------------------------

    /// The inventory active at `location`: the one bound to it, else the default.
    pub fn inventory_at(&self, location: LocationId) -> Option<InventoryId> {
        self.inventories
            .values()
            .find(|inv| !inv.default && inv.applies_at(location))
            .or_else(|| self.inventories.values().find(|inv| inv.default))
            .map(|inv| inv.id)
    }

    /// The player's current inventory.
    pub fn current_inventory(&self) -> Option<InventoryId> {
        self.inventory_at(self.player.location)
    }

    /// Whether the player holds `item`, directly or inside a held container.
    pub fn player_holds(&self, item: ItemKey) -> bool {
        match (self.outermost_container(item), self.current_inventory()) {
            (Some(ContainerRef::Inventory(held)), Some(current)) => held == current,
            _ => false,
        }
    }

    /// Whether `item` is at the player's location and not held.
    pub fn item_is_here(&self, item: ItemKey) -> bool {
        self.outermost_container(item) == Some(ContainerRef::Location(self.player.location))
    }

    /// Whether an item gives light.
    pub fn gives_light(&self, item: ItemKey) -> bool {
        self.item(item)
            .is_some_and(|i| i.has_effective(ItemFlags::GIVES_LIGHT))
    }

    /// Whether the player can see: the location is lit or a held or nearby
    /// item gives light. Items inside containers do not count.
    pub fn player_can_see(&self) -> bool {
        self.player_can_see_at(self.player.location)
    }

    /// Whether the player would see at `location` with what they carry.
    pub fn player_can_see_at(&self, location: LocationId) -> bool {
        if self.location(location).is_some_and(Location::gives_light) {
            return true;
        }
        let held = self
            .inventory_at(location)
            .map(|inv| self.contents(ContainerRef::Inventory(inv)))
            .unwrap_or_default();
        let here = self.contents(ContainerRef::Location(location));
        held.into_iter().chain(here).any(|k| self.gives_light(k))
    }

    /// Whether the player can breathe at `location` with what they carry.
    pub fn player_has_air_at(&self, location: LocationId) -> bool {
        if self.location(location).is_some_and(Location::gives_air) {
            return true;
        }
        self.inventory_at(location)
            .map(|inv| self.contents(ContainerRef::Inventory(inv)))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|k| self.item(k))
            .any(|i| i.has_effective(ItemFlags::GIVES_AIR))
    }

    /// The first obstruction at the player's location.
    pub fn obstruction_here(&self) -> Option<ItemKey> {
        self.contents(ContainerRef::Location(self.player.location))
            .into_iter()
            .find(|k| {
                self.item(*k)
                    .is_some_and(|i| i.has_attribute(ItemFlags::OBSTRUCTION))
            })
    }

    // -----------------------------------------------------------------------
    // Links and text
    // -----------------------------------------------------------------------

    /// Set or remove a direction link and re-derive `out`.
    pub fn relink(
        &mut self,
        location: LocationId,
        direction: Direction,
        destination: Option<LocationId>,
    ) -> CoreResult<()> {
        let loc = self
            .location_mut(location)
            .ok_or(CoreError::LocationNotFound(location))?;
        if direction == Direction::Out {
            loc.out_declared = destination.is_some();
        }
        match destination {
            Some(dest) => {
                loc.directions.insert(direction, dest);
            }
            None => {
                loc.directions.remove(&direction);
            }
        }
        loc.derive_out();
        Ok(())
    }

    /// Name used in listings: the longname plus state text.
    pub fn list_name(&self, item: ItemKey) -> String {
        let Some(it) = self.item(item) else {
            return self.item_name(item);
        };
        let mut name = it.labels.longname.clone();
        if let Some(switch) = &it.switch_facet {
            if let Ok(state) = self.is_switched_on(item) {
                name.push_str(&format!(" ({})", switch.vocabulary.text_for(state)));
            }
        }
        if it.is_worn() {
            name.push_str(" (worn)");
        }
        if let Some(inner) = it.contents() {
            name.push_str(&format!(" containing {}", self.list_name(inner)));
        }
        name
    }
}
