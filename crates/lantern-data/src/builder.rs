//! Pass two: turn records into the entity graph, resolving ids to references.
//!
//! Dangling references are dropped with an ERROR diagnostic. Things that make
//! the document meaningless (bad hex, unknown direction words, a player with
//! nowhere to stand) abort with a [`ConfigurationError`].

use bitflags::Flags;
use lantern_core::{
    ArgInfo, ArgMatcher, ArgValue, Command, CommandFlags, CommandId, CommandSwitch,
    ContainerRef, DataId, Direction, Event, EventAction, EventFlags, EventId, Inventory,
    InventoryId, Item, ItemFlags, ItemKey, ItemSource, Labels, Location, LocationFlags, LocationId,
    Outcome, PlayerFlags, Prerequisite, SwitchInfo, SwitchTarget, World, parse_attributes,
    translate_positional,
};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::{ConfigurationError, LoadResult};
use crate::resolver::Registries;
use crate::schema::{
    ActionRecord, ArgumentRecord, CommandRecord, EventRecord, ItemRecord, LabelsRecord,
    LocationRecord, MatchRecord, PlacementRecord, PrerequisiteRecord, SourceRecord,
    SwitchTargetRecord, WorldDocument,
};

/// Build the world from a resolved document.
pub fn build(doc: &WorldDocument, registries: &Registries<'_>) -> LoadResult<(World, Vec<Diagnostic>)> {
    let player = match doc.players.as_slice() {
        [player] => player,
        players => return Err(ConfigurationError::PlayerCount(players.len())),
    };
    if !registries.locations.contains(player.location) {
        return Err(ConfigurationError::UnknownStartLocation(player.location));
    }

    let mut builder = Builder {
        world: World::new(doc.name.clone(), LocationId(player.location)),
        registries,
        diagnostics: Vec::new(),
    };
    builder.world.player.attributes = flags(&player.attributes, "the player")?;

    builder.locations()?;
    builder.inventories();
    builder.items()?;
    builder.commands()?;
    builder.events()?;
    builder.texts(doc);

    debug!(
        diagnostics = builder.diagnostics.len(),
        "cross-referenced world"
    );
    Ok((builder.world, builder.diagnostics))
}

fn flags<F>(hex: &str, entity: impl Into<String>) -> LoadResult<F>
where
    F: Flags<Bits = u32>,
{
    parse_attributes(hex).map_err(|_| ConfigurationError::InvalidAttributes {
        entity: entity.into(),
        value: hex.to_string(),
    })
}

fn labels(record: &LabelsRecord) -> Labels {
    let longname = record
        .longname
        .clone()
        .unwrap_or_else(|| record.shortname.clone());
    let mut labels = Labels::new(
        record.shortname.clone(),
        longname,
        record.description.clone().unwrap_or_default(),
    );
    labels.extended_descriptions = record.extended_descriptions.clone();
    labels
}

fn direction(word: &str, location: u32) -> LoadResult<Direction> {
    Direction::parse(word).ok_or_else(|| ConfigurationError::UnknownDirection {
        location,
        word: word.to_string(),
    })
}

struct Builder<'r, 'a> {
    world: World,
    registries: &'r Registries<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl Builder<'_, '_> {
    fn error(&mut self, message: String) {
        self.diagnostics.push(Diagnostic::error(message));
    }

    fn location_ref(&mut self, id: u32, context: impl FnOnce() -> String) -> Option<LocationId> {
        if self.registries.locations.contains(id) {
            Some(LocationId(id))
        } else {
            let message = format!("{} refers to unknown location {id}", context());
            self.error(message);
            None
        }
    }

    fn item_ref(&mut self, id: u32, context: impl FnOnce() -> String) -> Option<ItemKey> {
        match self.world.item_key(DataId(id)) {
            Some(key) => Some(key),
            None => {
                let message = format!("{} refers to unknown item {id}", context());
                self.error(message);
                None
            }
        }
    }

    fn container_ref(
        &mut self,
        placement: PlacementRecord,
        context: impl Fn() -> String,
    ) -> Option<ContainerRef> {
        match placement {
            PlacementRecord::Location(id) => self.location_ref(id, context).map(ContainerRef::Location),
            PlacementRecord::Item(id) => self.item_ref(id, context).map(ContainerRef::Item),
            PlacementRecord::Inventory(id) => {
                if self.registries.inventories.contains(id) {
                    Some(ContainerRef::Inventory(InventoryId(id)))
                } else {
                    let message = format!("{} refers to unknown inventory {id}", context());
                    self.error(message);
                    None
                }
            }
        }
    }

    // -- Locations --

    fn locations(&mut self) -> LoadResult<()> {
        let registries = self.registries;
        for (id, record) in registries.locations.iter() {
            let location = self.location(id, record)?;
            self.world.add_location(location);
        }
        Ok(())
    }

    fn location(&mut self, id: u32, record: &LocationRecord) -> LoadResult<Location> {
        let attributes: LocationFlags = flags(&record.attributes, format!("location {id}"))?;
        let mut location = Location::new(LocationId(id), labels(&record.labels)).with_attributes(attributes);
        for (word, destination) in &record.directions {
            let dir = direction(word, id)?;
            if let Some(dest) = self.location_ref(*destination, || format!("location {id} ({word})")) {
                location = location.with_link(dir, dest);
            }
        }
        location.derive_out();
        Ok(location)
    }

    // -- Inventories --

    fn inventories(&mut self) {
        let registries = self.registries;
        for (id, record) in registries.inventories.iter() {
            let inventory = if record.default {
                Inventory::new_default(InventoryId(id), record.capacity)
            } else {
                let location_ids = record
                    .location_ids
                    .iter()
                    .filter_map(|loc| self.location_ref(*loc, || format!("inventory {id}")))
                    .collect();
                Inventory::new_local(InventoryId(id), record.capacity, location_ids)
            };
            self.world.add_inventory(inventory);
        }
    }

    // -- Items --

    fn items(&mut self) -> LoadResult<()> {
        // Create everything first so placements and switch targets can point
        // at items declared later.
        let registries = self.registries;
        for (id, record) in registries.items.iter() {
            let attributes: ItemFlags = flags(&record.attributes, format!("item {id}"))?;
            let mut item = Item::new(DataId(id), attributes, labels(&record.labels), record.size);
            if let Some(writing) = &record.writing {
                item = item.with_writing(writing.clone());
            }
            if let Some(activated) = &record.activated {
                item = item.with_activated(flags(activated, format!("item {id}"))?);
            }
            self.world.add_item(item);
        }
        for (id, record) in registries.items.iter() {
            self.switch_target(id, record)?;
            self.place(id, record);
        }
        Ok(())
    }

    fn switch_target(&mut self, id: u32, record: &ItemRecord) -> LoadResult<()> {
        let Some(switch) = &record.switch else {
            return Ok(());
        };
        let context = || format!("switch of item {id}");
        let target = match switch.target {
            SwitchTargetRecord::Item(target) => {
                let flag: ItemFlags = flags(&switch.attribute, context())?;
                self.item_ref(target, context)
                    .map(|key| SwitchTarget::Item { key, flag })
            }
            SwitchTargetRecord::Location(target) => {
                let flag: LocationFlags = flags(&switch.attribute, context())?;
                self.location_ref(target, context)
                    .map(|id| SwitchTarget::Location { id, flag })
            }
        };
        let vocabulary = vocabulary(switch.on.as_deref(), switch.off.as_deref());
        let Some(key) = self.world.item_key(DataId(id)) else {
            return Ok(());
        };
        match self.world.item_mut(key).and_then(|item| item.switch_facet.as_mut()) {
            Some(facet) => {
                facet.target = target;
                facet.vocabulary = vocabulary;
            }
            None => self.diagnostics.push(Diagnostic::warning(format!(
                "item {id} declares a switch but is not switchable"
            ))),
        }
        Ok(())
    }

    fn place(&mut self, id: u32, record: &ItemRecord) {
        let Some(placement) = record.placement else {
            return;
        };
        let Some(key) = self.world.item_key(DataId(id)) else {
            return;
        };
        let Some(container) = self.container_ref(placement, || format!("placement of item {id}")) else {
            return;
        };
        if let Err(err) = self.world.insert(container, key) {
            self.error(format!("item {id} could not be placed: {err}"));
        }
    }

    // -- Commands --

    fn commands(&mut self) -> LoadResult<()> {
        let registries = self.registries;
        for (id, record) in registries.commands.iter() {
            let command = self.command(id, record)?;
            self.world.add_command(command);
        }
        Ok(())
    }

    fn command(&mut self, id: u32, record: &CommandRecord) -> LoadResult<Command> {
        let attributes: CommandFlags = flags(&record.attributes, format!("command {id}"))?;
        let mut command = Command::new(CommandId(id), record.name.to_lowercase())
            .with_attributes(attributes)
            .with_aliases(record.aliases.iter().map(|a| a.to_lowercase()))
            .with_arguments(record.arguments.iter().map(argument).collect());
        if let Some(handler) = &record.handler {
            command = command.with_handler(handler.clone());
        }
        if let Some(switch) = &record.switch {
            let attribute: PlayerFlags = flags(&switch.attribute, format!("command {id}"))?;
            command = command.with_switch(CommandSwitch {
                vocabulary: vocabulary(switch.on.as_deref(), switch.off.as_deref()),
                attribute,
            });
        }
        for entry in &record.teleport {
            let context = || format!("teleport of command {id}");
            let from = self.location_ref(entry.from, context);
            let to = self.location_ref(entry.to, context);
            if let (Some(from), Some(to)) = (from, to) {
                command = command.with_teleport(from, to);
            }
        }
        Ok(command)
    }

    // -- Events --

    fn events(&mut self) -> LoadResult<()> {
        let registries = self.registries;
        for (id, record) in registries.events.iter() {
            if let Some(event) = self.event(id, record)? {
                self.world.add_event(event);
            }
        }
        Ok(())
    }

    fn event(&mut self, id: u32, record: &EventRecord) -> LoadResult<Option<Event>> {
        let attributes: EventFlags = flags(&record.attributes, format!("event {id}"))?;
        if !self.registries.commands.contains(record.command) {
            self.error(format!(
                "event {id} refers to unknown command {}; event dropped",
                record.command
            ));
            return Ok(None);
        }

        let mut matchers: Vec<ArgMatcher> = Vec::with_capacity(record.matches.len());
        for matcher in &record.matches {
            match matcher {
                MatchRecord::Text(text) => matchers.push(ArgValue::text(text)),
                MatchRecord::Item(item) if self.registries.items.contains(*item) => {
                    matchers.push(ArgValue::Item(DataId(*item)));
                }
                MatchRecord::Item(item) => {
                    self.error(format!(
                        "event {id} matches unknown item {item}; event dropped"
                    ));
                    return Ok(None);
                }
            }
        }

        let prerequisites = record
            .prerequisites
            .iter()
            .filter_map(|pre| self.prerequisite(id, pre))
            .collect();

        let mut actions = Vec::with_capacity(record.actions.len());
        for action in &record.actions {
            if let Some(action) = self.action(id, action)? {
                actions.push(action);
            }
        }

        let outcome = Outcome {
            text: translate_positional(&record.text),
            score: record.score,
            actions,
        };
        Ok(Some(
            Event::new(EventId(id), CommandId(record.command), matchers)
                .with_attributes(attributes)
                .with_prerequisites(prerequisites)
                .with_outcome(outcome),
        ))
    }

    fn event_ref(&mut self, id: u32, event: u32) -> Option<EventId> {
        if self.registries.events.contains(event) {
            Some(EventId(event))
        } else {
            self.error(format!("event {id} refers to unknown event {event}"));
            None
        }
    }

    fn prerequisite(&mut self, id: u32, record: &PrerequisiteRecord) -> Option<Prerequisite> {
        let context = || format!("prerequisite of event {id}");
        match *record {
            PrerequisiteRecord::ItemIn { item, container } => {
                let item = self.item_ref(item, context)?;
                let container = self.container_ref(container, context)?;
                Some(Prerequisite::ItemIn { item, container })
            }
            PrerequisiteRecord::ItemHeld { item } => self
                .item_ref(item, context)
                .map(|item| Prerequisite::ItemHeld { item }),
            PrerequisiteRecord::PlayerAt { location } => self
                .location_ref(location, context)
                .map(|location| Prerequisite::PlayerAt { location }),
            PrerequisiteRecord::EventFired { event } => self
                .event_ref(id, event)
                .map(|event| Prerequisite::EventFired { event }),
            PrerequisiteRecord::EventNotFired { event } => self
                .event_ref(id, event)
                .map(|event| Prerequisite::EventNotFired { event }),
        }
    }

    fn action(&mut self, id: u32, record: &ActionRecord) -> LoadResult<Option<EventAction>> {
        let context = || format!("action of event {id}");
        let action = match record {
            ActionRecord::DestroyItem { item } => self
                .item_ref(*item, context)
                .map(|item| EventAction::DestroyItem { item }),
            ActionRecord::MoveItem { item, to } => {
                let item = self.item_ref(*item, context);
                let to = self.container_ref(*to, context);
                item.zip(to).map(|(item, to)| EventAction::MoveItem { item, to })
            }
            ActionRecord::GiveItem { item } => self
                .item_ref(*item, context)
                .map(|item| EventAction::GiveItem { item }),
            ActionRecord::ReplaceItem { old, new } => {
                let old = self.item_ref(*old, context);
                let new = self.item_ref(*new, context);
                old.zip(new).map(|(old, new)| EventAction::ReplaceItem { old, new })
            }
            ActionRecord::SetPlayerAttribute { attribute, on } => {
                Some(EventAction::SetPlayerAttribute {
                    flag: flags(attribute, context())?,
                    on: *on,
                })
            }
            ActionRecord::SetLocationAttribute {
                location,
                attribute,
                on,
            } => {
                let flag: LocationFlags = flags(attribute, context())?;
                self.location_ref(*location, context)
                    .map(|location| EventAction::SetLocationAttribute {
                        location,
                        flag,
                        on: *on,
                    })
            }
            ActionRecord::SetItemAttribute {
                item,
                attribute,
                on,
            } => {
                let flag: ItemFlags = flags(attribute, context())?;
                self.item_ref(*item, context)
                    .map(|item| EventAction::SetItemAttribute {
                        item,
                        flag,
                        on: *on,
                    })
            }
            ActionRecord::LinkDirection {
                location,
                direction: word,
                destination,
            } => {
                let dir = direction(word, *location)?;
                let location = self.location_ref(*location, context);
                let destination = match destination {
                    Some(dest) => self.location_ref(*dest, context).map(Some),
                    None => Some(None),
                };
                location
                    .zip(destination)
                    .map(|(location, destination)| EventAction::LinkDirection {
                        location,
                        direction: dir,
                        destination,
                    })
            }
            ActionRecord::DescribeLocation {
                location,
                extension,
            } => {
                let location = self.location_ref(*location, context);
                if let (Some(loc), Some(index)) = (location, extension) {
                    let available = self
                        .world
                        .location(loc)
                        .map(|l| l.labels.extended_descriptions.len())
                        .unwrap_or(0);
                    if *index >= available {
                        self.error(format!(
                            "event {id} attaches description {index} but location {loc} has {available}"
                        ));
                        return Ok(None);
                    }
                }
                location.map(|location| EventAction::DescribeLocation {
                    location,
                    extension: *extension,
                })
            }
            ActionRecord::MovePlayer { location } => self
                .location_ref(*location, context)
                .map(|location| EventAction::MovePlayer { location }),
        };
        Ok(action)
    }

    // -- Text --

    fn texts(&mut self, doc: &WorldDocument) {
        let texts = &mut self.world.texts;
        for (key, value) in &doc.responses {
            texts.responses.insert(key.clone(), translate_positional(value));
        }
        texts.hints = doc
            .hints
            .iter()
            .map(|(k, v)| (k.to_lowercase(), translate_positional(v)))
            .collect();
        texts.explanations = doc
            .explanations
            .iter()
            .map(|(k, v)| (k.to_lowercase(), translate_positional(v)))
            .collect();
        for (name, words) in &doc.inputs {
            texts.inputs.set(name, words);
        }
    }
}

fn vocabulary(on: Option<&str>, off: Option<&str>) -> SwitchInfo {
    let default = SwitchInfo::default();
    SwitchInfo::new(
        on.map(str::to_string).unwrap_or(default.on),
        off.map(str::to_string).unwrap_or(default.off),
    )
}

fn argument(record: &ArgumentRecord) -> ArgInfo {
    let source = match record.source {
        SourceRecord::Inventory => ItemSource::Inventory,
        SourceRecord::Location => ItemSource::Location,
        SourceRecord::Either => ItemSource::Either,
    };
    let mut info = if record.item {
        ArgInfo::item(source)
    } else {
        ArgInfo::text()
    };
    if !record.mandatory {
        info = info.optional();
    }
    info.with_linkers(&record.linkers)
}
