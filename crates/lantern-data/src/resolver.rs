//! Pass one: index every collection by id.

use std::collections::HashMap;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::schema::{
    CommandRecord, EventRecord, InventoryRecord, ItemRecord, LocationRecord, WorldDocument,
};

/// Records of one collection keyed by `data_id`.
///
/// A later record with a repeated id replaces the earlier one but keeps the
/// earlier one's position, so iteration order is the order in which ids first
/// appeared.
#[derive(Debug)]
pub struct Registry<'a, T> {
    order: Vec<u32>,
    records: HashMap<u32, &'a T>,
}

impl<'a, T> Registry<'a, T> {
    fn collect(
        kind: &str,
        records: &'a [T],
        id_of: impl Fn(&T) -> u32,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut registry = Self {
            order: Vec::with_capacity(records.len()),
            records: HashMap::with_capacity(records.len()),
        };
        for record in records {
            let id = id_of(record);
            if registry.records.insert(id, record).is_some() {
                diagnostics.push(Diagnostic::error(format!(
                    "duplicate {kind} id {id}; the later declaration wins"
                )));
            } else {
                registry.order.push(id);
            }
        }
        registry
    }

    /// The record with `id`.
    pub fn get(&self, id: u32) -> Option<&'a T> {
        self.records.get(&id).copied()
    }

    /// Whether `id` is declared.
    pub fn contains(&self, id: u32) -> bool {
        self.records.contains_key(&id)
    }

    /// Surviving records in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &'a T)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|r| (*id, *r)))
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the collection declared nothing.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Pass one: every collection indexed by id, plus the command name table.
#[derive(Debug)]
pub struct Registries<'a> {
    /// Location records.
    pub locations: Registry<'a, LocationRecord>,
    /// Item records.
    pub items: Registry<'a, ItemRecord>,
    /// Command records.
    pub commands: Registry<'a, CommandRecord>,
    /// Event records.
    pub events: Registry<'a, EventRecord>,
    /// Inventory records.
    pub inventories: Registry<'a, InventoryRecord>,
    /// Lowercased command name or alias to the command that owns it.
    pub command_names: HashMap<String, u32>,
    /// Duplicate ids and name clashes found while indexing.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Registries<'a> {
    /// Index the document and report duplicate ids and name clashes.
    pub fn resolve(doc: &'a WorldDocument) -> Self {
        let mut diagnostics = Vec::new();
        let locations = Registry::collect("location", &doc.locations, |r| r.data_id, &mut diagnostics);
        let items = Registry::collect("item", &doc.items, |r| r.data_id, &mut diagnostics);
        let commands = Registry::collect("command", &doc.commands, |r| r.data_id, &mut diagnostics);
        let events = Registry::collect("event", &doc.events, |r| r.data_id, &mut diagnostics);
        let inventories =
            Registry::collect("inventory", &doc.inventories, |r| r.data_id, &mut diagnostics);

        let mut command_names: HashMap<String, u32> = HashMap::new();
        for (id, record) in commands.iter() {
            let names = std::iter::once(&record.name).chain(&record.aliases);
            for name in names {
                let key = name.to_lowercase();
                match command_names.insert(key.clone(), id) {
                    Some(previous) if previous == id => diagnostics.push(Diagnostic::warning(
                        format!("command {id} declares \"{key}\" more than once"),
                    )),
                    Some(previous) => diagnostics.push(Diagnostic::error(format!(
                        "\"{key}\" is claimed by command {previous} and command {id}; command {id} wins"
                    ))),
                    None => {}
                }
            }
        }

        debug!(
            locations = locations.len(),
            items = items.len(),
            commands = commands.len(),
            events = events.len(),
            inventories = inventories.len(),
            "resolved registries"
        );

        Self {
            locations,
            items,
            commands,
            events,
            inventories,
            command_names,
            diagnostics,
        }
    }
}
