//! Pass three: invariants that span collections.

use std::collections::BTreeMap;

use lantern_core::{Attributed, Command, CommandFlags, ItemFlags, LocationId, World};

use crate::diagnostics::Diagnostic;

/// Check the built world and report every violation found.
pub fn validate(world: &World) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    commands(world, &mut diagnostics);
    inventories(world, &mut diagnostics);
    items(world, &mut diagnostics);
    diagnostics
}

/// Report commands for which `resolves` finds no handler. Such commands run
/// as no-ops and only produce text through events.
pub fn check_handlers(world: &World, resolves: impl Fn(&Command) -> bool) -> Vec<Diagnostic> {
    world
        .commands()
        .filter(|cmd| !resolves(cmd))
        .map(|cmd| {
            Diagnostic::warning(format!(
                "command {} ({}) uses unknown handler \"{}\"",
                cmd.id, cmd.name, cmd.handler
            ))
        })
        .collect()
}

fn commands(world: &World, diagnostics: &mut Vec<Diagnostic>) {
    for cmd in world.commands() {
        let teleport = cmd.has_attribute(CommandFlags::TELEPORT);
        if teleport && cmd.teleport.is_empty() {
            diagnostics.push(Diagnostic::error(format!(
                "teleport command {} ({}) has no teleport entries",
                cmd.id, cmd.name
            )));
        }
        if !teleport && !cmd.teleport.is_empty() {
            diagnostics.push(Diagnostic::error(format!(
                "command {} ({}) has teleport entries but is not a teleport command",
                cmd.id, cmd.name
            )));
        }

        let switchable = cmd.has_attribute(CommandFlags::SWITCHABLE);
        if switchable && cmd.switch.is_none() {
            diagnostics.push(Diagnostic::error(format!(
                "switchable command {} ({}) has no switch info",
                cmd.id, cmd.name
            )));
        }
        if !switchable && cmd.switch.is_some() {
            diagnostics.push(Diagnostic::error(format!(
                "command {} ({}) has switch info but is not switchable",
                cmd.id, cmd.name
            )));
        }

        if cmd.has_attribute(CommandFlags::SWITCHING)
            && !cmd.arguments.first().is_some_and(|arg| arg.is_item)
        {
            diagnostics.push(Diagnostic::warning(format!(
                "switching command {} ({}) does not take an item",
                cmd.id, cmd.name
            )));
        }

        if cmd.has_attribute(CommandFlags::MOVEMENT)
            && cmd.direction().is_none()
            && cmd.arguments.is_empty()
        {
            diagnostics.push(Diagnostic::warning(format!(
                "movement command {} ({}) has no direction",
                cmd.id, cmd.name
            )));
        }
    }
}

fn inventories(world: &World, diagnostics: &mut Vec<Diagnostic>) {
    let defaults = world.inventories().filter(|inv| inv.default).count();
    if defaults != 1 {
        diagnostics.push(Diagnostic::error(format!(
            "expected exactly one default inventory, found {defaults}"
        )));
    }

    let mut bound: BTreeMap<LocationId, u32> = BTreeMap::new();
    for inv in world.inventories().filter(|inv| !inv.default) {
        if inv.location_ids.is_empty() {
            diagnostics.push(Diagnostic::error(format!(
                "inventory {} is not the default and has no locations",
                inv.id
            )));
        }
        for location in &inv.location_ids {
            if let Some(other) = bound.insert(*location, inv.id.0) {
                diagnostics.push(Diagnostic::warning(format!(
                    "location {location} is bound to inventory {other} and inventory {}",
                    inv.id
                )));
            }
        }
    }
}

fn items(world: &World, diagnostics: &mut Vec<Diagnostic>) {
    for (_, item) in world.items() {
        let untargeted = item.has_attribute(ItemFlags::SWITCHABLE)
            && item.switch_facet.as_ref().is_none_or(|s| s.target.is_none());
        if untargeted {
            diagnostics.push(Diagnostic::error(format!(
                "switchable item {} ({}) has no switch target",
                item.data_id, item.labels.shortname
            )));
        }
    }
}
