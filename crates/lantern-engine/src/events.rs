//! Scripted events.
//!
//! After the handler ran, the command and its resolved arguments form an
//! [`EventKey`]. Of the events registered under that key, the first one that
//! is still armed and whose prerequisites all hold fires: its actions mutate
//! the world, its score is awarded, and its text (when it has any) replaces
//! everything the chain said so far. Actions apply all or nothing.

use tracing::{debug, warn};

use lantern_core::{
    Arg, ArgValue, Attributed, Command, ContainerRef, CoreError, CoreResult, EventAction,
    EventFlags, EventId, EventKey, Prerequisite, World,
};

use crate::arguments::{display, transition_word};
use crate::chain::{StageResult, Turn};

/// The event-key value of a resolved argument. Locations and directions
/// never take part in matching.
pub fn event_value(world: &World, arg: &Arg) -> Option<ArgValue> {
    match arg {
        Arg::Item(key) => world.item(*key).map(|item| ArgValue::Item(item.data_id)),
        Arg::Text(text) => Some(ArgValue::text(text)),
        Arg::Transition(t) => Some(ArgValue::text(transition_word(*t))),
        Arg::Location(_) | Arg::Direction(_) => None,
    }
}

/// The key under which events for this command invocation are registered.
pub fn event_key(world: &World, cmd: &Command, args: &[Arg]) -> EventKey {
    EventKey {
        command: cmd.id,
        args: args.iter().filter_map(|a| event_value(world, a)).collect(),
    }
}

/// Whether a single prerequisite holds.
pub fn holds(world: &World, prerequisite: &Prerequisite) -> bool {
    match prerequisite {
        Prerequisite::ItemIn { item, container } => world.contains(*container, *item),
        Prerequisite::ItemHeld { item } => world.player_holds(*item),
        Prerequisite::PlayerAt { location } => world.player.location == *location,
        Prerequisite::EventFired { event } => world.event(*event).is_some_and(|e| e.fired),
        Prerequisite::EventNotFired { event } => world.event(*event).is_none_or(|e| !e.fired),
    }
}

/// The event that would fire for `key` right now.
pub fn ready_event(world: &World, key: &EventKey) -> Option<EventId> {
    world.events_for(key).iter().copied().find(|id| {
        world
            .event(*id)
            .is_some_and(|e| e.is_armed() && e.prerequisites.iter().all(|p| holds(world, p)))
    })
}

/// Perform one event action.
pub fn apply(world: &mut World, action: &EventAction) -> CoreResult<()> {
    match action {
        EventAction::DestroyItem { item } => world.destroy(*item),
        EventAction::MoveItem { item, to } => world.insert(*to, *item),
        EventAction::GiveItem { item } => match world.current_inventory() {
            Some(inventory) => world.insert(ContainerRef::Inventory(inventory), *item),
            None => {
                warn!(item = %item, "no inventory to give the item to");
                Ok(())
            }
        },
        EventAction::ReplaceItem { old, new } => {
            let container = world.item(*old).ok_or(CoreError::ItemNotFound(*old))?.container();
            world.destroy(*old)?;
            match container {
                Some(container) => world.insert(container, *new),
                None => Ok(()),
            }
        }
        EventAction::SetPlayerAttribute { flag, on } => {
            world.player.attributes.set(*flag, *on);
            Ok(())
        }
        EventAction::SetLocationAttribute { location, flag, on } => {
            world
                .location_mut(*location)
                .ok_or(CoreError::LocationNotFound(*location))?
                .attributes
                .set(*flag, *on);
            Ok(())
        }
        EventAction::SetItemAttribute { item, flag, on } => {
            world
                .item_mut(*item)
                .ok_or(CoreError::ItemNotFound(*item))?
                .attributes
                .set(*flag, *on);
            Ok(())
        }
        EventAction::LinkDirection {
            location,
            direction,
            destination,
        } => world.relink(*location, *direction, *destination),
        EventAction::DescribeLocation {
            location,
            extension,
        } => {
            world
                .location_mut(*location)
                .ok_or(CoreError::LocationNotFound(*location))?
                .labels
                .extension = *extension;
            Ok(())
        }
        EventAction::MovePlayer { location } => {
            if world.location(*location).is_none() {
                return Err(CoreError::LocationNotFound(*location));
            }
            world.player.move_to(*location);
            Ok(())
        }
    }
}

/// Perform every action or, when one fails, none of them.
pub fn apply_all(world: &mut World, actions: &[EventAction]) -> CoreResult<()> {
    if actions.is_empty() {
        return Ok(());
    }
    let mut staged = world.clone();
    for action in actions {
        apply(&mut staged, action)?;
    }
    *world = staged;
    Ok(())
}

/// Fire the matching event, if any. An event whose actions cannot all be
/// performed does not fire.
pub fn resolve_events(turn: &mut Turn<'_>, cmd: &Command, args: Vec<Arg>) -> StageResult {
    let key = event_key(turn.world, cmd, &args);
    let Some(id) = ready_event(turn.world, &key) else {
        return StageResult::pass(args);
    };
    let Some(event) = turn.world.event(id) else {
        return StageResult::pass(args);
    };
    let outcome = event.outcome.clone();
    let kills = event.has_attribute(EventFlags::KILLS_PLAYER);
    debug!(event = %id, command = %cmd.name, "event fires");

    if let Err(err) = apply_all(turn.world, &outcome.actions) {
        warn!(event = %id, error = %err, "event action failed, event withheld");
        return StageResult::pass(args);
    }
    turn.world.player.score = turn.world.player.score.saturating_add(outcome.score);
    if let Some(event) = turn.world.event_mut(id) {
        event.fired = true;
    }
    if kills && turn.world.player.die() && !outcome.text.is_empty() {
        turn.death_narrated = true;
    }

    if outcome.text.is_empty() {
        return StageResult::pass(args);
    }
    let content = args.iter().map(|a| display(turn.world, a)).collect();
    StageResult::ok(outcome.text, content, args).overriding()
}
