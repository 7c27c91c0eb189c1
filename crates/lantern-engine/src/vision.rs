//! Light: the stages that guard and follow commands by visibility, and the
//! location description shared by movement and `look`.

use lantern_core::{Arg, Command, ContainerRef, World};

use crate::chain::{StageResult, Turn};

/// Describe the player's location, or the darkness.
///
/// A full description is the location text, one line per item lying there,
/// and the exits. A brief one is the location's long name plus the items.
pub fn describe_location(world: &World, full: bool) -> String {
    let responses = &world.texts.responses;
    if !world.player_can_see() {
        return responses.get("describe_dark").to_string();
    }
    let here = world.player.location;
    let Some(location) = world.location(here) else {
        return String::new();
    };

    let mut lines = Vec::new();
    let description = location.labels.full_description();
    if full && !description.is_empty() {
        lines.push(description);
    } else {
        lines.push(location.labels.longname.clone());
    }
    for item in world.contents(ContainerRef::Location(here)) {
        lines.push(responses.format("describe_item_here", &[world.list_name(item)]));
    }
    let exits = location.exit_names();
    if full && !exits.is_empty() {
        lines.push(responses.format("describe_exits", &[exits.join(", ")]));
    }
    lines.join("\n")
}

/// Describe the location and remember it as visited when the player can see.
pub fn look_around(world: &mut World, full: bool) -> String {
    let text = describe_location(world, full);
    if world.player_can_see() {
        let here = world.player.location;
        if let Some(location) = world.location_mut(here) {
            location.visited = true;
        }
    }
    text
}

/// Refuse the command in the dark.
pub fn require_vision(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    if turn.world.player_can_see() {
        StageResult::pass(args)
    } else {
        turn.reject("reject_too_dark", vec![])
    }
}

/// Report a change in light caused by the handler: the surroundings when
/// they became visible, the darkness when the light went out.
pub fn post_vision(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let sees = turn.world.player_can_see();
    if sees == turn.could_see {
        return StageResult::pass(args);
    }
    turn.could_see = sees;
    let text = look_around(turn.world, true);
    StageResult::ok("{0}", vec![text], args)
}
