use tracing::debug;

use lantern_core::{Arg, Command, LocationId};

use crate::chain::{StageResult, Turn};
use crate::vision;

/// Walk along the resolved direction link. An obstruction at the current
/// location only lets the player back the way they came.
pub fn go(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(destination) = args.first().and_then(Arg::as_location) else {
        return turn.reject("reject_no_direction", vec![]);
    };
    if let Some(obstruction) = turn.world.obstruction_here() {
        if turn.world.player.previous_location != Some(destination) {
            let name = turn.world.item_name(obstruction);
            return turn.reject("reject_obstruction", vec![name]);
        }
    }
    arrive(turn, destination, args)
}

/// Jump to the resolved teleport destination.
pub fn teleport(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    match args.first().and_then(Arg::as_location) {
        Some(destination) => arrive(turn, destination, args),
        None => turn.reject("reject_teleport", vec![]),
    }
}

/// Move the player to `destination` and describe what they find.
///
/// Arriving somewhere without air kills the player. Arriving in darkness
/// kills them too unless a link leads straight back to where they came from.
pub fn arrive(turn: &mut Turn<'_>, destination: LocationId, args: Vec<Arg>) -> StageResult {
    let origin = turn.world.player.location;
    turn.world.player.move_to(destination);
    debug!(from = %origin, to = %destination, "player moved");

    if !turn.world.player_has_air_at(destination) && turn.world.player.die() {
        turn.death_narrated = true;
        return turn.ok("death_drowning", vec![], args);
    }

    if !turn.world.player_can_see() {
        let way_back = turn
            .world
            .location(destination)
            .is_some_and(|l| l.exit_to(origin));
        if !way_back && turn.world.player.die() {
            turn.death_narrated = true;
            return turn.ok("death_darkness", vec![], args);
        }
        turn.could_see = false;
        return turn.ok("describe_dark", vec![], args);
    }

    let unvisited = turn
        .world
        .location(destination)
        .is_some_and(|l| !l.visited);
    let full = turn.world.player.is_verbose() || unvisited;
    turn.could_see = true;
    let text = vision::look_around(turn.world, full);
    StageResult::ok("{0}", vec![text], args)
}
