//! The last stage of every chain: death bookkeeping.

use tracing::{info, warn};

use lantern_core::{Arg, Command, ContainerRef};

use crate::chain::{StageResult, Turn};

/// If the player died during this turn, scatter what they carried at the
/// place of death and ask whether they want to be reincarnated.
pub fn check_life(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    if turn.world.player.alive {
        return StageResult::pass(args);
    }
    let here = turn.world.player.location;
    info!(location = %here, "player died");

    let carried = turn
        .world
        .current_inventory()
        .map(|inv| turn.world.contents(ContainerRef::Inventory(inv)))
        .unwrap_or_default();
    for key in carried {
        if let Some(wear) = turn.world.item_mut(key).and_then(|i| i.wear_facet.as_mut()) {
            wear.worn = false;
        }
        if let Err(err) = turn.world.insert(ContainerRef::Location(here), key) {
            warn!(item = %key, error = %err, "could not drop item at place of death");
        }
    }
    turn.world.player.reset_current_command();

    let mut lines = Vec::new();
    if !turn.death_narrated {
        lines.push(turn.text("death_generic"));
    }
    lines.push(turn.text("reincarnation_prompt"));
    StageResult::ok("{0}", vec![lines.join(&turn.config.separator)], args)
}
