use lantern_core::{Arg, Attributed, Command, Transition};

use super::item_arg;
use crate::chain::{StageResult, Turn};

/// Switch an item. The state lives on the item's target, which may be the
/// item itself, another item, or a location.
pub fn switch(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return turn.reject("nothing_happens", vec![]);
    };
    let name = turn.world.item_name(key);
    let transition = args
        .get(1)
        .and_then(Arg::as_transition)
        .unwrap_or(Transition::Toggle);
    let (Some(vocabulary), Ok(current)) = (
        turn.world
            .item(key)
            .and_then(|i| i.switch_facet.as_ref())
            .map(|s| s.vocabulary.clone()),
        turn.world.is_switched_on(key),
    ) else {
        return turn.reject("reject_not_switchable", vec![name]);
    };

    let redundant = matches!(
        (transition, current),
        (Transition::On, true) | (Transition::Off, false)
    );
    if redundant {
        let state = vocabulary.text_for(current).to_string();
        return turn.reject("reject_already_switched", vec![name, state]);
    }
    match turn.world.switch(key, transition) {
        Ok(state) => {
            let state = vocabulary.text_for(state).to_string();
            turn.ok("confirm_switched", vec![name, state], args)
        }
        Err(_) => turn.reject("reject_not_switchable", vec![name]),
    }
}

/// Switch the player attribute named by the command ("verbose off").
pub fn set_player(turn: &mut Turn<'_>, cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(switch) = &cmd.switch else {
        return turn.reject("reject_not_switchable", vec![cmd.name.clone()]);
    };
    let transition = args
        .first()
        .and_then(Arg::as_transition)
        .unwrap_or(Transition::Toggle);
    let player = &mut turn.world.player;
    let state = transition.apply(player.has_attribute(switch.attribute));
    player.attributes.set(switch.attribute, state);
    let state = switch.vocabulary.text_for(state).to_string();
    turn.ok("confirm_player_switched", vec![capitalize(&cmd.name), state], args)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
