//! Argument resolution, including multi-turn completion.
//!
//! A stage receives the arguments already resolved for the command (empty on
//! a fresh command, the carried-over list when continuing) and consumes
//! tokens from the turn for the remaining slots. A missing mandatory argument
//! suspends the command on the player and asks for it; the next input then
//! resumes at the first unresolved slot.

use tracing::debug;

use lantern_core::{
    Arg, ArgInfo, Attributed, Command, CommandFlags, Direction, ItemKey, ItemSource, Transition,
    World,
};

use crate::chain::{Stage, StageResult, Turn};

/// The resolver stage for `cmd`, chosen from its flags.
pub fn resolver_for(cmd: &Command) -> Stage {
    if cmd.has_attribute(CommandFlags::MOVEMENT) {
        resolve_movement
    } else if cmd.has_attribute(CommandFlags::TELEPORT) {
        resolve_teleport
    } else if cmd.has_attribute(CommandFlags::SWITCHABLE) {
        resolve_switchable
    } else if cmd.has_attribute(CommandFlags::SWITCHING) {
        resolve_switching
    } else {
        resolve_generic
    }
}

/// Find the item a player means by `name`: one they hold first, then one at
/// their location, then any item with that name.
pub fn find_item(world: &World, name: &str) -> Option<ItemKey> {
    let candidates = world.find_items(name);
    candidates
        .iter()
        .copied()
        .find(|key| world.player_holds(*key))
        .or_else(|| candidates.iter().copied().find(|key| world.item_is_here(*key)))
        .or_else(|| candidates.first().copied())
}

/// Display text of a resolved argument.
pub fn display(world: &World, arg: &Arg) -> String {
    match arg {
        Arg::Item(key) => world.item_name(*key),
        Arg::Text(text) => text.clone(),
        Arg::Location(id) => world
            .location(*id)
            .map(|l| l.labels.shortname.clone())
            .unwrap_or_else(|| id.to_string()),
        Arg::Direction(dir) => dir.name().to_string(),
        Arg::Transition(t) => transition_word(*t).to_string(),
    }
}

/// The fixed word for a transition, used in event keys.
pub fn transition_word(transition: Transition) -> &'static str {
    match transition {
        Transition::On => "on",
        Transition::Off => "off",
        Transition::Toggle => "toggle",
    }
}

/// "verb noun linker noun ..." for a command suspended after `resolved`.
fn prompt_phrase(world: &World, verb: &str, cmd: &Command, resolved: &[Arg]) -> String {
    let mut parts = vec![verb.to_string()];
    for (index, arg) in resolved.iter().enumerate() {
        parts.push(display(world, arg));
        if let Some(linker) = cmd.arguments.get(index + 1).and_then(ArgInfo::first_linker) {
            parts.push(linker.to_string());
        }
    }
    parts.join(" ")
}

/// Check that an item satisfies the slot's source constraint.
fn check_source(turn: &Turn<'_>, info: &ArgInfo, key: ItemKey) -> Result<(), StageResult> {
    let world = &*turn.world;
    let name = vec![world.item_name(key)];
    let held = world.player_holds(key);
    let here = world.item_is_here(key);
    match info.source {
        ItemSource::Inventory if !held => Err(turn.reject("reject_not_holding", name)),
        ItemSource::Location if held => Err(turn.reject("reject_carrying", name)),
        ItemSource::Location if !here => Err(turn.reject("reject_not_here", name)),
        ItemSource::Either if !held && !here => Err(turn.reject("reject_not_here", name)),
        _ => Ok(()),
    }
}

/// Resolve the command's declared slots from `resolved.len()` onwards.
///
/// Consumes tokens from the turn. On success every mandatory slot is filled
/// and the pending state is cleared. A missing mandatory argument arms the
/// pending state and fails with a prompt; any other failure clears it.
fn resolve_slots(turn: &mut Turn<'_>, cmd: &Command, mut resolved: Vec<Arg>) -> Result<Vec<Arg>, StageResult> {
    let mut tokens = std::mem::take(&mut turn.tokens).into_iter().peekable();
    for info in cmd.arguments.iter().skip(resolved.len()) {
        if tokens.peek().is_some_and(|t| info.is_linker(t)) {
            tokens.next();
        }
        let Some(token) = tokens.next() else {
            if !info.mandatory {
                break;
            }
            let phrase = prompt_phrase(turn.world, &turn.verb, cmd, &resolved);
            debug!(command = %cmd.name, resolved = resolved.len(), "awaiting argument");
            let verb = turn.verb.clone();
            turn.world.player.set_current_command(cmd.id, verb, resolved);
            return Err(turn.reject("request_argument", vec![phrase]));
        };
        if !info.is_item {
            resolved.push(Arg::Text(token));
            continue;
        }
        let Some(key) = find_item(turn.world, &token) else {
            turn.world.player.reset_current_command();
            return Err(turn.reject("reject_unknown_item", vec![token]));
        };
        if let Err(rejection) = check_source(turn, info, key) {
            turn.world.player.reset_current_command();
            return Err(rejection);
        }
        resolved.push(Arg::Item(key));
    }
    turn.tokens = tokens.collect();
    turn.world.player.reset_current_command();
    Ok(resolved)
}

fn with_verb(turn: &Turn<'_>, cmd: &Command, mut args: Vec<Arg>) -> Vec<Arg> {
    if cmd.has_attribute(CommandFlags::VERB_IS_FIRST_ARG) {
        args.insert(0, Arg::Text(turn.verb.clone()));
    }
    args
}

/// Resolve the declared argument slots.
pub fn resolve_generic(turn: &mut Turn<'_>, cmd: &Command, args: Vec<Arg>) -> StageResult {
    match resolve_slots(turn, cmd, args) {
        Ok(resolved) => StageResult::pass(with_verb(turn, cmd, resolved)),
        Err(rejection) => rejection,
    }
}

/// Resolve the destination of a movement command. The direction comes from
/// the command name ("north") or from the first token ("go north").
pub fn resolve_movement(turn: &mut Turn<'_>, cmd: &Command, _args: Vec<Arg>) -> StageResult {
    turn.world.player.reset_current_command();
    let direction = cmd
        .direction()
        .or_else(|| turn.tokens.first().and_then(|t| Direction::parse(t)));
    let Some(direction) = direction else {
        return turn.reject("reject_no_direction", vec![]);
    };
    let destination = turn
        .world
        .location(turn.world.player.location)
        .and_then(|l| l.destination(direction));
    match destination {
        Some(dest) => StageResult::pass(vec![Arg::Location(dest), Arg::Direction(direction)]),
        None => turn.reject("reject_no_direction", vec![direction.name().to_string()]),
    }
}

/// Resolve the destination of a teleport command from the player's location.
pub fn resolve_teleport(turn: &mut Turn<'_>, cmd: &Command, _args: Vec<Arg>) -> StageResult {
    turn.world.player.reset_current_command();
    match cmd.teleport.get(&turn.world.player.location) {
        Some(dest) => StageResult::pass(vec![Arg::Location(*dest)]),
        None => turn.reject("reject_teleport", vec![]),
    }
}

/// Resolve the transition of a command that switches a player attribute.
/// No token means toggle.
pub fn resolve_switchable(turn: &mut Turn<'_>, cmd: &Command, _args: Vec<Arg>) -> StageResult {
    turn.world.player.reset_current_command();
    let Some(switch) = &cmd.switch else {
        return turn.reject("reject_not_switchable", vec![cmd.name.clone()]);
    };
    let Some(token) = turn.tokens.first() else {
        return StageResult::pass(vec![Arg::Transition(Transition::Toggle)]);
    };
    match switch.vocabulary.transition(token) {
        Some(transition) => StageResult::pass(vec![Arg::Transition(transition)]),
        None => turn.reject(
            "reject_switch_vocabulary",
            vec![
                cmd.name.clone(),
                switch.vocabulary.on.clone(),
                switch.vocabulary.off.clone(),
            ],
        ),
    }
}

/// Resolve an item and then a transition word from that item's own
/// vocabulary. No transition word means toggle.
pub fn resolve_switching(turn: &mut Turn<'_>, cmd: &Command, args: Vec<Arg>) -> StageResult {
    let resolved = match resolve_slots(turn, cmd, args) {
        Ok(resolved) => resolved,
        Err(rejection) => return rejection,
    };
    let Some(key) = resolved.first().and_then(Arg::as_item) else {
        return turn.reject("reject_not_switchable", vec![turn.verb.clone()]);
    };
    let name = turn.world.item_name(key);
    let Some(vocabulary) = turn
        .world
        .item(key)
        .and_then(|i| i.switch_facet.as_ref())
        .map(|s| s.vocabulary.clone())
    else {
        return turn.reject("reject_not_switchable", vec![name]);
    };
    let word = resolved
        .get(1)
        .and_then(Arg::as_text)
        .map(str::to_string)
        .or_else(|| turn.tokens.first().cloned());
    let transition = match word {
        Some(word) => match vocabulary.transition(&word) {
            Some(transition) => transition,
            None => {
                return turn.reject(
                    "reject_switch_vocabulary",
                    vec![name, vocabulary.on, vocabulary.off],
                );
            }
        },
        None => Transition::Toggle,
    };
    StageResult::pass(vec![Arg::Item(key), Arg::Transition(transition)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use lantern_core::{
        CommandId, CommandSwitch, ContainerRef, DataId, Inventory, InventoryId, Item, ItemFlags,
        Labels, Location, LocationId, PendingCommand, PlayerFlags, SwitchInfo,
    };

    struct Fixture {
        world: World,
        bottle: ItemKey,
        cage: ItemKey,
        rock: ItemKey,
    }

    fn fixture() -> Fixture {
        let mut world = World::new("Test", LocationId(1));
        world.add_location(
            Location::new(LocationId(1), Labels::new("hall", "hall", ""))
                .with_link(Direction::North, LocationId(2)),
        );
        world.add_location(Location::new(LocationId(2), Labels::new("yard", "yard", "")));
        world.add_inventory(Inventory::new_default(InventoryId(1), 10));
        let item = |id, name: &str| Item::new(DataId(id), ItemFlags::PORTABLE, Labels::new(name, name, ""), 1);
        let bottle = world.add_item(item(1, "bottle"));
        let cage = world.add_item(item(2, "cage"));
        let rock = world.add_item(item(3, "rock"));
        world.insert(ContainerRef::Inventory(InventoryId(1)), bottle).unwrap();
        world.insert(ContainerRef::Location(LocationId(1)), cage).unwrap();
        world.insert(ContainerRef::Location(LocationId(2)), rock).unwrap();
        Fixture { world, bottle, cage, rock }
    }

    fn insert_command() -> Command {
        Command::new(CommandId(1), "insert").with_arguments(vec![
            ArgInfo::item(ItemSource::Inventory),
            ArgInfo::item(ItemSource::Either).with_linkers(["into", "in"]),
        ])
    }

    fn resolve(world: &mut World, cmd: &Command, verb: &str, tokens: &[&str], args: Vec<Arg>) -> StageResult {
        let config = EngineConfig::default();
        let tokens = tokens.iter().map(|t| t.to_string()).collect();
        let mut turn = Turn::new(world, &config, verb, tokens);
        resolver_for(cmd)(&mut turn, cmd, args)
    }

    #[test]
    fn resolves_with_linker() {
        let mut f = fixture();
        let result = resolve(&mut f.world, &insert_command(), "insert", &["bottle", "into", "cage"], vec![]);
        assert!(result.success);
        assert_eq!(result.next, vec![Arg::Item(f.bottle), Arg::Item(f.cage)]);
        assert_eq!(f.world.player.pending, PendingCommand::Idle);
    }

    #[test]
    fn missing_argument_arms_pending_and_prompts() {
        let mut f = fixture();
        let cmd = insert_command();
        let result = resolve(&mut f.world, &cmd, "put", &["bottle"], vec![]);
        assert!(!result.success);
        assert_eq!(result.render(), "What do you want to put bottle into?");
        assert_eq!(
            f.world.player.pending,
            PendingCommand::AwaitingArgs {
                command: CommandId(1),
                verb: "put".to_string(),
                resolved: vec![Arg::Item(f.bottle)],
            }
        );
    }

    #[test]
    fn resuming_matches_single_turn() {
        let mut f = fixture();
        let cmd = insert_command();
        let single = resolve(&mut f.world, &cmd, "insert", &["bottle", "into", "cage"], vec![]);

        resolve(&mut f.world, &cmd, "insert", &["bottle"], vec![]);
        let carried = match f.world.player.current_command() {
            Some((_, _, resolved)) => resolved.to_vec(),
            None => panic!("command should be pending"),
        };
        let resumed = resolve(&mut f.world, &cmd, "insert", &["cage"], carried);
        assert_eq!(resumed, single);
        assert_eq!(f.world.player.pending, PendingCommand::Idle);
    }

    #[test]
    fn source_rejections() {
        let mut f = fixture();
        let take = Command::new(CommandId(2), "take")
            .with_arguments(vec![ArgInfo::item(ItemSource::Location)]);
        let drop = Command::new(CommandId(3), "drop")
            .with_arguments(vec![ArgInfo::item(ItemSource::Inventory)]);

        let carrying = resolve(&mut f.world, &take, "take", &["bottle"], vec![]);
        assert_eq!(carrying.render(), "You are already carrying the bottle.");
        let not_holding = resolve(&mut f.world, &drop, "drop", &["cage"], vec![]);
        assert_eq!(not_holding.render(), "You are not holding the cage.");
        let not_here = resolve(&mut f.world, &take, "take", &["rock"], vec![]);
        assert_eq!(not_here.render(), "There is no rock here.");
        let unknown = resolve(&mut f.world, &take, "take", &["unicorn"], vec![]);
        assert_eq!(unknown.render(), "I don't know what \"unicorn\" is.");
        assert!(f.world.item(f.rock).is_some());
    }

    #[test]
    fn failure_clears_pending() {
        let mut f = fixture();
        let cmd = insert_command();
        resolve(&mut f.world, &cmd, "insert", &["bottle"], vec![]);
        let result = resolve(&mut f.world, &cmd, "insert", &["unicorn"], vec![Arg::Item(f.bottle)]);
        assert!(!result.success);
        assert_eq!(f.world.player.pending, PendingCommand::Idle);
    }

    #[test]
    fn verb_is_first_arg() {
        let mut f = fixture();
        let cmd = Command::new(CommandId(4), "shout")
            .with_attributes(CommandFlags::VERB_IS_FIRST_ARG)
            .with_arguments(vec![ArgInfo::text().optional()]);
        let result = resolve(&mut f.world, &cmd, "yell", &["hello"], vec![]);
        assert_eq!(
            result.next,
            vec![Arg::Text("yell".to_string()), Arg::Text("hello".to_string())]
        );
    }

    #[test]
    fn movement_from_name_or_token() {
        let mut f = fixture();
        let north = Command::new(CommandId(5), "north").with_attributes(CommandFlags::MOVEMENT);
        let go = Command::new(CommandId(6), "go")
            .with_attributes(CommandFlags::MOVEMENT)
            .with_arguments(vec![ArgInfo::text()]);

        let by_name = resolve(&mut f.world, &north, "n", &[], vec![]);
        assert_eq!(by_name.next[0], Arg::Location(LocationId(2)));
        let by_token = resolve(&mut f.world, &go, "go", &["north"], vec![]);
        assert_eq!(by_token.next[0], Arg::Location(LocationId(2)));
        let nowhere = resolve(&mut f.world, &go, "go", &["south"], vec![]);
        assert!(!nowhere.success);
    }

    #[test]
    fn teleport_uses_current_location() {
        let mut f = fixture();
        let cmd = Command::new(CommandId(7), "xyzzy")
            .with_attributes(CommandFlags::TELEPORT)
            .with_teleport(LocationId(2), LocationId(1));
        assert!(!resolve(&mut f.world, &cmd, "xyzzy", &[], vec![]).success);
        f.world.player.move_to(LocationId(2));
        let result = resolve(&mut f.world, &cmd, "xyzzy", &[], vec![]);
        assert_eq!(result.next, vec![Arg::Location(LocationId(1))]);
    }

    #[test]
    fn switchable_vocabulary() {
        let mut f = fixture();
        let cmd = Command::new(CommandId(8), "verbose")
            .with_attributes(CommandFlags::SWITCHABLE)
            .with_switch(CommandSwitch {
                vocabulary: SwitchInfo::default(),
                attribute: PlayerFlags::VERBOSE,
            });
        let on = resolve(&mut f.world, &cmd, "verbose", &["on"], vec![]);
        assert_eq!(on.next, vec![Arg::Transition(Transition::On)]);
        let toggle = resolve(&mut f.world, &cmd, "verbose", &[], vec![]);
        assert_eq!(toggle.next, vec![Arg::Transition(Transition::Toggle)]);
        let bad = resolve(&mut f.world, &cmd, "verbose", &["loudly"], vec![]);
        assert_eq!(bad.render(), "You can switch the verbose \"on\" or \"off\".");
    }
}
