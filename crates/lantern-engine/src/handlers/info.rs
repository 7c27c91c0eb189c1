use std::collections::BTreeMap;

use lantern_core::{Arg, Command, ContainerRef};

use super::item_arg;
use crate::chain::{StageResult, Turn};
use crate::vision;

/// Describe the surroundings in full.
pub fn look(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let text = vision::look_around(turn.world, true);
    StageResult::ok("{0}", vec![text], args)
}

/// Describe an item and what it holds.
pub fn describe(turn: &mut Turn<'_>, cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return look(turn, cmd, args);
    };
    let world = &*turn.world;
    let Some(item) = world.item(key) else {
        return turn.reject("nothing_happens", vec![]);
    };
    let mut text = item.labels.full_description();
    if text.is_empty() {
        text = item.labels.longname.clone();
    }
    if let Some(inner) = item.contents() {
        let contents = world.texts.responses.format(
            "describe_contents",
            &[item.labels.shortname.clone(), world.list_name(inner)],
        );
        text = format!("{text}\n{contents}");
    }
    StageResult::ok("{0}", vec![text], args)
}

/// Read what is written on an item.
pub fn read(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return turn.reject("nothing_happens", vec![]);
    };
    match turn.world.item(key).and_then(|i| i.writing.clone()) {
        Some(writing) => turn.ok("describe_writing", vec![writing], args),
        None => turn.reject("reject_no_writing", vec![turn.world.item_name(key)]),
    }
}

/// List what the player carries.
pub fn inventory(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let world = &*turn.world;
    let carried = world
        .current_inventory()
        .map(|inv| world.contents(ContainerRef::Inventory(inv)))
        .unwrap_or_default();
    if carried.is_empty() {
        return turn.ok("inventory_empty", vec![], args);
    }
    let lines: Vec<String> = carried
        .into_iter()
        .map(|key| format!("  {}", world.list_name(key)))
        .collect();
    turn.ok("inventory_list", vec![lines.join("\n")], args)
}

/// Report the score.
pub fn score(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let player = &turn.world.player;
    let content = vec![player.score.to_string(), player.instructions.to_string()];
    turn.ok("describe_score", content, args)
}

/// General instructions.
pub fn help(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    turn.ok("describe_help", vec![], args)
}

/// A hint on a topic.
pub fn hint(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let hints = turn.world.texts.hints.clone();
    topic_lookup(turn, args, &hints, "reject_no_hint")
}

/// An explanation of a topic.
pub fn explain(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let explanations = turn.world.texts.explanations.clone();
    topic_lookup(turn, args, &explanations, "reject_no_explanation")
}

/// Look a topic up in `table`. No topic lists the known ones.
fn topic_lookup(
    turn: &mut Turn<'_>,
    args: Vec<Arg>,
    table: &BTreeMap<String, String>,
    missing: &str,
) -> StageResult {
    let topic = args
        .iter()
        .find_map(Arg::as_text)
        .map(str::to_string)
        .or_else(|| (!turn.tokens.is_empty()).then(|| turn.tokens.join(" ")))
        .map(|t| t.to_lowercase());
    let Some(topic) = topic else {
        let topics: Vec<&str> = table.keys().map(String::as_str).collect();
        return turn.ok("describe_topics", vec![topics.join(", ")], args);
    };
    match table.get(&topic) {
        Some(text) => StageResult::ok(text.clone(), vec![topic], args),
        None => turn.reject(missing, vec![topic]),
    }
}

/// List the verbs the player may use.
pub fn commands(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let mut names: Vec<String> = turn
        .world
        .commands()
        .filter(|cmd| !cmd.is_secret())
        .map(|cmd| cmd.name.clone())
        .collect();
    names.sort();
    names.dedup();
    turn.ok("describe_commands", vec![names.join(", ")], args)
}

/// End the game.
pub fn quit(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let player = &mut turn.world.player;
    player.playing = false;
    player.reset_current_command();
    let content = vec![player.score.to_string(), player.instructions.to_string()];
    turn.ok("confirm_quit", content, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Stage;
    use crate::config::EngineConfig;
    use lantern_core::{
        CommandFlags, CommandId, DataId, Inventory, InventoryId, Item, ItemFlags, Labels,
        Location, LocationFlags, LocationId, World,
    };

    fn world() -> World {
        let mut world = World::new("Test", LocationId(1));
        world.add_location(
            Location::new(LocationId(1), Labels::new("hall", "hall", "A hall."))
                .with_attributes(LocationFlags::GIVES_LIGHT),
        );
        world.add_inventory(Inventory::new_default(InventoryId(1), 10));
        world.texts.hints.insert("lamp".to_string(), "Try rubbing the {0}.".to_string());
        world
    }

    fn run(world: &mut World, stage: Stage, tokens: &[&str], args: Vec<Arg>) -> StageResult {
        let config = EngineConfig::default();
        let cmd = Command::new(CommandId(1), "test");
        let tokens = tokens.iter().map(|t| t.to_string()).collect();
        let mut turn = Turn::new(world, &config, "test", tokens);
        stage(&mut turn, &cmd, args)
    }

    #[test]
    fn inventory_lists_state() {
        let mut world = world();
        assert_eq!(run(&mut world, inventory, &[], vec![]).render(), "You are not carrying anything.");

        let flags = ItemFlags::PORTABLE | ItemFlags::CONTAINER | ItemFlags::HOLDS_SOLIDS;
        let sack = world.add_item(Item::new(DataId(1), flags, Labels::new("sack", "a sack", ""), 4));
        let coin = world.add_item(Item::new(DataId(2), ItemFlags::PORTABLE, Labels::new("coin", "a coin", ""), 1));
        world.insert(ContainerRef::Inventory(InventoryId(1)), sack).unwrap();
        world.insert(ContainerRef::Item(sack), coin).unwrap();

        assert_eq!(
            run(&mut world, inventory, &[], vec![]).render(),
            "You are carrying:\n  a sack containing a coin"
        );
        assert_eq!(
            run(&mut world, describe, &[], vec![Arg::Item(sack)]).render(),
            "a sack\nThe sack contains a coin."
        );
    }

    #[test]
    fn read_writing() {
        let mut world = world();
        let note = world.add_item(
            Item::new(DataId(1), ItemFlags::PORTABLE, Labels::new("note", "a note", ""), 1)
                .with_writing("Beware"),
        );
        let rock = world.add_item(Item::new(DataId(2), ItemFlags::PORTABLE, Labels::new("rock", "a rock", ""), 1));
        assert_eq!(run(&mut world, read, &[], vec![Arg::Item(note)]).render(), "It reads: \"Beware\"");
        assert_eq!(
            run(&mut world, read, &[], vec![Arg::Item(rock)]).render(),
            "There is nothing written on the rock."
        );
    }

    #[test]
    fn hints_by_topic() {
        let mut world = world();
        assert_eq!(run(&mut world, hint, &["LAMP"], vec![]).render(), "Try rubbing the lamp.");
        assert_eq!(run(&mut world, hint, &[], vec![]).render(), "You can ask about: lamp.");
        assert_eq!(run(&mut world, hint, &["troll"], vec![]).render(), "There is no hint about \"troll\".");
        assert!(!run(&mut world, explain, &["lamp"], vec![]).success);
    }

    #[test]
    fn command_listing_hides_secrets() {
        let mut world = world();
        world.add_command(Command::new(CommandId(1), "take"));
        world.add_command(Command::new(CommandId(2), "drop"));
        world.add_command(Command::new(CommandId(3), "xyzzy").with_attributes(CommandFlags::SECRET));
        assert_eq!(
            run(&mut world, commands, &[], vec![]).render(),
            "I know these verbs: drop, take."
        );
    }

    #[test]
    fn quit_stops_play() {
        let mut world = world();
        world.player.score = 7;
        world.player.instructions = 3;
        assert_eq!(
            run(&mut world, quit, &[], vec![]).render(),
            "You scored 7 points in 3 moves. Goodbye."
        );
        assert!(!world.player.playing);
    }
}
