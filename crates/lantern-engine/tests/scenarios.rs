//! Whole-game scenarios played against the bundled cavern world.

use lantern_core::{ContainerRef, LocationId};
use lantern_engine::{EngineConfig, GameSession, load_str};

const CAVERN: &str = include_str!("../../../worlds/cavern.json");

fn session() -> GameSession {
    let loaded = load_str(CAVERN).unwrap();
    assert!(
        !loaded.has_errors(),
        "cavern world has errors: {:?}",
        loaded.diagnostics
    );
    GameSession::new(loaded.world, EngineConfig::default()).unwrap()
}

fn play(session: &mut GameSession, lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| session.process_input(line)).collect()
}

fn transcript(session: &mut GameSession, lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| format!("> {line}\n{}", session.process_input(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn cavern_loads_without_diagnostics() {
    let loaded = load_str(CAVERN).unwrap();
    assert!(loaded.diagnostics.is_empty(), "{:?}", loaded.diagnostics);
    assert_eq!(loaded.world.name, "Cavern");
}

#[test]
fn opening_describes_the_road() {
    let mut session = session();
    let opening = session.start_message();
    assert!(opening.starts_with("Welcome to the Cavern."));
    assert!(opening.contains("You are standing at the end of a road before a small brick building."));
    assert!(opening.contains("There is a lever (down) here."));
    assert!(opening.ends_with("Exits: north, east, down."));
}

#[test]
fn short_walk_transcript() {
    let mut session = session();
    let text = transcript(
        &mut session,
        &["look", "take cage", "north", "take lamp", "inventory"],
    );
    insta::assert_snapshot!(text, @r"
    > look
    You are standing at the end of a road before a small brick building.
    There is a wire cage here.
    There is a little bird here.
    There is a black rod here.
    There is a wooden sign here.
    There is a lever (down) here.
    Exits: north, east, down.
    > take cage
    Taken.
    > north
    You are inside a building, a well house for a large spring.
    There is a brass lamp (off) here.
    There is a glass bottle here.
    Exits: south.
    > take lamp
    Taken.
    > inventory
    You are carrying:
      a wire cage
      a brass lamp (off)
    ");
}

#[test]
fn wandering_in_the_dark_is_fatal() {
    let mut session = session();
    assert_eq!(session.process_input("down"), "It is pitch dark.");
    assert_eq!(
        session.process_input("down"),
        "You stumble around in the dark and fall into a pit. You are dead.\nDo you want to be reincarnated?"
    );
    assert!(!session.player().alive);
    assert_eq!(session.process_input("no"), "Rest in peace.");
    assert!(!session.is_running());
    assert_eq!(session.process_input("look"), "The game is over.");
}

#[test]
fn commands_needing_light_fail_in_the_dark() {
    let mut session = session();
    session.start_message();
    session.process_input("down");
    assert_eq!(session.process_input("read sign"), "It is too dark to see.");
    assert_eq!(session.player().score, 0);
    assert_eq!(session.process_input("up"), "the end of the road\nThere is a wire cage here.\nThere is a little bird here.\nThere is a black rod here.\nThere is a wooden sign here.\nThere is a lever (down) here.");
}

#[test]
fn reading_the_sign_scores_once() {
    let mut session = session();
    assert_eq!(
        session.process_input("read sign"),
        "It reads: \"Beware of the pit below the chamber.\""
    );
    session.process_input("read sign");
    assert_eq!(session.player().score, 1);
}

#[test]
fn containers_only_take_smaller_items() {
    let mut session = session();
    let replies = play(
        &mut session,
        &["take cage", "take rod", "put rod into cage", "put bird in cage"],
    );
    assert_eq!(
        replies,
        vec![
            "Taken.",
            "Taken.",
            "The rod does not fit in the cage.",
            "You put the bird into the cage.",
        ]
    );
    assert_eq!(
        session.process_input("inventory"),
        "You are carrying:\n  a wire cage containing a little bird\n  a black rod"
    );
}

#[test]
fn missing_argument_is_asked_for() {
    let mut split = session();
    split.process_input("take cage");
    assert_eq!(
        split.process_input("put bird"),
        "What do you want to put bird into?"
    );
    let continued = split.process_input("cage");

    let mut single = session();
    single.process_input("take cage");
    let direct = single.process_input("put bird into cage");

    assert_eq!(continued, direct);
    assert_eq!(continued, "You put the bird into the cage.");
}

#[test]
fn rubbing_the_lamp_summons_the_genie() {
    let mut session = session();
    play(&mut session, &["north", "take lamp"]);
    assert_eq!(
        session.process_input("rub lamp"),
        "As you rub the lamp, it dissolves into smoke and a genie stands before you."
    );
    assert_eq!(session.player().score, 5);
    let world = session.world();
    let genie = world.find_items("genie")[0];
    assert!(world.player_holds(genie));
    assert!(world.find_items("lamp").iter().all(|lamp| !world.player_holds(*lamp)));
    assert_eq!(session.process_input("rub lamp"), "You are not holding the lamp.");
}

#[test]
fn lamp_lights_the_way() {
    let mut session = session();
    play(&mut session, &["north", "take lamp", "south"]);
    assert_eq!(session.process_input("switch lamp on"), "The lamp is now on.");
    let below = session.process_input("down");
    assert!(below.starts_with("You are in a damp chamber."));
    assert!(below.ends_with("Exits: up, down."));
    assert_eq!(session.process_input("switch lamp off"), "The lamp is now off.\nIt is pitch dark.");
}

#[test]
fn lever_lights_the_chamber() {
    let mut session = session();
    assert_eq!(
        session.process_input("switch lever on"),
        "You can switch the lever \"up\" or \"down\"."
    );
    assert_eq!(
        session.process_input("switch lever up"),
        "The lever creaks into place. Somewhere below, torches flare."
    );
    assert_eq!(
        session.process_input("down"),
        "You are in a damp chamber. Water drips from the ceiling. A faint draft rises from a crack in the floor.\nExits: up, down."
    );
}

#[test]
fn water_is_bottled_and_drunk() {
    let mut session = session();
    play(&mut session, &["north", "take bottle", "south", "east"]);
    assert_eq!(
        session.process_input("put water into bottle"),
        "You put the water into the bottle."
    );
    let world = session.world();
    let lake = world.contents(ContainerRef::Location(LocationId(5)));
    assert_eq!(lake.len(), 1);
    assert_eq!(world.item_name(lake[0]), "water");

    assert_eq!(session.process_input("drink water"), "You consume the water.");
    assert_eq!(
        session.process_input("inventory"),
        "You are carrying:\n  a glass bottle"
    );
}

#[test]
fn refilling_the_bottle_does_not_grow_the_world() {
    let mut session = session();
    play(&mut session, &["north", "take bottle", "south", "east"]);
    play(&mut session, &["put water into bottle", "drink water"]);
    let items = session.world().items().count();

    for _ in 0..50 {
        let replies = play(&mut session, &["put water into bottle", "drink water"]);
        assert_eq!(replies, vec!["You put the water into the bottle.", "You consume the water."]);
    }
    assert_eq!(session.world().items().count(), items);
    assert_eq!(session.world().find_items("water").len(), 1);
}

#[test]
fn typos_and_secret_words() {
    let mut session = session();
    assert_eq!(
        session.process_input("inventroy"),
        "I don't understand \"inventroy\". Did you mean \"inventory\"?"
    );
    assert!(!session.process_input("commands").contains("xyzzy"));
    session.process_input("xyzzy");
    assert_eq!(session.player().location, LocationId(2));
    session.process_input("xyzzy");
    assert_eq!(session.player().location, LocationId(1));
}

#[test]
fn reincarnation_restores_play() {
    let mut session = session();
    play(&mut session, &["read sign", "down", "down"]);
    let reborn = session.process_input("yes");
    assert!(reborn.starts_with("You are reincarnated.\n"));
    assert!(session.player().alive);
    assert!(session.is_running());
    assert_eq!(session.process_input("score"), "You have scored 0 points in 4 moves.");
}

#[test]
fn verbose_mode_repeats_full_descriptions() {
    let mut session = session();
    assert_eq!(session.process_input("verbose"), "Verbose is now on.");
    play(&mut session, &["north", "south"]);
    let again = session.process_input("north");
    assert!(again.starts_with("You are inside a building"));
}
