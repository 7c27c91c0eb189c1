//! Command handlers: the stage that performs what a command means.
//!
//! Handlers are looked up by the name a command declares. Commands whose
//! name is unknown fall back on their flags, and plain commands without a
//! handler become [`interact`], which does nothing and leaves the turn to
//! events.

mod info;
mod items;
mod movement;
mod switching;

use lantern_core::{Arg, Attributed, Command, CommandFlags, ItemKey};

use crate::chain::{Stage, StageResult, Turn};

pub use movement::arrive;

/// Every named handler.
const HANDLERS: &[(&str, Stage)] = &[
    ("go", movement::go),
    ("teleport", movement::teleport),
    ("take", items::take),
    ("drop", items::drop),
    ("insert", items::insert),
    ("wear", items::wear),
    ("remove", items::remove),
    ("consume", items::consume),
    ("pour", items::pour),
    ("switch", switching::switch),
    ("set_player", switching::set_player),
    ("look", info::look),
    ("describe", info::describe),
    ("read", info::read),
    ("inventory", info::inventory),
    ("score", info::score),
    ("help", info::help),
    ("hint", info::hint),
    ("explain", info::explain),
    ("commands", info::commands),
    ("quit", info::quit),
    ("interact", interact),
];

/// The handler registered under `name`.
pub fn named(name: &str) -> Option<Stage> {
    HANDLERS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, stage)| *stage)
}

/// The name of the handler `cmd` runs: its declared handler when that is
/// known, else one chosen from its flags, else `interact`.
pub fn handler_name(cmd: &Command) -> &'static str {
    if let Some((name, _)) = HANDLERS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(&cmd.handler))
    {
        return *name;
    }
    if cmd.has_attribute(CommandFlags::MOVEMENT) {
        "go"
    } else if cmd.has_attribute(CommandFlags::TELEPORT) {
        "teleport"
    } else if cmd.has_attribute(CommandFlags::SWITCHING) {
        "switch"
    } else if cmd.has_attribute(CommandFlags::SWITCHABLE) {
        "set_player"
    } else {
        "interact"
    }
}

/// Whether `cmd` gets a real handler rather than falling back to the no-op.
pub fn resolves(cmd: &Command) -> bool {
    cmd.handler.eq_ignore_ascii_case("interact") || handler_name(cmd) != "interact"
}

/// The handler stage for `cmd`.
pub fn handler_for(cmd: &Command) -> Stage {
    named(handler_name(cmd)).unwrap_or(interact)
}

/// Do nothing. Events keyed on the command supply the response.
pub fn interact(_turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    StageResult::pass(args)
}

/// The item in argument slot `index`.
fn item_arg(args: &[Arg], index: usize) -> Option<ItemKey> {
    args.get(index).and_then(Arg::as_item)
}
