//! "Did you mean" suggestions for unknown verbs.

use strsim::jaro_winkler;

use lantern_core::World;

/// The closest non-secret command name to `input`, if any scores at least
/// `threshold`. Suggestions never change what a token resolves to.
pub fn suggest_command(world: &World, input: &str, threshold: f64) -> Option<String> {
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, f64)> = None;
    for (name, id) in world.command_names() {
        if world.command(id).is_none_or(|cmd| cmd.is_secret()) {
            continue;
        }
        let score = jaro_winkler(&input_lower, name);
        let better = match best {
            Some((best_name, best_score)) => {
                score > best_score || (score == best_score && name < best_name)
            }
            None => true,
        };
        if score >= threshold && better {
            best = Some((name, score));
        }
    }
    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::{Command, CommandFlags, CommandId, LocationId};

    fn world() -> World {
        let mut world = World::new("Test", LocationId(1));
        world.add_command(Command::new(CommandId(1), "inventory").with_aliases(["inv"]));
        world.add_command(Command::new(CommandId(2), "take"));
        world.add_command(
            Command::new(CommandId(3), "xyzzy").with_attributes(CommandFlags::SECRET),
        );
        world
    }

    #[test]
    fn suggests_close_name() {
        assert_eq!(
            suggest_command(&world(), "inventroy", 0.8).as_deref(),
            Some("inventory")
        );
    }

    #[test]
    fn ignores_distant_input() {
        assert_eq!(suggest_command(&world(), "dance", 0.8), None);
    }

    #[test]
    fn never_suggests_secret_commands() {
        assert_eq!(suggest_command(&world(), "xyzzz", 0.8), None);
    }
}
