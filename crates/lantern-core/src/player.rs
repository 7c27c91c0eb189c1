//! Player state management.

use crate::attributes::{Attributed, PlayerFlags};
use crate::command::Arg;
use crate::entity::{CommandId, LocationId};

/// Multi-turn command state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingCommand {
    /// The next input starts a new command.
    #[default]
    Idle,
    /// The next input continues `command`, whose first arguments are known.
    AwaitingArgs {
        /// The suspended command.
        command: CommandId,
        /// The word the player typed for it, which may be an alias.
        verb: String,
        /// Arguments resolved before it was suspended.
        resolved: Vec<Arg>,
    },
}

/// The player's state in a session.
#[derive(Debug, Clone)]
pub struct Player {
    /// Where the player is.
    pub location: LocationId,
    /// Where the player was before the last move.
    pub previous_location: Option<LocationId>,
    /// Where the player started, used for reincarnation.
    pub start_location: LocationId,
    /// Attribute flags.
    pub attributes: PlayerFlags,
    /// False after death until reincarnation.
    pub alive: bool,
    /// False once the player quits.
    pub playing: bool,
    /// Commands executed so far.
    pub instructions: u32,
    /// Points scored.
    pub score: u32,
    /// Suspended command, if any.
    pub pending: PendingCommand,
}

impl Player {
    /// Create a living player at `location`.
    pub fn new(location: LocationId) -> Self {
        Self {
            location,
            previous_location: None,
            start_location: location,
            attributes: PlayerFlags::empty(),
            alive: true,
            playing: true,
            instructions: 0,
            score: 0,
            pending: PendingCommand::Idle,
        }
    }

    /// Move to `destination`, remembering where the player came from.
    pub fn move_to(&mut self, destination: LocationId) {
        self.previous_location = Some(self.location);
        self.location = destination;
    }

    /// Kill the player. Returns false when the player is immune.
    pub fn die(&mut self) -> bool {
        if self.is_immune() {
            return false;
        }
        self.alive = false;
        true
    }

    /// Bring the player back at the start location.
    pub fn reincarnate(&mut self, penalty: u32) {
        self.alive = true;
        self.previous_location = None;
        self.location = self.start_location;
        self.score = self.score.saturating_sub(penalty);
        self.reset_current_command();
    }

    /// Whether the player cannot die.
    pub fn is_immune(&self) -> bool {
        self.has_attribute(PlayerFlags::IMMUNE)
    }

    /// Whether full descriptions are always shown.
    pub fn is_verbose(&self) -> bool {
        self.has_attribute(PlayerFlags::VERBOSE)
    }

    /// Suspend `command`, typed as `verb`, until the next input supplies
    /// more arguments.
    pub fn set_current_command(
        &mut self,
        command: CommandId,
        verb: impl Into<String>,
        resolved: Vec<Arg>,
    ) {
        self.pending = PendingCommand::AwaitingArgs {
            command,
            verb: verb.into(),
            resolved,
        };
    }

    /// Forget any suspended command.
    pub fn reset_current_command(&mut self) {
        self.pending = PendingCommand::Idle;
    }

    /// The suspended command with the verb it was typed as, if any.
    pub fn current_command(&self) -> Option<(CommandId, &str, &[Arg])> {
        match &self.pending {
            PendingCommand::Idle => None,
            PendingCommand::AwaitingArgs {
                command,
                verb,
                resolved,
            } => Some((*command, verb, resolved)),
        }
    }
}

impl Attributed for Player {
    type Flags = PlayerFlags;

    fn attributes(&self) -> PlayerFlags {
        self.attributes
    }

    fn attributes_mut(&mut self) -> &mut PlayerFlags {
        &mut self.attributes
    }
}
