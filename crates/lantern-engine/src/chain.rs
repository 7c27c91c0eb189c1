//! The resolver chain: an ordered list of stages per command.
//!
//! Every command gets its chain once, when the session starts, from its
//! flags. Running a chain threads the argument list from stage to stage and
//! stops at the first stage that fails.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use lantern_core::{Arg, Attributed, Command, CommandFlags, CommandId, World, format_template};

use crate::config::EngineConfig;
use crate::{arguments, events, handlers, life, vision};

/// One step of a chain.
pub type Stage = fn(&mut Turn<'_>, &Command, Vec<Arg>) -> StageResult;

/// What a stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    /// False stops the chain after this stage.
    pub success: bool,
    /// Text fragment with `{N}` placeholders. Often empty.
    pub template: String,
    /// Values for the placeholders in `template`.
    pub content: Vec<String>,
    /// Arguments for the next stage.
    pub next: Vec<Arg>,
    /// Discard the fragments of earlier stages.
    pub overrides: bool,
}

impl StageResult {
    /// Succeed without text.
    pub fn pass(next: Vec<Arg>) -> Self {
        Self {
            success: true,
            template: String::new(),
            content: Vec::new(),
            next,
            overrides: false,
        }
    }

    /// Succeed with text.
    pub fn ok(template: impl Into<String>, content: Vec<String>, next: Vec<Arg>) -> Self {
        Self {
            success: true,
            template: template.into(),
            content,
            next,
            overrides: false,
        }
    }

    /// Fail with text.
    pub fn reject(template: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            success: false,
            template: template.into(),
            content,
            next: Vec::new(),
            overrides: false,
        }
    }

    /// Replace the text of every earlier stage with this one's.
    pub fn overriding(mut self) -> Self {
        self.overrides = true;
        self
    }

    /// The fragment with its own content substituted.
    pub fn render(&self) -> String {
        format_template(&self.template, &self.content)
    }
}

/// Mutable state of one turn, handed to every stage.
pub struct Turn<'a> {
    /// The world being played.
    pub world: &'a mut World,
    /// Session settings.
    pub config: &'a EngineConfig,
    /// The verb as typed, or the command name when continuing.
    pub verb: String,
    /// Tokens after the verb that no stage has consumed yet.
    pub tokens: Vec<String>,
    /// Whether the player could see when the turn started.
    pub could_see: bool,
    /// Set by stages that already described a death.
    pub death_narrated: bool,
}

impl<'a> Turn<'a> {
    /// A turn over `tokens`, which exclude the verb.
    pub fn new(
        world: &'a mut World,
        config: &'a EngineConfig,
        verb: impl Into<String>,
        tokens: Vec<String>,
    ) -> Self {
        let could_see = world.player_can_see();
        Self {
            world,
            config,
            verb: verb.into(),
            tokens,
            could_see,
            death_narrated: false,
        }
    }

    /// The response template for `key`.
    pub fn text(&self, key: &str) -> String {
        self.world.texts.responses.get(key).to_string()
    }

    /// Succeed with the response `key`.
    pub fn ok(&self, key: &str, content: Vec<String>, next: Vec<Arg>) -> StageResult {
        StageResult::ok(self.text(key), content, next)
    }

    /// Fail with the response `key`.
    pub fn reject(&self, key: &str, content: Vec<String>) -> StageResult {
        StageResult::reject(self.text(key), content)
    }
}

/// Chains for every command of a world.
#[derive(Default)]
pub struct ChainRegistry {
    chains: HashMap<CommandId, Vec<Stage>>,
}

impl fmt::Debug for ChainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainRegistry")
            .field("commands", &self.chains.len())
            .finish()
    }
}

impl ChainRegistry {
    /// Assemble the chain of every command in `world`.
    pub fn build(world: &World) -> Self {
        let chains = world
            .commands()
            .map(|cmd| (cmd.id, Self::assemble(cmd)))
            .collect();
        Self { chains }
    }

    /// The chain for one command, chosen from its flags.
    pub fn assemble(cmd: &Command) -> Vec<Stage> {
        let mut stages: Vec<Stage> = Vec::with_capacity(6);
        if cmd.has_attribute(CommandFlags::REQUIRES_VISION) {
            stages.push(vision::require_vision);
        }
        stages.push(arguments::resolver_for(cmd));
        stages.push(handlers::handler_for(cmd));
        if cmd.has_attribute(CommandFlags::POST_VISION) {
            stages.push(vision::post_vision);
        }
        stages.push(events::resolve_events);
        stages.push(life::check_life);
        stages
    }

    /// The chain of `id`.
    pub fn get(&self, id: CommandId) -> Option<&[Stage]> {
        self.chains.get(&id).map(Vec::as_slice)
    }

    /// Number of commands with a chain.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether no command has a chain.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Run `stages` for `cmd` starting from `args` and return the response.
///
/// Each fragment is rendered with its own content. Empty fragments are
/// skipped; the rest are joined with the configured separator.
pub fn run(turn: &mut Turn<'_>, cmd: &Command, stages: &[Stage], args: Vec<Arg>) -> String {
    let mut fragments: Vec<String> = Vec::new();
    let mut args = args;
    for (index, stage) in stages.iter().enumerate() {
        let result = stage(turn, cmd, args);
        debug!(
            command = %cmd.name,
            stage = index,
            success = result.success,
            "stage finished"
        );
        if result.overrides {
            fragments.clear();
        }
        let text = result.render();
        if !text.is_empty() {
            fragments.push(text);
        }
        if !result.success {
            break;
        }
        args = result.next;
    }
    fragments.join(&turn.config.separator)
}
