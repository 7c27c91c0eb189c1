//! A game session: one world, one player, one line of input at a time.

use std::rc::Rc;

use tracing::{debug, info};

use lantern_core::{Arg, Attributed, Command, InputVocabulary, Player, PlayerFlags, World};

use crate::chain::{self, ChainRegistry, Turn};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::parser::{suggest_command, tokenize};
use crate::vision;

/// An interactive session over a loaded world.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    config: EngineConfig,
    chains: ChainRegistry,
}

impl GameSession {
    /// Start a session. Fails when no inventory applies where the player
    /// starts.
    pub fn new(mut world: World, config: EngineConfig) -> EngineResult<Self> {
        if config.verbose {
            world.player.set_attribute(PlayerFlags::VERBOSE);
        }
        if config.immune {
            world.player.set_attribute(PlayerFlags::IMMUNE);
        }
        if world.current_inventory().is_none() {
            return Err(EngineError::NoInventory(world.player.location));
        }
        let chains = ChainRegistry::build(&world);
        info!(world = %world.name, commands = chains.len(), "session started");
        Ok(Self {
            world,
            config,
            chains,
        })
    }

    /// The world in its current state.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.world.player
    }

    /// The session settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the game still accepts commands.
    pub fn is_running(&self) -> bool {
        self.world.player.playing
    }

    /// The welcome text followed by a full description of the start.
    pub fn start_message(&mut self) -> String {
        let welcome = self.text("start");
        let surroundings = vision::look_around(&mut self.world, true);
        [welcome, surroundings].join(&self.config.separator)
    }

    /// Process one line of player input and return the response.
    pub fn process_input(&mut self, line: &str) -> String {
        if !self.world.player.playing {
            return self.text("game_over");
        }
        let tokens = tokenize(line, &self.world.texts.inputs);
        if !self.world.player.alive {
            return self.answer_reincarnation(&tokens);
        }
        let Some(first) = tokens.first().cloned() else {
            return self.text("nothing_happens");
        };

        let (cmd, verb, rest, args) = match self.continuation(&first) {
            Some((cmd, verb, resolved)) => (cmd, verb, tokens, resolved),
            None => {
                self.world.player.reset_current_command();
                let Some(cmd) = self.world.command_by_name(&first) else {
                    return self.unknown_verb(&first);
                };
                (cmd, first, tokens[1..].to_vec(), Vec::new())
            }
        };
        let Some(stages) = self.chains.get(cmd.id) else {
            return self.text("nothing_happens");
        };

        self.world.player.instructions += 1;
        debug!(command = %cmd.name, verb = %verb, "running command");
        let mut turn = Turn::new(&mut self.world, &self.config, verb, rest);
        let response = chain::run(&mut turn, &cmd, stages, args);
        if response.is_empty() {
            self.text("nothing_happens")
        } else {
            response
        }
    }

    /// The suspended command with its typed verb, unless `first` starts a
    /// new command. A word that names both a command and an item continues
    /// the suspended one.
    fn continuation(&self, first: &str) -> Option<(Rc<Command>, String, Vec<Arg>)> {
        let (id, verb, resolved) = self.world.player.current_command()?;
        let starts_new = self.world.command_by_name(first).is_some()
            && self.world.find_items(first).is_empty();
        if starts_new {
            return None;
        }
        let cmd = self.world.command(id)?;
        Some((cmd, verb.to_string(), resolved.to_vec()))
    }

    fn unknown_verb(&self, verb: &str) -> String {
        let responses = &self.world.texts.responses;
        match suggest_command(&self.world, verb, self.config.suggestion_threshold) {
            Some(suggestion) => {
                responses.format("unknown_command_suggest", &[verb.to_string(), suggestion])
            }
            None => responses.format("unknown_command", &[verb.to_string()]),
        }
    }

    fn answer_reincarnation(&mut self, tokens: &[String]) -> String {
        let inputs = &self.world.texts.inputs;
        let answer = tokens.first().map(String::as_str).unwrap_or_default();
        if inputs.is(InputVocabulary::YES, answer) {
            self.world.player.reincarnate(self.config.reincarnation_penalty);
            info!(score = self.world.player.score, "player reincarnated");
            let reborn = self.text("reincarnation_yes");
            let surroundings = vision::look_around(&mut self.world, true);
            [reborn, surroundings].join(&self.config.separator)
        } else if inputs.is(InputVocabulary::NO, answer) {
            self.world.player.playing = false;
            self.text("reincarnation_no")
        } else {
            self.text("reincarnation_unclear")
        }
    }

    fn text(&self, key: &str) -> String {
        self.world.texts.responses.get(key).to_string()
    }
}
