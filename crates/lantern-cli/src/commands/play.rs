use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use lantern_engine::{EngineConfig, GameSession};

pub fn run(path: &Path, verbose: bool, immune: bool, penalty: u32) -> Result<(), String> {
    let loaded = super::load_world(path)?;
    let config = EngineConfig::default()
        .with_verbose(verbose)
        .with_immune(immune)
        .with_reincarnation_penalty(penalty);

    let mut session = GameSession::new(loaded.world, config)
        .map_err(|e| format!("failed to start session: {e}"))?;

    println!("{}\n", session.start_message());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    while session.is_running() {
        print!("{} ", ">".bold());
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let output = session.process_input(line.trim());
        println!("{output}\n");
    }

    let player = session.player();
    println!(
        "  {} {} points in {} moves.",
        "Final score:".bold(),
        player.score,
        player.instructions
    );
    Ok(())
}
