//! CLI frontend for the Lantern text-adventure engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use lantern_engine::config::DEFAULT_REINCARNATION_PENALTY;

#[derive(Parser)]
#[command(
    name = "lantern",
    about = "Lantern, an interpreter for data-driven text adventures",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "debug", "lantern_engine=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a world file and report its diagnostics
    Check {
        /// Path to the JSON world description
        #[arg(short, long)]
        world: PathBuf,
    },

    /// Play a world interactively on stdin/stdout
    Play {
        /// Path to the JSON world description
        #[arg(short, long)]
        world: PathBuf,

        /// Describe locations in full on every visit
        #[arg(long)]
        verbose: bool,

        /// The player cannot die
        #[arg(long)]
        immune: bool,

        /// Points lost when the player is reincarnated
        #[arg(long, default_value_t = DEFAULT_REINCARNATION_PENALTY)]
        penalty: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = commands::init_tracing(&cli.log_level).and_then(|()| match cli.command {
        Commands::Check { world } => commands::check::run(&world),
        Commands::Play {
            world,
            verbose,
            immune,
            penalty,
        } => commands::play::run(&world, verbose, immune, penalty),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
