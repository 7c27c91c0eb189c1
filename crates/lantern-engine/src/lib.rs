//! Command resolution for Lantern text adventures.
//!
//! Every command runs as a chain of stages assembled from its flags: an
//! optional vision guard, an argument resolver, the handler, an optional
//! post-vision report, event resolution, and the life check. A
//! [`GameSession`] tokenizes input, picks the command (or continues one that
//! is waiting for arguments), and runs its chain.
//!
//! # Example
//!
//! ```
//! use lantern_engine::{EngineConfig, GameSession, load_str};
//!
//! let json = r#"{
//!     "locations": [{"data_id": 1, "attributes": "0x3", "labels": {"shortname": "hall", "description": "A hall."}}],
//!     "inventories": [{"data_id": 1, "capacity": 5, "default": true}],
//!     "players": [{"location": 1}],
//!     "commands": [{"data_id": 1, "name": "look"}]
//! }"#;
//! let loaded = load_str(json).unwrap();
//! let mut session = GameSession::new(loaded.world, EngineConfig::default()).unwrap();
//! assert_eq!(session.process_input("look"), "A hall.");
//! ```

pub mod arguments;
pub mod chain;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod life;
pub mod parser;
pub mod session;
pub mod vision;

use std::path::Path;

use lantern_data::{Loaded, validator};

pub use chain::{ChainRegistry, Stage, StageResult, Turn};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use session::GameSession;

/// Load a world from JSON and add a warning for every command whose handler
/// name the engine does not know.
pub fn load_str(source: &str) -> EngineResult<Loaded> {
    Ok(with_handler_checks(lantern_data::load_str(source)?))
}

/// Load a world from a JSON file, with the same handler checks as
/// [`load_str`].
pub fn load_path(path: &Path) -> EngineResult<Loaded> {
    Ok(with_handler_checks(lantern_data::load_path(path)?))
}

fn with_handler_checks(mut loaded: Loaded) -> Loaded {
    let unknown = validator::check_handlers(&loaded.world, handlers::resolves);
    loaded.diagnostics.extend(unknown);
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_handlers_become_warnings() {
        let json = r#"{
            "locations": [{"data_id": 1, "labels": {"shortname": "hall"}}],
            "inventories": [{"data_id": 1, "capacity": 5, "default": true}],
            "players": [{"location": 1}],
            "commands": [
                {"data_id": 1, "name": "take", "arguments": [{}]},
                {"data_id": 2, "name": "north", "attributes": "0x1"},
                {"data_id": 3, "name": "rub", "arguments": [{}]}
            ]
        }"#;
        let loaded = load_str(json).unwrap();
        let warnings: Vec<String> = loaded.diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(warnings, vec!["WARN: command 3 (rub) uses unknown handler \"rub\"".to_string()]);
    }
}
