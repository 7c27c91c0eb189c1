//! Error types for the engine.

use thiserror::Error;

use lantern_data::ConfigurationError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that stop a session from starting.
///
/// Nothing that happens during a turn is an error: rejections are ordinary
/// responses.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The world description could not be loaded.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The player starts somewhere without an inventory.
    #[error("no inventory applies at the start location {0}")]
    NoInventory(lantern_core::LocationId),
}
