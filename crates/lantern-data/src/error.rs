//! Fatal load errors.

use std::path::PathBuf;

/// Alias for `Result<T, ConfigurationError>`.
pub type LoadResult<T> = Result<T, ConfigurationError>;

/// Fatal problems that stop a world from loading at all.
///
/// Everything recoverable is reported as a
/// [`Diagnostic`](crate::diagnostics::Diagnostic) instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The document is not valid JSON or a required field is missing.
    #[error("malformed world description: {0}")]
    Json(#[from] serde_json::Error),

    /// The document must declare exactly one player.
    #[error("expected exactly one player, found {0}")]
    PlayerCount(usize),

    /// An attribute string is not hexadecimal.
    #[error("invalid attributes \"{value}\" on {entity}")]
    InvalidAttributes {
        /// Which record carried the value.
        entity: String,
        /// The offending text.
        value: String,
    },

    /// A direction word is not one of the known directions.
    #[error("unknown direction \"{word}\" on location {location}")]
    UnknownDirection {
        /// The location declaring the link.
        location: u32,
        /// The offending word.
        word: String,
    },

    /// The player starts at a location that does not exist.
    #[error("player starts at unknown location {0}")]
    UnknownStartLocation(u32),
}
