//! Player input: tokenizing and verb suggestions.

pub mod suggest;
pub mod tokens;

pub use suggest::suggest_command;
pub use tokens::tokenize;
