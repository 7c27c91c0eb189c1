//! World description loader for Lantern.
//!
//! Loading runs in three passes: [`resolver`] indexes every collection by id
//! and reports duplicates, [`builder`] turns ids into references, and
//! [`validator`] checks the invariants that span collections. Fatal problems
//! surface as [`ConfigurationError`]; everything else is collected as
//! [`Diagnostic`]s next to a best-effort world.

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod resolver;
pub mod schema;
pub mod validator;

use std::path::Path;

use lantern_core::World;
use tracing::{debug, warn};

pub use diagnostics::{Diagnostic, Severity, render_diagnostics};
pub use error::{ConfigurationError, LoadResult};
pub use schema::WorldDocument;

/// A loaded world together with everything the loader noticed.
#[derive(Debug)]
pub struct Loaded {
    /// The world, possibly with dangling references removed.
    pub world: World,
    /// Diagnostics in pass order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Loaded {
    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

/// Load a world from a JSON string.
pub fn load_str(source: &str) -> LoadResult<Loaded> {
    let doc: WorldDocument = serde_json::from_str(source)?;
    load_document(&doc)
}

/// Load a world from a JSON file.
pub fn load_path(path: &Path) -> LoadResult<Loaded> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "read world description");
    load_str(&source)
}

/// Load a world from an already parsed document.
pub fn load_document(doc: &WorldDocument) -> LoadResult<Loaded> {
    let registries = resolver::Registries::resolve(doc);
    let mut diagnostics = registries.diagnostics.clone();

    let (world, built) = builder::build(doc, &registries)?;
    diagnostics.extend(built);
    diagnostics.extend(validator::validate(&world));

    let loaded = Loaded { world, diagnostics };
    if !loaded.diagnostics.is_empty() {
        warn!(
            errors = loaded.error_count(),
            warnings = loaded.warning_count(),
            "world loaded with diagnostics"
        );
    }
    Ok(loaded)
}
