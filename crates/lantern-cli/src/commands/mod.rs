pub mod check;
pub mod play;

use std::path::Path;

use colored::Colorize;
use tracing_subscriber::{EnvFilter, prelude::*};

use lantern_data::{Diagnostic, Loaded, Severity};

/// Install the stderr log subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| format!("invalid log level '{level}': {e}"))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| e.to_string())
}

/// Load a world file and print its diagnostics.
/// Returns the loaded world if there are no errors.
fn load_world(path: &Path) -> Result<Loaded, String> {
    let loaded =
        lantern_engine::load_path(path).map_err(|e| format!("{}: {e}", path.display()))?;
    print_diagnostics(&loaded.diagnostics);

    if loaded.has_errors() {
        Err(format!(
            "'{}' has {} error{}",
            path.display(),
            loaded.error_count(),
            plural(loaded.error_count())
        ))
    } else {
        Ok(loaded)
    }
}

/// Print diagnostics to stderr, coloured by severity.
fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    for diagnostic in diagnostics {
        let line = match diagnostic.severity {
            Severity::Error => diagnostic.to_string().red(),
            Severity::Warning => diagnostic.to_string().yellow(),
        };
        eprintln!("  {line}");
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;
    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            plural(errors),
            warnings,
            plural(warnings),
        );
    } else {
        eprintln!("  {} warning{}", warnings, plural(warnings));
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
