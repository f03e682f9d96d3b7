//! Get-or-create command implementation.

use super::{render_term, OutputFormat};
use folksaurus_client::{LocalStore, TermManager, TermTransport};

/// Runs the get-or-create command.
pub fn run<T: TermTransport, S: LocalStore>(
    manager: &TermManager<T, S>,
    name: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = manager.get_or_create_term(name)?;
    if term.is_none() {
        tracing::warn!(name, "the service refused this term");
    }
    println!("{}", render_term(term.as_ref(), format)?);
    Ok(())
}
