//! Search command implementation.

use super::{render_summaries, OutputFormat};
use folksaurus_client::{LocalStore, TermManager, TermTransport};

/// Runs the search command.
pub fn run<T: TermTransport, S: LocalStore>(
    manager: &TermManager<T, S>,
    prefix: &str,
    limit: Option<u32>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let found = manager.search(prefix, limit)?;
    println!("{}", render_summaries(&found, format)?);
    Ok(())
}
