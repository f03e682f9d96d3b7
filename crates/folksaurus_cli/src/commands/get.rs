//! Get command implementation.

use super::{render_term, OutputFormat};
use folksaurus_client::{AppId, FolksaurusResult, LocalStore, Term, TermId, TermManager, TermTransport};

/// The key a term is looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Application id.
    AppId(AppId),
    /// Service id.
    Id(TermId),
    /// Name.
    Name(String),
}

/// Looks a term up.
pub fn lookup<T: TermTransport, S: LocalStore>(
    manager: &TermManager<T, S>,
    key: &Key,
) -> FolksaurusResult<Option<Term>> {
    match key {
        Key::AppId(app_id) => manager.term_by_app_id(app_id),
        Key::Id(id) => manager.term_by_remote_id(id),
        Key::Name(name) => manager.term_by_name(name),
    }
}

/// Runs the get command.
pub fn run<T: TermTransport, S: LocalStore>(
    manager: &TermManager<T, S>,
    key: &Key,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = lookup(manager, key)?;
    println!("{}", render_term(term.as_ref(), format)?);
    Ok(())
}
