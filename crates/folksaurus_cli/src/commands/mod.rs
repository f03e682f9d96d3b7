//! CLI command implementations.

pub mod get;
pub mod get_or_create;
pub mod search;

use folksaurus_client::{FileStore, HttpTransport, ReqwestClient, Term, TermManager, TermSummary};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

/// The manager used by the CLI.
pub type CliManager = TermManager<HttpTransport<ReqwestClient>, FileStore>;

/// Loads the configuration and opens the local cache.
pub fn open_manager(
    config: &Path,
    section: Option<&str>,
    store: &Path,
) -> Result<CliManager, Box<dyn std::error::Error>> {
    let store = FileStore::open(store)?;
    Ok(TermManager::from_config_file(Arc::new(store), config, section)?)
}

/// A term as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct TermView {
    /// Service id, empty for placeholders.
    pub id: String,
    /// Application id.
    pub app_id: String,
    /// Name.
    pub name: String,
    /// Derived status.
    pub status: String,
    /// Scope note.
    pub scope_note: String,
    /// Last retrieval time (RFC 3339), absent if never retrieved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_retrieved: Option<String>,
    /// Broader terms.
    pub broader: Vec<SummaryView>,
    /// Narrower terms.
    pub narrower: Vec<SummaryView>,
    /// Related terms.
    pub related: Vec<SummaryView>,
    /// Terms this one is used for.
    pub used_for: Vec<SummaryView>,
    /// Terms to use instead.
    #[serde(rename = "use")]
    pub use_terms: Vec<SummaryView>,
}

/// A term summary as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    /// Service id.
    pub id: String,
    /// Name.
    pub name: String,
}

impl From<&TermSummary> for SummaryView {
    fn from(summary: &TermSummary) -> Self {
        Self {
            id: summary.id().to_string(),
            name: summary.name().to_string(),
        }
    }
}

fn views(summaries: &[TermSummary]) -> Vec<SummaryView> {
    summaries.iter().map(SummaryView::from).collect()
}

impl From<&Term> for TermView {
    fn from(term: &Term) -> Self {
        Self {
            id: term.id().map(ToString::to_string).unwrap_or_default(),
            app_id: term.app_id().map(ToString::to_string).unwrap_or_default(),
            name: term.name().to_string(),
            status: term.status().to_string(),
            scope_note: term.scope_note().to_string(),
            last_retrieved: (term.last_retrieved() > 0)
                .then(|| term.last_retrieved_at().to_rfc3339()),
            broader: views(term.broader()),
            narrower: views(term.narrower()),
            related: views(term.related()),
            used_for: views(term.used_for()),
            use_terms: views(term.use_terms()),
        }
    }
}

/// Renders an optional term.
pub fn render_term(term: Option<&Term>, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&term.map(TermView::from)),
        OutputFormat::Text => Ok(match term {
            Some(term) => render_term_text(&TermView::from(term)),
            None => "No term found".to_string(),
        }),
    }
}

fn render_term_text(view: &TermView) -> String {
    let mut out = format!("{} ({})\n", view.name, view.status);
    out.push_str(&format!("  id:             {}\n", or_dash(&view.id)));
    out.push_str(&format!("  app id:         {}\n", or_dash(&view.app_id)));
    out.push_str(&format!(
        "  last retrieved: {}\n",
        view.last_retrieved.as_deref().unwrap_or("never")
    ));
    if !view.scope_note.is_empty() {
        out.push_str(&format!("  scope note:     {}\n", view.scope_note));
    }
    for (label, list) in [
        ("broader", &view.broader),
        ("narrower", &view.narrower),
        ("related", &view.related),
        ("used for", &view.used_for),
        ("use", &view.use_terms),
    ] {
        if list.is_empty() {
            continue;
        }
        let names: Vec<String> = list
            .iter()
            .map(|s| format!("{} [{}]", s.name, s.id))
            .collect();
        out.push_str(&format!("  {:<15} {}\n", format!("{label}:"), names.join(", ")));
    }
    out.trim_end().to_string()
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Renders a list of term summaries.
pub fn render_summaries(
    summaries: &[TermSummary],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&views(summaries)),
        OutputFormat::Text if summaries.is_empty() => Ok("No terms found".to_string()),
        OutputFormat::Text => Ok(summaries
            .iter()
            .map(|s| format!("{:>8}  {}", s.id().to_string(), s.name()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
