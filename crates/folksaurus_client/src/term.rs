//! Term value objects.

use crate::error::{FolksaurusError, FolksaurusResult};
use chrono::{DateTime, Utc};
use folksaurus_protocol::{AppId, SummaryRecord, TermId, TermRecord};
use std::fmt;
use tracing::warn;

/// Derived status of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStatus {
    /// The term has relationships and is the preferred name for its concept.
    Preferred,
    /// The term points at one or more preferred terms to use instead.
    NonPreferred,
    /// The term has no relationships yet.
    Unsorted,
}

impl TermStatus {
    /// Returns the status name used by the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            TermStatus::Preferred => "preferred",
            TermStatus::NonPreferred => "non-preferred",
            TermStatus::Unsorted => "unsorted",
        }
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up full terms by service id.
///
/// Implemented by [`crate::TermManager`]; summaries and terms borrow a
/// resolver only for the duration of a lookup.
pub trait TermResolver {
    /// Returns the term with the given service id, if it can be retrieved.
    fn resolve_term(&self, id: &TermId) -> FolksaurusResult<Option<Term>>;
}

/// A lightweight `{id, name}` reference to a related term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSummary {
    id: TermId,
    name: String,
}

impl TermSummary {
    /// Creates a summary.
    pub fn new(id: impl Into<TermId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the service id.
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieves the complete term through `resolver`.
    pub fn resolve(&self, resolver: &dyn TermResolver) -> FolksaurusResult<Option<Term>> {
        resolver.resolve_term(&self.id)
    }

    fn to_record(&self) -> SummaryRecord {
        SummaryRecord::new(self.id.clone(), self.name.clone())
    }
}

impl From<SummaryRecord> for TermSummary {
    fn from(record: SummaryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

impl fmt::Display for TermSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The preferred term(s) for a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preferred<'a> {
    /// The term is preferred or unsorted and stands for itself.
    Itself(&'a Term),
    /// The term has exactly one use target. `None` if it could not be
    /// retrieved.
    Single(Option<Term>),
    /// The term is ambiguous. Targets that could not be retrieved are
    /// skipped; the rest keep the order of the use list.
    Ambiguous(Vec<Term>),
}

/// A taxonomy term.
///
/// Terms are built from a flat record each time they are read. The only
/// mutations are setting the app id once the store assigns one and stamping
/// the retrieval time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    id: Option<TermId>,
    app_id: Option<AppId>,
    name: String,
    scope_note: String,
    last_retrieved: i64,
    broader: Vec<TermSummary>,
    narrower: Vec<TermSummary>,
    related: Vec<TermSummary>,
    used_for: Vec<TermSummary>,
    use_terms: Vec<TermSummary>,
}

fn summaries(records: Vec<SummaryRecord>) -> Vec<TermSummary> {
    records.into_iter().map(TermSummary::from).collect()
}

fn records(summaries: &[TermSummary]) -> Vec<SummaryRecord> {
    summaries.iter().map(TermSummary::to_record).collect()
}

impl Term {
    /// Builds a term from a record.
    ///
    /// An empty id is treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTerm` if the name is empty.
    pub fn from_record(record: TermRecord) -> FolksaurusResult<Self> {
        if record.name.trim().is_empty() {
            return Err(FolksaurusError::InvalidTerm(
                "term name must not be empty".into(),
            ));
        }
        Ok(Self {
            id: record.id.filter(|id| !id.as_str().is_empty()),
            app_id: record.app_id.filter(|id| !id.as_str().is_empty()),
            name: record.name,
            scope_note: record.scope_note,
            last_retrieved: record.last_retrieved,
            broader: summaries(record.broader),
            narrower: summaries(record.narrower),
            related: summaries(record.related),
            used_for: summaries(record.used_for),
            use_terms: summaries(record.use_terms),
        })
    }

    /// Builds a local placeholder: name only, never retrieved.
    pub fn placeholder(name: impl Into<String>) -> FolksaurusResult<Self> {
        Self::from_record(TermRecord::named(name))
    }

    /// Returns the term as a flat record.
    pub fn to_record(&self) -> TermRecord {
        TermRecord {
            id: self.id.clone(),
            app_id: self.app_id.clone(),
            name: self.name.clone(),
            scope_note: self.scope_note.clone(),
            last_retrieved: self.last_retrieved,
            broader: records(&self.broader),
            narrower: records(&self.narrower),
            related: records(&self.related),
            used_for: records(&self.used_for),
            use_terms: records(&self.use_terms),
        }
    }

    /// Returns the service id, unset until the service knows the term.
    pub fn id(&self) -> Option<&TermId> {
        self.id.as_ref()
    }

    /// Returns the application id.
    pub fn app_id(&self) -> Option<&AppId> {
        self.app_id.as_ref()
    }

    /// Sets the application id.
    pub fn set_app_id(&mut self, app_id: AppId) {
        self.app_id = Some(app_id);
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope note.
    pub fn scope_note(&self) -> &str {
        &self.scope_note
    }

    /// Returns the unix time of the last retrieval, 0 for never.
    pub fn last_retrieved(&self) -> i64 {
        self.last_retrieved
    }

    /// Returns the last retrieval time as a date.
    pub fn last_retrieved_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.last_retrieved, 0).unwrap_or_default()
    }

    /// Stamps the retrieval time.
    pub fn set_last_retrieved(&mut self, timestamp: i64) {
        self.last_retrieved = timestamp;
    }

    /// Stamps the retrieval time with the current time.
    pub fn touch(&mut self) {
        self.last_retrieved = Utc::now().timestamp();
    }

    /// Broader terms.
    pub fn broader(&self) -> &[TermSummary] {
        &self.broader
    }

    /// Narrower terms.
    pub fn narrower(&self) -> &[TermSummary] {
        &self.narrower
    }

    /// Related terms.
    pub fn related(&self) -> &[TermSummary] {
        &self.related
    }

    /// Non-preferred terms this term is used for.
    pub fn used_for(&self) -> &[TermSummary] {
        &self.used_for
    }

    /// Preferred terms to use instead of this one.
    pub fn use_terms(&self) -> &[TermSummary] {
        &self.use_terms
    }

    /// Derives the status from the relationship lists.
    pub fn status(&self) -> TermStatus {
        if !self.use_terms.is_empty() {
            TermStatus::NonPreferred
        } else if self.broader.is_empty()
            && self.narrower.is_empty()
            && self.related.is_empty()
            && self.used_for.is_empty()
        {
            TermStatus::Unsorted
        } else {
            TermStatus::Preferred
        }
    }

    /// Returns true if the term maps to more than one preferred term.
    pub fn is_ambiguous(&self) -> bool {
        self.use_terms.len() > 1
    }

    /// Returns the preferred term(s) for this term.
    ///
    /// Preferred and unsorted terms stand for themselves. Non-preferred terms
    /// resolve every use target through `resolver`.
    pub fn preferred(&self, resolver: &dyn TermResolver) -> FolksaurusResult<Preferred<'_>> {
        match self.use_terms.as_slice() {
            [] => Ok(Preferred::Itself(self)),
            [single] => Ok(Preferred::Single(single.resolve(resolver)?)),
            targets => {
                let mut resolved = Vec::with_capacity(targets.len());
                for target in targets {
                    match target.resolve(resolver)? {
                        Some(term) => resolved.push(term),
                        None => warn!(
                            term = %self.name,
                            target = %target.id(),
                            "preferred term could not be retrieved"
                        ),
                    }
                }
                Ok(Preferred::Ambiguous(resolved))
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
