//! Transport layer abstraction for term service calls.

use crate::error::{FolksaurusError, FolksaurusResult};
use folksaurus_protocol::{Outcome, SummaryRecord, TermId, TermRecord};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A term transport handles communication with the term service.
///
/// Every call returns the service's answer as a tagged [`Outcome`]. `Err` is
/// reserved for calls that produced no usable answer at all: connection
/// failures and undecodable bodies.
pub trait TermTransport: Send + Sync {
    /// Fetches a term by its service id.
    fn get_term_by_id(&self, id: &TermId) -> FolksaurusResult<Outcome<TermRecord>>;

    /// Fetches a term by id unless it is unchanged since `since` (unix seconds).
    fn get_term_by_id_if_modified_since(
        &self,
        id: &TermId,
        since: i64,
    ) -> FolksaurusResult<Outcome<TermRecord>>;

    /// Fetches a term by name.
    fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Outcome<TermRecord>>;

    /// Fetches a term by name unless it is unchanged since `since` (unix seconds).
    fn get_term_by_name_if_modified_since(
        &self,
        name: &str,
        since: i64,
    ) -> FolksaurusResult<Outcome<TermRecord>>;

    /// Creates a term. Creating an existing name answers `Conflict` with the
    /// existing id.
    fn create_term(&self, name: &str) -> FolksaurusResult<Outcome<TermId>>;

    /// Lists terms whose names start with `prefix`, at most `limit` of them.
    fn get_term_list(
        &self,
        prefix: &str,
        limit: u32,
    ) -> FolksaurusResult<Outcome<Vec<SummaryRecord>>>;

    /// Fetches a term by name, creating it first if the service lacks it.
    ///
    /// When the create call yields no id, its outcome is returned as is, so a
    /// refused create surfaces as `Forbidden` or `Gone`.
    fn get_or_create_term(&self, name: &str) -> FolksaurusResult<Outcome<TermRecord>> {
        let found = self.get_term_by_name(name)?;
        if found.has_value() {
            return Ok(found);
        }
        match self.create_term(name)? {
            Outcome::Found(id) | Outcome::Created(id) | Outcome::Conflict(id) => {
                self.get_term_by_id(&id)
            }
            refused => Ok(refused.without_value()),
        }
    }
}

/// A call received by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// `get_term_by_id`.
    GetById(TermId),
    /// `get_term_by_id_if_modified_since`.
    GetByIdIfModifiedSince(TermId, i64),
    /// `get_term_by_name`.
    GetByName(String),
    /// `get_term_by_name_if_modified_since`.
    GetByNameIfModifiedSince(String, i64),
    /// `create_term`.
    Create(String),
    /// `get_term_list`.
    GetTermList(String, u32),
}

/// A mock transport for testing.
///
/// Each operation answers with a fixed outcome, `NotFound` unless set.
/// `get_or_create_term` uses the trait's default composition, so it shows up
/// as the by-name, create and by-id calls it is made of.
#[derive(Debug)]
pub struct MockTransport {
    connected: AtomicBool,
    by_id: Mutex<Outcome<TermRecord>>,
    by_id_if_modified: Mutex<Outcome<TermRecord>>,
    by_name: Mutex<Outcome<TermRecord>>,
    by_name_if_modified: Mutex<Outcome<TermRecord>>,
    create: Mutex<Outcome<TermId>>,
    term_list: Mutex<Outcome<Vec<SummaryRecord>>>,
    calls: Mutex<Vec<TransportCall>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            by_id: Mutex::new(Outcome::NotFound),
            by_id_if_modified: Mutex::new(Outcome::NotFound),
            by_name: Mutex::new(Outcome::NotFound),
            by_name_if_modified: Mutex::new(Outcome::NotFound),
            create: Mutex::new(Outcome::NotFound),
            term_list: Mutex::new(Outcome::Found(Vec::new())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the answer to `get_term_by_id`.
    pub fn set_by_id_response(&self, outcome: Outcome<TermRecord>) {
        *self.by_id.lock() = outcome;
    }

    /// Sets the answer to `get_term_by_id_if_modified_since`.
    pub fn set_by_id_if_modified_response(&self, outcome: Outcome<TermRecord>) {
        *self.by_id_if_modified.lock() = outcome;
    }

    /// Sets the answer to `get_term_by_name`.
    pub fn set_by_name_response(&self, outcome: Outcome<TermRecord>) {
        *self.by_name.lock() = outcome;
    }

    /// Sets the answer to `get_term_by_name_if_modified_since`.
    pub fn set_by_name_if_modified_response(&self, outcome: Outcome<TermRecord>) {
        *self.by_name_if_modified.lock() = outcome;
    }

    /// Sets the answer to `create_term`.
    pub fn set_create_response(&self, outcome: Outcome<TermId>) {
        *self.create.lock() = outcome;
    }

    /// Sets the answer to `get_term_list`.
    pub fn set_term_list_response(&self, outcome: Outcome<Vec<SummaryRecord>>) {
        *self.term_list.lock() = outcome;
    }

    /// Sets the connected state. A disconnected mock fails every call.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record<T: Clone>(&self, call: TransportCall, answer: &Mutex<T>) -> FolksaurusResult<T> {
        self.calls.lock().push(call);
        if !self.connected.load(Ordering::SeqCst) {
            return Err(FolksaurusError::transport_retryable("not connected"));
        }
        Ok(answer.lock().clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TermTransport for MockTransport {
    fn get_term_by_id(&self, id: &TermId) -> FolksaurusResult<Outcome<TermRecord>> {
        self.record(TransportCall::GetById(id.clone()), &self.by_id)
    }

    fn get_term_by_id_if_modified_since(
        &self,
        id: &TermId,
        since: i64,
    ) -> FolksaurusResult<Outcome<TermRecord>> {
        self.record(
            TransportCall::GetByIdIfModifiedSince(id.clone(), since),
            &self.by_id_if_modified,
        )
    }

    fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Outcome<TermRecord>> {
        self.record(TransportCall::GetByName(name.to_string()), &self.by_name)
    }

    fn get_term_by_name_if_modified_since(
        &self,
        name: &str,
        since: i64,
    ) -> FolksaurusResult<Outcome<TermRecord>> {
        self.record(
            TransportCall::GetByNameIfModifiedSince(name.to_string(), since),
            &self.by_name_if_modified,
        )
    }

    fn create_term(&self, name: &str) -> FolksaurusResult<Outcome<TermId>> {
        self.record(TransportCall::Create(name.to_string()), &self.create)
    }

    fn get_term_list(
        &self,
        prefix: &str,
        limit: u32,
    ) -> FolksaurusResult<Outcome<Vec<SummaryRecord>>> {
        self.record(
            TransportCall::GetTermList(prefix.to_string(), limit),
            &self.term_list,
        )
    }
}
