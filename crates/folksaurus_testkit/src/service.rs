//! An in-memory term service.
//!
//! [`TermService`] implements [`HttpClient`], so an `HttpTransport` can talk
//! to it directly. It follows the service's rules for authorization,
//! conditional requests, create conflicts and deleted terms.

use chrono::{NaiveDateTime, Utc};
use folksaurus_client::{HttpClient, HttpRequest, HttpResponse, Method};
use folksaurus_protocol::{
    SummaryRecord, StatusCode, TermId, TermRecord, AUTHORIZATION_HEADER, IF_MODIFIED_SINCE_HEADER,
};
use parking_lot::{Mutex, RwLock};
use percent_encoding::percent_decode_str;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// API key accepted by services built with [`TermService::default`].
pub const API_KEY: &str = "test-api-key";

/// Base URL to point clients at; the service ignores the host part.
pub const API_URL: &str = "http://folksaurus.test";

#[derive(Debug, Clone)]
struct ServiceTerm {
    record: TermRecord,
    modified: i64,
    deleted: bool,
}

#[derive(Debug, Default)]
struct Terms {
    rows: BTreeMap<TermId, ServiceTerm>,
    next_id: u64,
    forbidden: BTreeSet<String>,
    unlisted: BTreeSet<String>,
}

impl Terms {
    fn by_name(&self, name: &str) -> Option<&ServiceTerm> {
        self.rows.values().find(|term| term.record.name == name)
    }

    fn allocate(&mut self) -> TermId {
        loop {
            self.next_id += 1;
            let id = TermId::from(self.next_id);
            if !self.rows.contains_key(&id) {
                return id;
            }
        }
    }
}

/// A term service held in memory.
#[derive(Debug)]
pub struct TermService {
    api_key: String,
    terms: RwLock<Terms>,
    requests: Mutex<Vec<HttpRequest>>,
    reachable: AtomicBool,
    failure: Mutex<Option<StatusCode>>,
}

impl Default for TermService {
    fn default() -> Self {
        Self::new(API_KEY)
    }
}

impl TermService {
    /// Creates an empty service that accepts `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            terms: RwLock::new(Terms::default()),
            requests: Mutex::new(Vec::new()),
            reachable: AtomicBool::new(true),
            failure: Mutex::new(None),
        }
    }

    /// Adds a term, modified now. An id is assigned if the record has none.
    pub fn insert(&self, record: TermRecord) -> TermId {
        self.insert_modified_at(record, Utc::now().timestamp())
    }

    /// Adds a term with an explicit modification time.
    pub fn insert_modified_at(&self, mut record: TermRecord, modified: i64) -> TermId {
        let mut terms = self.terms.write();
        let id = match record.id.clone() {
            Some(id) => id,
            None => terms.allocate(),
        };
        record.id = Some(id.clone());
        record.app_id = None;
        record.last_retrieved = 0;
        terms.rows.insert(
            id.clone(),
            ServiceTerm {
                record,
                modified,
                deleted: false,
            },
        );
        id
    }

    /// Edits a term and marks it modified now. Returns false if unknown.
    pub fn update(&self, id: &TermId, edit: impl FnOnce(&mut TermRecord)) -> bool {
        match self.terms.write().rows.get_mut(id) {
            Some(term) => {
                edit(&mut term.record);
                term.modified = Utc::now().timestamp();
                true
            }
            None => false,
        }
    }

    /// Deletes a term. Its id and name answer `410 Gone` from now on.
    pub fn delete(&self, id: &TermId) -> bool {
        match self.terms.write().rows.get_mut(id) {
            Some(term) => {
                term.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Refuses creation of `name` with `403 Forbidden`.
    pub fn forbid(&self, name: impl Into<String>) {
        self.terms.write().forbidden.insert(name.into());
    }

    /// Makes name lookups for `name` answer `404 Not Found` while the term
    /// stays reachable by id and creating it still conflicts. This is what a
    /// client sees when another client creates the term between its lookup
    /// and its create.
    pub fn unlist(&self, name: impl Into<String>) {
        self.terms.write().unlisted.insert(name.into());
    }

    /// Returns the current record for `id`, deleted or not.
    pub fn term(&self, id: &TermId) -> Option<TermRecord> {
        self.terms.read().rows.get(id).map(|term| term.record.clone())
    }

    /// Simulates the network going away. Unreachable services fail every
    /// request without recording it.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Answers every request with `code` until reset with `None`.
    pub fn set_failure(&self, code: Option<StatusCode>) {
        *self.failure.lock() = code;
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Forgets the recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        if request.header(AUTHORIZATION_HEADER) != Some(self.api_key.as_str()) {
            return status(StatusCode::FORBIDDEN);
        }
        let Some(start) = request.url.find("/api/") else {
            return status(StatusCode::NOT_FOUND);
        };
        let segments: Vec<String> = request.url[start + 5..]
            .trim_end_matches('/')
            .split('/')
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
            .collect();
        let since = request.header(IF_MODIFIED_SINCE_HEADER).and_then(parse_http_date);

        match (request.method, segments.as_slice()) {
            (Method::Get, [term, by, id]) if term == "term" && by == "id" => {
                let terms = self.terms.read();
                respond_term(terms.rows.get(&TermId::new(id.as_str())), since)
            }
            (Method::Get, [term, name]) if term == "term" => {
                let terms = self.terms.read();
                if terms.unlisted.contains(name.as_str()) {
                    return status(StatusCode::NOT_FOUND);
                }
                respond_term(terms.by_name(name), since)
            }
            (Method::Put, [term, name]) if term == "term" => self.create(name),
            (Method::Get, [list, prefix, limit]) if list == "term-list" => {
                match limit.parse::<usize>() {
                    Ok(limit) => self.list(prefix, limit),
                    Err(_) => status(StatusCode::BAD_REQUEST),
                }
            }
            (_, [term, ..]) if term == "term" => status(StatusCode::METHOD_NOT_ALLOWED),
            _ => status(StatusCode::NOT_FOUND),
        }
    }

    fn create(&self, name: &str) -> HttpResponse {
        let mut terms = self.terms.write();
        if terms.forbidden.contains(name) {
            return status(StatusCode::FORBIDDEN);
        }
        if let Some(existing) = terms.by_name(name) {
            if existing.deleted {
                return status(StatusCode::GONE);
            }
            let id = existing.record.id.clone().unwrap_or_else(|| TermId::new(""));
            return HttpResponse::new(StatusCode::CONFLICT, id.to_string());
        }
        let id = terms.allocate();
        let mut record = TermRecord::named(name);
        record.id = Some(id.clone());
        terms.rows.insert(
            id.clone(),
            ServiceTerm {
                record,
                modified: Utc::now().timestamp(),
                deleted: false,
            },
        );
        HttpResponse::new(StatusCode::CREATED, id.to_string())
    }

    fn list(&self, prefix: &str, limit: usize) -> HttpResponse {
        let terms = self.terms.read();
        let mut matches: Vec<SummaryRecord> = terms
            .rows
            .values()
            .filter(|term| !term.deleted && term.record.name.starts_with(prefix))
            .filter_map(|term| {
                term.record
                    .id
                    .clone()
                    .map(|id| SummaryRecord::new(id, term.record.name.clone()))
            })
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(limit);
        json_response(StatusCode::OK, &json!(matches))
    }
}

impl HttpClient for TermService {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err("connection refused".to_string());
        }
        self.requests.lock().push(request.clone());
        if let Some(code) = *self.failure.lock() {
            return Ok(status(code));
        }
        Ok(self.handle(request))
    }
}

fn status(code: StatusCode) -> HttpResponse {
    HttpResponse::new(code, Vec::new())
}

fn json_response(code: StatusCode, body: &serde_json::Value) -> HttpResponse {
    HttpResponse::new(code, body.to_string())
}

fn respond_term(term: Option<&ServiceTerm>, since: Option<i64>) -> HttpResponse {
    match term {
        None => status(StatusCode::NOT_FOUND),
        Some(term) if term.deleted => status(StatusCode::GONE),
        Some(term) if since.is_some_and(|since| term.modified <= since) => {
            status(StatusCode::NOT_MODIFIED)
        }
        Some(term) => json_response(StatusCode::OK, &wire_json(&term.record)),
    }
}

/// The JSON shape the service sends for a term.
pub fn wire_json(record: &TermRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "name": record.name,
        "scope_note": record.scope_note,
        "broader": record.broader,
        "narrower": record.narrower,
        "related": record.related,
        "used_for": record.used_for,
        "use": record.use_terms,
    })
}

fn parse_http_date(value: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S GMT")
        .ok()
        .map(|date| date.and_utc().timestamp())
}
