//! Term lookup and cache reconciliation.
//!
//! Every lookup first consults the local store. A cached term younger than
//! the configured expire time is returned as is; an older one is checked
//! against the service and the store is brought up to date with the answer.

use crate::config::ClientConfig;
use crate::error::FolksaurusResult;
use crate::store::LocalStore;
use crate::term::{Term, TermResolver, TermSummary};
use crate::transport::TermTransport;
use chrono::Utc;
use folksaurus_protocol::{AppId, Outcome, TermId, TermRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Retrieves terms and keeps the local store in sync with the term service.
///
/// The manager shares its transport and store; it holds no other state.
pub struct TermManager<T: TermTransport, S: LocalStore> {
    config: ClientConfig,
    transport: Arc<T>,
    store: Arc<S>,
}

impl<T: TermTransport, S: LocalStore> TermManager<T, S> {
    /// Creates a manager over the given transport and store.
    pub fn new(config: ClientConfig, transport: Arc<T>, store: Arc<S>) -> Self {
        Self {
            config,
            transport,
            store,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the local store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gets a term by the id the application assigned to it.
    ///
    /// An app id the store does not know cannot be looked up remotely, so
    /// this returns `None` without contacting the service.
    pub fn term_by_app_id(&self, app_id: &AppId) -> FolksaurusResult<Option<Term>> {
        match self.store.get_term_by_app_id(app_id)? {
            Some(record) => self.reconcile(Term::from_record(record)?),
            None => {
                debug!(app_id = %app_id, "app id not in local store");
                Ok(None)
            }
        }
    }

    /// Gets a term by its service id.
    pub fn term_by_remote_id(&self, id: &TermId) -> FolksaurusResult<Option<Term>> {
        if let Some(record) = self.store.get_term_by_remote_id(id)? {
            return self.reconcile(Term::from_record(record)?);
        }
        debug!(id = %id, "term not cached, fetching by id");
        let outcome = self.transport.get_term_by_id(id)?;
        self.adopt(outcome)
    }

    /// Gets a term by name.
    pub fn term_by_name(&self, name: &str) -> FolksaurusResult<Option<Term>> {
        if let Some(record) = self.store.get_term_by_name(name)? {
            return self.reconcile(Term::from_record(record)?);
        }
        debug!(name, "term not cached, fetching by name");
        let outcome = self.transport.get_term_by_name(name)?;
        self.adopt(outcome)
    }

    /// Gets a term by name, creating it on the service if needed.
    ///
    /// If the service cannot be reached or gives no term, a placeholder with
    /// only the name is stored so a later lookup retries. `None` means the
    /// service refused the name (`Forbidden` or `Gone`), or a cached copy was
    /// found to be deleted remotely.
    pub fn get_or_create_term(&self, name: &str) -> FolksaurusResult<Option<Term>> {
        if let Some(record) = self.store.get_term_by_name(name)? {
            return self.reconcile(Term::from_record(record)?);
        }
        match self.transport.get_or_create_term(name)? {
            Outcome::Found(record) | Outcome::Created(record) | Outcome::Conflict(record) => {
                self.fetched(record, None).map(Some)
            }
            Outcome::Forbidden | Outcome::Gone => {
                info!(name, "service refused to create term");
                Ok(None)
            }
            other => {
                warn!(name, status = %other.status(), "storing placeholder term");
                self.save(Term::placeholder(name)?).map(Some)
            }
        }
    }

    /// Lists terms whose names start with `prefix`.
    ///
    /// Uses the configured list limit when `limit` is `None`. An answer
    /// without a list yields an empty result.
    pub fn search(&self, prefix: &str, limit: Option<u32>) -> FolksaurusResult<Vec<TermSummary>> {
        let limit = limit.unwrap_or(self.config.term_list_limit);
        match self.transport.get_term_list(prefix, limit)?.into_value() {
            Some(list) => Ok(list.into_iter().map(TermSummary::from).collect()),
            None => {
                warn!(prefix, limit, "term list unavailable");
                Ok(Vec::new())
            }
        }
    }

    fn expire_secs(&self) -> i64 {
        i64::try_from(self.config.expire_time.as_secs()).unwrap_or(i64::MAX)
    }

    /// Brings a cached term up to date.
    ///
    /// Returns the term unchanged when it is fresh or when the service gives
    /// no authoritative answer, and `None` when the service reports it gone.
    fn reconcile(&self, term: Term) -> FolksaurusResult<Option<Term>> {
        let age = Utc::now().timestamp().saturating_sub(term.last_retrieved());
        if age <= self.expire_secs() {
            return Ok(Some(term));
        }
        debug!(name = term.name(), age, "cached term expired");

        let mut outcome = match term.id() {
            Some(id) => self
                .transport
                .get_term_by_id_if_modified_since(id, term.last_retrieved())?,
            None => Outcome::NotFound,
        };
        // NotModified and Gone are authoritative for the id; any other
        // answer without a record falls back to the name.
        if !outcome.has_value() && !matches!(outcome, Outcome::NotModified | Outcome::Gone) {
            outcome = self.transport.get_or_create_term(term.name())?;
        }

        match outcome {
            Outcome::Found(record) | Outcome::Created(record) | Outcome::Conflict(record) => {
                info!(name = term.name(), "term updated from service");
                let app_id = term.app_id().cloned();
                self.fetched(record, app_id).map(Some)
            }
            Outcome::NotModified => {
                let mut term = term;
                term.touch();
                self.save(term).map(Some)
            }
            Outcome::Gone => {
                info!(name = term.name(), "term deleted on service");
                match term.app_id() {
                    Some(app_id) => self.store.delete_term(app_id)?,
                    None => warn!(name = term.name(), "gone term has no app id"),
                }
                Ok(None)
            }
            other => {
                warn!(
                    name = term.name(),
                    status = %other.status(),
                    "could not refresh term, returning cached copy"
                );
                Ok(Some(term))
            }
        }
    }

    /// Stores a freshly fetched record when the outcome carries one.
    fn adopt(&self, outcome: Outcome<TermRecord>) -> FolksaurusResult<Option<Term>> {
        match outcome.into_value() {
            Some(record) => self.fetched(record, None).map(Some),
            None => Ok(None),
        }
    }

    fn fetched(&self, record: TermRecord, app_id: Option<AppId>) -> FolksaurusResult<Term> {
        let mut term = Term::from_record(record)?;
        if let Some(app_id) = app_id {
            term.set_app_id(app_id);
        }
        term.touch();
        self.save(term)
    }

    fn save(&self, mut term: Term) -> FolksaurusResult<Term> {
        let app_id = self.store.save_term(&term)?;
        term.set_app_id(app_id);
        Ok(term)
    }
}

impl<T: TermTransport, S: LocalStore> TermResolver for TermManager<T, S> {
    fn resolve_term(&self, id: &TermId) -> FolksaurusResult<Option<Term>> {
        self.term_by_remote_id(id)
    }
}

#[cfg(feature = "reqwest")]
impl<S: LocalStore> TermManager<crate::http::HttpTransport<crate::reqwest_client::ReqwestClient>, S> {
    /// Loads the configuration file and builds an HTTP-backed manager.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing, malformed or
    /// lacks a required key, and a transport error if the HTTP client cannot
    /// be built.
    pub fn from_config_file(
        store: Arc<S>,
        path: impl AsRef<std::path::Path>,
        section: Option<&str>,
    ) -> FolksaurusResult<Self> {
        let config = ClientConfig::from_file(path, section)?;
        let client = crate::reqwest_client::ReqwestClient::new(config.timeout)?;
        let transport = crate::http::HttpTransport::from_config(&config, client);
        Ok(Self::new(config, Arc::new(transport), store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::term::Preferred;
    use crate::transport::{MockTransport, TransportCall};
    use crate::FolksaurusError;
    use folksaurus_protocol::{StatusCode, SummaryRecord};
    use parking_lot::Mutex;
    use std::time::Duration;

    const HOUR: i64 = 60 * 60;
    const DAY: i64 = 24 * HOUR;

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        saves: Mutex<Vec<TermRecord>>,
        deletes: Mutex<Vec<AppId>>,
    }

    impl LocalStore for CountingStore {
        fn get_term_by_app_id(&self, app_id: &AppId) -> FolksaurusResult<Option<TermRecord>> {
            self.inner.get_term_by_app_id(app_id)
        }

        fn get_term_by_remote_id(&self, id: &TermId) -> FolksaurusResult<Option<TermRecord>> {
            self.inner.get_term_by_remote_id(id)
        }

        fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Option<TermRecord>> {
            self.inner.get_term_by_name(name)
        }

        fn save_term(&self, term: &Term) -> FolksaurusResult<AppId> {
            self.saves.lock().push(term.to_record());
            self.inner.save_term(term)
        }

        fn delete_term(&self, app_id: &AppId) -> FolksaurusResult<()> {
            self.deletes.lock().push(app_id.clone());
            self.inner.delete_term(app_id)
        }
    }

    struct Fixture {
        transport: Arc<MockTransport>,
        store: Arc<CountingStore>,
        manager: TermManager<MockTransport, CountingStore>,
    }

    fn fixture() -> Fixture {
        let transport = Arc::new(MockTransport::new());
        let store = Arc::new(CountingStore::default());
        let config = ClientConfig::new("key", "http://folksaurus.test")
            .with_expire_time(Duration::from_secs(HOUR as u64));
        let manager = TermManager::new(config, Arc::clone(&transport), Arc::clone(&store));
        Fixture {
            transport,
            store,
            manager,
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }

    fn foo(last_retrieved: i64) -> TermRecord {
        TermRecord {
            id: Some(TermId::from(1u64)),
            app_id: Some(AppId::from(100u64)),
            scope_note: "Original scope note".into(),
            last_retrieved,
            broader: vec![SummaryRecord::new(2u64, "Super Foo")],
            ..TermRecord::named("Foo")
        }
    }

    fn remote_foo(scope_note: &str) -> TermRecord {
        TermRecord {
            id: Some(TermId::from(1u64)),
            scope_note: scope_note.into(),
            broader: vec![SummaryRecord::new(2u64, "Super Foo")],
            ..TermRecord::named("Foo")
        }
    }

    #[test]
    fn unknown_app_id_makes_no_remote_call() {
        let f = fixture();

        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap();
        assert!(term.is_none());
        assert_eq!(f.transport.call_count(), 0);
    }

    #[test]
    fn fresh_term_is_returned_without_remote_call() {
        let f = fixture();
        f.store.inner.insert(foo(now() - 60));

        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
        assert_eq!(term.to_record(), f.store.inner.get_term_by_app_id(&AppId::from(100u64)).unwrap().unwrap());
        assert_eq!(f.transport.call_count(), 0);
        assert!(f.store.saves.lock().is_empty());
    }

    #[test]
    fn stale_term_is_updated() {
        let f = fixture();
        let yesterday = now() - DAY;
        f.store.inner.insert(foo(yesterday));
        f.transport
            .set_by_id_if_modified_response(Outcome::Found(remote_foo("Updated scope note")));

        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
        assert_eq!(term.scope_note(), "Updated scope note");
        assert_eq!(term.app_id(), Some(&AppId::from(100u64)));
        assert!(term.last_retrieved() > yesterday);
        assert_eq!(f.store.saves.lock().len(), 1);
        assert_eq!(
            f.transport.calls(),
            vec![TransportCall::GetByIdIfModifiedSince(TermId::from(1u64), yesterday)]
        );

        let stored = f.store.inner.get_term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
        assert_eq!(stored.scope_note, "Updated scope note");
    }

    #[test]
    fn not_modified_touches_and_saves_once() {
        let f = fixture();
        let yesterday = now() - DAY;
        f.store.inner.insert(foo(yesterday));
        f.transport.set_by_id_if_modified_response(Outcome::NotModified);

        let before = now();
        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
        assert!(term.last_retrieved() >= before);
        assert_eq!(term.scope_note(), "Original scope note");
        assert_eq!(term.broader(), &[crate::TermSummary::new(2u64, "Super Foo")]);

        let saves = f.store.saves.lock();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].last_retrieved, term.last_retrieved());
        assert_eq!(f.transport.call_count(), 1);
    }

    #[test]
    fn gone_deletes_once_and_never_saves() {
        let f = fixture();
        f.store.inner.insert(foo(now() - DAY));
        f.transport.set_by_id_if_modified_response(Outcome::Gone);

        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap();
        assert!(term.is_none());
        assert_eq!(*f.store.deletes.lock(), vec![AppId::from(100u64)]);
        assert!(f.store.saves.lock().is_empty());
        assert!(f.store.inner.is_deleted(&AppId::from(100u64)));
    }

    #[test]
    fn gone_from_name_fallback_deletes() {
        let f = fixture();
        f.store.inner.insert(TermRecord {
            app_id: Some(AppId::from(7u64)),
            last_retrieved: 0,
            ..TermRecord::named("Foo")
        });
        f.transport.set_create_response(Outcome::Gone);

        assert!(f.manager.term_by_name("Foo").unwrap().is_none());
        assert_eq!(*f.store.deletes.lock(), vec![AppId::from(7u64)]);
        assert!(f.store.saves.lock().is_empty());
    }

    #[test]
    fn term_without_id_is_reconciled_by_name() {
        let f = fixture();
        f.store.inner.insert(TermRecord {
            app_id: Some(AppId::from(100u64)),
            ..TermRecord::named("Foo")
        });
        f.transport
            .set_by_name_response(Outcome::Found(remote_foo("From the service")));

        let term = f.manager.term_by_name("Foo").unwrap().unwrap();
        assert_eq!(term.id(), Some(&TermId::from(1u64)));
        assert_eq!(term.app_id(), Some(&AppId::from(100u64)));
        assert_eq!(term.scope_note(), "From the service");
        assert_eq!(f.transport.calls(), vec![TransportCall::GetByName("Foo".into())]);
        assert_eq!(f.store.inner.len(), 1);
    }

    #[test]
    fn id_not_found_falls_back_to_name() {
        let f = fixture();
        f.store.inner.insert(foo(now() - DAY));
        f.transport.set_by_id_if_modified_response(Outcome::NotFound);
        f.transport
            .set_by_name_response(Outcome::Found(remote_foo("Found by name")));

        let term = f.manager.term_by_remote_id(&TermId::from(1u64)).unwrap().unwrap();
        assert_eq!(term.scope_note(), "Found by name");
        let calls = f.transport.calls();
        assert!(matches!(calls[0], TransportCall::GetByIdIfModifiedSince(..)));
        assert_eq!(calls[1], TransportCall::GetByName("Foo".into()));
    }

    #[test]
    fn unexpected_status_returns_cached_term() {
        let f = fixture();
        let yesterday = now() - DAY;
        f.store.inner.insert(foo(yesterday));
        f.transport
            .set_by_id_if_modified_response(Outcome::Unexpected(StatusCode::SERVER_ERROR));
        f.transport
            .set_create_response(Outcome::Unexpected(StatusCode::SERVER_ERROR));

        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
        assert_eq!(term.last_retrieved(), yesterday);
        assert_eq!(term.scope_note(), "Original scope note");
        assert!(f.store.saves.lock().is_empty());
        assert!(f.store.deletes.lock().is_empty());
        assert_eq!(
            f.transport.calls(),
            vec![
                TransportCall::GetByIdIfModifiedSince(TermId::from(1u64), yesterday),
                TransportCall::GetByName("Foo".into()),
                TransportCall::Create("Foo".into()),
            ]
        );
    }

    #[test]
    fn failed_id_check_falls_back_to_name() {
        for failure in [
            Outcome::Unexpected(StatusCode::SERVER_ERROR),
            Outcome::Forbidden,
        ] {
            let f = fixture();
            let yesterday = now() - DAY;
            f.store.inner.insert(foo(yesterday));
            f.transport.set_by_id_if_modified_response(failure);
            f.transport.set_by_name_response(Outcome::Found(remote_foo("fresh")));

            let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
            assert_eq!(term.scope_note(), "fresh");
            assert_eq!(term.app_id(), Some(&AppId::from(100u64)));
            assert!(term.last_retrieved() > yesterday);
            assert_eq!(f.store.saves.lock().len(), 1);
            assert_eq!(
                f.transport.calls(),
                vec![
                    TransportCall::GetByIdIfModifiedSince(TermId::from(1u64), yesterday),
                    TransportCall::GetByName("Foo".into()),
                ]
            );
        }
    }

    #[test]
    fn not_modified_and_gone_skip_name_fallback() {
        for answer in [Outcome::NotModified, Outcome::Gone] {
            let f = fixture();
            f.store.inner.insert(foo(now() - DAY));
            f.transport.set_by_id_if_modified_response(answer);
            f.transport.set_by_name_response(Outcome::Found(remote_foo("by name")));

            let _ = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap();
            assert_eq!(f.transport.call_count(), 1);
        }
    }

    #[test]
    fn not_found_everywhere_returns_cached_term() {
        let f = fixture();
        f.store.inner.insert(TermRecord {
            app_id: Some(AppId::from(100u64)),
            ..TermRecord::named("Foo")
        });

        let term = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap().unwrap();
        assert_eq!(term.name(), "Foo");
        assert!(term.id().is_none());
        assert!(f.store.saves.lock().is_empty());
        assert!(f.store.deletes.lock().is_empty());
    }

    #[test]
    fn transport_error_propagates() {
        let f = fixture();
        f.store.inner.insert(foo(now() - DAY));
        f.transport.set_connected(false);

        let err = f.manager.term_by_app_id(&AppId::from(100u64)).unwrap_err();
        assert!(err.is_retryable());
        assert!(f.store.saves.lock().is_empty());
    }

    #[test]
    fn uncached_remote_id_is_fetched_and_stored() {
        let f = fixture();
        f.transport.set_by_id_response(Outcome::Found(remote_foo("Remote")));

        let before = now();
        let term = f.manager.term_by_remote_id(&TermId::from(1u64)).unwrap().unwrap();
        assert!(term.last_retrieved() >= before);
        assert!(term.app_id().is_some());
        assert_eq!(f.store.saves.lock().len(), 1);
        assert_eq!(f.transport.calls(), vec![TransportCall::GetById(TermId::from(1u64))]);
    }

    #[test]
    fn uncached_remote_id_not_found_is_none() {
        let f = fixture();

        assert!(f.manager.term_by_remote_id(&TermId::from(1u64)).unwrap().is_none());
        assert!(f.store.saves.lock().is_empty());
    }

    #[test]
    fn uncached_name_is_fetched_and_stored() {
        let f = fixture();
        f.transport.set_by_name_response(Outcome::Found(remote_foo("Remote")));

        let term = f.manager.term_by_name("Foo").unwrap().unwrap();
        assert_eq!(term.id(), Some(&TermId::from(1u64)));
        assert_eq!(f.store.inner.len(), 1);

        f.transport.set_by_name_response(Outcome::NotFound);
        assert!(f.manager.term_by_name("Bar").unwrap().is_none());
        assert_eq!(f.store.inner.len(), 1);
    }

    #[test]
    fn get_or_create_conflict_returns_existing_term() {
        let f = fixture();
        f.transport.set_create_response(Outcome::Conflict(TermId::from(1u64)));
        f.transport.set_by_id_response(Outcome::Found(remote_foo("Existing")));

        let term = f.manager.get_or_create_term("Foo").unwrap().unwrap();
        assert_eq!(term.id(), Some(&TermId::from(1u64)));
        assert_eq!(term.scope_note(), "Existing");
        assert_eq!(
            f.transport.calls(),
            vec![
                TransportCall::GetByName("Foo".into()),
                TransportCall::Create("Foo".into()),
                TransportCall::GetById(TermId::from(1u64)),
            ]
        );
        let stored = f.store.inner.get_term_by_remote_id(&TermId::from(1u64)).unwrap().unwrap();
        assert_eq!(stored.scope_note, "Existing");
        assert_eq!(stored.app_id.as_ref(), term.app_id());
    }

    #[test]
    fn get_or_create_creates_remotely() {
        let f = fixture();
        f.transport.set_create_response(Outcome::Created(TermId::from(1u64)));
        f.transport.set_by_id_response(Outcome::Found(remote_foo("")));

        let term = f.manager.get_or_create_term("Foo").unwrap().unwrap();
        assert_eq!(term.id(), Some(&TermId::from(1u64)));
        assert!(term.last_retrieved() > 0);
        assert_eq!(
            f.transport.calls(),
            vec![
                TransportCall::GetByName("Foo".into()),
                TransportCall::Create("Foo".into()),
                TransportCall::GetById(TermId::from(1u64)),
            ]
        );
    }

    #[test]
    fn get_or_create_stores_placeholder_when_service_fails() {
        let f = fixture();
        f.transport
            .set_create_response(Outcome::Unexpected(StatusCode::SERVER_ERROR));

        let term = f.manager.get_or_create_term("Foo").unwrap().unwrap();
        assert_eq!(term.name(), "Foo");
        assert!(term.id().is_none());
        assert_eq!(term.last_retrieved(), 0);
        assert!(term.app_id().is_some());

        let saves = f.store.saves.lock();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].name, "Foo");
    }

    #[test]
    fn get_or_create_refused_names() {
        for refusal in [Outcome::Forbidden, Outcome::Gone] {
            let f = fixture();
            f.transport.set_create_response(refusal);

            assert!(f.manager.get_or_create_term("Foo").unwrap().is_none());
            assert!(f.store.saves.lock().is_empty());
        }
    }

    #[test]
    fn get_or_create_reuses_cached_term() {
        let f = fixture();
        f.store.inner.insert(foo(now()));

        let term = f.manager.get_or_create_term("Foo").unwrap().unwrap();
        assert_eq!(term.app_id(), Some(&AppId::from(100u64)));
        assert_eq!(f.transport.call_count(), 0);
    }

    #[test]
    fn placeholder_is_synced_on_next_lookup() {
        let f = fixture();
        f.transport
            .set_create_response(Outcome::Unexpected(StatusCode::SERVER_ERROR));
        let placeholder = f.manager.get_or_create_term("Foo").unwrap().unwrap();

        f.transport.set_create_response(Outcome::Created(TermId::from(1u64)));
        f.transport.set_by_id_response(Outcome::Found(remote_foo("Synced")));
        let synced = f.manager.get_or_create_term("Foo").unwrap().unwrap();

        assert_eq!(synced.app_id(), placeholder.app_id());
        assert_eq!(synced.id(), Some(&TermId::from(1u64)));
        assert_eq!(f.store.inner.len(), 1);
    }

    #[test]
    fn malformed_remote_term_is_an_error() {
        let f = fixture();
        f.transport.set_by_id_response(Outcome::Found(TermRecord::named("")));

        let err = f.manager.term_by_remote_id(&TermId::from(1u64)).unwrap_err();
        assert!(matches!(err, FolksaurusError::InvalidTerm(_)));
    }

    #[test]
    fn search_uses_configured_limit() {
        let f = fixture();
        f.transport.set_term_list_response(Outcome::Found(vec![
            SummaryRecord::new(1u64, "Foo"),
            SummaryRecord::new(3u64, "Food"),
        ]));

        let found = f.manager.search("Foo", None).unwrap();
        assert_eq!(
            found.iter().map(TermSummary::name).collect::<Vec<_>>(),
            ["Foo", "Food"]
        );
        assert_eq!(
            f.transport.calls(),
            vec![TransportCall::GetTermList("Foo".into(), 25)]
        );

        f.manager.search("F", Some(5)).unwrap();
        assert_eq!(
            f.transport.calls()[1],
            TransportCall::GetTermList("F".into(), 5)
        );
    }

    #[test]
    fn search_without_list_is_empty() {
        let f = fixture();
        f.transport.set_term_list_response(Outcome::Forbidden);

        assert!(f.manager.search("Foo", None).unwrap().is_empty());
    }

    #[test]
    fn preferred_resolves_through_manager() {
        let f = fixture();
        f.store.inner.insert(TermRecord {
            id: Some(TermId::from(5u64)),
            last_retrieved: now(),
            use_terms: vec![SummaryRecord::new(1u64, "Foo")],
            ..TermRecord::named("Fu")
        });
        f.transport.set_by_id_response(Outcome::Found(remote_foo("Preferred")));

        let fu = f.manager.term_by_name("Fu").unwrap().unwrap();
        match fu.preferred(&f.manager).unwrap() {
            Preferred::Single(Some(term)) => assert_eq!(term.name(), "Foo"),
            other => panic!("unexpected {other:?}"),
        }

        // The resolved term is now cached.
        assert!(f.store.inner.get_term_by_remote_id(&TermId::from(1u64)).unwrap().is_some());
    }
}
