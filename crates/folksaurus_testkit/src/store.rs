//! A local store that records writes.

use folksaurus_client::{AppId, FolksaurusResult, LocalStore, MemoryStore, Term, TermId, TermRecord};
use parking_lot::Mutex;

/// Wraps a [`MemoryStore`] and records every save and delete.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    saves: Mutex<Vec<TermRecord>>,
    deletes: Mutex<Vec<AppId>>,
}

impl RecordingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`. Seeding is not recorded.
    pub fn with_records(records: impl IntoIterator<Item = TermRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.inner.insert(record);
        }
        store
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Returns the records passed to `save_term`, in order.
    pub fn saves(&self) -> Vec<TermRecord> {
        self.saves.lock().clone()
    }

    /// Returns the app ids passed to `delete_term`, in order.
    pub fn deletes(&self) -> Vec<AppId> {
        self.deletes.lock().clone()
    }

    /// Forgets the recorded writes.
    pub fn clear_log(&self) {
        self.saves.lock().clear();
        self.deletes.lock().clear();
    }
}

impl LocalStore for RecordingStore {
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
