//! Local term storage.
//!
//! The caller owns persistence. The manager only needs the small contract in
//! [`LocalStore`]; [`MemoryStore`] and [`FileStore`] are ready-made
//! implementations for tests and simple tools.

use crate::error::FolksaurusResult;
use crate::term::Term;
use folksaurus_protocol::{AppId, TermId, TermRecord};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Storage for cached terms, keyed by application id.
///
/// Records returned by the getters must carry their `app_id`. Soft-deleted
/// rows are invisible to every getter.
pub trait LocalStore: Send + Sync {
    /// Retrieves a term by the id the application assigned to it.
    fn get_term_by_app_id(&self, app_id: &AppId) -> FolksaurusResult<Option<TermRecord>>;

    /// Retrieves a term by its service id.
    fn get_term_by_remote_id(&self, id: &TermId) -> FolksaurusResult<Option<TermRecord>>;

    /// Retrieves a term by its name.
    fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Option<TermRecord>>;

    /// Inserts or updates a term and returns the app id it is stored under.
    ///
    /// A term that already has an app id must update that row, so the link
    /// between the application's id and the service's id survives updates.
    fn save_term(&self, term: &Term) -> FolksaurusResult<AppId>;

    /// Flags a term as deleted. The row is kept.
    fn delete_term(&self, app_id: &AppId) -> FolksaurusResult<()>;
}

/// A stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTerm {
    /// The term record, `app_id` always set.
    pub record: TermRecord,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Default)]
struct Rows {
    rows: BTreeMap<AppId, StoredTerm>,
    next_app_id: u64,
}

impl Rows {
    fn allocate(&mut self) -> AppId {
        loop {
            self.next_app_id += 1;
            let id = AppId::from(self.next_app_id);
            if !self.rows.contains_key(&id) {
                return id;
            }
        }
    }

    fn find_live(&self, predicate: impl Fn(&TermRecord) -> bool) -> Option<&StoredTerm> {
        self.rows
            .values()
            .find(|row| !row.deleted && predicate(&row.record))
    }
}

/// An in-memory store.
///
/// Upserts resolve the target row by app id, then by service id, then by
/// name, considering only live rows for the latter two.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Rows>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `rows`.
    pub fn from_rows(rows: impl IntoIterator<Item = StoredTerm>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            for mut row in rows {
                let app_id = match row.record.app_id.clone() {
                    Some(app_id) => app_id,
                    None => inner.allocate(),
                };
                row.record.app_id = Some(app_id.clone());
                inner.rows.insert(app_id, row);
            }
        }
        store
    }

    /// Inserts a raw record, allocating an app id if it has none.
    pub fn insert(&self, mut record: TermRecord) -> AppId {
        let mut inner = self.inner.write();
        let app_id = match record.app_id.clone() {
            Some(app_id) => app_id,
            None => inner.allocate(),
        };
        record.app_id = Some(app_id.clone());
        inner.rows.insert(
            app_id.clone(),
            StoredTerm {
                record,
                deleted: false,
            },
        );
        app_id
    }

    /// Returns all rows, deleted ones included, ordered by app id.
    pub fn rows(&self) -> Vec<StoredTerm> {
        self.inner.read().rows.values().cloned().collect()
    }

    /// Returns true if the row exists and is flagged deleted.
    pub fn is_deleted(&self, app_id: &AppId) -> bool {
        self.inner
            .read()
            .rows
            .get(app_id)
            .is_some_and(|row| row.deleted)
    }

    /// Replaces every row with `rows`. The app id counter is kept, so ids
    /// handed out before are not reused.
    fn restore(&self, rows: Vec<StoredTerm>) {
        let mut inner = self.inner.write();
        inner.rows = rows
            .into_iter()
            .filter_map(|row| row.record.app_id.clone().map(|app_id| (app_id, row)))
            .collect();
    }

    /// Returns the number of live rows.
    pub fn len(&self) -> usize {
        self.inner.read().rows.values().filter(|row| !row.deleted).count()
    }

    /// Returns true if there are no live rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStore for MemoryStore {
    fn get_term_by_app_id(&self, app_id: &AppId) -> FolksaurusResult<Option<TermRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .rows
            .get(app_id)
            .filter(|row| !row.deleted)
            .map(|row| row.record.clone()))
    }

    fn get_term_by_remote_id(&self, id: &TermId) -> FolksaurusResult<Option<TermRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .find_live(|record| record.id.as_ref() == Some(id))
            .map(|row| row.record.clone()))
    }

    fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Option<TermRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .find_live(|record| record.name == name)
            .map(|row| row.record.clone()))
    }

    fn save_term(&self, term: &Term) -> FolksaurusResult<AppId> {
        let mut inner = self.inner.write();
        let existing = term.app_id().cloned().or_else(|| {
            term.id()
                .and_then(|id| inner.find_live(|record| record.id.as_ref() == Some(id)))
                .or_else(|| inner.find_live(|record| record.name == term.name()))
                .and_then(|row| row.record.app_id.clone())
        });
        let app_id = match existing {
            Some(app_id) => app_id,
            None => inner.allocate(),
        };

        let mut record = term.to_record();
        record.app_id = Some(app_id.clone());
        let deleted = inner.rows.get(&app_id).is_some_and(|row| row.deleted);
        if deleted {
            debug!(app_id = %app_id, "updating a deleted term row; it stays deleted");
        }
        inner
            .rows
            .insert(app_id.clone(), StoredTerm { record, deleted });
        Ok(app_id)
    }

    fn delete_term(&self, app_id: &AppId) -> FolksaurusResult<()> {
        match self.inner.write().rows.get_mut(app_id) {
            Some(row) => row.deleted = true,
            None => warn!(app_id = %app_id, "delete requested for unknown term"),
        }
        Ok(())
    }
}

/// A [`MemoryStore`] persisted as a JSON file.
///
/// The whole file is rewritten after every mutation, through a temporary
/// file in the same directory that is renamed into place. Mutations are
/// serialized; one whose write fails is undone in memory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
    writer: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> FolksaurusResult<Self> {
        let path = path.as_ref().to_path_buf();
        let memory = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            let rows: Vec<StoredTerm> = if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&text)?
            };
            MemoryStore::from_rows(rows)
        } else {
            MemoryStore::new()
        };
        Ok(Self {
            path,
            memory,
            writer: Mutex::new(()),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory view of the store.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Applies `mutate` to the in-memory rows and writes the result out.
    fn write_through<R>(
        &self,
        mutate: impl FnOnce(&MemoryStore) -> FolksaurusResult<R>,
    ) -> FolksaurusResult<R> {
        let _writer = self.writer.lock();
        let before = self.memory.rows();
        let result = mutate(&self.memory)?;
        if let Err(err) = self.persist() {
            warn!(path = %self.path.display(), error = %err, "term store write failed, rolling back");
            self.memory.restore(before);
            return Err(err);
        }
        Ok(result)
    }

    fn persist(&self) -> FolksaurusResult<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let json = serde_json::to_vec_pretty(&self.memory.rows())?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get_term_by_app_id(&self, app_id: &AppId) -> FolksaurusResult<Option<TermRecord>> {
        self.memory.get_term_by_app_id(app_id)
    }

    fn get_term_by_remote_id(&self, id: &TermId) -> FolksaurusResult<Option<TermRecord>> {
        self.memory.get_term_by_remote_id(id)
    }

    fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Option<TermRecord>> {
        self.memory.get_term_by_name(name)
    }

    fn save_term(&self, term: &Term) -> FolksaurusResult<AppId> {
        self.write_through(|memory| memory.save_term(term))
    }

    fn delete_term(&self, app_id: &AppId) -> FolksaurusResult<()> {
        self.write_through(|memory| memory.delete_term(app_id))
    }
}
