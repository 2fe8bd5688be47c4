//! The bounded audit history store.
//!
//! `HistoryStore` keeps past results newest first, capped at a fixed
//! capacity (a sliding window: appending past the cap drops the oldest
//! entries). It is hydrated once from a single key in `KeyValueStorage` and
//! writes its full contents back under that key after every mutation.
//!
//! The in-memory sequence is the source of truth for the running process.
//! Storage failures are logged and otherwise ignored: at worst they lose
//! history on the next start, they never corrupt the live view.

use std::collections::{BTreeMap, HashSet};

use chrono::Local;
use tracing::{debug, info, warn};

use ciphersync_contracts::{
    audit::{AuditDraft, AuditKind, AuditResult},
    error::CipherResult,
};
use ciphersync_core::traits::KeyValueStorage;

pub use ciphersync_contracts::audit::{
    HISTORY_CAPACITY as DEFAULT_CAPACITY, HISTORY_STORAGE_KEY as DEFAULT_STORAGE_KEY,
};

/// Prefix of every generated result id.
pub const ID_PREFIX: &str = "CS-";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ordered, bounded, persisted collection of audit results.
pub struct HistoryStore<S> {
    storage: S,
    key: String,
    capacity: usize,
    entries: Vec<AuditResult>,
}

impl<S: KeyValueStorage> HistoryStore<S> {
    /// An empty store with the default key and capacity. Nothing is read
    /// from `storage` until `hydrate()` is called.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
            capacity: DEFAULT_CAPACITY,
            entries: Vec::new(),
        }
    }

    /// Create a store and hydrate it in one step.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.hydrate();
        store
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use a different capacity. A capacity below 1 is raised to 1.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Replace the in-memory sequence with what storage holds.
    ///
    /// Absent, unreadable, or corrupted data all leave the store empty; none
    /// of them is an error. Loaded entries are re-checked against the store
    /// invariants: duplicate ids keep their first (newest) occurrence and
    /// anything beyond the capacity is dropped.
    pub fn hydrate(&mut self) {
        self.entries = match self.storage.read(&self.key) {
            Ok(None) => {
                debug!(key = %self.key, "no persisted history, starting empty");
                Vec::new()
            }
            Ok(Some(blob)) => match serde_json::from_str::<Vec<AuditResult>>(&blob) {
                Ok(loaded) => self.sanitize(loaded),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "history corruption detected, reinitializing");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(key = %self.key, error = %e, "history unreadable, starting empty");
                Vec::new()
            }
        };

        info!(key = %self.key, entries = self.entries.len(), "history hydrated");
    }

    /// Stamp `draft` with a fresh id and timestamp, insert it as the newest
    /// entry, trim to capacity, and persist.
    ///
    /// Returns the inserted entry.
    pub fn append(&mut self, draft: AuditDraft) -> AuditResult {
        let entry = draft.into_result(self.next_id(), Local::now().format(TIMESTAMP_FORMAT).to_string());

        self.entries.insert(0, entry.clone());
        self.entries.truncate(self.capacity);

        debug!(id = %entry.id, kind = %entry.kind, entries = self.entries.len(), "history entry appended");
        self.persist();
        entry
    }

    /// Remove the entry with `id`. Unknown ids are a no-op.
    ///
    /// Returns whether an entry was removed. Persists either way.
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;

        debug!(%id, removed, "history delete");
        self.persist();
        removed
    }

    /// Drop every entry and persist the empty sequence.
    pub fn purge_all(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();

        info!(dropped, "history purged");
        self.persist();
    }

    /// Write the full sequence to storage, logging any failure.
    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!(key = %self.key, error = %e, "history persist failed; in-memory state retained");
        }
    }

    /// Write the full sequence to storage, returning any failure.
    pub fn try_persist(&self) -> CipherResult<()> {
        let blob = serde_json::to_string(&self.entries)?;
        self.storage.write(&self.key, &blob)
    }

    // ── Read access ───────────────────────────────────────────────────────────

    /// All entries, newest first.
    pub fn entries(&self) -> &[AuditResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: &str) -> Option<&AuditResult> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of entries per tool kind. Kinds with no entries are absent.
    pub fn count_by_kind(&self) -> BTreeMap<AuditKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// A `CS-XXXXXXXX` id not currently used by any entry.
    fn next_id(&self) -> String {
        loop {
            let token = uuid::Uuid::new_v4().simple().to_string();
            let id = format!("{ID_PREFIX}{}", token[..8].to_ascii_uppercase());
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn sanitize(&self, loaded: Vec<AuditResult>) -> Vec<AuditResult> {
        let total = loaded.len();
        let mut seen = HashSet::new();
        let mut kept: Vec<AuditResult> = loaded
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        kept.truncate(self.capacity);

        if kept.len() != total {
            warn!(
                key = %self.key,
                loaded = total,
                kept = kept.len(),
                "persisted history exceeded capacity or repeated ids; trimmed"
            );
        }
        kept
    }
}
