//! # ciphersync-vault
//!
//! The audit history vault for CipherSync: a bounded, newest-first list of
//! past tool results, hydrated once from durable key/value storage and
//! written through on every change.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ciphersync_vault::{FileStorage, HistoryStore};
//!
//! let mut store = HistoryStore::open(FileStorage::new(".ciphersync"));
//! let entry = store.append(draft);
//! store.delete_by_id(&entry.id);
//! ```

pub mod storage;
pub mod store;

pub use storage::{FileStorage, InMemoryStorage};
pub use store::{HistoryStore, DEFAULT_CAPACITY, DEFAULT_STORAGE_KEY};

// ── Tests ─────────────────────────────────────────────────────────────────────
