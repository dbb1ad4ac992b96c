//! KeyStore - whole-document key-value persistence
//!
//! Values are complete JSON documents stored under short string keys, the
//! same contract a browser's local storage offers. Callers read a document,
//! change it in memory and write the whole document back.
//!
//! # Layout
//!
//! ```text
//! <store>/
//! ├── .lock               # advisory lock held while writing
//! ├── weeklyTasks.json
//! ├── weeklyReports.json
//! └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keystore::{FileStore, KeyValueStore};
//!
//! let store = FileStore::open(".weekplan")?;
//! store.set("lastWeekStart", "\"2026-10-12\"")?;
//! let start: Option<String> = store.get_json("lastWeekStart")?;
//! ```

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// File extension used for stored documents
pub const DOCUMENT_EXTENSION: &str = "json";
