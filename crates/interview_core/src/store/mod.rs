//! Keyed document store contracts and backends.
//!
//! # Responsibility
//! - Define the create-or-replace / keyed-read contract the loader and the
//!   read path depend on.
//! - Keep transport details (SQLite, Firestore REST, memory) behind it.
//!
//! # Invariants
//! - `set_document` replaces the whole document; it never merges fields.
//! - Every backend rejects illegal document keys before touching storage.

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod firestore;
mod firestore_value;
pub mod memory;
pub mod sqlite;

pub use firestore::FirestoreDocumentStore;
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Fixed collection holding every catalog problem.
pub const PROBLEMS_COLLECTION: &str = "codinginterview-problems";

const MAX_DOCUMENT_KEY_BYTES: usize = 1500;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store transport and contract errors.
#[derive(Debug)]
pub enum StoreError {
    InvalidKey(String),
    InvalidEndpoint(String),
    Db(DbError),
    Http(reqwest::Error),
    Status { status: u16, body: String },
    Json(serde_json::Error),
    InvalidDocument(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid document key `{key}`"),
            Self::InvalidEndpoint(message) => write!(f, "invalid store endpoint: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "store responded with HTTP {status}: {body}")
            }
            Self::Json(err) => write!(f, "document is not valid JSON: {err}"),
            Self::InvalidDocument(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Http(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidKey(_)
            | Self::InvalidEndpoint(_)
            | Self::Status { .. }
            | Self::InvalidDocument(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Keyed, schemaless document collection.
pub trait DocumentStore {
    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;

    /// Creates or fully replaces the document at `key` in `collection`.
    fn set_document(&self, collection: &str, key: &str, document: &Value) -> StoreResult<()>;

    /// Reads the document at `key`, or `None` when it does not exist.
    fn get_document(&self, collection: &str, key: &str) -> StoreResult<Option<Value>>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn set_document(&self, collection: &str, key: &str, document: &Value) -> StoreResult<()> {
        (**self).set_document(collection, key, document)
    }

    fn get_document(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        (**self).get_document(collection, key)
    }
}

/// Returns whether `key` can address a document.
///
/// Legal keys are non-empty, at most 1500 bytes, contain no `/`, are not
/// `.` or `..`, and do not use the reserved `__name__` form.
pub fn is_valid_document_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_DOCUMENT_KEY_BYTES
        && !key.contains('/')
        && key != "."
        && key != ".."
        && !(key.len() >= 4 && key.starts_with("__") && key.ends_with("__"))
}

pub(crate) fn ensure_valid_key(collection: &str, key: &str) -> StoreResult<()> {
    if !is_valid_document_key(collection) {
        return Err(StoreError::InvalidKey(collection.to_string()));
    }
    if !is_valid_document_key(key) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
