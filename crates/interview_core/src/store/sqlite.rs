//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist one JSON body per `(collection, key)` in the `documents` table.
//!
//! # Invariants
//! - Writes replace the stored body wholesale and bump `write_count`.
//! - Reads reject bodies that are not JSON objects instead of masking them.

use super::{ensure_valid_key, DocumentStore, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Document store over a migrated SQLite connection (see `db::open_db`).
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the number of documents stored in `collection`.
    pub fn count_documents(&self, collection: &str) -> StoreResult<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1;",
            [collection],
            |row| row.get::<_, i64>(0),
        )?;
        u64::try_from(count)
            .map_err(|_| StoreError::InvalidDocument(format!("negative row count {count}")))
    }

    /// Returns how many times the document at `key` has been written.
    pub fn write_count(&self, collection: &str, key: &str) -> StoreResult<Option<u32>> {
        let count = self
            .conn
            .query_row(
                "SELECT write_count FROM documents WHERE collection = ?1 AND doc_key = ?2;",
                params![collection, key],
                |row| row.get::<_, u32>(0),
            )
            .optional()?;
        Ok(count)
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn set_document(&self, collection: &str, key: &str, document: &Value) -> StoreResult<()> {
        ensure_valid_key(collection, key)?;
        if !document.is_object() {
            return Err(StoreError::InvalidDocument(format!(
                "document `{key}` must be a JSON object"
            )));
        }
        let body = serde_json::to_string(document)?;

        self.conn.execute(
            "INSERT INTO documents (collection, doc_key, body)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, doc_key) DO UPDATE SET
                body = excluded.body,
                write_count = documents.write_count + 1,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![collection, key, body],
        )?;

        Ok(())
    }

    fn get_document(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        ensure_valid_key(collection, key)?;

        let body = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_key = ?2;",
                params![collection, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match body {
            Some(body) => {
                let value: Value = serde_json::from_str(&body)?;
                if !value.is_object() {
                    return Err(StoreError::InvalidDocument(format!(
                        "documents.body for `{collection}/{key}` is not a JSON object"
                    )));
                }
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}
