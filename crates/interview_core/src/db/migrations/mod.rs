//! Document store schema setup.
//!
//! Each script moves the schema forward by one `PRAGMA user_version` step;
//! the script at index `i` produces version `i + 1`. After migrating, the
//! `documents` table is checked for every column the store reads or writes.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCRIPTS: &[&str] = &[include_str!("0001_documents.sql")];

/// Columns `SqliteDocumentStore` depends on.
pub const DOCUMENT_COLUMNS: &[&str] = &[
    "collection",
    "doc_key",
    "body",
    "write_count",
    "created_at",
    "updated_at",
];

/// Returns the schema version produced by the newest script.
pub fn latest_version() -> u32 {
    SCRIPTS.len() as u32
}

/// Brings the connection to `latest_version()` and verifies the result.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `SchemaMismatch` when `documents` lacks a required column.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending = &SCRIPTS[current as usize..];
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for script in pending {
            tx.execute_batch(script)?;
        }
        tx.pragma_update(None, "user_version", latest)?;
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from={current} to={latest}");
    }

    verify_documents_table(conn)
}

fn verify_documents_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('documents');")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    match DOCUMENT_COLUMNS
        .iter()
        .find(|column| !present.iter().any(|name| name.as_str() == **column))
    {
        Some(missing) => Err(DbError::SchemaMismatch(format!(
            "documents.{missing} is missing"
        ))),
        None => Ok(()),
    }
}
