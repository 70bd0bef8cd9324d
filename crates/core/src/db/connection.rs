//! Database connection management with pragma configuration.
//!
//! This module handles opening the archive database, applying required
//! pragmas for performance and concurrency (WAL mode), and running
//! migrations. The handle is created once by the process entry point and
//! injected into the search pipeline; every query borrows it for the
//! duration of one statement.

use super::migrations;
use crate::Error;
use chrono::NaiveDate;
use std::path::Path;
use tokio_rusqlite::{Connection, params};

/// Archive database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations on a
/// background thread. Cloning shares the same underlying handle; no second
/// connection is ever established within the process lifetime.
#[derive(Clone, Debug)]
pub struct ArchiveDb {
    pub(crate) conn: Connection,
}

/// A document row to insert into the archive.
#[derive(Debug, Clone)]
pub struct NewDoc {
    pub corpus: String,
    pub collection: Option<String>,
    pub title: String,
    pub source_url: String,
    pub authored: NaiveDate,
    pub pages: i64,
    pub redactions: i64,
    pub body: String,
}

impl ArchiveDb {
    /// Open the archive database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations. Failure here is fatal to the
    /// request that triggered it; the caller re-invokes on the next
    /// interaction rather than retrying in-process.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Connection(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    ///
    /// Same pragma configuration and migrations as file-based databases.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Connection(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Connection)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }

    /// Insert a document into the archive.
    ///
    /// The FTS index is kept in sync by schema triggers. Returns the rowid
    /// of the inserted document.
    pub async fn insert_doc(&self, doc: &NewDoc) -> Result<i64, Error> {
        let doc = doc.clone();
        self.conn
            .call(move |conn| -> Result<i64, Error> {
                conn.execute(
                    "INSERT INTO docs (
                        corpus, collection, title, source_url,
                        authored, pages, redactions, body
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        &doc.corpus,
                        &doc.collection,
                        &doc.title,
                        &doc.source_url,
                        doc.authored.to_string(),
                        doc.pages,
                        doc.redactions,
                        &doc.body,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = ArchiveDb::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_insert_doc_populates_fts() {
        let db = ArchiveDb::open_in_memory().await.unwrap();
        let id = db
            .insert_doc(&NewDoc {
                corpus: "pdb".into(),
                collection: None,
                title: "Soviet launch activity".into(),
                source_url: "https://archive.example/doc/1".into(),
                authored: NaiveDate::from_ymd_opt(1962, 10, 16).unwrap(),
                pages: 4,
                redactions: 1,
                body: "satellite telemetry intercepted over the Pacific".into(),
            })
            .await
            .unwrap();
        assert!(id > 0);

        let hits: i64 = db
            .conn
            .call(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM docs_fts WHERE docs_fts MATCH 'satellite'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(hits, 1);
    }
}
