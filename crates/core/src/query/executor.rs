//! Memoized query execution against the archive database.
//!
//! The executor is the only component that touches the connection. Every
//! statement goes through the TTL cache first; a fresh entry is returned
//! without issuing any database work. Execution failures propagate and are
//! never cached, so the next call retries against the database.

use crate::db::ArchiveDb;
use crate::query::cache::QueryCache;
use crate::query::templates::RenderedQuery;
use crate::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_rusqlite::{params, rusqlite};

/// Row mapper applied inside the connection's worker thread.
pub type RowMapper<T> = fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>;

/// TTL-memoized query executor sharing one database handle.
#[derive(Debug)]
pub struct CachedExecutor {
    db: ArchiveDb,
    cache: QueryCache,
    timeout_ms: u64,
    executions: AtomicU64,
}

impl CachedExecutor {
    pub fn new(db: ArchiveDb, ttl_secs: i64, timeout_ms: u64) -> Self {
        Self { db, cache: QueryCache::new(ttl_secs), timeout_ms, executions: AtomicU64::new(0) }
    }

    /// Run a rendered query, serving from cache when fresh.
    ///
    /// On a miss the statement executes with the search term and corpus as
    /// its only bind arguments, under the configured deadline. The rows are
    /// stored back into the cache stamped with the current time.
    pub async fn run<T>(&self, query: &RenderedQuery, mapper: RowMapper<T>) -> Result<Vec<T>, Error>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let key = query.cache_key();

        if let Some(rows) = self.cache.get(&key) {
            tracing::debug!(term = %query.term, "query cache hit");
            return serde_json::from_value(rows)
                .map_err(|e| Error::Query(format!("cached rows corrupt: {e}")));
        }

        let sql = query.sql;
        let term = query.term.clone();
        let corpus = query.corpus.clone();

        let call = self.db.conn.call(move |conn| -> Result<Vec<T>, Error> {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(params![term, corpus], mapper)?
                .collect::<Result<Vec<T>, _>>()?;
            Ok(rows)
        });

        let rows = tokio::time::timeout(Duration::from_millis(self.timeout_ms), call)
            .await
            .map_err(|_| Error::QueryTimeout(self.timeout_ms))?
            .map_err(Error::from)?;

        self.executions.fetch_add(1, Ordering::Relaxed);

        match serde_json::to_value(&rows) {
            Ok(json) => self.cache.put(key, json),
            Err(e) => tracing::warn!("failed to cache query result: {e}"),
        }

        Ok(rows)
    }

    /// Drop the cached entry for one rendered query.
    pub fn invalidate(&self, query: &RenderedQuery) -> bool {
        self.cache.invalidate(&query.cache_key())
    }

    /// Delete expired cache entries. Returns the number deleted.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }

    /// Number of cache entries currently held, fresh or stale.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Count of statements actually executed against the database.
    ///
    /// Cache hits do not increment this.
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::Relaxed)
    }
}
