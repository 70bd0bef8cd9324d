//! Parameterized query templates for the archive corpus.
//!
//! Each template carries exactly one substitution point for the user's
//! search term: the bind argument of `docs_fts MATCH ?1`. The term is
//! passed through to the FTS5 query parser verbatim — the engine is the
//! sole arbiter of syntax validity (double quotes for phrases, `OR` for
//! disjunction, `NOT` for negation). The corpus label is the second bind
//! argument and comes from validated configuration, never from the user.
//!
//! The term must never be concatenated into structural SQL; widening the
//! substitution point past the `MATCH` argument widens the injection
//! surface with it.

use sha2::{Digest, Sha256};

const DISTRIBUTION_SQL: &str = "\
    SELECT CAST(strftime('%Y', d.authored) AS INTEGER) AS year,
           COUNT(*) AS docs
    FROM docs d
    WHERE d.id IN (SELECT rowid FROM docs_fts WHERE docs_fts MATCH ?1)
      AND d.corpus = ?2
    GROUP BY year
    ORDER BY year";

const DISTRIBUTION_SPLIT_SQL: &str = "\
    SELECT CAST(strftime('%Y', d.authored) AS INTEGER) AS year,
           COALESCE(d.collection, '') AS collection,
           COUNT(*) AS docs
    FROM docs d
    WHERE d.id IN (SELECT rowid FROM docs_fts WHERE docs_fts MATCH ?1)
      AND d.corpus = ?2
    GROUP BY year, collection
    ORDER BY year, docs, collection";

const AGGREGATE_SQL: &str = "\
    SELECT COUNT(*) AS total_docs,
           MIN(d.authored) AS from_date,
           MAX(d.authored) AS to_date
    FROM docs d
    WHERE d.id IN (SELECT rowid FROM docs_fts WHERE docs_fts MATCH ?1)
      AND d.corpus = ?2";

const LISTING_SQL: &str = "\
    SELECT d.authored,
           '[' || d.title || '](' || d.source_url || ')' AS document,
           d.pages,
           d.redactions
    FROM docs d
    WHERE d.id IN (SELECT rowid FROM docs_fts WHERE docs_fts MATCH ?1)
      AND d.corpus = ?2
    ORDER BY d.authored";

/// Registry of named query templates, bound to one corpus label.
#[derive(Debug, Clone)]
pub struct QueryTemplates {
    corpus: String,
}

/// A query rendered against a specific search term.
///
/// Identity (statement text + term + corpus) determines the cache key:
/// rendering the same template with the same term always yields the same
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    pub sql: &'static str,
    pub term: String,
    pub corpus: String,
}

impl RenderedQuery {
    /// Content-addressed cache key over statement text, term, and corpus.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sql.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.term.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.corpus.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl QueryTemplates {
    pub fn new(corpus: impl Into<String>) -> Self {
        Self { corpus: corpus.into() }
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    /// Per-year match counts, ascending by year.
    ///
    /// The split variant buckets by (year, collection) and orders by
    /// (year, count) with the collection label as a stable final tie-break.
    pub fn distribution(&self, term: &str, split_by_collection: bool) -> RenderedQuery {
        let sql = if split_by_collection { DISTRIBUTION_SPLIT_SQL } else { DISTRIBUTION_SQL };
        self.render(sql, term)
    }

    /// Total match count plus earliest and latest authored dates.
    pub fn aggregate(&self, term: &str) -> RenderedQuery {
        self.render(AGGREGATE_SQL, term)
    }

    /// One row per matching document with citation metadata, ascending by
    /// authored date. The title and source link are folded into a single
    /// markdown-formatted column.
    pub fn listing(&self, term: &str) -> RenderedQuery {
        self.render(LISTING_SQL, term)
    }

    fn render(&self, sql: &'static str, term: &str) -> RenderedQuery {
        RenderedQuery { sql, term: term.to_string(), corpus: self.corpus.clone() }
    }
}
