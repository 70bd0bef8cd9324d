//! Search pipeline: distribution → aggregate → optional listing.
//!
//! The distribution query doubles as a cheap existence check: when it comes
//! back empty the pipeline reports `NoMatch` without ever rendering the
//! heavier aggregate or listing statements.

use crate::query::executor::CachedExecutor;
use crate::query::templates::QueryTemplates;
use crate::Error;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite;

/// One (year[, collection]) bucket of matching documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DistributionRow {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collection: Option<String>,
    pub docs: i64,
}

/// Total match count with the earliest and latest authored dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AggregateSummary {
    pub total_docs: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// One matching document with citation metadata.
///
/// `document` is the title and source link folded into markdown markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentRow {
    pub authored: NaiveDate,
    pub document: String,
    pub pages: i64,
    pub redactions: i64,
}

/// Assembled result of a matching search.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResults {
    pub distribution: Vec<DistributionRow>,
    pub summary: AggregateSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<Vec<DocumentRow>>,
}

/// Outcome of a non-empty search.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The search executed but matched no documents. Not an error.
    NoMatch { query: String },
    Results(SearchResults),
}

/// Presentation-level switches for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Also run the per-document listing query.
    pub include_listing: bool,
    /// Bucket the distribution by (year, collection) instead of year alone.
    pub split_by_collection: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { include_listing: true, split_by_collection: false }
    }
}

fn date_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn year_count_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DistributionRow> {
    Ok(DistributionRow { year: row.get(0)?, collection: None, docs: row.get(1)? })
}

fn year_collection_count_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DistributionRow> {
    Ok(DistributionRow { year: row.get(0)?, collection: Some(row.get(1)?), docs: row.get(2)? })
}

fn summary_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AggregateSummary> {
    Ok(AggregateSummary {
        total_docs: row.get(0)?,
        from_date: date_col(row, 1)?,
        to_date: date_col(row, 2)?,
    })
}

fn document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        authored: date_col(row, 0)?,
        document: row.get(1)?,
        pages: row.get(2)?,
        redactions: row.get(3)?,
    })
}

/// The entry point of the query/caching layer.
///
/// Owns the memoized executor and the template registry; the database
/// handle is injected through the executor at construction time.
#[derive(Debug)]
pub struct SearchPipeline {
    executor: CachedExecutor,
    templates: QueryTemplates,
}

impl SearchPipeline {
    pub fn new(executor: CachedExecutor, templates: QueryTemplates) -> Self {
        Self { executor, templates }
    }

    pub fn corpus(&self) -> &str {
        self.templates.corpus()
    }

    /// Access to the executor for cache maintenance (purge, invalidate).
    pub fn executor(&self) -> &CachedExecutor {
        &self.executor
    }

    /// Run a search over the corpus.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input without
    /// issuing any query. Otherwise returns exactly one of
    /// [`SearchOutcome::NoMatch`] or [`SearchOutcome::Results`]. The three
    /// statements execute strictly in distribution → aggregate → listing
    /// order; later statements are only issued when earlier ones matched.
    pub async fn search(
        &self, raw: &str, options: SearchOptions,
    ) -> Result<Option<SearchOutcome>, Error> {
        let term = raw.trim();
        if term.is_empty() {
            return Ok(None);
        }

        let mapper: crate::query::executor::RowMapper<DistributionRow> = if options.split_by_collection {
            year_collection_count_row
        } else {
            year_count_row
        };
        let distribution = self
            .executor
            .run(&self.templates.distribution(term, options.split_by_collection), mapper)
            .await?;

        if distribution.is_empty() {
            tracing::debug!(term, "search matched no documents");
            return Ok(Some(SearchOutcome::NoMatch { query: term.to_string() }));
        }

        let summary = self
            .executor
            .run(&self.templates.aggregate(term), summary_row)
            .await?
            .into_iter()
            .next()
            .filter(|s| s.total_docs > 0)
            .ok_or_else(|| {
                Error::Query("aggregate returned no summary for a non-empty distribution".into())
            })?;

        let listing = if options.include_listing {
            Some(self.executor.run(&self.templates.listing(term), document_row).await?)
        } else {
            None
        };

        Ok(Some(SearchOutcome::Results(SearchResults { distribution, summary, listing })))
    }

    /// Run only the listing query for a search term.
    ///
    /// Used by the export surface; `None` when the term matches nothing,
    /// checked through the same cheap distribution probe as `search`.
    pub async fn listing(&self, raw: &str) -> Result<Option<Vec<DocumentRow>>, Error> {
        let term = raw.trim();
        if term.is_empty() {
            return Ok(None);
        }

        let distribution = self
            .executor
            .run(&self.templates.distribution(term, false), year_count_row)
            .await?;
        if distribution.is_empty() {
            return Ok(None);
        }

        let rows = self.executor.run(&self.templates.listing(term), document_row).await?;
        Ok(Some(rows))
    }
}
