//! doc_search tool implementation.
//!
//! Runs the search pipeline for a free-text query and renders the outcome.

use foiarch_core::{AggregateSummary, DistributionRow, DocumentRow, Error, SearchOptions, SearchOutcome, SearchPipeline};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for doc_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DocSearchParams {
    /// Free-text search string, passed through to the engine's query
    /// parser (double quotes for phrases, OR, NOT).
    pub query: String,

    /// Also return the per-document listing. Defaults to the server
    /// configuration when omitted.
    #[serde(default)]
    pub include_listing: Option<bool>,

    /// Bucket the distribution by (year, collection) instead of year alone.
    #[serde(default)]
    pub split_by_collection: Option<bool>,
}

/// Output structure for doc_search tool.
///
/// `status` is one of `empty` (blank input, nothing executed), `no_match`,
/// or `ok`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocSearchOutput {
    pub status: String,
    pub query: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub distribution: Vec<DistributionRow>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<AggregateSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub listing: Option<Vec<DocumentRow>>,
}

/// Implementation of the doc_search tool.
pub async fn search_impl(
    pipeline: &SearchPipeline, include_listing_default: bool, params: DocSearchParams,
) -> Result<CallToolResult, McpError> {
    let options = SearchOptions {
        include_listing: params.include_listing.unwrap_or(include_listing_default),
        split_by_collection: params.split_by_collection.unwrap_or(false),
    };

    let output = match pipeline.search(&params.query, options).await? {
        None => DocSearchOutput {
            status: "empty".into(),
            query: params.query,
            distribution: Vec::new(),
            summary: None,
            listing: None,
        },
        Some(SearchOutcome::NoMatch { query }) => DocSearchOutput {
            status: "no_match".into(),
            query,
            distribution: Vec::new(),
            summary: None,
            listing: None,
        },
        Some(SearchOutcome::Results(results)) => DocSearchOutput {
            status: "ok".into(),
            query: params.query.trim().to_string(),
            distribution: results.distribution,
            summary: Some(results.summary),
            listing: results.listing,
        },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use foiarch_core::{ArchiveDb, CachedExecutor, NewDoc, QueryTemplates};

    async fn test_pipeline() -> SearchPipeline {
        let db = ArchiveDb::open_in_memory().await.unwrap();
        db.insert_doc(&NewDoc {
            corpus: "pdb".into(),
            collection: None,
            title: "Readiness estimate".into(),
            source_url: "https://archive.example/doc/7".into(),
            authored: NaiveDate::from_ymd_opt(1975, 5, 20).unwrap(),
            pages: 6,
            redactions: 3,
            body: "naval readiness in the northern fleet".into(),
        })
        .await
        .unwrap();
        SearchPipeline::new(CachedExecutor::new(db, 3600, 20_000), QueryTemplates::new("pdb"))
    }

    fn output_from(result: &CallToolResult) -> DocSearchOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_empty_query_reports_empty_status() {
        let pipeline = test_pipeline().await;
        let params = DocSearchParams { query: "   ".into(), ..Default::default() };

        let result = search_impl(&pipeline, true, params).await.unwrap();
        let output = output_from(&result);
        assert_eq!(output.status, "empty");
        assert!(output.summary.is_none());
    }

    #[tokio::test]
    async fn test_matching_query() {
        let pipeline = test_pipeline().await;
        let params = DocSearchParams { query: "readiness".into(), ..Default::default() };

        let result = search_impl(&pipeline, true, params).await.unwrap();
        let output = output_from(&result);
        assert_eq!(output.status, "ok");
        assert_eq!(output.distribution.len(), 1);
        assert_eq!(output.summary.unwrap().total_docs, 1);
        assert_eq!(output.listing.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_match_query() {
        let pipeline = test_pipeline().await;
        let params = DocSearchParams { query: "zzz_no_such_term".into(), ..Default::default() };

        let result = search_impl(&pipeline, true, params).await.unwrap();
        let output = output_from(&result);
        assert_eq!(output.status, "no_match");
        assert_eq!(output.query, "zzz_no_such_term");
    }

    #[tokio::test]
    async fn test_listing_default_from_config() {
        let pipeline = test_pipeline().await;
        let params = DocSearchParams { query: "readiness".into(), ..Default::default() };

        let result = search_impl(&pipeline, false, params).await.unwrap();
        let output = output_from(&result);
        assert_eq!(output.status, "ok");
        assert!(output.listing.is_none());
    }

    #[tokio::test]
    async fn test_malformed_query_is_error() {
        let pipeline = test_pipeline().await;
        let params = DocSearchParams { query: "\"unterminated".into(), ..Default::default() };

        let result = search_impl(&pipeline, true, params).await;
        assert!(result.is_err());
    }
}
