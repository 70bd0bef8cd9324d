//! doc_export tool implementation.
//!
//! Runs the listing query for a search and returns the CSV payload.

use foiarch_core::{CsvExporter, Error, SearchPipeline};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the doc_export tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocExportParams {
    /// Free-text search string selecting the documents to export.
    pub query: String,
}

/// Output from the doc_export tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocExportOutput {
    /// `ok` or `no_match`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rows: Option<usize>,
    /// The CSV payload, UTF-8 with a header row.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub csv: Option<String>,
}

/// Implementation of the doc_export tool.
pub async fn export_impl(
    pipeline: &SearchPipeline, exporter: &CsvExporter, params: DocExportParams,
) -> Result<CallToolResult, McpError> {
    if params.query.trim().is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let output = match pipeline.listing(&params.query).await? {
        None => DocExportOutput {
            status: "no_match".into(),
            filename: None,
            content_type: None,
            rows: None,
            csv: None,
        },
        Some(listing) => {
            let payload = exporter.encode(&listing)?;
            let csv = String::from_utf8(payload.bytes.to_vec())
                .map_err(|e| Error::Export(e.to_string()))?;
            DocExportOutput {
                status: "ok".into(),
                filename: Some(payload.filename),
                content_type: Some(payload.content_type.to_string()),
                rows: Some(listing.len()),
                csv: Some(csv),
            }
        }
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
