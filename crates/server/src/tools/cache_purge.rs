//! cache_purge tool implementation.
//!
//! Drops expired entries from the query result cache.

use foiarch_core::{Error, SearchPipeline};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of expired entries deleted.
    pub deleted: usize,
    /// Number of entries still cached.
    pub remaining: usize,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(pipeline: &SearchPipeline) -> Result<CallToolResult, McpError> {
    let deleted = pipeline.executor().purge_expired();
    let remaining = pipeline.executor().cached_entries();

    let output = CachePurgeOutput { deleted, remaining };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
