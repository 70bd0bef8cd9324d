//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::cache_purge::purge_impl;
use crate::tools::doc_export::{DocExportParams, export_impl};
use crate::tools::doc_search::{DocSearchParams, search_impl};

use foiarch_core::{CsvExporter, SearchPipeline};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-foiarch.
#[derive(Clone)]
pub struct FoiarchServer {
    pipeline: Arc<SearchPipeline>,
    exporter: Arc<CsvExporter>,
    include_listing_default: bool,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FoiarchServer {
    /// Create a new server handler.
    pub fn new(pipeline: SearchPipeline, exporter: CsvExporter, include_listing_default: bool) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            exporter: Arc::new(exporter),
            include_listing_default,
            tool_router: Self::tool_router(),
        }
    }

    /// Search the document corpus.
    ///
    /// Runs the distribution, aggregate, and (optionally) listing queries
    /// for a free-text search string and returns the assembled result.
    #[tool(
        description = "Full-text search over the archive corpus. Returns a per-year distribution, summary statistics, and an optional document listing. Use double quotes for phrases, OR for disjunction, NOT for negation."
    )]
    async fn doc_search(&self, params: Parameters<DocSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.pipeline, self.include_listing_default, params.0).await
    }

    /// Export the matching documents as CSV.
    #[tool(description = "Export the documents matching a search as a CSV payload (text/csv, filename <corpus>.csv).")]
    async fn doc_export(&self, params: Parameters<DocExportParams>) -> Result<CallToolResult, McpError> {
        export_impl(&self.pipeline, &self.exporter, params.0).await
    }

    /// Drop expired query cache entries.
    #[tool(description = "Purge expired entries from the query result cache. Returns the number of entries dropped.")]
    async fn cache_purge(&self) -> Result<CallToolResult, McpError> {
        purge_impl(&self.pipeline).await
    }
}

impl ServerHandler for FoiarchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-foiarch".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
