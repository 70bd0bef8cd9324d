//! mcp-foiarch server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use foiarch_core::{AppConfig, ArchiveDb, CachedExecutor, CsvExporter, QueryTemplates, SearchPipeline};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(corpus = %config.corpus, db_path = %config.db_path.display(), "Starting mcp-foiarch server on stdio transport");

    let db = ArchiveDb::open(&config.db_path).await?;
    let executor = CachedExecutor::new(db, config.cache_ttl_secs, config.query_timeout_ms);
    let pipeline = SearchPipeline::new(executor, QueryTemplates::new(config.corpus.clone()));
    let exporter = CsvExporter::new(config.corpus.clone());

    let handler = handler::FoiarchServer::new(pipeline, exporter, config.include_listing);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
