//! Core query/caching layer for the foiarch document search service.
//!
//! This crate provides:
//! - Archive database access (SQLite + FTS5) with schema migrations
//! - Parameterized query templates for distribution, aggregate, and listing queries
//! - A TTL-memoized query executor
//! - The search pipeline orchestrating the three queries
//! - A memoized CSV export encoder
//! - Configuration structures and unified error types

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod query;

pub use config::AppConfig;
pub use db::{ArchiveDb, NewDoc};
pub use error::Error;
pub use export::{CsvExporter, ExportPayload};
pub use query::{
    AggregateSummary, CachedExecutor, DistributionRow, DocumentRow, QueryTemplates, RenderedQuery,
    SearchOptions, SearchOutcome, SearchPipeline, SearchResults,
};
