//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-foiarch server.

pub mod cache_purge;
pub mod doc_export;
pub mod doc_search;
