//! Unified error types for the foiarch service.
//!
//! The search engine owns query-syntax validity: a malformed search string is
//! rejected by FTS5 at execution time and surfaces as [`Error::Query`]. A
//! zero-result search is never an error; the pipeline reports it as a
//! distinct outcome.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the foiarch service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty export query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database unreachable or the handle could not be established.
    ///
    /// Fatal to the current request; there is no in-process retry.
    #[error("CONNECTION_ERROR: {0}")]
    Connection(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CONNECTION_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed, including search syntax rejected by the
    /// engine's query parser. Never cached; the next call retries.
    #[error("QUERY_ERROR: {0}")]
    Query(String),

    /// Query did not complete within the configured deadline.
    #[error("QUERY_TIMEOUT: query exceeded {0}ms")]
    QueryTimeout(u64),

    /// CSV export serialization failed.
    #[error("EXPORT_ERROR: {0}")]
    Export(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => {
                Error::Connection(tokio_rusqlite::Error::ConnectionClosed)
            }
            tokio_rusqlite::Error::Close(c) => Error::Connection(tokio_rusqlite::Error::Close(c)),
            _ => Error::Connection(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Connection(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Query(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Query(msg) => (-32001, msg.clone()),
            Error::Connection(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::QueryTimeout(_) => (-32003, err.to_string()),
            Error::Export(msg) => (-32004, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Query("fts5: syntax error near \"\"\"".to_string());
        assert!(err.to_string().contains("QUERY_ERROR"));
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::QueryTimeout(20_000);
        assert!(err.to_string().contains("QUERY_TIMEOUT"));
        assert!(err.to_string().contains("20000ms"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::Query("bad statement".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
    }

    #[test]
    fn test_invalid_input_code() {
        let err = Error::InvalidInput("query cannot be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }
}
