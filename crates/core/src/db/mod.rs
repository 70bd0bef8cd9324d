//! SQLite-backed document archive access.
//!
//! This module owns the single long-lived database handle and the schema it
//! runs against: a `docs` table partitioned by corpus label, indexed for
//! full-text search through an external-content FTS5 table. It supports:
//!
//! - One handle per process, opened once and reused by every query
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - In-memory databases for tests

pub mod connection;
pub mod migrations;

pub use crate::Error;

pub use connection::{ArchiveDb, NewDoc};
