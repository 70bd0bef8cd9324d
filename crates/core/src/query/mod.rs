//! Query rendering, memoized execution, and the search pipeline.
//!
//! A raw user search string flows through three stages:
//!
//! 1. [`QueryTemplates`] renders it into parameterized statements whose only
//!    user-controlled input is the single `MATCH` bind argument
//! 2. [`CachedExecutor`] runs each statement through a TTL-memoized cache
//!    keyed by the rendered query identity
//! 3. [`SearchPipeline`] orchestrates distribution → aggregate → listing,
//!    short-circuiting on empty input and on zero matches

pub mod cache;
pub mod executor;
pub mod pipeline;
pub mod templates;

pub use cache::QueryCache;
pub use executor::CachedExecutor;
pub use pipeline::{
    AggregateSummary, DistributionRow, DocumentRow, SearchOptions, SearchOutcome, SearchPipeline,
    SearchResults,
};
pub use templates::{QueryTemplates, RenderedQuery};
