// src/search/mod.rs
// =============================================================================
// The query side: read a query file, run each query against the index on a
// thread pool, and collect the results in key order.
//
// Submodules:
// - query: line -> normalized Query (and its key)
// - results: ResultMap, the shared key -> results map
// - executor: QueryExecutor, which ties the two to the WorkQueue
// =============================================================================

mod executor;
mod query;
mod results;

pub use executor::QueryExecutor;
pub use query::Query;
pub use results::ResultMap;
