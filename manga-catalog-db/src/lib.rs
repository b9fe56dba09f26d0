//! SQLite persistence layer for the manga catalog.
//!
//! Provides schema creation, the catalog repository (CRUD with delete
//! guards), the work filter query builder, read queries, and page
//! resolution, backed by SQLite (via rusqlite with bundled feature).

pub mod error;
pub mod filter;
pub mod guards;
pub mod operations;
pub mod queries;
pub mod resolver;
pub mod schema;

pub use error::{CatalogError, classify, is_unique_violation};
pub use filter::{QueryPlan, WorkQuery, build_work_query};
pub use guards::{DeletePolicy, Removal};
pub use operations::*;
pub use queries::{
    CatalogStats, MIN_SEARCH_CHARS, RECENT_WORKS, SEARCH_LIMIT, catalog_stats, export_works,
    list_works, ping, recent_works, search_catalog,
};
pub use resolver::resolve_page;
pub use schema::{CURRENT_VERSION, SchemaError, open_database, open_memory};
