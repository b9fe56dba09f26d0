//! Manga catalog data model, filter criteria, seed files, and shared settings.
//!
//! This crate defines the catalog entities (works, chapters, translations,
//! pages and their reference data) without any database dependency. The
//! `manga-catalog-db` crate persists these types; the CLI and tests build
//! them directly.

pub mod artifact;
pub mod criteria;
pub mod error;
pub mod settings;
pub mod types;
pub mod yaml;

pub use artifact::{ArtifactError, ArtifactRoot};
pub use criteria::{SortMode, WorkFilter};
pub use error::ModelError;
pub use types::*;
pub use yaml::{SeedData, SeedError, load_seed, load_seed_dir};
