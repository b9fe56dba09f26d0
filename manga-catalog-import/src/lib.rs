//! Bulk mutations for the manga catalog database.
//!
//! Each item of a bulk request runs in its own repository transaction, so one
//! conflicting item is skipped without undoing the items before it.

pub mod bulk;
pub mod pages;
pub mod progress;

pub use bulk::{BulkError, BulkStats, MAX_BULK_CHAPTERS, bulk_create_chapters};
pub use pages::{PageImportError, PageImportStats, import_page_dir};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
