//! Create a run of consecutively numbered chapters for one work.
//!
//! Numbers that already exist are skipped; any other failure stops the run
//! and reports how far it got. Chapters created before the failure stay.

use manga_catalog_core::{ChapterNumber, EntityKind, WorkId};
use manga_catalog_db::{operations, CatalogError};
use rusqlite::Connection;
use thiserror::Error;

use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum BulkError {
    #[error("Invalid chapter range {start}-{end}: {reason}")]
    InvalidRange {
        start: i64,
        end: i64,
        reason: &'static str,
    },
    #[error("Database error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Stopped after creating {created} and skipping {skipped} chapter(s): {source}")]
    Aborted {
        created: u64,
        skipped: u64,
        #[source]
        source: CatalogError,
    },
}

/// Outcome of a completed bulk run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulkStats {
    pub created: u64,
    /// Numbers that already existed.
    pub skipped: u64,
}

impl BulkStats {
    pub fn total(&self) -> u64 {
        self.created + self.skipped
    }
}

/// Largest number of chapters one bulk call may create.
///
/// Each chapter is its own transaction, so an unbounded range (up to
/// `u32::MAX` numbers) would hold the caller for hours.
pub const MAX_BULK_CHAPTERS: u32 = 10_000;

/// Check an inclusive chapter range and narrow it to chapter-number width.
///
/// Rejects negative or reversed ranges and ranges of more than
/// [`MAX_BULK_CHAPTERS`] numbers.
pub fn validate_range(start: i64, end: i64) -> Result<(u32, u32), BulkError> {
    let invalid = move |reason: &'static str| BulkError::InvalidRange { start, end, reason };
    if start < 0 {
        return Err(invalid("chapter numbers cannot be negative"));
    }
    if start > end {
        return Err(invalid("start must not be greater than end"));
    }
    let start = u32::try_from(start).map_err(|_| invalid("start is too large"))?;
    let end = u32::try_from(end).map_err(|_| invalid("end is too large"))?;
    if end - start >= MAX_BULK_CHAPTERS {
        return Err(invalid("range is larger than the maximum bulk size"));
    }
    Ok((start, end))
}

/// Create chapters `start..=end` for a work, one transaction per chapter.
///
/// The range is validated and the work looked up before anything is written.
pub fn bulk_create_chapters(
    conn: &Connection,
    work_id: WorkId,
    start: i64,
    end: i64,
    progress: Option<&dyn ImportProgress>,
) -> Result<BulkStats, BulkError> {
    let (first, last) = validate_range(start, end)?;
    if operations::find_work(conn, work_id)?.is_none() {
        return Err(CatalogError::not_found(EntityKind::Work, work_id).into());
    }

    let total = usize::try_from(last - first).map_or(usize::MAX, |n| n.saturating_add(1));
    if let Some(p) = progress {
        p.on_phase(&format!(
            "Creating chapters {}-{} for work {}",
            first, last, work_id
        ));
    }

    let mut stats = BulkStats::default();
    for (i, n) in (first..=last).enumerate() {
        match operations::create_chapter(conn, work_id, ChapterNumber::from(n), None) {
            Ok(_) => stats.created += 1,
            Err(e) if e.is_conflict() => {
                log::warn!("Chapter {} of work {} already exists, skipping", n, work_id);
                stats.skipped += 1;
            }
            Err(e) => {
                log::warn!(
                    "Bulk creation for work {} stopped at chapter {}: {}",
                    work_id,
                    n,
                    e
                );
                return Err(BulkError::Aborted {
                    created: stats.created,
                    skipped: stats.skipped,
                    source: e,
                });
            }
        }

        if let Some(p) = progress {
            p.on_item(i + 1, total, &format!("chapter {}", n));
        }
    }

    let summary = format!(
        "Created {} chapter(s), skipped {} existing",
        stats.created, stats.skipped
    );
    log::info!("Work {}: {}", work_id, summary);
    if let Some(p) = progress {
        p.on_complete(&summary);
    }
    Ok(stats)
}
