//! Resolving a (work, chapter, language, page) address to a stored artifact reference.
//!
//! Each link of the hierarchy is checked in order, so a miss names the first
//! missing link rather than reporting a generic "page not found". Nothing here
//! touches the filesystem; see [`manga_catalog_core::ArtifactRoot`] for that.

use manga_catalog_core::{ChapterId, EntityKind, PageRef, WorkId};
use rusqlite::{params, Connection};

use crate::error::CatalogError;
use crate::operations::{in_transaction, require_translation, require_work};

/// Look up the artifact reference for one page.
///
/// Checks, inside one read transaction: the work exists, the chapter belongs
/// to it, the chapter is translated into `language_id`, and the page exists.
pub fn resolve_page(
    conn: &Connection,
    work_id: WorkId,
    chapter_id: ChapterId,
    language_id: &str,
    page_number: u32,
) -> Result<PageRef, CatalogError> {
    in_transaction(conn, |tx| {
        require_work(tx, work_id)?;

        let owned: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM chapter WHERE chapter_id = ?1 AND manga_id = ?2)",
            params![chapter_id, work_id],
            |row| row.get(0),
        )?;
        if !owned {
            return Err(CatalogError::not_found(
                EntityKind::Chapter,
                format!("chapter {chapter_id} of work {work_id}"),
            ));
        }

        require_translation(tx, chapter_id, language_id)?;

        let result = tx.query_row(
            "SELECT page_path FROM pages
             WHERE chapter_id = ?1 AND language_id = ?2 AND page_num = ?3",
            params![chapter_id, language_id, page_number],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(path) => Ok(PageRef {
                work_id,
                chapter_id,
                language_id: language_id.to_string(),
                page_number,
                path,
            }),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(CatalogError::not_found(
                EntityKind::Page,
                format!("page {page_number} of chapter {chapter_id} in '{language_id}'"),
            )),
            Err(e) => Err(e.into()),
        }
    })
}
