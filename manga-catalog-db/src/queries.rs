//! Read queries for the catalog database.
//!
//! Provides filtered listing, cross-entity search, statistics and export.

use std::collections::BTreeSet;

use manga_catalog_core::*;
use rusqlite::{params, params_from_iter, Connection};

use crate::error::CatalogError;
use crate::filter::{build_work_query, like_pattern, title_expr};
use crate::operations::{
    in_transaction, row_to_author, row_to_tag, row_to_work, work_credits, work_languages,
    work_tags, WORK_COLUMNS,
};

/// Maximum hits returned per entity by [`search_catalog`].
pub const SEARCH_LIMIT: u32 = 20;

/// Shortest search text [`search_catalog`] will run.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Number of works listed under "recently added" in [`catalog_stats`].
pub const RECENT_WORKS: u32 = 5;

// ── Work Listing ────────────────────────────────────────────────────────────

/// List works matching `filter`, with their tag and language sets.
///
/// The count, the page and each work's tags and languages are read inside
/// one transaction, so `total` always agrees with the rows returned.
pub fn list_works(conn: &Connection, filter: &WorkFilter) -> Result<WorkPage, CatalogError> {
    let query = build_work_query(filter)?;

    in_transaction(conn, |tx| {
        let total: i64 = tx.query_row(
            &query.count.sql,
            params_from_iter(query.count.params.iter()),
            |row| row.get(0),
        )?;
        let total = u64::try_from(total).unwrap_or(0);

        let mut stmt = tx.prepare(&query.select.sql)?;
        let rows = stmt.query_map(params_from_iter(query.select.params.iter()), row_to_work)?;
        let works = rows.collect::<Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(works.len());
        for work in works {
            summaries.push(WorkSummary {
                tags: tag_names(tx, work.id)?,
                languages: language_names(tx, work.id)?,
                work,
            });
        }

        Ok(WorkPage {
            works: summaries,
            total,
            page: filter.page_number(),
            page_count: filter.page_count(total),
        })
    })
}

fn tag_names(conn: &Connection, work_id: WorkId) -> Result<BTreeSet<String>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT t.tag_name FROM tag t JOIN has h ON h.tag_id = t.tag_id WHERE h.manga_id = ?1",
    )?;
    let rows = stmt.query_map(params![work_id], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

fn language_names(conn: &Connection, work_id: WorkId) -> Result<BTreeSet<String>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT l.language_name_en FROM language l
         JOIN supports s ON s.language_id = l.language_id
         WHERE s.manga_id = ?1",
    )?;
    let rows = stmt.query_map(params![work_id], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

// ── Search ──────────────────────────────────────────────────────────────────

/// Search works (any of the three names), authors and tags by substring.
///
/// Text shorter than [`MIN_SEARCH_CHARS`] returns nothing without touching the store.
pub fn search_catalog(
    conn: &Connection,
    text: &str,
    scope: SearchScope,
) -> Result<SearchResults, CatalogError> {
    let term = text.trim().to_lowercase();
    let mut results = SearchResults::default();
    if term.chars().count() < MIN_SEARCH_CHARS {
        return Ok(results);
    }
    let pattern = like_pattern(&term);

    if matches!(scope, SearchScope::All | SearchScope::Works) {
        let sql = format!(
            "SELECT {WORK_COLUMNS} FROM manga m
             WHERE LOWER(COALESCE(m.name_english, '')) LIKE ?1 ESCAPE '\\'
                OR LOWER(COALESCE(m.name_romanized, '')) LIKE ?1 ESCAPE '\\'
                OR LOWER(COALESCE(m.name_original, '')) LIKE ?1 ESCAPE '\\'
             ORDER BY LOWER({}), m.manga_id
             LIMIT ?2",
            title_expr()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, SEARCH_LIMIT], row_to_work)?;
        for work in rows {
            let work = work?;
            results.works.push((work.id, work.display_title().to_string()));
        }
    }

    if matches!(scope, SearchScope::All | SearchScope::Authors) {
        let mut stmt = conn.prepare(
            "SELECT author_id, name_romanized FROM author
             WHERE LOWER(name_romanized) LIKE ?1 ESCAPE '\\'
             ORDER BY name_romanized COLLATE NOCASE, author_id
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![pattern, SEARCH_LIMIT], row_to_author)?;
        results.authors = rows.collect::<Result<Vec<_>, _>>()?;
    }

    if matches!(scope, SearchScope::All | SearchScope::Tags) {
        let mut stmt = conn.prepare(
            "SELECT tag_id, tag_name FROM tag
             WHERE LOWER(tag_name) LIKE ?1 ESCAPE '\\'
             ORDER BY tag_name COLLATE NOCASE
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![pattern, SEARCH_LIMIT], row_to_tag)?;
        results.tags = rows.collect::<Result<Vec<_>, _>>()?;
    }

    Ok(results)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Summary statistics for the catalog.
#[derive(Debug, Default)]
pub struct CatalogStats {
    pub works: u64,
    pub chapters: u64,
    pub translations: u64,
    pub pages: u64,
    pub authors: u64,
    pub tags: u64,
    pub languages: u64,
    /// The most recently created works, newest first.
    pub recent: Vec<Work>,
}

/// Get catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, CatalogError> {
    let count = |table: &str| -> Result<u64, CatalogError> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
        Ok(u64::try_from(n).unwrap_or(0))
    };

    Ok(CatalogStats {
        works: count("manga")?,
        chapters: count("chapter")?,
        translations: count("translated_to")?,
        pages: count("pages")?,
        authors: count("author")?,
        tags: count("tag")?,
        languages: count("language")?,
        recent: recent_works(conn, RECENT_WORKS)?,
    })
}

/// The `limit` most recently created works, newest first.
pub fn recent_works(conn: &Connection, limit: u32) -> Result<Vec<Work>, CatalogError> {
    let sql = format!(
        "SELECT {WORK_COLUMNS} FROM manga m ORDER BY m.created_at DESC, m.manga_id DESC LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], row_to_work)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Export ──────────────────────────────────────────────────────────────────

/// Every work with its relations flattened to names, ordered by id.
pub fn export_works(conn: &Connection) -> Result<Vec<WorkExport>, CatalogError> {
    let sql = format!("SELECT {WORK_COLUMNS} FROM manga m ORDER BY m.manga_id");
    let mut stmt = conn.prepare(&sql)?;
    let works = stmt
        .query_map([], row_to_work)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut exports = Vec::with_capacity(works.len());
    for work in works {
        let tags = work_tags(conn, work.id)?
            .into_iter()
            .map(|t| t.name)
            .collect();
        let authors = work_credits(conn, work.id)?
            .into_iter()
            .map(|c| {
                if c.role.is_empty() {
                    c.name
                } else {
                    format!("{} ({})", c.name, c.role)
                }
            })
            .collect();
        let languages = work_languages(conn, work.id)?
            .into_iter()
            .map(|l| l.name)
            .collect();
        exports.push(WorkExport {
            title: work.display_title().to_string(),
            tags,
            authors,
            languages,
            work,
        });
    }
    Ok(exports)
}

// ── Health ──────────────────────────────────────────────────────────────────

/// Check that the store answers a trivial query.
pub fn ping(conn: &Connection) -> Result<(), CatalogError> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}
