//! CRUD operations for all catalog entity types.
//!
//! Every mutating function runs inside exactly one transaction: it commits
//! when the whole unit succeeds and rolls back (by dropping the transaction)
//! on any error path, so a refused or conflicting call leaves no trace.

use chrono::NaiveDate;
use manga_catalog_core::artifact::check_reference;
use manga_catalog_core::yaml::{SeedChapter, SeedData, SeedWork};
use manga_catalog_core::*;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, Transaction};

use crate::error::{classify, CatalogError};
use crate::filter::like_pattern;
use crate::guards::{check_removal, count_translation_pages, count_work_translations, Removal};

/// Column list for a `manga m` row, in the order [`row_to_work`] reads it.
pub(crate) const WORK_COLUMNS: &str = "m.manga_id, m.name_original, m.name_romanized, m.name_english,
    m.manga_status, m.started_publishing, m.ended_publishing, m.cover_path,
    m.created_at, m.updated_at";

/// Run `f` inside one transaction: commit on `Ok`, roll back on any error.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Transaction<'_>) -> Result<T, CatalogError>,
) -> Result<T, CatalogError> {
    let tx = conn.unchecked_transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

// ── Work Operations ─────────────────────────────────────────────────────────

/// Insert a new work. Returns the generated ID.
pub fn create_work(conn: &Connection, fields: &WorkFields) -> Result<WorkId, CatalogError> {
    let fields = validated_work_fields(fields)?;
    let id = in_transaction(conn, |tx| insert_work(tx, &fields))?;
    log::debug!("Created work {} ({})", id, fields.display_title());
    Ok(id)
}

fn insert_work(conn: &Connection, fields: &WorkFields) -> Result<WorkId, CatalogError> {
    conn.execute(
        "INSERT INTO manga (name_original, name_romanized, name_english, manga_status,
             started_publishing, ended_publishing, cover_path)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            fields.name_original,
            fields.name_romanized,
            fields.name_english,
            fields.status.as_str(),
            fields.started_publishing,
            fields.ended_publishing,
            fields.cover_path,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Look up a work by id.
pub fn find_work(conn: &Connection, id: WorkId) -> Result<Option<Work>, CatalogError> {
    let sql = format!("SELECT {WORK_COLUMNS} FROM manga m WHERE m.manga_id = ?1");
    match conn.query_row(&sql, params![id], row_to_work) {
        Ok(work) => Ok(Some(work)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A work with its tags, credited authors and supported languages.
pub fn get_work(conn: &Connection, id: WorkId) -> Result<WorkDetail, CatalogError> {
    let work = find_work(conn, id)?.ok_or_else(|| CatalogError::not_found(EntityKind::Work, id))?;
    Ok(WorkDetail {
        tags: work_tags(conn, id)?,
        authors: work_credits(conn, id)?,
        languages: work_languages(conn, id)?,
        work,
    })
}

/// Replace the editable fields of a work and refresh `updated_at`.
pub fn update_work(conn: &Connection, id: WorkId, fields: &WorkFields) -> Result<(), CatalogError> {
    let fields = validated_work_fields(fields)?;
    in_transaction(conn, |tx| {
        let changed = tx.execute(
            "UPDATE manga SET name_original = ?2, name_romanized = ?3, name_english = ?4,
                 manga_status = ?5, started_publishing = ?6, ended_publishing = ?7,
                 cover_path = ?8, updated_at = datetime('now')
             WHERE manga_id = ?1",
            params![
                id,
                fields.name_original,
                fields.name_romanized,
                fields.name_english,
                fields.status.as_str(),
                fields.started_publishing,
                fields.ended_publishing,
                fields.cover_path,
            ],
        )?;
        if changed == 0 {
            return Err(CatalogError::not_found(EntityKind::Work, id));
        }
        Ok(())
    })?;
    log::debug!("Updated work {}", id);
    Ok(())
}

/// Delete a work together with its chapters, translations, pages and links.
pub fn delete_work(conn: &Connection, id: WorkId) -> Result<(), CatalogError> {
    delete_by_key(conn, Removal::Work, "DELETE FROM manga WHERE manga_id = ?1", id)
}

pub(crate) fn work_tags(conn: &Connection, work_id: WorkId) -> Result<Vec<Tag>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT t.tag_id, t.tag_name FROM tag t
         JOIN has h ON h.tag_id = t.tag_id
         WHERE h.manga_id = ?1
         ORDER BY t.tag_name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map(params![work_id], row_to_tag)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(crate) fn work_credits(conn: &Connection, work_id: WorkId) -> Result<Vec<Credit>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT a.author_id, a.name_romanized, w.role FROM author a
         JOIN writes w ON w.author_id = a.author_id
         WHERE w.manga_id = ?1
         ORDER BY a.name_romanized COLLATE NOCASE, w.role",
    )?;
    let rows = stmt.query_map(params![work_id], |row| {
        Ok(Credit {
            author_id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(crate) fn work_languages(
    conn: &Connection,
    work_id: WorkId,
) -> Result<Vec<Language>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT l.language_id, l.language_name_en FROM language l
         JOIN supports s ON s.language_id = l.language_id
         WHERE s.manga_id = ?1
         ORDER BY l.language_name_en",
    )?;
    let rows = stmt.query_map(params![work_id], row_to_language)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn validated_work_fields(fields: &WorkFields) -> Result<WorkFields, CatalogError> {
    let fields = fields.clone().normalized();
    if let Some(cover) = &fields.cover_path {
        validate_reference(cover)?;
    }
    Ok(fields)
}

// ── Chapter Operations ──────────────────────────────────────────────────────

/// Insert a chapter. Fails with `AlreadyExists` when the work already has this number.
pub fn create_chapter(
    conn: &Connection,
    work_id: WorkId,
    number: ChapterNumber,
    page_count: Option<u32>,
) -> Result<ChapterId, CatalogError> {
    let id = in_transaction(conn, |tx| {
        require_work(tx, work_id)?;
        insert_chapter(tx, work_id, number, page_count)
    })?;
    log::debug!("Created chapter {} of work {} (id {})", number, work_id, id);
    Ok(id)
}

fn insert_chapter(
    conn: &Connection,
    work_id: WorkId,
    number: ChapterNumber,
    page_count: Option<u32>,
) -> Result<ChapterId, CatalogError> {
    conn.execute(
        "INSERT INTO chapter (manga_id, chapter_num, page_count) VALUES (?1, ?2, ?3)",
        params![work_id, number.value(), page_count],
    )
    .map_err(|e| classify(e, EntityKind::Chapter, chapter_key(work_id, number)))?;
    Ok(conn.last_insert_rowid())
}

pub fn find_chapter(conn: &Connection, id: ChapterId) -> Result<Option<Chapter>, CatalogError> {
    let result = conn.query_row(
        "SELECT chapter_id, manga_id, chapter_num, page_count FROM chapter WHERE chapter_id = ?1",
        params![id],
        row_to_chapter,
    );
    match result {
        Ok(chapter) => Ok(Some(chapter)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Look up a chapter by work and number.
pub fn find_chapter_by_number(
    conn: &Connection,
    work_id: WorkId,
    number: ChapterNumber,
) -> Result<Option<Chapter>, CatalogError> {
    let result = conn.query_row(
        "SELECT chapter_id, manga_id, chapter_num, page_count FROM chapter
         WHERE manga_id = ?1 AND chapter_num = ?2",
        params![work_id, number.value()],
        row_to_chapter,
    );
    match result {
        Ok(chapter) => Ok(Some(chapter)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_chapter(conn: &Connection, id: ChapterId) -> Result<Chapter, CatalogError> {
    find_chapter(conn, id)?.ok_or_else(|| CatalogError::not_found(EntityKind::Chapter, id))
}

/// Chapters of a work in number order, with the pages stored for each.
pub fn list_chapters(
    conn: &Connection,
    work_id: WorkId,
) -> Result<Vec<ChapterListing>, CatalogError> {
    require_work(conn, work_id)?;
    let mut stmt = conn.prepare(
        "SELECT c.chapter_id, c.manga_id, c.chapter_num, c.page_count, COUNT(p.page_id)
         FROM chapter c
         LEFT JOIN pages p ON p.chapter_id = c.chapter_id
         WHERE c.manga_id = ?1
         GROUP BY c.chapter_id
         ORDER BY c.chapter_num",
    )?;
    let rows = stmt.query_map(params![work_id], |row| {
        let stored: i64 = row.get(4)?;
        Ok(ChapterListing {
            chapter: row_to_chapter(row)?,
            stored_pages: u64::try_from(stored).unwrap_or(0),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Renumber a chapter or change its declared page count.
pub fn update_chapter(
    conn: &Connection,
    id: ChapterId,
    number: ChapterNumber,
    page_count: Option<u32>,
) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        let chapter = get_chapter(tx, id)?;
        tx.execute(
            "UPDATE chapter SET chapter_num = ?2, page_count = ?3 WHERE chapter_id = ?1",
            params![id, number.value(), page_count],
        )
        .map_err(|e| classify(e, EntityKind::Chapter, chapter_key(chapter.work_id, number)))?;
        Ok(())
    })
}

/// Delete a chapter with all of its translations and pages.
pub fn delete_chapter(conn: &Connection, id: ChapterId) -> Result<(), CatalogError> {
    delete_by_key(
        conn,
        Removal::Chapter,
        "DELETE FROM chapter WHERE chapter_id = ?1",
        id,
    )
}

fn chapter_key(work_id: WorkId, number: ChapterNumber) -> String {
    format!("chapter {number} of work {work_id}")
}

// ── Translation Operations ──────────────────────────────────────────────────

/// Record that a chapter has been translated into a language.
///
/// The chapter's work must support the language.
pub fn add_translation(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
    translation_date: Option<NaiveDate>,
    is_complete: bool,
) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        let chapter = get_chapter(tx, chapter_id)?;
        require_language(tx, language_id)?;
        insert_translation(tx, &chapter, language_id, translation_date, is_complete)
    })?;
    log::debug!("Added '{}' translation of chapter {}", language_id, chapter_id);
    Ok(())
}

fn insert_translation(
    conn: &Connection,
    chapter: &Chapter,
    language_id: &str,
    translation_date: Option<NaiveDate>,
    is_complete: bool,
) -> Result<(), CatalogError> {
    if !is_supported(conn, chapter.work_id, language_id)? {
        return Err(CatalogError::LanguageNotSupported {
            work_id: chapter.work_id,
            language_id: language_id.to_string(),
        });
    }
    conn.execute(
        "INSERT INTO translated_to (language_id, chapter_id, translation_date, is_complete)
         VALUES (?1, ?2, ?3, ?4)",
        params![language_id, chapter.id, translation_date, is_complete],
    )
    .map_err(|e| classify(e, EntityKind::Translation, translation_key(chapter.id, language_id)))?;
    Ok(())
}

/// Translations of a chapter, ordered by language name.
pub fn list_translations(
    conn: &Connection,
    chapter_id: ChapterId,
) -> Result<Vec<Translation>, CatalogError> {
    get_chapter(conn, chapter_id)?;
    let mut stmt = conn.prepare(
        "SELECT t.chapter_id, t.language_id, l.language_name_en, t.translation_date, t.is_complete
         FROM translated_to t
         JOIN language l ON l.language_id = t.language_id
         WHERE t.chapter_id = ?1
         ORDER BY l.language_name_en",
    )?;
    let rows = stmt.query_map(params![chapter_id], row_to_translation)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn translation_exists(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
) -> Result<bool, CatalogError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM translated_to WHERE chapter_id = ?1 AND language_id = ?2)",
        params![chapter_id, language_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Delete a translation. Refused while it still has pages.
pub fn delete_translation(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
) -> Result<(), CatalogError> {
    let result = in_transaction(conn, |tx| {
        let pages = count_translation_pages(tx, chapter_id, language_id)?;
        check_removal(Removal::Translation, pages)?;
        let changed = tx.execute(
            "DELETE FROM translated_to WHERE chapter_id = ?1 AND language_id = ?2",
            params![chapter_id, language_id],
        )?;
        if changed == 0 {
            return Err(CatalogError::not_found(
                EntityKind::Translation,
                translation_key(chapter_id, language_id),
            ));
        }
        Ok(())
    });
    if let Err(CatalogError::DependentsExist { count, .. }) = &result {
        log::warn!(
            "Refused to delete '{}' translation of chapter {}: {} page(s) remain",
            language_id,
            chapter_id,
            count
        );
    }
    result
}

fn translation_key(chapter_id: ChapterId, language_id: &str) -> String {
    format!("chapter {chapter_id} in '{language_id}'")
}

// ── Page Operations ─────────────────────────────────────────────────────────

/// Add a page to an existing translation.
pub fn create_page(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
    page_number: u32,
    path: &str,
) -> Result<PageId, CatalogError> {
    validate_page_number(i64::from(page_number))?;
    validate_reference(path)?;
    in_transaction(conn, |tx| {
        get_chapter(tx, chapter_id)?;
        require_language(tx, language_id)?;
        require_translation(tx, chapter_id, language_id)?;
        insert_page(tx, chapter_id, language_id, page_number, path)
    })
}

fn insert_page(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
    page_number: u32,
    path: &str,
) -> Result<PageId, CatalogError> {
    conn.execute(
        "INSERT INTO pages (page_num, page_path, chapter_id, language_id) VALUES (?1, ?2, ?3, ?4)",
        params![page_number, path, chapter_id, language_id],
    )
    .map_err(|e| {
        classify(e, EntityKind::Page, page_key(chapter_id, language_id, page_number))
    })?;
    Ok(conn.last_insert_rowid())
}

/// The number a newly appended page should take: one past the highest stored.
pub fn next_page_number(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
) -> Result<u32, CatalogError> {
    let max: Option<u32> = conn.query_row(
        "SELECT MAX(page_num) FROM pages WHERE chapter_id = ?1 AND language_id = ?2",
        params![chapter_id, language_id],
        |row| row.get(0),
    )?;
    Ok(max.map_or(1, |n| n.saturating_add(1)))
}

pub fn get_page(conn: &Connection, id: PageId) -> Result<Page, CatalogError> {
    let result = conn.query_row(
        "SELECT page_id, chapter_id, language_id, page_num, page_path FROM pages WHERE page_id = ?1",
        params![id],
        row_to_page,
    );
    match result {
        Ok(page) => Ok(page),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(CatalogError::not_found(EntityKind::Page, id)),
        Err(e) => Err(e.into()),
    }
}

/// Pages of one translation in page order.
pub fn list_pages(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
) -> Result<Vec<Page>, CatalogError> {
    get_chapter(conn, chapter_id)?;
    require_translation(conn, chapter_id, language_id)?;
    let mut stmt = conn.prepare(
        "SELECT page_id, chapter_id, language_id, page_num, page_path FROM pages
         WHERE chapter_id = ?1 AND language_id = ?2
         ORDER BY page_num",
    )?;
    let rows = stmt.query_map(params![chapter_id, language_id], row_to_page)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Renumber a page or point it at a different artifact.
pub fn update_page(
    conn: &Connection,
    id: PageId,
    page_number: u32,
    path: &str,
) -> Result<(), CatalogError> {
    validate_page_number(i64::from(page_number))?;
    validate_reference(path)?;
    in_transaction(conn, |tx| {
        let page = get_page(tx, id)?;
        tx.execute(
            "UPDATE pages SET page_num = ?2, page_path = ?3 WHERE page_id = ?1",
            params![id, page_number, path],
        )
        .map_err(|e| {
            classify(
                e,
                EntityKind::Page,
                page_key(page.chapter_id, &page.language_id, page_number),
            )
        })?;
        Ok(())
    })
}

pub fn delete_page(conn: &Connection, id: PageId) -> Result<(), CatalogError> {
    delete_by_key(conn, Removal::Page, "DELETE FROM pages WHERE page_id = ?1", id)
}

fn page_key(chapter_id: ChapterId, language_id: &str, page_number: u32) -> String {
    format!("page {page_number} of chapter {chapter_id} in '{language_id}'")
}

// ── Author Operations ───────────────────────────────────────────────────────

pub fn create_author(conn: &Connection, name: &str) -> Result<AuthorId, CatalogError> {
    let name = required_name(name, "author name")?;
    in_transaction(conn, |tx| insert_author(tx, &name))
}

fn insert_author(conn: &Connection, name: &str) -> Result<AuthorId, CatalogError> {
    conn.execute(
        "INSERT INTO author (name_romanized) VALUES (?1)",
        params![name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_author(conn: &Connection, id: AuthorId) -> Result<Author, CatalogError> {
    let result = conn.query_row(
        "SELECT author_id, name_romanized FROM author WHERE author_id = ?1",
        params![id],
        row_to_author,
    );
    match result {
        Ok(author) => Ok(author),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(CatalogError::not_found(EntityKind::Author, id))
        }
        Err(e) => Err(e.into()),
    }
}

/// Find an author by exact name. Author names are not unique; the oldest wins.
pub fn find_author_by_name(conn: &Connection, name: &str) -> Result<Option<Author>, CatalogError> {
    let result = conn.query_row(
        "SELECT author_id, name_romanized FROM author WHERE name_romanized = ?1
         ORDER BY author_id LIMIT 1",
        params![name],
        row_to_author,
    );
    match result {
        Ok(author) => Ok(Some(author)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_author(conn: &Connection, id: AuthorId, name: &str) -> Result<(), CatalogError> {
    let name = required_name(name, "author name")?;
    in_transaction(conn, |tx| {
        let changed = tx.execute(
            "UPDATE author SET name_romanized = ?2 WHERE author_id = ?1",
            params![id, name],
        )?;
        if changed == 0 {
            return Err(CatalogError::not_found(EntityKind::Author, id));
        }
        Ok(())
    })
}

/// Delete an author and every credit they hold.
pub fn delete_author(conn: &Connection, id: AuthorId) -> Result<(), CatalogError> {
    delete_by_key(
        conn,
        Removal::Author,
        "DELETE FROM author WHERE author_id = ?1",
        id,
    )
}

/// Authors whose name contains `search` (case-insensitive), with the number of works they wrote.
pub fn list_authors(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<Usage<Author>>, CatalogError> {
    let pattern = search_pattern(search);
    let mut stmt = conn.prepare(
        "SELECT a.author_id, a.name_romanized, COUNT(DISTINCT w.manga_id)
         FROM author a
         LEFT JOIN writes w ON w.author_id = a.author_id
         WHERE ?1 IS NULL OR LOWER(a.name_romanized) LIKE ?1 ESCAPE '\\'
         GROUP BY a.author_id
         ORDER BY a.name_romanized COLLATE NOCASE, a.author_id",
    )?;
    let rows = stmt.query_map(params![pattern], |row| {
        Ok(Usage {
            item: row_to_author(row)?,
            work_count: usage_count(row, 2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Tag Operations ──────────────────────────────────────────────────────────

pub fn create_tag(conn: &Connection, name: &str) -> Result<TagId, CatalogError> {
    let name = required_name(name, "tag name")?;
    in_transaction(conn, |tx| insert_tag(tx, &name))
}

fn insert_tag(conn: &Connection, name: &str) -> Result<TagId, CatalogError> {
    conn.execute("INSERT INTO tag (tag_name) VALUES (?1)", params![name])
        .map_err(|e| classify(e, EntityKind::Tag, name))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_tag(conn: &Connection, id: TagId) -> Result<Tag, CatalogError> {
    let result = conn.query_row(
        "SELECT tag_id, tag_name FROM tag WHERE tag_id = ?1",
        params![id],
        row_to_tag,
    );
    match result {
        Ok(tag) => Ok(tag),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(CatalogError::not_found(EntityKind::Tag, id)),
        Err(e) => Err(e.into()),
    }
}

pub fn find_tag_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>, CatalogError> {
    let result = conn.query_row(
        "SELECT tag_id, tag_name FROM tag WHERE tag_name = ?1",
        params![name],
        row_to_tag,
    );
    match result {
        Ok(tag) => Ok(Some(tag)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Rename a tag. Fails with `AlreadyExists` if another tag has the new name.
pub fn update_tag(conn: &Connection, id: TagId, name: &str) -> Result<(), CatalogError> {
    let name = required_name(name, "tag name")?;
    in_transaction(conn, |tx| {
        let changed = tx
            .execute(
                "UPDATE tag SET tag_name = ?2 WHERE tag_id = ?1",
                params![id, name],
            )
            .map_err(|e| classify(e, EntityKind::Tag, &name))?;
        if changed == 0 {
            return Err(CatalogError::not_found(EntityKind::Tag, id));
        }
        Ok(())
    })
}

/// Delete a tag and unlink it from every work.
pub fn delete_tag(conn: &Connection, id: TagId) -> Result<(), CatalogError> {
    delete_by_key(conn, Removal::Tag, "DELETE FROM tag WHERE tag_id = ?1", id)
}

/// Tags whose name contains `search` (case-insensitive), with the number of works using them.
pub fn list_tags(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<Usage<Tag>>, CatalogError> {
    let pattern = search_pattern(search);
    let mut stmt = conn.prepare(
        "SELECT t.tag_id, t.tag_name, COUNT(DISTINCT h.manga_id)
         FROM tag t
         LEFT JOIN has h ON h.tag_id = t.tag_id
         WHERE ?1 IS NULL OR LOWER(t.tag_name) LIKE ?1 ESCAPE '\\'
         GROUP BY t.tag_id
         ORDER BY t.tag_name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map(params![pattern], |row| {
        Ok(Usage {
            item: row_to_tag(row)?,
            work_count: usage_count(row, 2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Language Operations ─────────────────────────────────────────────────────

/// Register a language under a short id such as `en`.
pub fn create_language(conn: &Connection, language: &Language) -> Result<(), CatalogError> {
    let id = required_name(&language.id, "language id")?;
    let name = required_name(&language.name, "language name")?;
    in_transaction(conn, |tx| {
        tx.execute(
            "INSERT INTO language (language_id, language_name_en) VALUES (?1, ?2)",
            params![id, name],
        )
        .map_err(|e| classify(e, EntityKind::Language, &id))?;
        Ok(())
    })
}

pub fn get_language(conn: &Connection, id: &str) -> Result<Language, CatalogError> {
    let result = conn.query_row(
        "SELECT language_id, language_name_en FROM language WHERE language_id = ?1",
        params![id],
        row_to_language,
    );
    match result {
        Ok(language) => Ok(language),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(CatalogError::not_found(EntityKind::Language, id))
        }
        Err(e) => Err(e.into()),
    }
}

/// All languages, ordered by display name.
pub fn list_languages(conn: &Connection) -> Result<Vec<Language>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT language_id, language_name_en FROM language ORDER BY language_name_en",
    )?;
    let rows = stmt.query_map([], row_to_language)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Relation Operations ─────────────────────────────────────────────────────

/// Credit an author on a work. The same author may hold several roles.
pub fn add_author_to_work(
    conn: &Connection,
    work_id: WorkId,
    author_id: AuthorId,
    role: &str,
) -> Result<(), CatalogError> {
    let role = role.trim();
    in_transaction(conn, |tx| {
        require_work(tx, work_id)?;
        get_author(tx, author_id)?;
        tx.execute(
            "INSERT INTO writes (author_id, manga_id, role) VALUES (?1, ?2, ?3)",
            params![author_id, work_id, role],
        )
        .map_err(|e| {
            classify(
                e,
                EntityKind::Relation,
                format!("author {author_id} on work {work_id} as '{role}'"),
            )
        })?;
        Ok(())
    })
}

/// Remove an author's credit from a work: one role when given, otherwise all of them.
pub fn remove_author_from_work(
    conn: &Connection,
    work_id: WorkId,
    author_id: AuthorId,
    role: Option<&str>,
) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        let changed = tx.execute(
            "DELETE FROM writes WHERE manga_id = ?1 AND author_id = ?2 AND (?3 IS NULL OR role = ?3)",
            params![work_id, author_id, role.map(str::trim)],
        )?;
        if changed == 0 {
            return Err(CatalogError::not_found(
                EntityKind::Relation,
                format!("author {author_id} on work {work_id}"),
            ));
        }
        Ok(())
    })
}

pub fn add_tag_to_work(conn: &Connection, work_id: WorkId, tag_id: TagId) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        require_work(tx, work_id)?;
        get_tag(tx, tag_id)?;
        tx.execute(
            "INSERT INTO has (tag_id, manga_id) VALUES (?1, ?2)",
            params![tag_id, work_id],
        )
        .map_err(|e| classify(e, EntityKind::Relation, format!("tag {tag_id} on work {work_id}")))?;
        Ok(())
    })
}

pub fn remove_tag_from_work(
    conn: &Connection,
    work_id: WorkId,
    tag_id: TagId,
) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        let changed = tx.execute(
            "DELETE FROM has WHERE manga_id = ?1 AND tag_id = ?2",
            params![work_id, tag_id],
        )?;
        if changed == 0 {
            return Err(CatalogError::not_found(
                EntityKind::Relation,
                format!("tag {tag_id} on work {work_id}"),
            ));
        }
        Ok(())
    })
}

/// Declare that a work is offered in a language.
pub fn add_language_support(
    conn: &Connection,
    work_id: WorkId,
    language_id: &str,
) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        require_work(tx, work_id)?;
        require_language(tx, language_id)?;
        tx.execute(
            "INSERT INTO supports (language_id, manga_id) VALUES (?1, ?2)",
            params![language_id, work_id],
        )
        .map_err(|e| {
            classify(
                e,
                EntityKind::Relation,
                format!("language '{language_id}' on work {work_id}"),
            )
        })?;
        Ok(())
    })
}

/// Withdraw a work's support for a language. Refused while any of the
/// work's chapters is still translated into it.
pub fn remove_language_support(
    conn: &Connection,
    work_id: WorkId,
    language_id: &str,
) -> Result<(), CatalogError> {
    let result = in_transaction(conn, |tx| {
        let translations = count_work_translations(tx, work_id, language_id)?;
        check_removal(Removal::LanguageSupport, translations)?;
        let changed = tx.execute(
            "DELETE FROM supports WHERE manga_id = ?1 AND language_id = ?2",
            params![work_id, language_id],
        )?;
        if changed == 0 {
            return Err(CatalogError::not_found(
                EntityKind::Relation,
                format!("language '{language_id}' on work {work_id}"),
            ));
        }
        Ok(())
    });
    if let Err(CatalogError::DependentsExist { count, .. }) = &result {
        log::warn!(
            "Refused to remove '{}' from work {}: {} translation(s) remain",
            language_id,
            work_id,
            count
        );
    }
    result
}

pub fn is_supported(
    conn: &Connection,
    work_id: WorkId,
    language_id: &str,
) -> Result<bool, CatalogError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM supports WHERE manga_id = ?1 AND language_id = ?2)",
        params![work_id, language_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

// ── Seed Loading ────────────────────────────────────────────────────────────

/// Rows written while applying seed data. Rows that already existed unchanged are not counted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedStats {
    pub languages: usize,
    pub tags: usize,
    pub authors: usize,
    pub works: usize,
    pub chapters: usize,
    pub translations: usize,
    pub pages: usize,
}

/// Load seed data into the database in a single transaction.
///
/// Safe to call repeatedly: works are matched on their three names, chapters
/// on their number, and reference data on name or id.
pub fn seed_catalog(conn: &Connection, seed: &SeedData) -> Result<SeedStats, CatalogError> {
    let stats = in_transaction(conn, |tx| {
        let mut stats = SeedStats::default();

        for language in &seed.languages {
            stats.languages += tx.execute(
                "INSERT INTO language (language_id, language_name_en) VALUES (?1, ?2)
                 ON CONFLICT(language_id) DO UPDATE SET language_name_en = excluded.language_name_en
                 WHERE language_name_en != excluded.language_name_en",
                params![language.id.trim(), language.name.trim()],
            )?;
        }
        for tag in &seed.tags {
            ensure_tag(tx, tag, &mut stats)?;
        }
        for author in &seed.authors {
            ensure_author(tx, author, &mut stats)?;
        }
        for work in &seed.works {
            seed_work(tx, work, &mut stats)?;
        }

        Ok(stats)
    })?;
    log::info!(
        "Seeded {} works, {} chapters, {} pages",
        stats.works,
        stats.chapters,
        stats.pages
    );
    Ok(stats)
}

fn seed_work(tx: &Connection, seed: &SeedWork, stats: &mut SeedStats) -> Result<(), CatalogError> {
    let fields = validated_work_fields(&seed.fields)?;
    let existing: Option<WorkId> = match tx.query_row(
        "SELECT manga_id FROM manga
         WHERE name_english IS ?1 AND name_romanized IS ?2 AND name_original IS ?3
         ORDER BY manga_id LIMIT 1",
        params![fields.name_english, fields.name_romanized, fields.name_original],
        |row| row.get(0),
    ) {
        Ok(id) => Some(id),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(e.into()),
    };
    let work_id = match existing {
        Some(id) => id,
        None => {
            stats.works += 1;
            insert_work(tx, &fields)?
        }
    };

    for tag in &seed.tags {
        let tag_id = ensure_tag(tx, tag, stats)?;
        tx.execute(
            "INSERT OR IGNORE INTO has (tag_id, manga_id) VALUES (?1, ?2)",
            params![tag_id, work_id],
        )?;
    }
    for credit in &seed.authors {
        let author_id = ensure_author(tx, &credit.name, stats)?;
        tx.execute(
            "INSERT OR IGNORE INTO writes (author_id, manga_id, role) VALUES (?1, ?2, ?3)",
            params![author_id, work_id, credit.role.trim()],
        )?;
    }
    for language_id in &seed.languages {
        require_language(tx, language_id)?;
        tx.execute(
            "INSERT OR IGNORE INTO supports (language_id, manga_id) VALUES (?1, ?2)",
            params![language_id, work_id],
        )?;
    }
    for chapter in &seed.chapters {
        seed_chapter(tx, work_id, chapter, stats)?;
    }
    Ok(())
}

fn seed_chapter(
    tx: &Connection,
    work_id: WorkId,
    seed: &SeedChapter,
    stats: &mut SeedStats,
) -> Result<(), CatalogError> {
    let chapter = match find_chapter_by_number(tx, work_id, seed.number)? {
        Some(chapter) => chapter,
        None => {
            let id = insert_chapter(tx, work_id, seed.number, seed.page_count)?;
            stats.chapters += 1;
            get_chapter(tx, id)?
        }
    };

    for translation in &seed.translations {
        let language_id = translation.language.trim();
        if !translation_exists(tx, chapter.id, language_id)? {
            require_language(tx, language_id)?;
            insert_translation(
                tx,
                &chapter,
                language_id,
                translation.date,
                translation.complete,
            )?;
            stats.translations += 1;
        }
        for (index, path) in translation.pages.iter().enumerate() {
            validate_reference(path)?;
            let page_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            stats.pages += tx.execute(
                "INSERT OR IGNORE INTO pages (page_num, page_path, chapter_id, language_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![page_number, path, chapter.id, language_id],
            )?;
        }
    }
    Ok(())
}

fn ensure_tag(tx: &Connection, name: &str, stats: &mut SeedStats) -> Result<TagId, CatalogError> {
    let name = required_name(name, "tag name")?;
    if let Some(tag) = find_tag_by_name(tx, &name)? {
        return Ok(tag.id);
    }
    stats.tags += 1;
    insert_tag(tx, &name)
}

fn ensure_author(
    tx: &Connection,
    name: &str,
    stats: &mut SeedStats,
) -> Result<AuthorId, CatalogError> {
    let name = required_name(name, "author name")?;
    if let Some(author) = find_author_by_name(tx, &name)? {
        return Ok(author.id);
    }
    stats.authors += 1;
    insert_author(tx, &name)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Delete one row by integer key, reporting `NotFound` when nothing matched.
fn delete_by_key(conn: &Connection, removal: Removal, sql: &str, id: i64) -> Result<(), CatalogError> {
    in_transaction(conn, |tx| {
        let changed = tx.execute(sql, params![id])?;
        if changed == 0 {
            return Err(CatalogError::not_found(removal.kind(), id));
        }
        Ok(())
    })?;
    log::debug!("Deleted {} {}", removal.kind(), id);
    Ok(())
}

pub(crate) fn require_work(conn: &Connection, id: WorkId) -> Result<(), CatalogError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM manga WHERE manga_id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(CatalogError::not_found(EntityKind::Work, id))
    }
}

fn require_language(conn: &Connection, id: &str) -> Result<(), CatalogError> {
    get_language(conn, id).map(|_| ())
}

pub(crate) fn require_translation(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
) -> Result<(), CatalogError> {
    if translation_exists(conn, chapter_id, language_id)? {
        Ok(())
    } else {
        Err(CatalogError::not_found(
            EntityKind::Translation,
            translation_key(chapter_id, language_id),
        ))
    }
}

fn required_name(value: &str, field: &'static str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Empty { field });
    }
    Ok(trimmed.to_string())
}

fn validate_reference(path: &str) -> Result<(), ModelError> {
    check_reference(path)
        .map(|_| ())
        .map_err(|e| ModelError::invalid_artifact_path(path, e.to_string()))
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| like_pattern(&s.to_lowercase()))
}

fn usage_count(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    let count: i64 = row.get(idx)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

pub(crate) fn row_to_work(row: &Row) -> rusqlite::Result<Work> {
    let status: String = row.get(4)?;
    Ok(Work {
        id: row.get(0)?,
        name_original: row.get(1)?,
        name_romanized: row.get(2)?,
        name_english: row.get(3)?,
        status: WorkStatus::from_str_loose(&status),
        started_publishing: row.get(5)?,
        ended_publishing: row.get(6)?,
        cover_path: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub(crate) fn row_to_chapter(row: &Row) -> rusqlite::Result<Chapter> {
    let raw: f64 = row.get(2)?;
    let number = ChapterNumber::new(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Real, Box::new(e)))?;
    Ok(Chapter {
        id: row.get(0)?,
        work_id: row.get(1)?,
        number,
        page_count: row.get(3)?,
    })
}

fn row_to_translation(row: &Row) -> rusqlite::Result<Translation> {
    Ok(Translation {
        chapter_id: row.get(0)?,
        language_id: row.get(1)?,
        language_name: row.get(2)?,
        translation_date: row.get(3)?,
        is_complete: row.get(4)?,
    })
}

fn row_to_page(row: &Row) -> rusqlite::Result<Page> {
    Ok(Page {
        id: row.get(0)?,
        chapter_id: row.get(1)?,
        language_id: row.get(2)?,
        page_number: row.get(3)?,
        path: row.get(4)?,
    })
}

pub(crate) fn row_to_author(row: &Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn row_to_tag(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn row_to_language(row: &Row) -> rusqlite::Result<Language> {
    Ok(Language {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
