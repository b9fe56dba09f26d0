//! SQLite schema creation and migration.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a catalog database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SchemaError::Sqlite(rusqlite::Error::InvalidPath(
                    format!("{}: {}", parent.display(), e).into(),
                ))
            })?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    register_functions(&conn)?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        log::debug!("Creating catalog schema in {}", path.display());
        create_schema(&conn)?;
    } else if version != CURRENT_VERSION {
        migrate(&conn, version)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    register_functions(&conn)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Replace SQLite's ASCII-only `lower()` with full Unicode lowercasing, so
/// stored text folds the same way as search terms lowercased in Rust.
fn register_functions(conn: &Connection) -> Result<(), SchemaError> {
    conn.create_scalar_function(
        "lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )?;
    Ok(())
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    // Version 1 is the first schema, so no migration steps exist yet.
    let mut version = from_version;
    while version < CURRENT_VERSION {
        version += 1;
        log::info!("Migrated catalog schema to version {}", version);
        set_schema_version(conn, version)?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Works
CREATE TABLE IF NOT EXISTS manga (
    manga_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name_original TEXT,
    name_romanized TEXT,
    name_english TEXT,
    manga_status TEXT NOT NULL DEFAULT 'unknown',
    started_publishing TEXT,
    ended_publishing TEXT,
    cover_path TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_manga_status ON manga(manga_status);
CREATE INDEX IF NOT EXISTS idx_manga_started ON manga(started_publishing);

-- Reference data
CREATE TABLE IF NOT EXISTS author (
    author_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name_romanized TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tag (
    tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS language (
    language_id TEXT PRIMARY KEY,
    language_name_en TEXT NOT NULL
);

-- Work relations
CREATE TABLE IF NOT EXISTS writes (
    author_id INTEGER NOT NULL REFERENCES author(author_id) ON DELETE CASCADE,
    manga_id INTEGER NOT NULL REFERENCES manga(manga_id) ON DELETE CASCADE,
    role TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (author_id, manga_id, role)
);
CREATE INDEX IF NOT EXISTS idx_writes_manga ON writes(manga_id);

CREATE TABLE IF NOT EXISTS has (
    tag_id INTEGER NOT NULL REFERENCES tag(tag_id) ON DELETE CASCADE,
    manga_id INTEGER NOT NULL REFERENCES manga(manga_id) ON DELETE CASCADE,
    PRIMARY KEY (tag_id, manga_id)
);
CREATE INDEX IF NOT EXISTS idx_has_manga ON has(manga_id);

CREATE TABLE IF NOT EXISTS supports (
    language_id TEXT NOT NULL REFERENCES language(language_id) ON DELETE CASCADE,
    manga_id INTEGER NOT NULL REFERENCES manga(manga_id) ON DELETE CASCADE,
    PRIMARY KEY (language_id, manga_id)
);
CREATE INDEX IF NOT EXISTS idx_supports_manga ON supports(manga_id);

-- Chapters
CREATE TABLE IF NOT EXISTS chapter (
    chapter_id INTEGER PRIMARY KEY AUTOINCREMENT,
    manga_id INTEGER NOT NULL REFERENCES manga(manga_id) ON DELETE CASCADE,
    chapter_num REAL NOT NULL CHECK (chapter_num >= 0),
    page_count INTEGER,
    UNIQUE (manga_id, chapter_num)
);

CREATE TABLE IF NOT EXISTS translated_to (
    language_id TEXT NOT NULL REFERENCES language(language_id),
    chapter_id INTEGER NOT NULL REFERENCES chapter(chapter_id) ON DELETE CASCADE,
    translation_date TEXT,
    is_complete BOOLEAN NOT NULL DEFAULT 0,
    PRIMARY KEY (chapter_id, language_id)
);
CREATE INDEX IF NOT EXISTS idx_translated_language ON translated_to(language_id);

-- Pages share the (chapter, language) key with translated_to but have no
-- foreign key to it; the repository guards that link.
CREATE TABLE IF NOT EXISTS pages (
    page_id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_num INTEGER NOT NULL CHECK (page_num > 0),
    page_path TEXT NOT NULL,
    chapter_id INTEGER NOT NULL REFERENCES chapter(chapter_id) ON DELETE CASCADE,
    language_id TEXT NOT NULL REFERENCES language(language_id),
    UNIQUE (chapter_id, language_id, page_num)
);
"#;
