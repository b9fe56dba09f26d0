//! Delete guards for the parts of the hierarchy the schema does not enforce.
//!
//! Pages reference a (chapter, language) pair without a foreign key to
//! `translated_to`, and translations reference a language without checking
//! that the owning work still supports it. The repository keeps both links
//! intact by refusing the two deletes that would orphan them.

use manga_catalog_core::{ChapterId, EntityKind, WorkId};
use rusqlite::{params, Connection};

use crate::error::CatalogError;

/// How a delete treats rows that depend on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete immediately. Dependents go with it via `ON DELETE CASCADE`.
    Unconditional,
    /// Refuse while any row of `dependents` still references the target.
    Guarded { dependents: EntityKind },
}

/// Every delete the repository exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Work,
    Chapter,
    Translation,
    Page,
    Author,
    Tag,
    /// A `writes` row.
    AuthorCredit,
    /// A `has` row.
    TagLink,
    /// A `supports` row.
    LanguageSupport,
}

impl Removal {
    pub const ALL: [Removal; 9] = [
        Self::Work,
        Self::Chapter,
        Self::Translation,
        Self::Page,
        Self::Author,
        Self::Tag,
        Self::AuthorCredit,
        Self::TagLink,
        Self::LanguageSupport,
    ];

    pub const fn policy(self) -> DeletePolicy {
        match self {
            Self::Translation => DeletePolicy::Guarded {
                dependents: EntityKind::Page,
            },
            Self::LanguageSupport => DeletePolicy::Guarded {
                dependents: EntityKind::Translation,
            },
            _ => DeletePolicy::Unconditional,
        }
    }

    /// The entity kind reported when the target is missing or protected.
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Work => EntityKind::Work,
            Self::Chapter => EntityKind::Chapter,
            Self::Translation => EntityKind::Translation,
            Self::Page => EntityKind::Page,
            Self::Author => EntityKind::Author,
            Self::Tag => EntityKind::Tag,
            Self::AuthorCredit | Self::TagLink | Self::LanguageSupport => EntityKind::Relation,
        }
    }
}

/// Refuse `removal` when its policy is guarded and `dependents` is non-zero.
pub fn check_removal(removal: Removal, dependents: u64) -> Result<(), CatalogError> {
    match removal.policy() {
        DeletePolicy::Guarded { dependents: kind } if dependents > 0 => {
            Err(CatalogError::DependentsExist {
                kind: removal.kind(),
                dependents: kind,
                count: dependents,
            })
        }
        _ => Ok(()),
    }
}

/// Translations of the work's chapters into `language_id`.
pub fn count_work_translations(
    conn: &Connection,
    work_id: WorkId,
    language_id: &str,
) -> Result<u64, CatalogError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM translated_to t
         JOIN chapter c ON c.chapter_id = t.chapter_id
         WHERE c.manga_id = ?1 AND t.language_id = ?2",
        params![work_id, language_id],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Pages stored for one (chapter, language) translation.
pub fn count_translation_pages(
    conn: &Connection,
    chapter_id: ChapterId,
    language_id: &str,
) -> Result<u64, CatalogError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pages WHERE chapter_id = ?1 AND language_id = ?2",
        params![chapter_id, language_id],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}
