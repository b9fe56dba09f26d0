//! Outcomes of catalog repository calls.

use manga_catalog_core::{EntityKind, ModelError, WorkId};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input rejected before the store was touched.
    #[error("Invalid input: {0}")]
    Validation(#[from] ModelError),

    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: EntityKind, key: String },

    /// A guarded delete refused because `count` rows of `dependents` still reference the target.
    #[error("Cannot remove {kind}: {count} {dependents}(s) still depend on it")]
    DependentsExist {
        kind: EntityKind,
        dependents: EntityKind,
        count: u64,
    },

    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("Work {work_id} does not support language '{language_id}'")]
    LanguageNotSupported { work_id: WorkId, language_id: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn already_exists(kind: EntityKind, key: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.to_string(),
        }
    }

    /// True for a uniqueness conflict. Bulk creation skips these.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// True when the store refused a mutation to protect an invariant.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::DependentsExist { .. } | Self::LanguageNotSupported { .. }
        )
    }

    /// Which link of the hierarchy was missing, if this is a `NotFound`.
    pub fn not_found_kind(&self) -> Option<EntityKind> {
        match self {
            Self::NotFound { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// True when SQLite rejected a write because of a UNIQUE or PRIMARY KEY constraint.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

/// Map a failed write, turning uniqueness violations into `AlreadyExists { kind, key }`.
pub fn classify(err: rusqlite::Error, kind: EntityKind, key: impl ToString) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::already_exists(kind, key)
    } else {
        CatalogError::Sqlite(err)
    }
}
