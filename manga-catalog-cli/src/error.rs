use manga_catalog_core::{ArtifactError, ModelError, SeedError};
use manga_catalog_db::{CatalogError, SchemaError};
use manga_catalog_import::{BulkError, PageImportError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Settings or database location problem
    #[error("Config error: {0}")]
    Config(String),

    /// Input rejected before it reached the catalog
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// A link of the catalog hierarchy is missing
    #[error("{0}")]
    NotFound(String),

    /// The catalog refused a mutation (duplicate, dependents, unsupported language)
    #[error("Refused: {message}")]
    Refused {
        message: String,
        hint: &'static str,
    },

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Process exit status for this error.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid(_) => 2,
            Self::Refused { .. } => 3,
            Self::NotFound(_) => 4,
            _ => 1,
        }
    }

    /// A follow-up hint printed after the error, when one applies.
    pub(crate) fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Refused { hint, .. } => Some(*hint),
            _ => None,
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation(_) => Self::Invalid(e.to_string()),
            CatalogError::NotFound { .. } => Self::NotFound(e.to_string()),
            CatalogError::Sqlite(_) => Self::Database(e.to_string()),
            CatalogError::AlreadyExists { .. } => Self::Refused {
                hint: "Edit the existing record instead of adding a new one.",
                message: e.to_string(),
            },
            CatalogError::DependentsExist { .. } => Self::Refused {
                hint: "Remove the dependent records first, then retry.",
                message: e.to_string(),
            },
            CatalogError::LanguageNotSupported { .. } => Self::Refused {
                hint: "Add support with 'manga-catalog languages support <WORK> <LANG>'.",
                message: e.to_string(),
            },
        }
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        Self::Invalid(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::database(format!("Failed to open catalog database: {}", e))
    }
}

impl From<SeedError> for CliError {
    fn from(e: SeedError) -> Self {
        match e {
            SeedError::Parse { .. } => Self::invalid(e.to_string()),
            SeedError::DirNotFound(_) => Self::NotFound(e.to_string()),
            SeedError::Io { .. } => Self::other(e.to_string()),
        }
    }
}

impl From<ArtifactError> for CliError {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::Missing(_) => Self::NotFound(e.to_string()),
            ArtifactError::Io { source, .. } => Self::Io(source),
            _ => Self::Invalid(e.to_string()),
        }
    }
}

impl From<BulkError> for CliError {
    fn from(e: BulkError) -> Self {
        match e {
            BulkError::InvalidRange { .. } => Self::Invalid(e.to_string()),
            BulkError::Catalog(inner) => inner.into(),
            BulkError::Aborted { .. } => Self::Database(e.to_string()),
        }
    }
}

impl From<PageImportError> for CliError {
    fn from(e: PageImportError) -> Self {
        match e {
            PageImportError::Artifact(inner) => inner.into(),
            PageImportError::Catalog(inner) => inner.into(),
            PageImportError::Io { source, .. } => Self::Io(source),
            PageImportError::Aborted { .. } => Self::Database(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::other(format!("Failed to serialize export: {}", e))
    }
}
