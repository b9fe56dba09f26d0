//! Mapping stored artifact references onto the storage directory.
//!
//! Page and cover references in the catalog are relative paths. Before any
//! file is handed out, [`ArtifactRoot::locate`] checks that the reference
//! cannot leave the storage root, both lexically and after resolving links.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact reference is empty")]
    Empty,

    #[error("Artifact reference '{0}' escapes the storage root")]
    Escapes(String),

    #[error("Artifact not found: {0}")]
    Missing(String),

    #[error("I/O error resolving {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// Check that a reference is a plain relative path with no `..`, root, or
/// drive-prefix components.
pub fn check_reference(reference: &str) -> Result<&Path, ArtifactError> {
    if reference.trim().is_empty() {
        return Err(ArtifactError::Empty);
    }
    let path = Path::new(reference);
    let clean = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !clean || path.is_absolute() {
        return Err(ArtifactError::Escapes(reference.to_string()));
    }
    Ok(path)
}

/// The designated directory that page images and covers live under.
#[derive(Debug, Clone)]
pub struct ArtifactRoot {
    root: PathBuf,
}

impl ArtifactRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored reference to an existing file inside the root.
    ///
    /// Does not read the file.
    pub fn locate(&self, reference: &str) -> Result<PathBuf, ArtifactError> {
        let relative = check_reference(reference)?;
        let candidate = self.root.join(relative);
        if !candidate.exists() {
            return Err(ArtifactError::Missing(reference.to_string()));
        }

        let canonical_root = self.root.canonicalize().map_err(|e| ArtifactError::Io {
            path: self.root.display().to_string(),
            source: e,
        })?;
        let canonical = candidate.canonicalize().map_err(|e| ArtifactError::Io {
            path: candidate.display().to_string(),
            source: e,
        })?;

        // A symlink inside the root can still point outside it.
        if !canonical.starts_with(&canonical_root) {
            return Err(ArtifactError::Escapes(reference.to_string()));
        }
        Ok(canonical)
    }
}
