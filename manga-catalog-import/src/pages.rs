//! Register a directory of page images as the pages of one translation.
//!
//! Image files are taken in file-name order and appended after the highest
//! page number already stored. Files whose reference is already registered
//! for the translation are skipped, so re-running after adding files only
//! appends the new ones.

use std::collections::HashSet;

use manga_catalog_core::{ArtifactError, ArtifactRoot, ChapterId};
use manga_catalog_db::{operations, CatalogError};
use rusqlite::Connection;
use thiserror::Error;

use crate::progress::ImportProgress;

/// File extensions treated as page images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif"];

#[derive(Debug, Error)]
pub enum PageImportError {
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Database error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Stopped after adding {added} page(s): {source}")]
    Aborted {
        added: u64,
        skipped: u64,
        #[source]
        source: CatalogError,
    },
}

/// Statistics from a page directory import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageImportStats {
    pub added: u64,
    /// Files already registered as pages of the translation.
    pub skipped: u64,
}

/// Add every image in `dir` (relative to `root`) as a page of the translation.
pub fn import_page_dir(
    conn: &Connection,
    root: &ArtifactRoot,
    chapter_id: ChapterId,
    language_id: &str,
    dir: &str,
    progress: Option<&dyn ImportProgress>,
) -> Result<PageImportStats, PageImportError> {
    let located = root.locate(dir)?;
    // Also confirms the chapter and translation exist.
    let registered: HashSet<String> = operations::list_pages(conn, chapter_id, language_id)?
        .into_iter()
        .map(|p| p.path)
        .collect();

    let files = image_files(&located)?;
    if let Some(p) = progress {
        p.on_phase(&format!(
            "Importing {} page image(s) from {}",
            files.len(),
            dir
        ));
    }

    let prefix = dir.trim_end_matches('/');
    let mut next = operations::next_page_number(conn, chapter_id, language_id)?;
    let mut stats = PageImportStats::default();

    for (i, name) in files.iter().enumerate() {
        let reference = format!("{}/{}", prefix, name);
        if registered.contains(&reference) {
            stats.skipped += 1;
        } else {
            match operations::create_page(conn, chapter_id, language_id, next, &reference) {
                Ok(_) => {
                    stats.added += 1;
                    next += 1;
                }
                Err(e) => {
                    return Err(PageImportError::Aborted {
                        added: stats.added,
                        skipped: stats.skipped,
                        source: e,
                    });
                }
            }
        }

        if let Some(p) = progress {
            p.on_item(i + 1, files.len(), name);
        }
    }

    let summary = format!(
        "Added {} page(s), skipped {} already registered",
        stats.added, stats.skipped
    );
    log::info!("Chapter {} '{}': {}", chapter_id, language_id, summary);
    if let Some(p) = progress {
        p.on_complete(&summary);
    }
    Ok(stats)
}

/// Names of the image files directly inside `dir`, sorted.
fn image_files(dir: &std::path::Path) -> Result<Vec<String>, PageImportError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PageImportError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_image(&path) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("Skipping non-UTF-8 file name {:?}", raw),
        }
    }
    names.sort();
    Ok(names)
}

fn is_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
