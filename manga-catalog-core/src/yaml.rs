//! YAML seed files for populating a catalog.
//!
//! A seed document lists reference data (languages, tags, authors) and works
//! with their relations, chapters, translations and pages. Seeds are used to
//! bootstrap a fresh database and to build test fixtures.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{ChapterNumber, Language, WorkFields};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Directory not found: {0}")]
    DirNotFound(String),
}

/// The contents of one or more seed files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub works: Vec<SeedWork>,
}

impl SeedData {
    fn extend(&mut self, other: SeedData) {
        self.languages.extend(other.languages);
        self.tags.extend(other.tags);
        self.authors.extend(other.authors);
        self.works.extend(other.works);
    }
}

/// A work in a seed file. Tags, authors and languages are referenced by name/id.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedWork {
    #[serde(flatten)]
    pub fields: WorkFields,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub authors: Vec<SeedCredit>,
    /// Language ids the work supports.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub chapters: Vec<SeedChapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCredit {
    pub name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedChapter {
    pub number: ChapterNumber,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub translations: Vec<SeedTranslation>,
}

/// A translation of a seeded chapter. Pages are numbered in list order from 1.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTranslation {
    pub language: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub pages: Vec<String>,
}

/// Parse a seed document from a string.
pub fn parse_seed(contents: &str, origin: &str) -> Result<SeedData, SeedError> {
    serde_yml::from_str(contents).map_err(|e| SeedError::Parse {
        path: origin.to_string(),
        source: e,
    })
}

/// Load a single seed file.
pub fn load_seed(path: &Path) -> Result<SeedData, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed(&contents, &path.display().to_string())
}

/// Load and merge every `.yaml`/`.yml` file in a directory, in file-name order.
///
/// A missing directory yields empty seed data.
pub fn load_seed_dir(dir: &Path) -> Result<SeedData, SeedError> {
    if !dir.exists() {
        return Ok(SeedData::default());
    }
    if !dir.is_dir() {
        return Err(SeedError::DirNotFound(dir.display().to_string()));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| SeedError::Io {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut all = SeedData::default();
    for entry in entries {
        all.extend(load_seed(&entry.path())?);
    }
    Ok(all)
}
