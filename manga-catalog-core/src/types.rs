//! Data model types for the manga catalog.
//!
//! These types represent the persistent catalog schema: works, chapters,
//! translations, pages, and the author/tag/language reference data with
//! their join relations.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Title shown when a work has none of its three names set.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

pub type WorkId = i64;
pub type ChapterId = i64;
pub type PageId = i64;
pub type AuthorId = i64;
pub type TagId = i64;
/// Language keys are short text codes such as `en` or `ja`.
pub type LanguageId = String;

// ── Entity Kinds ────────────────────────────────────────────────────────────

/// Which link of the catalog hierarchy an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Work,
    Chapter,
    Translation,
    Page,
    Author,
    Tag,
    Language,
    /// A Writes/Has/Supports join row.
    Relation,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Chapter => "chapter",
            Self::Translation => "translation",
            Self::Page => "page",
            Self::Author => "author",
            Self::Tag => "tag",
            Self::Language => "language",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Work ────────────────────────────────────────────────────────────────────

/// Publication status of a work.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    #[default]
    Unknown,
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 5] = [
        Self::Unknown,
        Self::Ongoing,
        Self::Completed,
        Self::Hiatus,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Hiatus => "hiatus",
            Self::Cancelled => "cancelled",
        }
    }

    /// Map a stored value back to a status. Unrecognised values read as `Unknown`.
    pub fn from_str_loose(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for WorkStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the title to show for a work: english, then romanized, then original.
///
/// Blank names count as absent.
pub fn display_title<'a>(
    english: Option<&'a str>,
    romanized: Option<&'a str>,
    original: Option<&'a str>,
) -> &'a str {
    [english, romanized, original]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_TITLE)
}

/// Trim a free-text field, turning blank input into `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A serialized title (manga), the root catalog entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Work {
    pub id: WorkId,
    pub name_original: Option<String>,
    pub name_romanized: Option<String>,
    pub name_english: Option<String>,
    pub status: WorkStatus,
    pub started_publishing: Option<NaiveDate>,
    pub ended_publishing: Option<NaiveDate>,
    pub cover_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Work {
    pub fn display_title(&self) -> &str {
        display_title(
            self.name_english.as_deref(),
            self.name_romanized.as_deref(),
            self.name_original.as_deref(),
        )
    }
}

/// The editable fields of a work, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkFields {
    #[serde(default)]
    pub name_original: Option<String>,
    #[serde(default)]
    pub name_romanized: Option<String>,
    #[serde(default)]
    pub name_english: Option<String>,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default)]
    pub started_publishing: Option<NaiveDate>,
    #[serde(default)]
    pub ended_publishing: Option<NaiveDate>,
    #[serde(default)]
    pub cover_path: Option<String>,
}

impl WorkFields {
    /// Fields for a work known only by its english title.
    pub fn english(title: impl Into<String>) -> Self {
        Self {
            name_english: Some(title.into()),
            ..Self::default()
        }
    }

    /// Trim every text field and drop the blank ones.
    pub fn normalized(self) -> Self {
        Self {
            name_original: normalize_text(self.name_original),
            name_romanized: normalize_text(self.name_romanized),
            name_english: normalize_text(self.name_english),
            cover_path: normalize_text(self.cover_path),
            ..self
        }
    }

    pub fn display_title(&self) -> &str {
        display_title(
            self.name_english.as_deref(),
            self.name_romanized.as_deref(),
            self.name_original.as_deref(),
        )
    }
}

/// Parse an optional ISO date from user input. Blank input is `None`.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, ModelError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ModelError::InvalidDate(trimmed.to_string()))
}

/// An author credited on a work, with the role they had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credit {
    pub author_id: AuthorId,
    pub name: String,
    pub role: String,
}

/// A work together with its tags, credited authors, and supported languages.
#[derive(Debug, Clone, Serialize)]
pub struct WorkDetail {
    pub work: Work,
    pub tags: Vec<Tag>,
    pub authors: Vec<Credit>,
    pub languages: Vec<Language>,
}

/// One row of a filtered work listing.
///
/// Tag and language names are sets: order-insensitive and deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct WorkSummary {
    pub work: Work,
    pub tags: BTreeSet<String>,
    pub languages: BTreeSet<String>,
}

impl WorkSummary {
    pub fn display_title(&self) -> &str {
        self.work.display_title()
    }
}

/// A page of filtered works plus counts over the whole matching set.
#[derive(Debug, Clone, Serialize)]
pub struct WorkPage {
    pub works: Vec<WorkSummary>,
    /// Number of works matching the filter, ignoring the limit.
    pub total: u64,
    /// 1-based page that `works` holds.
    pub page: u32,
    pub page_count: u32,
}

/// A work as written to the JSON export, with every relation flattened to names.
#[derive(Debug, Clone, Serialize)]
pub struct WorkExport {
    #[serde(flatten)]
    pub work: Work,
    pub title: String,
    pub tags: Vec<String>,
    /// `"name (role)"`, or just the name when the role is blank.
    pub authors: Vec<String>,
    pub languages: Vec<String>,
}

// ── Chapter ─────────────────────────────────────────────────────────────────

/// A chapter number. Fractional numbers (e.g. 10.5) are allowed; negative,
/// infinite, and NaN values are not.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ChapterNumber(f64);

impl ChapterNumber {
    pub fn new(value: f64) -> Result<Self, ModelError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ModelError::InvalidChapterNumber(value.to_string()));
        }
        // Fold -0.0 into 0.0 so both hit the same unique key.
        Ok(Self(value + 0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ChapterNumber {
    type Error = ModelError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChapterNumber> for f64 {
    fn from(number: ChapterNumber) -> Self {
        number.0
    }
}

impl From<u32> for ChapterNumber {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl FromStr for ChapterNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ModelError::InvalidChapterNumber(trimmed.to_string()))?;
        Self::new(value).map_err(|_| ModelError::InvalidChapterNumber(trimmed.to_string()))
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A numbered installment of a work, independent of language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub work_id: WorkId,
    pub number: ChapterNumber,
    /// Declared page count. Informational only; stored pages are authoritative.
    pub page_count: Option<u32>,
}

/// A chapter with the number of pages actually stored for it (all languages).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterListing {
    pub chapter: Chapter,
    pub stored_pages: u64,
}

// ── Translation / Page ──────────────────────────────────────────────────────

/// The fact that a chapter has been rendered into a language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub chapter_id: ChapterId,
    pub language_id: LanguageId,
    pub language_name: String,
    pub translation_date: Option<NaiveDate>,
    pub is_complete: bool,
}

/// One numbered image within a (chapter, language) translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub id: PageId,
    pub chapter_id: ChapterId,
    pub language_id: LanguageId,
    pub page_number: u32,
    /// Artifact reference, relative to the artifact root.
    pub path: String,
}

/// A resolved, servable page reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub work_id: WorkId,
    pub chapter_id: ChapterId,
    pub language_id: LanguageId,
    pub page_number: u32,
    pub path: String,
}

/// Check that a page number is usable (pages start at 1).
pub fn validate_page_number(page_number: i64) -> Result<u32, ModelError> {
    u32::try_from(page_number)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(ModelError::InvalidPageNumber(page_number))
}

// ── Reference Data ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
}

/// A reference entity together with the number of works linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage<T> {
    pub item: T,
    pub work_count: u64,
}

// ── Search / Stats ──────────────────────────────────────────────────────────

/// Which entity lists a catalog search should cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchScope {
    #[default]
    All,
    Works,
    Authors,
    Tags,
}

impl FromStr for SearchScope {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "manga" | "works" => Ok(Self::Works),
            "author" | "authors" => Ok(Self::Authors),
            "tag" | "tags" => Ok(Self::Tags),
            other => Err(ModelError::InvalidSearchScope(other.to_string())),
        }
    }
}

/// Results of a cross-entity catalog search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    /// `(id, display title)` pairs.
    pub works: Vec<(WorkId, String)>,
    pub authors: Vec<Author>,
    pub tags: Vec<Tag>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.works.is_empty() && self.authors.is_empty() && self.tags.is_empty()
    }
}
