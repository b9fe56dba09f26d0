//! Filter criteria for listing works.
//!
//! A [`WorkFilter`] is a sparse set of optional criteria. Absent or empty
//! criteria never narrow the result; the database crate turns a validated
//! filter into a parameterized query.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::types::WorkStatus;

/// Result ordering for a work listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// By display title, A to Z.
    #[default]
    Alphabetical,
    /// By display title, Z to A.
    ReverseAlphabetical,
    /// By start-of-publication date, newest first. Undated works sort last.
    DateNewest,
    /// By start-of-publication date, oldest first. Undated works sort last.
    DateOldest,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::ReverseAlphabetical => "reverse-alphabetical",
            Self::DateNewest => "date-newest",
            Self::DateOldest => "date-oldest",
        }
    }
}

impl FromStr for SortMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "alphabetical" => Ok(Self::Alphabetical),
            "reverse-alphabetical" => Ok(Self::ReverseAlphabetical),
            "date-newest" => Ok(Self::DateNewest),
            "date-oldest" => Ok(Self::DateOldest),
            // Only meaningful for the in-memory sample gallery; nothing is persisted to sort on.
            "rating" => Err(ModelError::UnsupportedSortMode("rating".to_string())),
            other => Err(ModelError::InvalidSortMode(other.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criteria for listing works.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkFilter {
    /// Case-insensitive substring matched against the display title or any tag name.
    pub text: Option<String>,
    pub statuses: BTreeSet<WorkStatus>,
    /// Language display names, matched case-insensitively.
    pub languages: BTreeSet<String>,
    pub sort: SortMode,
    /// Maximum number of works per page.
    pub limit: Option<u32>,
    /// 1-based page number. Requires `limit`.
    pub page: Option<u32>,
}

impl WorkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.insert(language.into());
        self
    }

    pub fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// The trimmed, lowercased search text, or `None` when blank.
    pub fn text_term(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Lowercased, non-blank language names.
    pub fn language_terms(&self) -> BTreeSet<String> {
        self.languages
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// True when no criterion narrows the result.
    pub fn is_unfiltered(&self) -> bool {
        self.text_term().is_none() && self.statuses.is_empty() && self.language_terms().is_empty()
    }

    /// The 1-based page to fetch.
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Reject malformed pagination before any store access.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.limit == Some(0) {
            return Err(ModelError::invalid_pagination("limit must be at least 1"));
        }
        match (self.page, self.limit) {
            (Some(0), _) => Err(ModelError::invalid_pagination("pages are numbered from 1")),
            (Some(_), None) => Err(ModelError::invalid_pagination("a page number requires a limit")),
            _ => Ok(()),
        }
    }

    /// Row offset of the requested page.
    pub fn offset(&self) -> u64 {
        match self.limit {
            Some(limit) => u64::from(self.page_number().saturating_sub(1)) * u64::from(limit),
            None => 0,
        }
    }

    /// Number of pages needed to show `total` matching works.
    pub fn page_count(&self, total: u64) -> u32 {
        let pages = match self.limit {
            Some(limit) => total.div_ceil(u64::from(limit)),
            None => u64::from(total > 0),
        };
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
