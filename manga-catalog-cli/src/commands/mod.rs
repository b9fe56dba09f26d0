pub(crate) mod authors;
pub(crate) mod catalog;
pub(crate) mod chapters;
pub(crate) mod config;
pub(crate) mod languages;
pub(crate) mod pages;
pub(crate) mod tags;
pub(crate) mod translations;
pub(crate) mod works;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::Connection;

use manga_catalog_core::settings::Settings;
use manga_catalog_core::ArtifactRoot;

use crate::CliError;

/// Resolved global options shared by every command.
pub(crate) struct Context {
    pub db_path: PathBuf,
    pub quiet: bool,
    pub settings: Settings,
}

impl Context {
    /// Open an existing catalog database.
    pub(crate) fn open(&self) -> Result<Connection, CliError> {
        if !self.db_path.exists() {
            return Err(CliError::config(format!(
                "No catalog database found at {}. Run 'manga-catalog init' to create one.",
                self.db_path.display()
            )));
        }
        self.open_or_create()
    }

    /// Open the catalog database, creating it if needed.
    pub(crate) fn open_or_create(&self) -> Result<Connection, CliError> {
        log::debug!("Opening catalog database {}", self.db_path.display());
        Ok(manga_catalog_db::open_database(&self.db_path)?)
    }

    /// The artifact root from the command line, falling back to settings.
    pub(crate) fn artifact_root(&self, cli_override: Option<PathBuf>) -> Result<ArtifactRoot, CliError> {
        cli_override
            .or_else(|| self.settings.storage.artifact_root.clone())
            .map(ArtifactRoot::new)
            .ok_or_else(|| {
                CliError::config(
                    "No artifact root configured. Pass --artifact-root or run \
                     'manga-catalog config set-artifact-root <DIR>'.",
                )
            })
    }
}

/// Look up a tag by numeric id or exact name.
pub(crate) fn resolve_tag(
    conn: &Connection,
    key: &str,
) -> Result<manga_catalog_core::Tag, CliError> {
    if let Ok(id) = key.parse::<i64>() {
        return Ok(manga_catalog_db::get_tag(conn, id)?);
    }
    manga_catalog_db::find_tag_by_name(conn, key.trim())?
        .ok_or_else(|| CliError::NotFound(format!("tag not found: {}", key)))
}

/// Look up an author by numeric id or exact name.
pub(crate) fn resolve_author(
    conn: &Connection,
    key: &str,
) -> Result<manga_catalog_core::Author, CliError> {
    if let Ok(id) = key.parse::<i64>() {
        return Ok(manga_catalog_db::get_author(conn, id)?);
    }
    manga_catalog_db::find_author_by_name(conn, key.trim())?
        .ok_or_else(|| CliError::NotFound(format!("author not found: {}", key)))
}

/// Parse an optional date argument; a blank value clears the date.
pub(crate) fn parse_date_arg(value: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    match value {
        Some(v) => Ok(manga_catalog_core::parse_date(v)?),
        None => Ok(None),
    }
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

/// Display a path relative to the current directory when it is inside it.
pub(crate) fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("ワンピース", 10), "ワンピース");
        assert_eq!(truncate_str("Blue Harbor Chronicles", 10), "Blue Ha...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn blank_date_argument_clears() {
        assert_eq!(parse_date_arg(Some("  ")).unwrap(), None);
        assert_eq!(parse_date_arg(None).unwrap(), None);
        assert_eq!(
            parse_date_arg(Some("2020-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29)
        );
        assert!(matches!(
            parse_date_arg(Some("29/02/2020")),
            Err(CliError::Invalid(_))
        ));
    }
}
