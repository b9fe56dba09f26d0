//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use manga_catalog_core::{ChapterNumber, SearchScope, SortMode, WorkStatus};

#[derive(Parser)]
#[command(name = "manga-catalog")]
#[command(about = "Manage a catalog of manga works, chapters, translations and pages", long_about = None)]
pub(crate) struct Cli {
    /// Path to the catalog database (default: from settings, then the data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the catalog database (or upgrade an older one)
    Init,

    /// Load YAML seed files or directories into the catalog
    Seed {
        /// Seed files (.yaml/.yml) or directories of them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show catalog counts and recently added works
    Stats,

    /// Manage works
    Works {
        #[command(subcommand)]
        action: WorkAction,
    },

    /// Manage chapters of a work
    Chapters {
        #[command(subcommand)]
        action: ChapterAction,
    },

    /// Manage chapter translations
    Translations {
        #[command(subcommand)]
        action: TranslationAction,
    },

    /// Manage the pages of a translation
    Pages {
        #[command(subcommand)]
        action: PageAction,
    },

    /// Manage tags and their links to works
    Tags {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Manage authors and their credits on works
    Authors {
        #[command(subcommand)]
        action: AuthorAction,
    },

    /// Manage languages and which works support them
    Languages {
        #[command(subcommand)]
        action: LanguageAction,
    },

    /// Search works, authors and tags by name
    Search {
        /// Text to look for (at least two characters)
        text: String,

        /// Which entities to search: all, works, authors, tags
        #[arg(long, default_value = "all")]
        scope: SearchScope,
    },

    /// Check that the catalog database is reachable
    Ping,

    /// Show or change shared settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Editable work fields. Pass an empty string to clear a field on edit.
#[derive(Args, Clone, Default)]
pub(crate) struct WorkFieldArgs {
    /// Title in the original script
    #[arg(long)]
    pub original: Option<String>,

    /// Romanized title
    #[arg(long)]
    pub romanized: Option<String>,

    /// English title
    #[arg(long)]
    pub english: Option<String>,

    /// Publication status: unknown, ongoing, completed, hiatus, cancelled
    #[arg(long)]
    pub status: Option<WorkStatus>,

    /// Start of publication (YYYY-MM-DD)
    #[arg(long)]
    pub started: Option<String>,

    /// End of publication (YYYY-MM-DD)
    #[arg(long)]
    pub ended: Option<String>,

    /// Cover image reference, relative to the artifact root
    #[arg(long)]
    pub cover: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum WorkAction {
    /// List works matching the given filters
    List {
        /// Case-insensitive text matched against titles and tag names
        #[arg(short, long)]
        search: Option<String>,

        /// Statuses to include (e.g., ongoing,hiatus)
        #[arg(long, value_delimiter = ',')]
        status: Vec<WorkStatus>,

        /// Language names to include (e.g., English,Japanese)
        #[arg(long, value_delimiter = ',')]
        language: Vec<String>,

        /// alphabetical, reverse-alphabetical, date-newest, date-oldest
        #[arg(long, default_value = "alphabetical")]
        sort: SortMode,

        /// Maximum works per page
        #[arg(short, long)]
        limit: Option<u32>,

        /// Page number (1-based, requires --limit)
        #[arg(short, long)]
        page: Option<u32>,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one work with its tags, authors and languages
    Show {
        id: i64,

        /// Print the work as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a work
    Add {
        #[command(flatten)]
        fields: WorkFieldArgs,
    },

    /// Change fields of a work (unspecified fields keep their value)
    Edit {
        id: i64,

        #[command(flatten)]
        fields: WorkFieldArgs,
    },

    /// Delete a work and everything under it
    Delete { id: i64 },

    /// Write every work with its relations as JSON
    Export {
        /// Output file (default: standard output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ChapterAction {
    /// List the chapters of a work
    List { work: i64 },

    /// Add a chapter to a work
    Add {
        work: i64,

        /// Chapter number (fractions such as 10.5 are allowed)
        number: ChapterNumber,

        /// Declared page count
        #[arg(long)]
        pages: Option<u32>,
    },

    /// Add every chapter from START to END (inclusive), skipping existing ones
    #[command(allow_negative_numbers = true)]
    Bulk { work: i64, start: i64, end: i64 },

    /// Change a chapter's number or declared page count
    Edit {
        id: i64,

        #[arg(long)]
        number: Option<ChapterNumber>,

        #[arg(long, conflicts_with = "clear_pages")]
        pages: Option<u32>,

        /// Remove the declared page count
        #[arg(long)]
        clear_pages: bool,
    },

    /// Delete a chapter with its translations and pages
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum TranslationAction {
    /// List the translations of a chapter
    List { chapter: i64 },

    /// Record that a chapter exists in a language
    Add {
        chapter: i64,
        language: String,

        /// Translation date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Mark the translation as complete
        #[arg(long)]
        complete: bool,
    },

    /// Remove a translation (refused while it has pages)
    Remove { chapter: i64, language: String },
}

#[derive(Subcommand)]
pub(crate) enum PageAction {
    /// List the pages of a translation
    List { chapter: i64, language: String },

    /// Add a page to a translation
    Add {
        chapter: i64,
        language: String,

        /// Image reference, relative to the artifact root
        path: String,

        /// Page number (default: after the last page)
        #[arg(short, long)]
        number: Option<u32>,
    },

    /// Change a page's number or image reference
    Edit {
        id: i64,

        #[arg(short, long)]
        number: Option<u32>,

        #[arg(long)]
        path: Option<String>,
    },

    /// Delete a page
    Delete { id: i64 },

    /// Resolve a page of a work to its stored image reference
    Resolve {
        work: i64,
        chapter: i64,
        language: String,
        page: u32,

        /// Also locate the image file under the artifact root
        #[arg(long)]
        locate: bool,

        /// Artifact root (default: from settings)
        #[arg(long)]
        artifact_root: Option<PathBuf>,
    },

    /// Add every image in a directory as pages of a translation
    Import {
        chapter: i64,
        language: String,

        /// Directory relative to the artifact root
        dir: String,

        /// Artifact root (default: from settings)
        #[arg(long)]
        artifact_root: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub(crate) enum TagAction {
    /// List tags with the number of works using each
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a tag
    Add { name: String },

    /// Rename a tag
    Rename {
        /// Tag id or name
        tag: String,
        name: String,
    },

    /// Delete a tag and unlink it from every work
    Delete {
        /// Tag id or name
        tag: String,
    },

    /// Tag a work
    Link {
        work: i64,
        /// Tag id or name
        tag: String,
    },

    /// Remove a tag from a work
    Unlink {
        work: i64,
        /// Tag id or name
        tag: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum AuthorAction {
    /// List authors with the number of works crediting each
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add an author
    Add { name: String },

    /// Rename an author
    Rename {
        /// Author id or name
        author: String,
        name: String,
    },

    /// Delete an author and their credits
    Delete {
        /// Author id or name
        author: String,
    },

    /// Credit an author on a work
    Link {
        work: i64,
        /// Author id or name
        author: String,

        /// Role on the work (e.g., story, art)
        #[arg(long, default_value = "")]
        role: String,
    },

    /// Remove an author's credit from a work
    Unlink {
        work: i64,
        /// Author id or name
        author: String,

        /// Only remove this role (default: every role)
        #[arg(long)]
        role: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum LanguageAction {
    /// List known languages
    List,

    /// Add a language
    Add {
        /// Short code (e.g., en, ja)
        id: String,
        /// English display name
        name: String,
    },

    /// Declare that a work is published in a language
    Support { work: i64, language: String },

    /// Withdraw a work's language (refused while translations exist)
    Unsupport { work: i64, language: String },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and resolved locations
    Show,

    /// Print the settings file path
    Path,

    /// Set the default database path (omit to clear)
    SetDb { path: Option<PathBuf> },

    /// Set the artifact root directory (omit to clear)
    SetArtifactRoot { path: Option<PathBuf> },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn work_list_parses_filters() {
        let cli = Cli::try_parse_from([
            "manga-catalog",
            "works",
            "list",
            "--status",
            "ongoing,hiatus",
            "--language",
            "English",
            "--sort",
            "date-newest",
            "--limit",
            "10",
            "--page",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Works {
                action:
                    WorkAction::List {
                        status,
                        language,
                        sort,
                        limit,
                        page,
                        ..
                    },
            } => {
                assert_eq!(status, vec![WorkStatus::Ongoing, WorkStatus::Hiatus]);
                assert_eq!(language, vec!["English".to_string()]);
                assert_eq!(sort, SortMode::DateNewest);
                assert_eq!((limit, page), (Some(10), Some(2)));
            }
            _ => panic!("expected works list"),
        }
    }

    #[test]
    fn rating_sort_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from(["manga-catalog", "works", "list", "--sort", "rating"]);
        assert!(result.is_err());
    }

    #[test]
    fn bulk_accepts_negative_bounds_for_later_validation() {
        let cli = Cli::try_parse_from([
            "manga-catalog",
            "--db",
            "x.db",
            "chapters",
            "bulk",
            "3",
            "-2",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(matches!(
            cli.command,
            Commands::Chapters {
                action: ChapterAction::Bulk {
                    work: 3,
                    start: -2,
                    end: 5
                }
            }
        ));
    }

    #[test]
    fn fractional_chapter_number() {
        let cli = Cli::try_parse_from(["manga-catalog", "chapters", "add", "1", "10.5"]).unwrap();
        match cli.command {
            Commands::Chapters {
                action: ChapterAction::Add { number, .. },
            } => assert_eq!(number.value(), 10.5),
            _ => panic!("expected chapters add"),
        }
    }
}
