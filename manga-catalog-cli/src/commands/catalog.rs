use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use manga_catalog_core::{SearchScope, load_seed, load_seed_dir};
use manga_catalog_db::{MIN_SEARCH_CHARS, SEARCH_LIMIT, SeedStats};

use super::{Context, display_path, truncate_str};
use crate::CliError;

pub(crate) fn run_init(ctx: &Context) -> Result<(), CliError> {
    let existed = ctx.db_path.exists();
    let conn = ctx.open_or_create()?;
    let version = manga_catalog_db::schema::get_schema_version(&conn)?;

    let verb = if existed { "Opened" } else { "Created" };
    log::info!(
        "{} catalog database {} (schema v{})",
        verb,
        display_path(&ctx.db_path).if_supports_color(Stdout, |t| t.cyan()),
        version,
    );
    Ok(())
}

pub(crate) fn run_seed(ctx: &Context, paths: &[PathBuf]) -> Result<(), CliError> {
    let conn = ctx.open_or_create()?;
    let mut totals = SeedStats::default();

    for path in paths {
        let seed = if path.is_dir() {
            load_seed_dir(path)?
        } else {
            load_seed(path)?
        };
        let stats = manga_catalog_db::seed_catalog(&conn, &seed)?;
        log::info!(
            "  {} {}",
            display_path(path).if_supports_color(Stdout, |t| t.cyan()),
            summarize(&stats),
        );
        totals.languages += stats.languages;
        totals.tags += stats.tags;
        totals.authors += stats.authors;
        totals.works += stats.works;
        totals.chapters += stats.chapters;
        totals.translations += stats.translations;
        totals.pages += stats.pages;
    }

    if totals == SeedStats::default() {
        log::info!("Catalog already up to date.");
    } else {
        log::info!(
            "{} {}",
            "Seeded:".if_supports_color(Stdout, |t| t.green()),
            summarize(&totals)
        );
    }
    Ok(())
}

fn summarize(stats: &SeedStats) -> String {
    format!(
        "{} work(s), {} chapter(s), {} translation(s), {} page(s), \
         {} author(s), {} tag(s), {} language(s)",
        stats.works,
        stats.chapters,
        stats.translations,
        stats.pages,
        stats.authors,
        stats.tags,
        stats.languages,
    )
}

pub(crate) fn run_stats(ctx: &Context) -> Result<(), CliError> {
    let conn = ctx.open()?;
    let stats = manga_catalog_db::catalog_stats(&conn)?;

    log::info!(
        "{}",
        "Catalog Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", ctx.db_path.display());
    crate::log_blank();
    log::info!("  Works:          {:>8}", stats.works);
    log::info!("  Chapters:       {:>8}", stats.chapters);
    log::info!("  Translations:   {:>8}", stats.translations);
    log::info!("  Pages:          {:>8}", stats.pages);
    log::info!("  Authors:        {:>8}", stats.authors);
    log::info!("  Tags:           {:>8}", stats.tags);
    log::info!("  Languages:      {:>8}", stats.languages);

    if !stats.recent.is_empty() {
        crate::log_blank();
        log::info!("{}", "Recently added".if_supports_color(Stdout, |t| t.bold()));
        for work in &stats.recent {
            log::info!(
                "  {:>5}  {}  {}",
                work.id,
                truncate_str(work.display_title(), 50),
                work.created_at.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}

pub(crate) fn run_search(ctx: &Context, text: &str, scope: SearchScope) -> Result<(), CliError> {
    if text.trim().chars().count() < MIN_SEARCH_CHARS {
        return Err(CliError::invalid(format!(
            "search text must be at least {} characters",
            MIN_SEARCH_CHARS
        )));
    }
    let conn = ctx.open()?;
    let results = manga_catalog_db::search_catalog(&conn, text, scope)?;

    if results.is_empty() {
        log::info!("No matches for '{}'.", text.trim());
        return Ok(());
    }

    let section = |title: &str, count: usize| {
        let suffix = if count >= SEARCH_LIMIT as usize {
            " (limit reached)"
        } else {
            ""
        };
        log::info!(
            "{}{}",
            format!("{} ({})", title, count).if_supports_color(Stdout, |t| t.bold()),
            suffix
        );
    };

    if !results.works.is_empty() {
        section("Works", results.works.len());
        for (id, title) in &results.works {
            log::info!("  {:>5}  {}", id, title);
        }
    }
    if !results.authors.is_empty() {
        section("Authors", results.authors.len());
        for author in &results.authors {
            log::info!("  {:>5}  {}", author.id, author.name);
        }
    }
    if !results.tags.is_empty() {
        section("Tags", results.tags.len());
        for tag in &results.tags {
            log::info!("  {:>5}  {}", tag.id, tag.name);
        }
    }
    Ok(())
}

pub(crate) fn run_ping(ctx: &Context) -> Result<(), CliError> {
    let conn = ctx.open()?;
    manga_catalog_db::ping(&conn)?;
    log::info!(
        "{} {}",
        "ok".if_supports_color(Stdout, |t| t.green()),
        ctx.db_path.display()
    );
    Ok(())
}
