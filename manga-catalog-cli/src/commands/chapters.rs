use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use manga_catalog_import::{BulkError, bulk_create_chapters};

use super::Context;
use crate::cli_types::ChapterAction;
use crate::progress::BarProgress;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: ChapterAction) -> Result<(), CliError> {
    match action {
        ChapterAction::List { work } => {
            let conn = ctx.open()?;
            let title = manga_catalog_db::get_work(&conn, work)?
                .work
                .display_title()
                .to_string();
            let chapters = manga_catalog_db::list_chapters(&conn, work)?;

            log::info!(
                "{} {}",
                title.if_supports_color(Stdout, |t| t.bold()),
                format!("({} chapter(s))", chapters.len())
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
            for listing in &chapters {
                let declared = listing
                    .chapter
                    .page_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string());
                log::info!(
                    "  #{:<6} chapter {:<8} declared {:>4}  stored {:>5}",
                    listing.chapter.id,
                    listing.chapter.number,
                    declared,
                    listing.stored_pages,
                );
            }
            Ok(())
        }
        ChapterAction::Add {
            work,
            number,
            pages,
        } => {
            let conn = ctx.open()?;
            let id = manga_catalog_db::create_chapter(&conn, work, number, pages)?;
            log::info!("Created chapter {} of work {} (id {})", number, work, id);
            Ok(())
        }
        ChapterAction::Bulk { work, start, end } => run_bulk(ctx, work, start, end),
        ChapterAction::Edit {
            id,
            number,
            pages,
            clear_pages,
        } => {
            let conn = ctx.open()?;
            let current = manga_catalog_db::get_chapter(&conn, id)?;
            if number.is_none() && pages.is_none() && !clear_pages {
                return Err(CliError::invalid(
                    "nothing to change; pass --number, --pages or --clear-pages",
                ));
            }
            let number = number.unwrap_or(current.number);
            let page_count = if clear_pages {
                None
            } else {
                pages.or(current.page_count)
            };
            manga_catalog_db::update_chapter(&conn, id, number, page_count)?;
            log::info!("Updated chapter {} (now chapter {})", id, number);
            Ok(())
        }
        ChapterAction::Delete { id } => {
            let conn = ctx.open()?;
            manga_catalog_db::delete_chapter(&conn, id)?;
            log::info!("Deleted chapter {} with its translations and pages", id);
            Ok(())
        }
    }
}

fn run_bulk(ctx: &Context, work: i64, start: i64, end: i64) -> Result<(), CliError> {
    // Report a bad range without requiring a database.
    manga_catalog_import::bulk::validate_range(start, end)?;
    let conn = ctx.open()?;

    let progress = BarProgress::new(ctx.quiet);
    match bulk_create_chapters(&conn, work, start, end, Some(&progress)) {
        Ok(stats) => {
            if stats.skipped > 0 {
                log::warn!(
                    "{} chapter number(s) already existed and were left unchanged",
                    stats.skipped
                );
            }
            Ok(())
        }
        Err(BulkError::Aborted {
            created,
            skipped,
            source,
        }) => {
            log::warn!(
                "Created {} and skipped {} chapter(s) before the failure; they were kept",
                created,
                skipped
            );
            Err(source.into())
        }
        Err(e) => Err(e.into()),
    }
}
