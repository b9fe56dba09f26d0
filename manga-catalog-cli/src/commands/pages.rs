use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use manga_catalog_import::import_page_dir;

use super::Context;
use crate::cli_types::PageAction;
use crate::progress::BarProgress;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: PageAction) -> Result<(), CliError> {
    match action {
        PageAction::List { chapter, language } => {
            let conn = ctx.open()?;
            let pages = manga_catalog_db::list_pages(&conn, chapter, &language)?;
            if pages.is_empty() {
                log::info!("No pages stored for chapter {} in '{}'.", chapter, language);
            }
            for page in &pages {
                log::info!(
                    "  {:>4}  {}  {}",
                    page.page_number,
                    page.path,
                    format!("#{}", page.id).if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            Ok(())
        }
        PageAction::Add {
            chapter,
            language,
            path,
            number,
        } => {
            let conn = ctx.open()?;
            let number = match number {
                Some(n) => n,
                None => manga_catalog_db::next_page_number(&conn, chapter, &language)?,
            };
            let id = manga_catalog_db::create_page(&conn, chapter, &language, number, &path)?;
            log::info!(
                "Added page {} of chapter {} in '{}' (id {})",
                number,
                chapter,
                language,
                id
            );
            Ok(())
        }
        PageAction::Edit { id, number, path } => {
            let conn = ctx.open()?;
            let current = manga_catalog_db::get_page(&conn, id)?;
            if number.is_none() && path.is_none() {
                return Err(CliError::invalid("nothing to change; pass --number or --path"));
            }
            let number = number.unwrap_or(current.page_number);
            let path = path.unwrap_or(current.path);
            manga_catalog_db::update_page(&conn, id, number, &path)?;
            log::info!("Updated page {} (page {}: {})", id, number, path);
            Ok(())
        }
        PageAction::Delete { id } => {
            let conn = ctx.open()?;
            manga_catalog_db::delete_page(&conn, id)?;
            log::info!("Deleted page {}", id);
            Ok(())
        }
        PageAction::Resolve {
            work,
            chapter,
            language,
            page,
            locate,
            artifact_root,
        } => run_resolve(ctx, work, chapter, &language, page, locate, artifact_root),
        PageAction::Import {
            chapter,
            language,
            dir,
            artifact_root,
        } => {
            let root = ctx.artifact_root(artifact_root)?;
            let conn = ctx.open()?;
            let progress = BarProgress::new(ctx.quiet);
            import_page_dir(&conn, &root, chapter, &language, &dir, Some(&progress))?;
            Ok(())
        }
    }
}

fn run_resolve(
    ctx: &Context,
    work: i64,
    chapter: i64,
    language: &str,
    page: u32,
    locate: bool,
    artifact_root: Option<PathBuf>,
) -> Result<(), CliError> {
    let conn = ctx.open()?;
    let page_ref = manga_catalog_db::resolve_page(&conn, work, chapter, language, page)?;

    if !locate {
        log::info!("{}", page_ref.path);
        return Ok(());
    }

    let root = ctx.artifact_root(artifact_root)?;
    let file = root.locate(&page_ref.path)?;
    log::info!("{}", file.display());
    Ok(())
}
