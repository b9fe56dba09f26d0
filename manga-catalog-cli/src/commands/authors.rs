use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{Context, resolve_author};
use crate::cli_types::AuthorAction;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: AuthorAction) -> Result<(), CliError> {
    let conn = ctx.open()?;
    match action {
        AuthorAction::List { search } => {
            let authors = manga_catalog_db::list_authors(&conn, search.as_deref())?;
            if authors.is_empty() {
                log::info!("No authors found.");
            }
            for usage in &authors {
                log::info!(
                    "  {:>5}  {:<30} {}",
                    usage.item.id,
                    usage.item.name,
                    format!("{} work(s)", usage.work_count)
                        .if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            Ok(())
        }
        AuthorAction::Add { name } => {
            let id = manga_catalog_db::create_author(&conn, &name)?;
            log::info!("Created author {} ({})", name.trim(), id);
            Ok(())
        }
        AuthorAction::Rename { author, name } => {
            let current = resolve_author(&conn, &author)?;
            manga_catalog_db::update_author(&conn, current.id, &name)?;
            log::info!("Renamed author '{}' to '{}'", current.name, name.trim());
            Ok(())
        }
        AuthorAction::Delete { author } => {
            let current = resolve_author(&conn, &author)?;
            manga_catalog_db::delete_author(&conn, current.id)?;
            log::info!("Deleted author '{}'", current.name);
            Ok(())
        }
        AuthorAction::Link { work, author, role } => {
            let author = resolve_author(&conn, &author)?;
            manga_catalog_db::add_author_to_work(&conn, work, author.id, &role)?;
            if role.trim().is_empty() {
                log::info!("Credited '{}' on work {}", author.name, work);
            } else {
                log::info!(
                    "Credited '{}' on work {} as {}",
                    author.name,
                    work,
                    role.trim()
                );
            }
            Ok(())
        }
        AuthorAction::Unlink { work, author, role } => {
            let author = resolve_author(&conn, &author)?;
            manga_catalog_db::remove_author_from_work(&conn, work, author.id, role.as_deref())?;
            log::info!("Removed '{}' from work {}", author.name, work);
            Ok(())
        }
    }
}
