use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{Context, resolve_tag};
use crate::cli_types::TagAction;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: TagAction) -> Result<(), CliError> {
    let conn = ctx.open()?;
    match action {
        TagAction::List { search } => {
            let tags = manga_catalog_db::list_tags(&conn, search.as_deref())?;
            if tags.is_empty() {
                log::info!("No tags found.");
            }
            for usage in &tags {
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
        TagAction::Add { name } => {
            let id = manga_catalog_db::create_tag(&conn, &name)?;
            log::info!("Created tag {} ({})", name.trim(), id);
            Ok(())
        }
        TagAction::Rename { tag, name } => {
            let current = resolve_tag(&conn, &tag)?;
            manga_catalog_db::update_tag(&conn, current.id, &name)?;
            log::info!("Renamed tag '{}' to '{}'", current.name, name.trim());
            Ok(())
        }
        TagAction::Delete { tag } => {
            let current = resolve_tag(&conn, &tag)?;
            manga_catalog_db::delete_tag(&conn, current.id)?;
            log::info!("Deleted tag '{}'", current.name);
            Ok(())
        }
        TagAction::Link { work, tag } => {
            let tag = resolve_tag(&conn, &tag)?;
            manga_catalog_db::add_tag_to_work(&conn, work, tag.id)?;
            log::info!("Tagged work {} with '{}'", work, tag.name);
            Ok(())
        }
        TagAction::Unlink { work, tag } => {
            let tag = resolve_tag(&conn, &tag)?;
            manga_catalog_db::remove_tag_from_work(&conn, work, tag.id)?;
            log::info!("Removed tag '{}' from work {}", tag.name, work);
            Ok(())
        }
    }
}
