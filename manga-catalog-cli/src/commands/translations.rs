use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{Context, format_date, parse_date_arg};
use crate::cli_types::TranslationAction;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: TranslationAction) -> Result<(), CliError> {
    let conn = ctx.open()?;
    match action {
        TranslationAction::List { chapter } => {
            let translations = manga_catalog_db::list_translations(&conn, chapter)?;
            if translations.is_empty() {
                log::info!("Chapter {} has no translations.", chapter);
                return Ok(());
            }
            for t in &translations {
                let state = if t.is_complete {
                    "complete".if_supports_color(Stdout, |s| s.green()).to_string()
                } else {
                    "in progress".if_supports_color(Stdout, |s| s.yellow()).to_string()
                };
                log::info!(
                    "  {:<4} {:<16} {:<10}  {}",
                    t.language_id,
                    t.language_name,
                    format_date(t.translation_date),
                    state
                );
            }
            Ok(())
        }
        TranslationAction::Add {
            chapter,
            language,
            date,
            complete,
        } => {
            let date = parse_date_arg(date.as_deref())?;
            manga_catalog_db::add_translation(&conn, chapter, &language, date, complete)?;
            log::info!("Added '{}' translation of chapter {}", language, chapter);
            Ok(())
        }
        TranslationAction::Remove { chapter, language } => {
            manga_catalog_db::delete_translation(&conn, chapter, &language)?;
            log::info!("Removed '{}' translation of chapter {}", language, chapter);
            Ok(())
        }
    }
}
