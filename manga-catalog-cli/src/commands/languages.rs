use manga_catalog_core::Language;

use super::Context;
use crate::cli_types::LanguageAction;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: LanguageAction) -> Result<(), CliError> {
    let conn = ctx.open()?;
    match action {
        LanguageAction::List => {
            let languages = manga_catalog_db::list_languages(&conn)?;
            if languages.is_empty() {
                log::info!("No languages defined.");
            }
            for language in &languages {
                log::info!("  {:<6} {}", language.id, language.name);
            }
            Ok(())
        }
        LanguageAction::Add { id, name } => {
            let language = Language { id, name };
            manga_catalog_db::create_language(&conn, &language)?;
            log::info!("Added language {} ({})", language.name, language.id);
            Ok(())
        }
        LanguageAction::Support { work, language } => {
            manga_catalog_db::add_language_support(&conn, work, &language)?;
            log::info!("Work {} now supports '{}'", work, language);
            Ok(())
        }
        LanguageAction::Unsupport { work, language } => {
            manga_catalog_db::remove_language_support(&conn, work, &language)?;
            log::info!("Work {} no longer supports '{}'", work, language);
            Ok(())
        }
    }
}
