use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use manga_catalog_core::settings::{
    default_database_path, load_settings_string, save_setting, settings_path,
};

use super::Context;
use crate::cli_types::ConfigAction;
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => {
            run_config_show(ctx);
            Ok(())
        }
        ConfigAction::Path => {
            log::info!("{}", settings_path().display());
            Ok(())
        }
        ConfigAction::SetDb { path } => set_path("database", "path", path),
        ConfigAction::SetArtifactRoot { path } => set_path("storage", "artifact_root", path),
    }
}

fn run_config_show(ctx: &Context) {
    let path = settings_path();

    log::info!(
        "{}",
        "Manga Catalog Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let db_source = if ctx.settings.database.path.as_ref() == Some(&ctx.db_path) {
        "settings"
    } else if ctx.db_path == default_database_path() {
        "default"
    } else {
        "--db"
    };
    log::info!(
        "  Database:      {} {}",
        ctx.db_path.display(),
        format!("({})", db_source).if_supports_color(Stdout, |t| t.dimmed()),
    );
    match &ctx.settings.storage.artifact_root {
        Some(root) => log::info!("  Artifact root: {}", root.display()),
        None => log::info!(
            "  Artifact root: {}",
            "not set".if_supports_color(Stdout, |t| t.yellow())
        ),
    }

    if let Some(contents) = load_settings_string(&path) {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {}", line.if_supports_color(Stdout, |t| t.dimmed()));
        }
    }
}

fn set_path(section: &str, key: &str, value: Option<PathBuf>) -> Result<(), CliError> {
    let value = match value {
        Some(p) if p.is_relative() => Some(std::env::current_dir()?.join(p)),
        other => other,
    };
    let path = settings_path();
    save_setting(&path, section, key, value.as_deref())
        .map_err(|e| CliError::config(format!("Failed to write {}: {}", path.display(), e)))?;

    match value {
        Some(v) => log::info!("Set [{}] {} = {}", section, key, v.display()),
        None => log::info!("Cleared [{}] {}", section, key),
    }
    Ok(())
}
