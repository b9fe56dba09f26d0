//! manga-catalog CLI
//!
//! Command-line interface for managing a catalog of manga works, their
//! chapters, translations and pages.

mod cli_types;
mod commands;
mod error;
mod logger;
mod progress;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use manga_catalog_core::settings::Settings;

use cli_types::{Cli, Commands};
use commands::Context;
pub(crate) use error::CliError;
pub(crate) use logger::log_blank;

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);

    let settings = Settings::load();
    let ctx = Context {
        db_path: settings.resolve_database_path(cli.db),
        quiet: cli.quiet,
        settings,
    };

    if let Err(e) = run(&ctx, cli.command) {
        log::error!("{}", e);
        if let Some(hint) = e.hint() {
            log::warn!("{}", hint.if_supports_color(Stdout, |t| t.dimmed()));
        }
        std::process::exit(e.exit_code());
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Init => commands::catalog::run_init(ctx),
        Commands::Seed { paths } => commands::catalog::run_seed(ctx, &paths),
        Commands::Stats => commands::catalog::run_stats(ctx),
        Commands::Works { action } => commands::works::run(ctx, action),
        Commands::Chapters { action } => commands::chapters::run(ctx, action),
        Commands::Translations { action } => commands::translations::run(ctx, action),
        Commands::Pages { action } => commands::pages::run(ctx, action),
        Commands::Tags { action } => commands::tags::run(ctx, action),
        Commands::Authors { action } => commands::authors::run(ctx, action),
        Commands::Languages { action } => commands::languages::run(ctx, action),
        Commands::Search { text, scope } => commands::catalog::run_search(ctx, &text, scope),
        Commands::Ping => commands::catalog::run_ping(ctx),
        Commands::Config { action } => commands::config::run(ctx, action),
    }
}
