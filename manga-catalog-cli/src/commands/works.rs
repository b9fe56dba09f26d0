use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use manga_catalog_core::{Work, WorkFields, WorkFilter, WorkPage, WorkStatus};

use super::{Context, format_date, parse_date_arg, truncate_str};
use crate::cli_types::{WorkAction, WorkFieldArgs};
use crate::CliError;

pub(crate) fn run(ctx: &Context, action: WorkAction) -> Result<(), CliError> {
    match action {
        WorkAction::List {
            search,
            status,
            language,
            sort,
            limit,
            page,
            json,
        } => {
            let filter = WorkFilter {
                text: search,
                statuses: status.into_iter().collect(),
                languages: language.into_iter().collect(),
                sort,
                limit,
                page,
            };
            run_list(ctx, &filter, json)
        }
        WorkAction::Show { id, json } => run_show(ctx, id, json),
        WorkAction::Add { fields } => run_add(ctx, fields),
        WorkAction::Edit { id, fields } => run_edit(ctx, id, fields),
        WorkAction::Delete { id } => {
            let conn = ctx.open()?;
            let title = manga_catalog_db::get_work(&conn, id)?
                .work
                .display_title()
                .to_string();
            manga_catalog_db::delete_work(&conn, id)?;
            log::info!("Deleted work {} ({})", id, title);
            Ok(())
        }
        WorkAction::Export { output } => run_export(ctx, output.as_deref()),
    }
}

fn run_list(ctx: &Context, filter: &WorkFilter, json: bool) -> Result<(), CliError> {
    // Reject bad pagination before touching the database.
    filter.validate()?;
    let conn = ctx.open()?;
    let page = manga_catalog_db::list_works(&conn, filter)?;

    if json {
        return print_json(&page);
    }
    print_work_page(&page);
    Ok(())
}

fn print_work_page(page: &WorkPage) {
    if page.works.is_empty() {
        log::info!("No works match.");
        return;
    }

    log::info!(
        "{}",
        format!(
            "  {:>5}  {:<40}  {:<10}  {:<10}  {}",
            "ID", "Title", "Status", "Started", "Languages"
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    for summary in &page.works {
        let work = &summary.work;
        let languages: Vec<&str> = summary.languages.iter().map(String::as_str).collect();
        log::info!(
            "  {:>5}  {:<40}  {:<10}  {:<10}  {}",
            work.id,
            truncate_str(work.display_title(), 40),
            status_label(work.status),
            format_date(work.started_publishing),
            languages.join(", "),
        );
        if !summary.tags.is_empty() {
            let tags: Vec<&str> = summary.tags.iter().map(String::as_str).collect();
            log::info!(
                "         {}",
                tags.join(", ").if_supports_color(Stdout, |t| t.dimmed())
            );
        }
    }
    crate::log_blank();
    log::info!(
        "Page {} of {} ({} matching work(s))",
        page.page,
        page.page_count,
        page.total
    );
}

fn status_label(status: WorkStatus) -> String {
    match status {
        WorkStatus::Ongoing => status.if_supports_color(Stdout, |t| t.green()).to_string(),
        WorkStatus::Completed => status.if_supports_color(Stdout, |t| t.cyan()).to_string(),
        WorkStatus::Hiatus => status.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        WorkStatus::Cancelled => status.if_supports_color(Stdout, |t| t.red()).to_string(),
        WorkStatus::Unknown => status.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    }
}

fn run_show(ctx: &Context, id: i64, json: bool) -> Result<(), CliError> {
    let conn = ctx.open()?;
    let detail = manga_catalog_db::get_work(&conn, id)?;
    if json {
        return print_json(&detail);
    }

    let work = &detail.work;
    log::info!(
        "{} {}",
        work.display_title().if_supports_color(Stdout, |t| t.bold()),
        format!("(#{})", work.id).if_supports_color(Stdout, |t| t.dimmed()),
    );
    let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    log::info!("  Original:   {}", optional(&work.name_original));
    log::info!("  Romanized:  {}", optional(&work.name_romanized));
    log::info!("  English:    {}", optional(&work.name_english));
    log::info!("  Status:     {}", status_label(work.status));
    log::info!(
        "  Published:  {} to {}",
        format_date(work.started_publishing),
        format_date(work.ended_publishing)
    );
    log::info!("  Cover:      {}", optional(&work.cover_path));

    let tags: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    log::info!("  Tags:       {}", tags.join(", "));
    let languages: Vec<String> = detail
        .languages
        .iter()
        .map(|l| format!("{} ({})", l.name, l.id))
        .collect();
    log::info!("  Languages:  {}", languages.join(", "));
    if !detail.authors.is_empty() {
        log::info!("  Authors:");
        for credit in &detail.authors {
            if credit.role.is_empty() {
                log::info!("    {} #{}", credit.name, credit.author_id);
            } else {
                log::info!("    {} #{} ({})", credit.name, credit.author_id, credit.role);
            }
        }
    }
    Ok(())
}

/// Build work fields from arguments, starting from `base`. Returns whether anything was given.
fn apply_args(mut base: WorkFields, args: WorkFieldArgs) -> Result<(WorkFields, bool), CliError> {
    let mut touched = false;
    if let Some(v) = args.original {
        base.name_original = Some(v);
        touched = true;
    }
    if let Some(v) = args.romanized {
        base.name_romanized = Some(v);
        touched = true;
    }
    if let Some(v) = args.english {
        base.name_english = Some(v);
        touched = true;
    }
    if let Some(status) = args.status {
        base.status = status;
        touched = true;
    }
    if args.started.is_some() {
        base.started_publishing = parse_date_arg(args.started.as_deref())?;
        touched = true;
    }
    if args.ended.is_some() {
        base.ended_publishing = parse_date_arg(args.ended.as_deref())?;
        touched = true;
    }
    if let Some(v) = args.cover {
        base.cover_path = Some(v);
        touched = true;
    }
    // Blank strings clear their field.
    Ok((base.normalized(), touched))
}

fn fields_of(work: &Work) -> WorkFields {
    WorkFields {
        name_original: work.name_original.clone(),
        name_romanized: work.name_romanized.clone(),
        name_english: work.name_english.clone(),
        status: work.status,
        started_publishing: work.started_publishing,
        ended_publishing: work.ended_publishing,
        cover_path: work.cover_path.clone(),
    }
}

fn run_add(ctx: &Context, args: WorkFieldArgs) -> Result<(), CliError> {
    let (fields, _) = apply_args(WorkFields::default(), args)?;
    let conn = ctx.open()?;
    let id = manga_catalog_db::create_work(&conn, &fields)?;
    log::info!(
        "Created work {} ({})",
        id.if_supports_color(Stdout, |t| t.green()),
        fields.display_title()
    );
    Ok(())
}

fn run_edit(ctx: &Context, id: i64, args: WorkFieldArgs) -> Result<(), CliError> {
    let conn = ctx.open()?;
    let current = manga_catalog_db::get_work(&conn, id)?.work;
    let (fields, touched) = apply_args(fields_of(&current), args)?;
    if !touched {
        return Err(CliError::invalid("nothing to change; pass at least one field"));
    }
    manga_catalog_db::update_work(&conn, id, &fields)?;
    log::info!("Updated work {} ({})", id, fields.display_title());
    Ok(())
}

fn run_export(ctx: &Context, output: Option<&Path>) -> Result<(), CliError> {
    let conn = ctx.open()?;
    let works = manga_catalog_db::export_works(&conn)?;
    let json = serde_json::to_string_pretty(&works)?;

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")?;
            log::info!("Exported {} work(s) to {}", works.len(), path.display());
        }
        None => writeln!(std::io::stdout().lock(), "{}", json)?,
    }
    Ok(())
}

/// Machine-readable output goes straight to stdout, even with --quiet.
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(std::io::stdout().lock(), "{}", json)?;
    Ok(())
}
