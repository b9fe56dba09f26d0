use manga_catalog_core::*;
use manga_catalog_db::*;
use rusqlite::Connection;

/// Five works with mixed statuses, dates, tags and languages:
///
/// | title            | status    | started    | tags            | languages        |
/// |------------------|-----------|------------|-----------------|------------------|
/// | Blue Harbor      | ongoing   | 2019-04-01 | sea, seinen     | English          |
/// | Crimson Lantern  | completed | 2011-09-15 | horror          | English, Japanese|
/// | aster field      | ongoing   | (none)     | slice of life   | Japanese         |
/// | Dune Runner      | hiatus    | 2015-01-20 | sea             | (none)           |
/// | 100% Pure        | unknown   | (none)     | (none)          | English          |
fn setup_db() -> Connection {
    let conn = open_memory().unwrap();
    for (id, name) in [("en", "English"), ("ja", "Japanese")] {
        create_language(
            &conn,
            &Language {
                id: id.to_string(),
                name: name.to_string(),
            },
        )
        .unwrap();
    }

    let works = [
        ("Blue Harbor", WorkStatus::Ongoing, "2019-04-01", &["sea", "seinen"][..], &["en"][..]),
        ("Crimson Lantern", WorkStatus::Completed, "2011-09-15", &["horror"][..], &["en", "ja"][..]),
        ("aster field", WorkStatus::Ongoing, "", &["slice of life"][..], &["ja"][..]),
        ("Dune Runner", WorkStatus::Hiatus, "2015-01-20", &["sea"][..], &[][..]),
        ("100% Pure", WorkStatus::Unknown, "", &[][..], &["en"][..]),
    ];
    for (title, status, started, tags, languages) in works {
        let fields = WorkFields {
            status,
            started_publishing: parse_date(started).unwrap(),
            ..WorkFields::english(title)
        };
        let work = create_work(&conn, &fields).unwrap();
        for tag in tags {
            let tag_id = match find_tag_by_name(&conn, tag).unwrap() {
                Some(t) => t.id,
                None => create_tag(&conn, tag).unwrap(),
            };
            add_tag_to_work(&conn, work, tag_id).unwrap();
        }
        for language in languages {
            add_language_support(&conn, work, language).unwrap();
        }
    }
    conn
}

fn titles(page: &WorkPage) -> Vec<&str> {
    page.works.iter().map(|w| w.display_title()).collect()
}

// ── Filtering ───────────────────────────────────────────────────────────────

#[test]
fn no_criteria_returns_everything() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new()).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.works.len(), 5);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_count, 1);
}

#[test]
fn alphabetical_sort_ignores_case() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new()).unwrap();
    assert_eq!(
        titles(&page),
        vec!["100% Pure", "aster field", "Blue Harbor", "Crimson Lantern", "Dune Runner"]
    );

    let reversed = WorkFilter::new().sorted_by(SortMode::ReverseAlphabetical);
    let page = list_works(&conn, &reversed).unwrap();
    assert_eq!(
        titles(&page),
        vec!["Dune Runner", "Crimson Lantern", "Blue Harbor", "aster field", "100% Pure"]
    );
}

#[test]
fn date_sorts_put_undated_last() {
    let conn = setup_db();

    let newest = list_works(&conn, &WorkFilter::new().sorted_by(SortMode::DateNewest)).unwrap();
    assert_eq!(
        &titles(&newest)[..3],
        &["Blue Harbor", "Dune Runner", "Crimson Lantern"]
    );

    let oldest = list_works(&conn, &WorkFilter::new().sorted_by(SortMode::DateOldest)).unwrap();
    assert_eq!(
        &titles(&oldest)[..3],
        &["Crimson Lantern", "Dune Runner", "Blue Harbor"]
    );

    for page in [newest, oldest] {
        assert!(page.works[3..].iter().all(|w| w.work.started_publishing.is_none()));
    }
}

#[test]
fn text_matches_title_or_tag_case_insensitively() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new().with_text("  SEA ")).unwrap();
    assert_eq!(titles(&page), vec!["Blue Harbor", "Dune Runner"]);

    let page = list_works(&conn, &WorkFilter::new().with_text("lantern")).unwrap();
    assert_eq!(titles(&page), vec!["Crimson Lantern"]);
}

#[test]
fn blank_text_is_ignored() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new().with_text("   ")).unwrap();
    assert_eq!(page.total, 5);
}

#[test]
fn wildcards_in_text_match_literally() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new().with_text("0% p")).unwrap();
    assert_eq!(titles(&page), vec!["100% Pure"]);

    // `_` would match any single character if it were not escaped.
    let page = list_works(&conn, &WorkFilter::new().with_text("blue_harbor")).unwrap();
    assert_eq!(page.total, 0);

    let page = list_works(&conn, &WorkFilter::new().with_text("%")).unwrap();
    assert_eq!(titles(&page), vec!["100% Pure"]);
}

#[test]
fn status_filter_is_a_set() {
    let conn = setup_db();
    let filter = WorkFilter::new()
        .with_status(WorkStatus::Ongoing)
        .with_status(WorkStatus::Hiatus);
    let page = list_works(&conn, &filter).unwrap();
    assert_eq!(titles(&page), vec!["aster field", "Blue Harbor", "Dune Runner"]);
    assert!(
        page.works
            .iter()
            .all(|w| filter.statuses.contains(&w.work.status))
    );
}

#[test]
fn language_filter_matches_display_names() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new().with_language("japanese")).unwrap();
    assert_eq!(titles(&page), vec!["aster field", "Crimson Lantern"]);

    let both = WorkFilter::new()
        .with_language("English")
        .with_language("Japanese");
    let page = list_works(&conn, &both).unwrap();
    assert_eq!(page.total, 4);
    // A work supporting both languages appears once.
    assert_eq!(
        titles(&page)
            .iter()
            .filter(|t| **t == "Crimson Lantern")
            .count(),
        1
    );
}

#[test]
fn criteria_combine_with_and() {
    let conn = setup_db();
    let filter = WorkFilter::new()
        .with_text("sea")
        .with_status(WorkStatus::Ongoing)
        .with_language("English");
    let page = list_works(&conn, &filter).unwrap();
    assert_eq!(titles(&page), vec!["Blue Harbor"]);

    let filter = WorkFilter::new()
        .with_text("sea")
        .with_language("Japanese");
    assert_eq!(list_works(&conn, &filter).unwrap().total, 0);
}

#[test]
fn every_result_satisfies_every_predicate() {
    let conn = setup_db();
    let statuses = [WorkStatus::Ongoing, WorkStatus::Completed, WorkStatus::Unknown];
    let languages = ["English", "Japanese"];
    let texts = ["", "sea", "r", "lantern"];

    let everything = list_works(&conn, &WorkFilter::new()).unwrap().works;
    for status in statuses {
        for language in languages {
            for text in texts {
                let filter = WorkFilter::new()
                    .with_status(status)
                    .with_language(language)
                    .with_text(text);
                let page = list_works(&conn, &filter).unwrap();

                let expected: Vec<&str> = everything
                    .iter()
                    .filter(|w| w.work.status == status)
                    .filter(|w| w.languages.contains(language))
                    .filter(|w| {
                        text.is_empty()
                            || w.display_title().to_lowercase().contains(text)
                            || w.tags.iter().any(|t| t.contains(text))
                    })
                    .map(|w| w.display_title())
                    .collect();
                assert_eq!(titles(&page), expected, "{status} / {language} / {text:?}");
                assert_eq!(page.total as usize, expected.len());
            }
        }
    }
}

#[test]
fn aggregated_sets_are_deduplicated() {
    let conn = setup_db();
    let page = list_works(&conn, &WorkFilter::new().with_text("crimson")).unwrap();
    let crimson = &page.works[0];
    assert_eq!(
        crimson.languages.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["English", "Japanese"]
    );
    assert_eq!(crimson.tags.len(), 1);
}

// ── Pagination ──────────────────────────────────────────────────────────────

#[test]
fn pagination_counts_whole_matching_set() {
    let conn = setup_db();
    let filter = WorkFilter::new().with_limit(2).on_page(2);
    let page = list_works(&conn, &filter).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_count, 3);
    assert_eq!(titles(&page), vec!["Blue Harbor", "Crimson Lantern"]);

    let last = list_works(&conn, &WorkFilter::new().with_limit(2).on_page(3)).unwrap();
    assert_eq!(titles(&last), vec!["Dune Runner"]);

    let beyond = list_works(&conn, &WorkFilter::new().with_limit(2).on_page(9)).unwrap();
    assert!(beyond.works.is_empty());
    assert_eq!(beyond.total, 5);
}

#[test]
fn malformed_pagination_is_rejected() {
    let conn = setup_db();
    for filter in [
        WorkFilter::new().with_limit(0),
        WorkFilter::new().with_limit(5).on_page(0),
        WorkFilter::new().on_page(2),
    ] {
        let err = list_works(&conn, &filter).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ModelError::InvalidPagination(_))
        ));
    }
}

#[test]
fn empty_catalog_has_no_pages() {
    let conn = open_memory().unwrap();
    let page = list_works(&conn, &WorkFilter::new()).unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.page_count, 0);
}

// ── Search / Stats / Export ─────────────────────────────────────────────────

#[test]
fn search_spans_entities() {
    let conn = setup_db();
    create_author(&conn, "Harbor Master").unwrap();

    let results = search_catalog(&conn, "harbor", SearchScope::All).unwrap();
    assert_eq!(results.works.len(), 1);
    assert_eq!(results.works[0].1, "Blue Harbor");
    assert_eq!(results.authors.len(), 1);
    assert!(results.tags.is_empty());

    let results = search_catalog(&conn, "se", SearchScope::Tags).unwrap();
    let tags: Vec<&str> = results.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, vec!["sea", "seinen"]);
    assert!(results.works.is_empty());
}

#[test]
fn short_search_returns_nothing() {
    let conn = setup_db();
    assert!(search_catalog(&conn, " a ", SearchScope::All).unwrap().is_empty());
}

#[test]
fn search_is_capped() {
    let conn = open_memory().unwrap();
    for i in 0..(SEARCH_LIMIT + 5) {
        create_tag(&conn, &format!("tag-{i:02}")).unwrap();
    }
    let results = search_catalog(&conn, "tag", SearchScope::Tags).unwrap();
    assert_eq!(results.tags.len(), SEARCH_LIMIT as usize);
}

#[test]
fn stats_count_every_table() {
    let conn = setup_db();
    let work = list_works(&conn, &WorkFilter::new().with_text("blue"))
        .unwrap()
        .works[0]
        .work
        .id;
    let chapter = create_chapter(&conn, work, ChapterNumber::from(1), None).unwrap();
    add_translation(&conn, chapter, "en", None, true).unwrap();
    create_page(&conn, chapter, "en", 1, "blue/001.png").unwrap();

    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.works, 5);
    assert_eq!(stats.chapters, 1);
    assert_eq!(stats.translations, 1);
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.tags, 4);
    assert_eq!(stats.languages, 2);
    assert_eq!(stats.authors, 0);
    assert_eq!(stats.recent.len(), RECENT_WORKS as usize);
    // Same-second inserts fall back to id order, newest first.
    assert_eq!(stats.recent[0].display_title(), "100% Pure");
}

#[test]
fn export_flattens_relations() {
    let conn = setup_db();
    let work = list_works(&conn, &WorkFilter::new().with_text("crimson"))
        .unwrap()
        .works[0]
        .work
        .id;
    let author = create_author(&conn, "Mori Kaito").unwrap();
    add_author_to_work(&conn, work, author, "story").unwrap();
    let editor = create_author(&conn, "Sato").unwrap();
    add_author_to_work(&conn, work, editor, "").unwrap();

    let exports = export_works(&conn).unwrap();
    assert_eq!(exports.len(), 5);
    let crimson = exports.iter().find(|e| e.work.id == work).unwrap();
    assert_eq!(crimson.title, "Crimson Lantern");
    assert_eq!(crimson.authors, vec!["Mori Kaito (story)", "Sato"]);
    assert_eq!(crimson.languages, vec!["English", "Japanese"]);
    assert_eq!(crimson.tags, vec!["horror"]);
}

#[test]
fn ping_answers() {
    let conn = open_memory().unwrap();
    ping(&conn).unwrap();
}

// ── Non-ASCII Case Folding ──────────────────────────────────────────────────

fn setup_accented_db() -> Connection {
    let conn = open_memory().unwrap();
    create_language(
        &conn,
        &Language {
            id: "fr".to_string(),
            name: "Français".to_string(),
        },
    )
    .unwrap();
    let work = create_work(&conn, &WorkFields::english("ÉCOLE DU DRAGON")).unwrap();
    let tag = create_tag(&conn, "Ísekai").unwrap();
    add_tag_to_work(&conn, work, tag).unwrap();
    add_language_support(&conn, work, "fr").unwrap();
    create_author(&conn, "Ōkubo Ümit").unwrap();
    conn
}

#[test]
fn text_filter_folds_non_ascii_case() {
    let conn = setup_accented_db();
    for text in ["ÉCOLE", "école", "École du"] {
        let page = list_works(&conn, &WorkFilter::new().with_text(text)).unwrap();
        assert_eq!(titles(&page), vec!["ÉCOLE DU DRAGON"], "{text:?}");
    }

    let page = list_works(&conn, &WorkFilter::new().with_text("ísekai")).unwrap();
    assert_eq!(titles(&page), vec!["ÉCOLE DU DRAGON"]);
    let page = list_works(&conn, &WorkFilter::new().with_text("ÍSEKAI")).unwrap();
    assert_eq!(page.total, 1);
}

#[test]
fn language_filter_folds_non_ascii_case() {
    let conn = setup_accented_db();
    for name in ["FRANÇAIS", "français", "Français"] {
        let page = list_works(&conn, &WorkFilter::new().with_language(name)).unwrap();
        assert_eq!(page.total, 1, "{name:?}");
    }
}

#[test]
fn search_and_listings_fold_non_ascii_case() {
    let conn = setup_accented_db();

    let results = search_catalog(&conn, "école", SearchScope::All).unwrap();
    assert_eq!(results.works.len(), 1);
    let results = search_catalog(&conn, "ÍSEK", SearchScope::Tags).unwrap();
    assert_eq!(results.tags.len(), 1);
    let results = search_catalog(&conn, "ōkubo", SearchScope::Authors).unwrap();
    assert_eq!(results.authors.len(), 1);

    let tags = list_tags(&conn, Some("ísekai")).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].work_count, 1);
    let authors = list_authors(&conn, Some("ÜMIT")).unwrap();
    assert_eq!(authors.len(), 1);
}
