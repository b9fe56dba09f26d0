use manga_catalog_core::yaml::parse_seed;
use manga_catalog_core::{ChapterNumber, WorkStatus, load_seed, load_seed_dir};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_yaml(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

const SEED: &str = r#"
languages:
  - id: en
    name: English
  - id: ja
    name: Japanese
tags: [Action, Drama]
authors: [Hajime Isayama]
works:
  - name_original: "進撃の巨人"
    name_romanized: "Shingeki no Kyojin"
    name_english: "Attack on Titan"
    status: completed
    started_publishing: "2009-09-09"
    tags: [Action, Drama]
    authors:
      - name: Hajime Isayama
        role: Story & Art
    languages: [en, ja]
    chapters:
      - number: 1
        translations:
          - language: en
            complete: true
            pages: [aot/1/en/01.jpg, aot/1/en/02.jpg]
      - number: 1.5
"#;

#[test]
fn parse_full_seed_document() {
    let seed = parse_seed(SEED, "inline").unwrap();
    assert_eq!(seed.languages.len(), 2);
    assert_eq!(seed.tags, vec!["Action", "Drama"]);
    assert_eq!(seed.authors, vec!["Hajime Isayama"]);

    let work = &seed.works[0];
    assert_eq!(work.fields.display_title(), "Attack on Titan");
    assert_eq!(work.fields.status, WorkStatus::Completed);
    assert_eq!(
        work.fields.started_publishing.map(|d| d.to_string()),
        Some("2009-09-09".to_string())
    );
    assert_eq!(work.authors[0].role, "Story & Art");
    assert_eq!(work.chapters.len(), 2);
    assert_eq!(work.chapters[1].number, ChapterNumber::new(1.5).unwrap());
    assert_eq!(work.chapters[0].translations[0].pages.len(), 2);
    assert!(work.chapters[0].translations[0].complete);
}

#[test]
fn work_defaults_to_unknown_status() {
    let seed = parse_seed("works:\n  - name_english: Untitled Draft\n", "inline").unwrap();
    assert_eq!(seed.works[0].fields.status, WorkStatus::Unknown);
    assert!(seed.works[0].chapters.is_empty());
}

#[test]
fn negative_chapter_number_is_rejected() {
    let result = parse_seed(
        "works:\n  - name_english: X\n    chapters:\n      - number: -1\n",
        "inline",
    );
    assert!(result.is_err());
}

#[test]
fn load_seed_from_file() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "seed.yaml", SEED);
    let seed = load_seed(&tmp.path().join("seed.yaml")).unwrap();
    assert_eq!(seed.works.len(), 1);
}

#[test]
fn load_seed_dir_merges_in_name_order() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "b.yaml", "tags: [Second]\n");
    write_yaml(tmp.path(), "a.yml", "tags: [First]\n");
    write_yaml(tmp.path(), "notes.txt", "tags: [Ignored]\n");

    let seed = load_seed_dir(tmp.path()).unwrap();
    assert_eq!(seed.tags, vec!["First", "Second"]);
}

#[test]
fn load_seed_dir_missing_is_empty() {
    let seed = load_seed_dir(Path::new("/nonexistent/path/seeds")).unwrap();
    assert!(seed.works.is_empty());
    assert!(seed.languages.is_empty());
}

#[test]
fn malformed_yaml_reports_path() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "bad.yaml", "works: [ {name_english: }\n");
    let err = load_seed(&tmp.path().join("bad.yaml")).unwrap_err();
    assert!(err.to_string().contains("bad.yaml"));
}
