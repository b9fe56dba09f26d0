use std::sync::Mutex;

use manga_catalog_core::*;
use manga_catalog_db::*;

static STATEMENTS: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn record(sql: &str) {
    STATEMENTS.lock().unwrap().push(sql.trim().to_string());
}

#[test]
fn list_works_reads_inside_one_transaction() {
    let mut conn = open_memory().unwrap();
    create_language(
        &conn,
        &Language {
            id: "en".to_string(),
            name: "English".to_string(),
        },
    )
    .unwrap();
    let work = create_work(&conn, &WorkFields::english("Blue Harbor")).unwrap();
    let tag = create_tag(&conn, "sea").unwrap();
    add_tag_to_work(&conn, work, tag).unwrap();
    add_language_support(&conn, work, "en").unwrap();

    conn.trace(Some(record));
    let page = list_works(&conn, &WorkFilter::default()).unwrap();
    conn.trace(None);

    assert_eq!(page.total, 1);
    assert_eq!(page.works.len(), 1);

    let statements = STATEMENTS.lock().unwrap();
    assert!(statements.len() >= 5, "{statements:?}");
    assert!(statements[0].starts_with("BEGIN"), "{statements:?}");
    assert_eq!(statements.last().map(String::as_str), Some("COMMIT"));
    let inner = &statements[1..statements.len() - 1];
    assert!(inner.iter().all(|sql| sql.starts_with("SELECT")), "{inner:?}");
}
