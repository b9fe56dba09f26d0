//! Turns a [`WorkFilter`] into parameterized SQL.
//!
//! Every user-supplied value travels as a bound parameter. Only fixed column
//! and table fragments are assembled into the statement text, so the plan
//! for a given set of *active* criteria is always the same string.

use manga_catalog_core::{ModelError, SortMode, UNKNOWN_TITLE, WorkFilter};
use rusqlite::types::Value;

use crate::operations::WORK_COLUMNS;

/// SQL text plus the values bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The page query for a filter and the count over its whole matching set.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkQuery {
    pub select: QueryPlan,
    pub count: QueryPlan,
}

/// Wrap a search term for `LIKE ... ESCAPE '\'`, escaping `%`, `_` and `\` so
/// they match literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// SQL expression for a work's display title: english, romanized, original, then the fallback.
pub fn title_expr() -> String {
    format!(
        "COALESCE(NULLIF(TRIM(m.name_english), ''), NULLIF(TRIM(m.name_romanized), ''), \
         NULLIF(TRIM(m.name_original), ''), '{UNKNOWN_TITLE}')"
    )
}

/// Build the select and count statements for `filter`.
///
/// Pagination is validated first; nothing is built for a malformed request.
pub fn build_work_query(filter: &WorkFilter) -> Result<WorkQuery, ModelError> {
    filter.validate()?;

    let title = title_expr();
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(term) = filter.text_term() {
        let pattern = like_pattern(&term);
        conditions.push(format!(
            "(LOWER({title}) LIKE ? ESCAPE '\\'
              OR EXISTS (SELECT 1 FROM has h JOIN tag t ON t.tag_id = h.tag_id
                         WHERE h.manga_id = m.manga_id AND LOWER(t.tag_name) LIKE ? ESCAPE '\\'))"
        ));
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }

    if !filter.statuses.is_empty() {
        conditions.push(format!(
            "m.manga_status IN ({})",
            placeholders(filter.statuses.len())
        ));
        params.extend(
            filter
                .statuses
                .iter()
                .map(|s| Value::Text(s.as_str().to_string())),
        );
    }

    let languages = filter.language_terms();
    if !languages.is_empty() {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM supports s JOIN language l ON l.language_id = s.language_id
                     WHERE s.manga_id = m.manga_id AND LOWER(l.language_name_en) IN ({}))",
            placeholders(languages.len())
        ));
        params.extend(languages.into_iter().map(Value::Text));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count = QueryPlan {
        sql: format!("SELECT COUNT(*) FROM manga m{where_clause}"),
        params: params.clone(),
    };

    let mut sql = format!(
        "SELECT {WORK_COLUMNS} FROM manga m{where_clause} ORDER BY {}",
        order_by(filter.sort, &title)
    );
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::Integer(i64::from(limit)));
        params.push(Value::Integer(
            i64::try_from(filter.offset()).unwrap_or(i64::MAX),
        ));
    }

    Ok(WorkQuery {
        select: QueryPlan { sql, params },
        count,
    })
}

fn order_by(sort: SortMode, title: &str) -> String {
    match sort {
        SortMode::Alphabetical => format!("LOWER({title}) ASC, m.manga_id ASC"),
        SortMode::ReverseAlphabetical => format!("LOWER({title}) DESC, m.manga_id ASC"),
        // Undated works go last in both directions.
        SortMode::DateNewest => {
            "m.started_publishing IS NULL, m.started_publishing DESC, m.manga_id ASC".to_string()
        }
        SortMode::DateOldest => {
            "m.started_publishing IS NULL, m.started_publishing ASC, m.manga_id ASC".to_string()
        }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use manga_catalog_core::WorkStatus;

    #[test]
    fn unfiltered_plan_binds_nothing() {
        let query = build_work_query(&WorkFilter::new()).unwrap();
        assert!(!query.select.sql.contains("WHERE"));
        assert!(query.select.params.is_empty());
        assert_eq!(query.count.sql, "SELECT COUNT(*) FROM manga m");
    }

    #[test]
    fn user_text_never_reaches_sql() {
        let filter = WorkFilter::new().with_text("'; DROP TABLE manga; --");
        let query = build_work_query(&filter).unwrap();
        assert!(!query.select.sql.contains("DROP TABLE"));
        assert_eq!(query.select.params.len(), 2);
    }

    #[test]
    fn placeholders_match_params() {
        let filter = WorkFilter::new()
            .with_text("isekai")
            .with_status(WorkStatus::Ongoing)
            .with_status(WorkStatus::Hiatus)
            .with_language("English")
            .with_limit(10)
            .on_page(3);
        let query = build_work_query(&filter).unwrap();
        assert_eq!(
            query.select.sql.matches('?').count(),
            query.select.params.len()
        );
        assert_eq!(query.count.sql.matches('?').count(), query.count.params.len());
        assert_eq!(
            query.select.params[query.select.params.len() - 1],
            Value::Integer(20)
        );
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn invalid_pagination_builds_nothing() {
        assert!(build_work_query(&WorkFilter::new().on_page(2)).is_err());
        assert!(build_work_query(&WorkFilter::new().with_limit(0)).is_err());
    }
}
