//! Write-once query history store.
//!
//! Every successful analysis appends exactly one row; rows are never
//! updated or deleted afterwards. Reads are ordered newest-first and
//! support a substring filter over headline, verdict, and credibility.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::models::{HistoryRecord, NewHistoryRecord};

/// How many characters of the claim text are kept as the headline.
pub const HEADLINE_MAX_CHARS: usize = 200;

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Truncate the claim text into a headline.
pub fn headline_of(text: &str) -> String {
    text.chars().take(HEADLINE_MAX_CHARS).collect()
}

/// Append one record. Returns the new row id.
pub async fn create(pool: &SqlitePool, record: &NewHistoryRecord) -> Result<i64> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO query_history
            (headline, serpapi_result, gemini_result, factcheck_result,
             verdict, credibility, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.headline)
    .bind(&record.serpapi_result)
    .bind(&record.gemini_result)
    .bind(&record.factcheck_result)
    .bind(&record.verdict)
    .bind(&record.credibility)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List records newest-first. `search` matches as a substring against
/// headline, verdict, and credibility.
pub async fn list(
    pool: &SqlitePool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<HistoryRecord>> {
    let rows = match search.filter(|s| !s.trim().is_empty()) {
        Some(term) => {
            let pattern = format!("%{}%", term.trim());
            sqlx::query(
                r#"
                SELECT id, headline, serpapi_result, gemini_result,
                       factcheck_result, verdict, credibility, created_at
                FROM query_history
                WHERE headline LIKE ?1
                   OR verdict LIKE ?1
                   OR credibility LIKE ?1
                ORDER BY created_at DESC, id DESC
                LIMIT ?2 OFFSET ?3
                "#,
            )
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT id, headline, serpapi_result, gemini_result,
                       factcheck_result, verdict, credibility, created_at
                FROM query_history
                ORDER BY created_at DESC, id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    let records = rows
        .iter()
        .map(|row| {
            let created_at: i64 = row.get("created_at");
            HistoryRecord {
                id: row.get("id"),
                headline: row.get("headline"),
                serpapi_result: row.get("serpapi_result"),
                gemini_result: row.get("gemini_result"),
                factcheck_result: row.get("factcheck_result"),
                verdict: row.get("verdict"),
                credibility: row.get("credibility"),
                created_at: format_ts_iso(created_at),
            }
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_truncation() {
        let long = "a".repeat(300);
        assert_eq!(headline_of(&long).chars().count(), 200);
        assert_eq!(headline_of("short claim"), "short claim");
    }

    #[test]
    fn test_format_ts_iso() {
        assert_eq!(format_ts_iso(0), "1970-01-01T00:00:00Z");
    }

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE query_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                headline TEXT NOT NULL,
                serpapi_result TEXT,
                gemini_result TEXT,
                factcheck_result TEXT,
                verdict TEXT,
                credibility TEXT,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    fn record(headline: &str, verdict: &str) -> NewHistoryRecord {
        NewHistoryRecord {
            headline: headline.to_string(),
            serpapi_result: None,
            gemini_result: None,
            factcheck_result: None,
            verdict: Some(verdict.to_string()),
            credibility: Some("Unknown".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let pool = memory_pool().await;
        create(&pool, &record("first claim", "Unknown")).await.unwrap();
        create(&pool, &record("second claim", "Verified by Google FactCheck"))
            .await
            .unwrap();

        let records = list(&pool, None, 50, 0).await.unwrap();
        assert_eq!(records.len(), 2);
        // Same-second inserts fall back to id DESC
        assert_eq!(records[0].headline, "second claim");
        assert_eq!(records[1].headline, "first claim");
    }

    #[tokio::test]
    async fn test_search_matches_all_three_columns() {
        let pool = memory_pool().await;
        create(&pool, &record("moon landing was staged", "Likely False"))
            .await
            .unwrap();
        create(&pool, &record("water is wet", "Verified by Google FactCheck"))
            .await
            .unwrap();

        let by_headline = list(&pool, Some("moon"), 50, 0).await.unwrap();
        assert_eq!(by_headline.len(), 1);
        assert_eq!(by_headline[0].headline, "moon landing was staged");

        let by_verdict = list(&pool, Some("FactCheck"), 50, 0).await.unwrap();
        assert_eq!(by_verdict.len(), 1);
        assert_eq!(by_verdict[0].headline, "water is wet");

        let by_credibility = list(&pool, Some("Unknown"), 50, 0).await.unwrap();
        assert_eq!(by_credibility.len(), 2);

        let none = list(&pool, Some("zebra"), 50, 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_limit_and_offset() {
        let pool = memory_pool().await;
        for i in 0..5 {
            create(&pool, &record(&format!("claim {}", i), "Unknown"))
                .await
                .unwrap();
        }

        let page1 = list(&pool, None, 2, 0).await.unwrap();
        let page2 = list(&pool, None, 2, 2).await.unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);
        assert_eq!(page1[0].headline, "claim 4");
        assert_eq!(page2[0].headline, "claim 2");
    }
}
