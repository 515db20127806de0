//! Export the query history table as CSV.
//!
//! Column order is fixed and matches the audit-log schema:
//! `id, headline, serpapi_result, gemini_result, factcheck_result,
//! verdict, credibility, created_at`.

use anyhow::Result;
use sqlx::Row;
use std::path::Path;

use crate::config::Config;
use crate::db;

const CSV_HEADER: &str =
    "id,headline,serpapi_result,gemini_result,factcheck_result,verdict,credibility,created_at";

/// Export all history records as CSV.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes to
/// stdout for piping.
pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let pool = db::connect(&config.db).await?;

    let rows = sqlx::query(
        "SELECT id, headline, serpapi_result, gemini_result, factcheck_result, \
         verdict, credibility, created_at \
         FROM query_history ORDER BY id ASC",
    )
    .fetch_all(&pool)
    .await?;

    let mut csv = String::with_capacity(rows.len() * 128 + CSV_HEADER.len());
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for row in &rows {
        let id: i64 = row.get("id");
        let created_at: i64 = row.get("created_at");
        let created_at = chrono::DateTime::from_timestamp(created_at, 0)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_else(|| created_at.to_string());

        let fields = [
            id.to_string(),
            row.get::<String, _>("headline"),
            row.get::<Option<String>, _>("serpapi_result").unwrap_or_default(),
            row.get::<Option<String>, _>("gemini_result").unwrap_or_default(),
            row.get::<Option<String>, _>("factcheck_result").unwrap_or_default(),
            row.get::<Option<String>, _>("verdict").unwrap_or_default(),
            row.get::<Option<String>, _>("credibility").unwrap_or_default(),
            created_at,
        ];

        let line = fields
            .iter()
            .map(|f| escape_csv(f))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    let record_count = rows.len();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &csv)?;
            eprintln!("Exported {} records to {}", record_count, path.display());
        }
        None => {
            print!("{}", csv);
        }
    }

    pool.close().await;
    Ok(())
}

/// Quote a CSV field when it contains a comma, quote, or newline;
/// embedded quotes are doubled.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
