//! Evidence providers: Google FactCheck Tools, NewsData.io, and SerpAPI.
//!
//! Each provider takes the shared HTTP client (bounded by the configured
//! 10-second timeout) and a free-text query, and always returns an
//! [`EvidenceReport`] — never an error. A missing credential, a transport
//! failure, or an empty result set all degrade to a report whose `summary`
//! explains what happened and whose `items` list is empty. Every outbound
//! call is attempted exactly once; there are no retries anywhere in this
//! module.

use reqwest::Client;
use serde_json::Value;

use crate::config::ProvidersConfig;
use crate::models::{EvidenceItem, EvidenceReport, EvidenceSource};

/// Query the Google FactCheck Tools claim search API.
///
/// Flattens `claims[].claimReview[]` into one item per review, carrying the
/// reviewer's textual rating.
pub async fn fetch_factcheck(http: &Client, key: Option<&str>, query: &str) -> EvidenceReport {
    let key = match key {
        Some(k) => k,
        None => return EvidenceReport::note(EvidenceSource::FactCheck, "No Google FactCheck key set."),
    };

    match fetch_factcheck_inner(http, key, query).await {
        Ok(report) => report,
        Err(e) => EvidenceReport::note(
            EvidenceSource::FactCheck,
            format!("Error fetching FactCheck: {}", e),
        ),
    }
}

async fn fetch_factcheck_inner(
    http: &Client,
    key: &str,
    query: &str,
) -> anyhow::Result<EvidenceReport> {
    let data: Value = http
        .get("https://factchecktools.googleapis.com/v1alpha1/claims:search")
        .query(&[("query", query), ("key", key)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mut items = Vec::new();
    let mut lines = Vec::new();

    let empty = Vec::new();
    for claim in data.get("claims").and_then(Value::as_array).unwrap_or(&empty) {
        for review in claim
            .get("claimReview")
            .and_then(Value::as_array)
            .unwrap_or(&empty)
        {
            let publisher = review
                .pointer("/publisher/name")
                .and_then(Value::as_str)
                .unwrap_or("");
            let rating = review.get("textualRating").and_then(Value::as_str).unwrap_or("");
            let title = review.get("title").and_then(Value::as_str).unwrap_or("");
            let url = review.get("url").and_then(Value::as_str).unwrap_or("");

            lines.push(format!(
                "- {} rated: {} (Title: {}, URL: {})",
                publisher, rating, title, url
            ));
            items.push(EvidenceItem {
                source: EvidenceSource::FactCheck,
                title: title.to_string(),
                url: url.to_string(),
                rating: Some(rating.to_string()),
            });
        }
    }

    if items.is_empty() {
        return Ok(EvidenceReport::note(
            EvidenceSource::FactCheck,
            "No fact-check found.",
        ));
    }

    Ok(EvidenceReport {
        source: EvidenceSource::FactCheck,
        items,
        summary: lines.join("\n"),
    })
}

/// Query NewsData.io for recent coverage of the claim.
pub async fn fetch_live_news(
    http: &Client,
    key: Option<&str>,
    query: &str,
    cfg: &ProvidersConfig,
) -> EvidenceReport {
    let key = match key {
        Some(k) => k,
        None => return EvidenceReport::note(EvidenceSource::News, "No NewsData.io key set."),
    };

    match fetch_live_news_inner(http, key, query, cfg.news_limit).await {
        Ok(report) => report,
        Err(e) => EvidenceReport::note(
            EvidenceSource::News,
            format!("Error fetching live news: {}", e),
        ),
    }
}

async fn fetch_live_news_inner(
    http: &Client,
    key: &str,
    query: &str,
    limit: usize,
) -> anyhow::Result<EvidenceReport> {
    let data: Value = http
        .get("https://newsdata.io/api/1/news")
        .query(&[("apikey", key), ("q", query), ("language", "en")])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let articles = link_items(
        EvidenceSource::News,
        data.get("results").and_then(Value::as_array),
        "link",
        limit,
    );

    if articles.is_empty() {
        return Ok(EvidenceReport::note(
            EvidenceSource::News,
            "No relevant news found.",
        ));
    }
    Ok(render_link_report(EvidenceSource::News, articles))
}

/// Query SerpAPI (Google Search) for organic results about the claim.
pub async fn fetch_serpapi(
    http: &Client,
    key: Option<&str>,
    query: &str,
    cfg: &ProvidersConfig,
) -> EvidenceReport {
    let key = match key {
        Some(k) => k,
        None => return EvidenceReport::note(EvidenceSource::Search, "No SerpAPI key set."),
    };

    match fetch_serpapi_inner(http, key, query, cfg.search_limit).await {
        Ok(report) => report,
        Err(e) => EvidenceReport::note(
            EvidenceSource::Search,
            format!("Error fetching SerpAPI: {}", e),
        ),
    }
}

async fn fetch_serpapi_inner(
    http: &Client,
    key: &str,
    query: &str,
    limit: usize,
) -> anyhow::Result<EvidenceReport> {
    let data: Value = http
        .get("https://serpapi.com/search.json")
        .query(&[("q", query), ("hl", "en"), ("api_key", key)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let results = link_items(
        EvidenceSource::Search,
        data.get("organic_results").and_then(Value::as_array),
        "link",
        limit,
    );

    if results.is_empty() {
        return Ok(EvidenceReport::note(
            EvidenceSource::Search,
            "No SerpAPI results.",
        ));
    }
    Ok(render_link_report(EvidenceSource::Search, results))
}

/// Extract up to `limit` `{title, <url_field>}` pairs from a JSON array.
fn link_items(
    source: EvidenceSource,
    array: Option<&Vec<Value>>,
    url_field: &str,
    limit: usize,
) -> Vec<EvidenceItem> {
    array
        .map(|arr| {
            arr.iter()
                .take(limit)
                .map(|entry| EvidenceItem {
                    source,
                    title: entry
                        .get("title")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    url: entry
                        .get(url_field)
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    rating: None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn render_link_report(source: EvidenceSource, items: Vec<EvidenceItem>) -> EvidenceReport {
    let summary = items
        .iter()
        .map(|item| format!("- {} ({})", item.title, item.url))
        .collect::<Vec<_>>()
        .join("\n");
    EvidenceReport {
        source,
        items,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_items_respects_limit_and_missing_fields() {
        let arr = vec![
            json!({"title": "A", "link": "http://a"}),
            json!({"title": "B"}),
            json!({"link": "http://c"}),
            json!({"title": "D", "link": "http://d"}),
        ];
        let items = link_items(EvidenceSource::News, Some(&arr), "link", 3);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[1].url, "");
        assert_eq!(items[2].title, "");
    }

    #[test]
    fn test_render_link_report_lines() {
        let items = vec![EvidenceItem {
            source: EvidenceSource::Search,
            title: "Result".into(),
            url: "http://x".into(),
            rating: None,
        }];
        let report = render_link_report(EvidenceSource::Search, items);
        assert_eq!(report.summary, "- Result (http://x)");
        assert_eq!(report.items.len(), 1);
    }

    #[test]
    fn test_note_report_has_no_items() {
        let report = EvidenceReport::note(EvidenceSource::FactCheck, "No Google FactCheck key set.");
        assert!(report.items.is_empty());
        assert_eq!(report.summary, "No Google FactCheck key set.");
    }
}
