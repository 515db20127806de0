//! Inference providers: named-entity recognition, sentiment, and fake-news
//! classification.
//!
//! The pre-trained pipelines themselves are remote: when
//! `inference.provider = "hf-api"`, each function posts the text to the
//! Hugging Face Inference API and normalizes the loosely-typed reply.
//! When the provider is `"disabled"` every call returns an error, which the
//! request handler degrades to an inline `{"error": ...}` object instead of
//! failing the request.
//!
//! The normalization rules (entity deduplication, sentiment label mapping,
//! fake-news label policy) are pure functions so they can be tested without
//! a model behind them.

use anyhow::{bail, Result};
use reqwest::Client;
use serde_json::Value;

use crate::config::InferenceConfig;
use crate::models::{Entity, FakeNews, Sentiment};

/// Extract named entities from the text, deduplicated by
/// (surface form, entity type) in first-occurrence order.
pub async fn extract_entities(
    config: &InferenceConfig,
    token: Option<&str>,
    text: &str,
) -> Result<Vec<Entity>> {
    let reply = call_model(config, token, &config.ner_model, text).await?;

    let raw: Vec<Entity> = reply
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|ent| Entity {
                    text: ent.get("word").and_then(Value::as_str).unwrap_or("").to_string(),
                    label: ent
                        .get("entity_group")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(dedup_entities(raw))
}

/// Classify the sentiment of the text into `negative | neutral | positive`.
pub async fn analyze_sentiment(
    config: &InferenceConfig,
    token: Option<&str>,
    text: &str,
) -> Result<Sentiment> {
    let reply = call_model(config, token, &config.sentiment_model, text).await?;
    let top = top_classification(&reply)
        .ok_or_else(|| anyhow::anyhow!("Empty sentiment response"))?;

    Ok(Sentiment {
        label: map_sentiment_label(&top.0),
        score: top.1,
    })
}

/// Classify the text as FAKE or REAL.
///
/// Empty or whitespace-only input short-circuits with an explicit error
/// result; the model is never called.
pub async fn classify_fake_news(
    config: &InferenceConfig,
    token: Option<&str>,
    text: &str,
) -> Result<FakeNews> {
    if text.trim().is_empty() {
        return Ok(FakeNews {
            label: None,
            is_fake: None,
            score: None,
            raw_label: None,
            error: Some("No text provided to classifier.".to_string()),
        });
    }

    let reply = call_model(config, token, &config.fake_news_model, text).await?;
    let top = top_classification(&reply)
        .ok_or_else(|| anyhow::anyhow!("Empty fake-news response"))?;

    let raw_label = top.0.to_uppercase();
    let (label, is_fake) = normalize_fake_news_label(&raw_label);

    Ok(FakeNews {
        label: Some(label),
        is_fake,
        score: Some(top.1),
        raw_label: Some(raw_label),
        error: None,
    })
}

/// Embed a batch of texts with the configured sentence-embedding model.
///
/// Returns one vector per input text, in input order. Used by the
/// similarity provider.
pub async fn embed_texts(
    config: &InferenceConfig,
    token: Option<&str>,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let reply = call_inference_api(config, token, &config.embedding_model, &texts.to_vec()).await?;

    let rows = reply
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Invalid embedding response: expected an array"))?;

    let mut vectors = Vec::with_capacity(rows.len());
    for row in rows {
        let vec: Vec<f64> = row
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid embedding response: expected nested arrays"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0))
            .collect();
        vectors.push(vec);
    }
    Ok(vectors)
}

/// Submit a single text to a hosted model and return the raw JSON reply.
async fn call_model(
    config: &InferenceConfig,
    token: Option<&str>,
    model: &str,
    text: &str,
) -> Result<Value> {
    call_inference_api(config, token, model, &text.to_string()).await
}

/// One attempt against `POST {endpoint}/models/{model}` — no retries.
async fn call_inference_api<T: serde::Serialize + ?Sized>(
    config: &InferenceConfig,
    token: Option<&str>,
    model: &str,
    inputs: &T,
) -> Result<Value> {
    match config.provider.as_str() {
        "hf-api" => {}
        "disabled" => bail!("Inference provider is disabled"),
        other => bail!("Unknown inference provider: {}", other),
    }

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()?;

    let url = format!("{}/models/{}", config.endpoint.trim_end_matches('/'), model);
    let mut req = client
        .post(&url)
        .json(&serde_json::json!({ "inputs": inputs }));
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }

    let response = req.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Inference API error {} for {}: {}", status, model, body);
    }

    Ok(response.json().await?)
}

/// Pull the top-scoring `{label, score}` out of a classification reply.
///
/// The API returns either `[{label, score}, ...]` or `[[{label, score},
/// ...]]` depending on input shape; candidates are sorted by descending
/// score, so the first entry wins.
fn top_classification(reply: &Value) -> Option<(String, f64)> {
    let candidates = match reply.as_array()? {
        arr if arr.first().map(Value::is_array).unwrap_or(false) => arr.first()?.as_array()?,
        arr => arr,
    };

    let top = candidates.first()?;
    Some((
        top.get("label").and_then(Value::as_str)?.to_string(),
        top.get("score").and_then(Value::as_f64).unwrap_or(0.0),
    ))
}

/// Strip sub-word markers and drop repeated (surface form, type) pairs,
/// keeping the first occurrence's position.
pub fn dedup_entities(raw: Vec<Entity>) -> Vec<Entity> {
    let mut seen = std::collections::HashSet::new();
    let mut entities = Vec::new();

    for ent in raw {
        let text = ent.text.replace("##", "");
        let key = (text.clone(), ent.label.clone());
        if seen.insert(key) {
            entities.push(Entity {
                text,
                label: ent.label,
            });
        }
    }
    entities
}

/// Map raw model label codes onto the canonical sentiment set. Unknown
/// codes pass through unchanged.
pub fn map_sentiment_label(raw: &str) -> String {
    match raw {
        "LABEL_0" => "negative".to_string(),
        "LABEL_1" => "neutral".to_string(),
        "LABEL_2" => "positive".to_string(),
        other => other.to_string(),
    }
}

/// Normalize an uppercased raw classifier label to (label, isFake).
///
/// Name-based matching first; positional convention (`..0` = REAL,
/// `..1` = FAKE) as fallback; anything else passes through with an
/// undetermined isFake.
pub fn normalize_fake_news_label(raw_label: &str) -> (String, Option<bool>) {
    if raw_label.contains("FAKE") {
        ("FAKE".to_string(), Some(true))
    } else if raw_label.contains("REAL") || raw_label.contains("TRUE") {
        ("REAL".to_string(), Some(false))
    } else if raw_label.ends_with('0') {
        ("REAL".to_string(), Some(false))
    } else if raw_label.ends_with('1') {
        ("FAKE".to_string(), Some(true))
    } else {
        (raw_label.to_string(), None)
    }
}
