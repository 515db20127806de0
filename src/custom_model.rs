//! Client for an external custom fact-checking model service.
//!
//! This is the alternative evidence path selected by
//! `verdict.strategy = "custom-model"`: instead of querying structured
//! fact-check and search APIs, the whole claim is posted to a single
//! service that returns its own verdict, credibility, and reasoning.
//!
//! The service's reply shape is loosely typed, so parsing goes through an
//! explicit coalescing step at this boundary. Two quirks of the upstream
//! contract are preserved deliberately because changing them would change
//! observable behavior:
//!
//! - any verdict other than exactly `VERIFIED` (case-insensitive) is
//!   treated as fake;
//! - credibility is a 0-5 integer mapped to a five-level text scale, and
//!   confidence is that integer x 20.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::CustomModelConfig;
use crate::models::CustomModelResult;

/// Post the claim to the custom model service and parse its reply.
/// Never returns an error: failures become a result with `success = false`.
pub async fn call_custom_model(
    config: &CustomModelConfig,
    url: Option<&str>,
    api_key: Option<&str>,
    query_text: &str,
) -> CustomModelResult {
    let url = match url {
        Some(u) => u,
        None => return error_result("Custom model URL not configured"),
    };

    match call_inner(config, url, api_key, query_text).await {
        Ok(raw) => parse_custom_model_response(raw),
        Err(e) => error_result(format!("Failed to connect to custom model: {}", e)),
    }
}

async fn call_inner(
    config: &CustomModelConfig,
    url: &str,
    api_key: Option<&str>,
    query_text: &str,
) -> anyhow::Result<Value> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let mut req = client
        .post(url)
        .json(&serde_json::json!({ "query": query_text }));
    if let Some(key) = api_key {
        req = req.header("X-API-Key", key);
    }

    let response = req.send().await?.error_for_status()?;
    Ok(response.json().await?)
}

/// Parse the service reply, handling the nested form, the flat object
/// form with field aliases, and bare string/list replies.
pub fn parse_custom_model_response(raw: Value) -> CustomModelResult {
    if let Some(obj) = raw.as_object() {
        // Nested form: the actual analysis sits inside a `response` object.
        if let Some(nested) = obj.get("response").filter(|v| v.is_object()) {
            return parse_nested(nested, raw.clone());
        }
        return parse_flat(obj, raw.clone());
    }

    // String or list reply: keep whatever text we can salvage.
    let response_str = safe_str(&raw, None);
    CustomModelResult {
        success: true,
        verdict: "Analysis Complete".to_string(),
        credibility: "See details".to_string(),
        summary: if response_str.is_empty() {
            "No summary available".to_string()
        } else {
            truncate(&response_str, 500)
        },
        reasoning: response_str,
        sources: Vec::new(),
        confidence: 0.0,
        is_fake: None,
        error: None,
        raw_response: raw,
    }
}

fn parse_nested(nested: &Value, raw: Value) -> CustomModelResult {
    let verdict = nested
        .get("verdict")
        .and_then(Value::as_str)
        .unwrap_or("Undetermined")
        .to_string();
    // Anything but a literal VERIFIED counts as fake. Narrow, but it is
    // the upstream contract.
    let is_fake = verdict.to_uppercase() != "VERIFIED";

    let credibility_num = safe_num(nested.get("credibility"), 0.0);
    let credibility_text = match credibility_num as i64 {
        5 => "Very High",
        4 => "High",
        3 => "Medium",
        2 => "Low",
        1 => "Very Low",
        _ => "Unknown",
    };

    CustomModelResult {
        success: true,
        verdict,
        credibility: format!("{} ({}/5)", credibility_text, credibility_num),
        summary: nested.get("summary").map(|v| safe_str(v, None)).unwrap_or_default(),
        reasoning: nested
            .get("reasoning")
            .map(|v| safe_str(v, None))
            .unwrap_or_default(),
        sources: string_list(nested.get("url_references")),
        confidence: credibility_num * 20.0,
        is_fake: Some(is_fake),
        error: None,
        raw_response: raw,
    }
}

fn parse_flat(obj: &serde_json::Map<String, Value>, raw: Value) -> CustomModelResult {
    // An alias that is present but renders empty (null, "") does not win;
    // the next alias still gets a chance.
    let coalesce = |names: &[&str]| {
        names
            .iter()
            .filter_map(|n| obj.get(*n))
            .find(|v| !safe_str(v, None).is_empty())
            .cloned()
    };

    let mut summary = coalesce(&["summary", "analysis", "explanation"])
        .map(|v| safe_str(&v, None))
        .unwrap_or_default();
    let mut reasoning = coalesce(&["reasoning", "rationale", "details"])
        .map(|v| safe_str(&v, None))
        .unwrap_or_default();

    // Bare text replies often carry the whole analysis in `response` or
    // `text`; use it when no summary field was present.
    if summary.is_empty() {
        if let Some(text) = coalesce(&["response", "text"]) {
            let text = safe_str(&text, None);
            if !text.is_empty() {
                summary = truncate(&text, 500);
                reasoning = text;
            }
        }
    }

    CustomModelResult {
        success: true,
        verdict: coalesce(&["verdict", "label", "prediction"])
            .map(|v| safe_str(&v, None))
            .unwrap_or_else(|| "Unknown".to_string()),
        credibility: coalesce(&["credibility", "confidence_level"])
            .map(|v| safe_str(&v, None))
            .unwrap_or_else(|| "Unknown".to_string()),
        summary,
        reasoning,
        sources: string_list(coalesce(&["sources", "references", "links"]).as_ref()),
        confidence: safe_num(
            coalesce(&["confidence", "score", "confidence_score"]).as_ref(),
            0.0,
        ),
        is_fake: None,
        error: None,
        raw_response: raw,
    }
}

fn error_result(message: impl Into<String>) -> CustomModelResult {
    CustomModelResult {
        success: false,
        verdict: "Error".to_string(),
        credibility: "Unknown".to_string(),
        summary: String::new(),
        reasoning: String::new(),
        sources: Vec::new(),
        confidence: 0.0,
        is_fake: None,
        error: Some(message.into()),
        raw_response: Value::Null,
    }
}

/// Render a JSON array as a list of strings, one entry per element.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(|v| safe_str(v, None)).collect())
        .unwrap_or_default()
}

/// Render any JSON value as a string, optionally truncated.
fn safe_str(value: &Value, max_length: Option<usize>) -> String {
    let s = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match max_length {
        Some(max) => truncate(&s, max),
        None => s,
    }
}

/// Coerce a JSON value to a number, with a default for anything
/// non-numeric.
fn safe_num(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
