//! Generative summarizer backed by the Gemini `generateContent` API.
//!
//! Composes one prompt from the claim and the three evidence summaries,
//! asks the model for a structured JSON reply, and parses it defensively:
//!
//! 1. Markdown code fences (```` ``` ```` with an optional `json` tag) are
//!    stripped before parsing.
//! 2. On parse success, the five named fields are extracted with
//!    independent null-safety; `serpapiEvidence` defaults to the SerpAPI
//!    summary the prompt was built from.
//! 3. On parse failure, a degraded record is synthesized (`summary` = raw
//!    reply text, `credibility` = `"unknown"`, `isFake` = null).
//! 4. Any failure in the whole flow (missing key, transport, malformed
//!    response envelope) is converted into a record whose only populated
//!    field is `error` — the summarizer's single failure-reporting channel.

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::models::GenerativeVerdict;

/// Analyze a claim against the gathered evidence. Never fails the caller.
pub async fn analyze_with_gemini(
    config: &GeminiConfig,
    api_key: Option<&str>,
    text: &str,
    factcheck_summary: &str,
    news_summary: &str,
    serp_summary: &str,
) -> GenerativeVerdict {
    let result = analyze_inner(
        config,
        api_key,
        text,
        factcheck_summary,
        news_summary,
        serp_summary,
    )
    .await;

    match result {
        Ok(verdict) => verdict,
        Err(e) => GenerativeVerdict::from_error(e.to_string()),
    }
}

async fn analyze_inner(
    config: &GeminiConfig,
    api_key: Option<&str>,
    text: &str,
    factcheck_summary: &str,
    news_summary: &str,
    serp_summary: &str,
) -> Result<GenerativeVerdict> {
    let api_key = api_key.ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY not set"))?;

    let prompt = build_prompt(text, factcheck_summary, news_summary, serp_summary);
    let raw_text = generate_content(config, api_key, &prompt).await?;

    Ok(parse_generative_reply(&raw_text, serp_summary))
}

/// Build the fact-checking prompt embedding the claim and all evidence.
fn build_prompt(text: &str, factcheck: &str, news: &str, serp: &str) -> String {
    format!(
        r#"You are a fact-checking assistant.
Claim: "{text}"

Evidence from Google FactCheck: {factcheck}
Evidence from Live News: {news}
Evidence from SerpAPI (Google Search): {serp}

Respond ONLY in valid JSON:
{{
    "summary": "short summary of the claim",
    "credibility": "Verified|Uncertain|Untrustworthy",
    "reasoning": "brief explanation",
    "verdict": "short verdict label",
    "isFake": true|false,
    "serpapiEvidence": "relevant search evidence, if any"
}}"#
    )
}

/// One call to `POST {endpoint}/models/{model}:generateContent`; returns
/// the reply's first candidate text.
async fn generate_content(config: &GeminiConfig, api_key: &str, prompt: &str) -> Result<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let url = format!(
        "{}/models/{}:generateContent",
        config.endpoint.trim_end_matches('/'),
        config.model
    );

    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Gemini API error {}: {}", status, body_text);
    }

    let json: Value = response.json().await?;
    let text = json
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("Gemini response missing candidate text"))?;

    Ok(text.trim().to_string())
}

/// Strip Markdown code-fence wrappers from a model reply.
///
/// Handles a leading ```` ``` ```` or ```` ```json ````, a trailing
/// ```` ``` ````, and a stray leading `json` token left after fence
/// removal.
pub fn strip_code_fences(raw: &str) -> String {
    let mut cleaned = raw.trim();

    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }

    let mut cleaned = cleaned.trim().to_string();
    if cleaned.to_lowercase().starts_with("json") {
        cleaned = cleaned[4..].trim().to_string();
    }
    cleaned
}

/// Parse the model's reply into a [`GenerativeVerdict`], degrading to a
/// best-effort record when the reply is not valid JSON.
pub fn parse_generative_reply(raw_text: &str, serp_summary: &str) -> GenerativeVerdict {
    let cleaned = strip_code_fences(raw_text);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(parsed) => {
            let field = |name: &str| {
                parsed
                    .get(name)
                    .and_then(Value::as_str)
                    .map(|s| s.to_string())
            };
            GenerativeVerdict {
                summary: field("summary"),
                credibility: field("credibility"),
                reasoning: field("reasoning"),
                verdict: field("verdict"),
                is_fake: parsed.get("isFake").and_then(Value::as_bool),
                serpapi_evidence: field("serpapiEvidence")
                    .or_else(|| Some(serp_summary.to_string())),
                error: None,
            }
        }
        Err(_) => GenerativeVerdict {
            summary: Some(raw_text.to_string()),
            credibility: Some("unknown".to_string()),
            reasoning: Some("Gemini did not return valid JSON".to_string()),
            verdict: None,
            is_fake: None,
            serpapi_evidence: Some(serp_summary.to_string()),
            error: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_fences() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_tagged_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_stray_json_token() {
        assert_eq!(strip_code_fences("json {\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_input_unchanged() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_reply_parses_identically_to_unwrapped() {
        let body = r#"{"summary": "s", "credibility": "Verified", "reasoning": "r", "isFake": false, "serpapiEvidence": "- hit (url)"}"#;
        let fenced = format!("```json\n{}\n```", body);

        let a = parse_generative_reply(body, "");
        let b = parse_generative_reply(&fenced, "");

        assert_eq!(a.summary, b.summary);
        assert_eq!(a.credibility.as_deref(), Some("Verified"));
        assert_eq!(b.credibility.as_deref(), Some("Verified"));
        assert_eq!(a.is_fake, Some(false));
        assert_eq!(b.is_fake, Some(false));
        assert_eq!(b.serpapi_evidence.as_deref(), Some("- hit (url)"));
    }

    #[test]
    fn test_malformed_reply_degrades() {
        let raw = "I could not produce JSON, sorry.";
        let verdict = parse_generative_reply(raw, "- serp line");

        assert_eq!(verdict.summary.as_deref(), Some(raw));
        assert_eq!(verdict.credibility.as_deref(), Some("unknown"));
        assert_eq!(
            verdict.reasoning.as_deref(),
            Some("Gemini did not return valid JSON")
        );
        assert_eq!(verdict.is_fake, None);
        assert_eq!(verdict.serpapi_evidence.as_deref(), Some("- serp line"));
        assert!(verdict.error.is_none());
    }

    #[test]
    fn test_fields_are_independently_nullable() {
        let verdict = parse_generative_reply(r#"{"summary": "only summary"}"#, "serp");
        assert_eq!(verdict.summary.as_deref(), Some("only summary"));
        assert_eq!(verdict.credibility, None);
        assert_eq!(verdict.reasoning, None);
        assert_eq!(verdict.is_fake, None);
        // serpapiEvidence falls back to the search provider's summary
        assert_eq!(verdict.serpapi_evidence.as_deref(), Some("serp"));
    }

    #[test]
    fn test_prompt_embeds_claim_and_evidence() {
        let prompt = build_prompt("the moon is cheese", "fc block", "news block", "serp block");
        assert!(prompt.contains("the moon is cheese"));
        assert!(prompt.contains("fc block"));
        assert!(prompt.contains("news block"));
        assert!(prompt.contains("serp block"));
        assert!(prompt.contains("Respond ONLY in valid JSON"));
    }
}
