//! Core data types flowing through the claim-analysis pipeline.
//!
//! External payloads (fact-check, search, generative-model, custom-model
//! responses) are parsed into these explicit optional-field structures at
//! the provider boundary; downstream code never touches raw JSON presence
//! checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which external service produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceSource {
    FactCheck,
    News,
    Search,
}

/// One normalized evidence hit from a fact-check or search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub source: EvidenceSource,
    pub title: String,
    pub url: String,
    pub rating: Option<String>,
}

/// What an evidence provider hands back to the pipeline.
///
/// `summary` is the rendered text block fed into the summarizer prompt:
/// one `- ...` line per item, or an explanatory note when the provider is
/// unconfigured, found nothing, or failed. `items` is empty exactly in
/// those three cases, so an empty list doubles as the "no usable
/// evidence" signal for the verdict resolver.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceReport {
    pub source: EvidenceSource,
    pub items: Vec<EvidenceItem>,
    pub summary: String,
}

impl EvidenceReport {
    pub fn note(source: EvidenceSource, summary: impl Into<String>) -> Self {
        Self {
            source,
            items: Vec::new(),
            summary: summary.into(),
        }
    }
}

/// A named entity extracted from the claim text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// Sentiment prediction with the canonical label set
/// `negative | neutral | positive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

/// Cosine-similarity score between two texts, bucketed into a
/// human-readable label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Similarity {
    pub label: String,
    pub score: f64,
}

/// Normalized fake-news classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FakeNews {
    pub label: Option<String>,
    #[serde(rename = "isFake")]
    pub is_fake: Option<bool>,
    pub score: Option<f64>,
    pub raw_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The generative summarizer's structured reply.
///
/// Every field is independently nullable: a malformed model reply degrades
/// to a best-effort record instead of failing the request, and a failure
/// anywhere in the summarizer flow yields a record whose only populated
/// field is `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerativeVerdict {
    pub summary: Option<String>,
    pub credibility: Option<String>,
    pub reasoning: Option<String>,
    pub verdict: Option<String>,
    #[serde(rename = "isFake")]
    pub is_fake: Option<bool>,
    #[serde(rename = "serpapiEvidence")]
    pub serpapi_evidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerativeVerdict {
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Parsed reply from the external custom fact-checking model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomModelResult {
    pub success: bool,
    pub verdict: String,
    pub credibility: String,
    pub summary: String,
    pub reasoning: String,
    pub sources: Vec<String>,
    pub confidence: f64,
    pub is_fake: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub raw_response: Value,
}

/// One row of the query history audit log. Write-once: never updated or
/// deleted after creation.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub headline: String,
    pub serpapi_result: Option<String>,
    pub gemini_result: Option<String>,
    pub factcheck_result: Option<String>,
    pub verdict: Option<String>,
    pub credibility: Option<String>,
    pub created_at: String,
}

/// Fields for a new history row; `id` and `created_at` are assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub headline: String,
    pub serpapi_result: Option<String>,
    pub gemini_result: Option<String>,
    pub factcheck_result: Option<String>,
    pub verdict: Option<String>,
    pub credibility: Option<String>,
}
