//! Verdict resolution over already-fetched evidence. Pure functions, no
//! I/O.
//!
//! Two strategies exist, selected by configuration rather than by sniffing
//! which fields happen to be present in a response:
//!
//! - [`VerdictStrategy::ApiPrecedence`] — structured fact-check databases
//!   outrank generative-model judgment, which outranks raw search-evidence
//!   presence, which outranks no information.
//! - [`VerdictStrategy::CustomModel`] — defer entirely to the external
//!   custom model service's own verdict and credibility fields.
//!
//! The strategies never run against the same claim.

use crate::models::{CustomModelResult, EvidenceReport, GenerativeVerdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStrategy {
    ApiPrecedence,
    CustomModel,
}

impl VerdictStrategy {
    /// Parse the config string; `load_config` has already validated it.
    pub fn from_config(strategy: &str) -> Self {
        match strategy {
            "custom-model" => VerdictStrategy::CustomModel,
            _ => VerdictStrategy::ApiPrecedence,
        }
    }
}

/// The resolved outcome attached to every analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub verdict: String,
    pub credibility: String,
}

/// Resolve a verdict from the FactCheck and SerpAPI evidence and the
/// generative summarizer's reply. First matching rule wins:
///
/// 1. usable FactCheck evidence → "Verified by Google FactCheck";
/// 2. the summarizer produced a verdict label → use it verbatim;
/// 3. usable SerpAPI evidence → "Evidence found via SerpAPI";
/// 4. nothing → "Unknown".
pub fn resolve_api_precedence(
    factcheck: &EvidenceReport,
    serp: &EvidenceReport,
    gemini: &GenerativeVerdict,
) -> Verdict {
    // Provider errors and "not configured" notes never populate `items`,
    // so a non-empty list is always real evidence. The summarizer's
    // serpapiEvidence field is no substitute for rule 3: it defaults to
    // the provider summary, which is a note when the provider degraded.
    let verdict = if !factcheck.items.is_empty() {
        "Verified by Google FactCheck".to_string()
    } else if let Some(v) = gemini.verdict.as_deref().filter(|v| !v.trim().is_empty()) {
        v.to_string()
    } else if !serp.items.is_empty() {
        "Evidence found via SerpAPI".to_string()
    } else {
        "Unknown".to_string()
    };

    let credibility = gemini
        .credibility
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("Unknown")
        .to_string();

    Verdict {
        verdict,
        credibility,
    }
}

/// Resolve a verdict from the custom model service's reply.
pub fn resolve_custom_model(result: &CustomModelResult) -> Verdict {
    if result.success {
        Verdict {
            verdict: if result.verdict.is_empty() {
                "Unknown".to_string()
            } else {
                result.verdict.clone()
            },
            credibility: if result.credibility.is_empty() {
                "Unknown".to_string()
            } else {
                result.credibility.clone()
            },
        }
    } else {
        Verdict {
            verdict: "Error analyzing claim".to_string(),
            credibility: "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvidenceItem, EvidenceSource};
    use serde_json::Value;

    fn factcheck_with_items() -> EvidenceReport {
        EvidenceReport {
            source: EvidenceSource::FactCheck,
            items: vec![EvidenceItem {
                source: EvidenceSource::FactCheck,
                title: "x".into(),
                url: "http://example.org".into(),
                rating: Some("False".into()),
            }],
            summary: "- Reviewer rated: False (Title: x, URL: http://example.org)".into(),
        }
    }

    fn factcheck_empty() -> EvidenceReport {
        EvidenceReport::note(EvidenceSource::FactCheck, "No fact-check found.")
    }

    fn serp_with_items() -> EvidenceReport {
        EvidenceReport {
            source: EvidenceSource::Search,
            items: vec![EvidenceItem {
                source: EvidenceSource::Search,
                title: "some hit".into(),
                url: "http://example.org".into(),
                rating: None,
            }],
            summary: "- some hit (http://example.org)".into(),
        }
    }

    fn serp_empty() -> EvidenceReport {
        EvidenceReport::note(EvidenceSource::Search, "No SerpAPI results.")
    }

    #[test]
    fn test_scenario_a_factcheck_wins_regardless_of_gemini() {
        let gemini = GenerativeVerdict {
            verdict: Some("Likely False".into()),
            credibility: Some("Untrustworthy".into()),
            ..Default::default()
        };
        let v = resolve_api_precedence(&factcheck_with_items(), &serp_empty(), &gemini);
        assert_eq!(v.verdict, "Verified by Google FactCheck");
        assert_eq!(v.credibility, "Untrustworthy");
    }

    #[test]
    fn test_scenario_b_gemini_verdict_used_verbatim() {
        let gemini = GenerativeVerdict {
            verdict: Some("Likely False".into()),
            ..Default::default()
        };
        let v = resolve_api_precedence(&factcheck_empty(), &serp_empty(), &gemini);
        assert_eq!(v.verdict, "Likely False");
        assert_eq!(v.credibility, "Unknown");
    }

    #[test]
    fn test_scenario_c_serp_evidence_fallback() {
        let gemini = GenerativeVerdict {
            serpapi_evidence: Some("- some hit (http://example.org)".into()),
            ..Default::default()
        };
        let v = resolve_api_precedence(&factcheck_empty(), &serp_with_items(), &gemini);
        assert_eq!(v.verdict, "Evidence found via SerpAPI");
    }

    #[test]
    fn test_scenario_d_all_empty_is_unknown() {
        let v = resolve_api_precedence(
            &factcheck_empty(),
            &serp_empty(),
            &GenerativeVerdict::default(),
        );
        assert_eq!(v.verdict, "Unknown");
        assert_eq!(v.credibility, "Unknown");
    }

    #[test]
    fn test_blank_gemini_verdict_does_not_match_rule_two() {
        let gemini = GenerativeVerdict {
            verdict: Some("   ".into()),
            ..Default::default()
        };
        let v = resolve_api_precedence(&factcheck_empty(), &serp_empty(), &gemini);
        assert_eq!(v.verdict, "Unknown");
    }

    #[test]
    fn test_serp_note_in_gemini_reply_is_not_evidence() {
        // The summarizer echoes the provider summary when its reply has no
        // serpapiEvidence field, so an unconfigured provider's note ends up
        // in that slot. Rule 3 must not mistake it for search evidence.
        for note in [
            "No SerpAPI key set.",
            "No SerpAPI results.",
            "Error fetching SerpAPI: timeout",
        ] {
            let gemini = GenerativeVerdict {
                summary: Some("s".into()),
                credibility: Some("Uncertain".into()),
                serpapi_evidence: Some(note.into()),
                ..Default::default()
            };
            let serp = EvidenceReport::note(EvidenceSource::Search, note);
            let v = resolve_api_precedence(&factcheck_empty(), &serp, &gemini);
            assert_eq!(v.verdict, "Unknown");
            assert_eq!(v.credibility, "Uncertain");
        }
    }

    #[test]
    fn test_custom_model_success() {
        let result = CustomModelResult {
            success: true,
            verdict: "Verified".into(),
            credibility: "High (4/5)".into(),
            summary: String::new(),
            reasoning: String::new(),
            sources: Vec::new(),
            confidence: 80.0,
            is_fake: Some(false),
            error: None,
            raw_response: Value::Null,
        };
        let v = resolve_custom_model(&result);
        assert_eq!(v.verdict, "Verified");
        assert_eq!(v.credibility, "High (4/5)");
    }

    #[test]
    fn test_custom_model_failure() {
        let result = CustomModelResult {
            success: false,
            verdict: "Error".into(),
            credibility: "Unknown".into(),
            summary: String::new(),
            reasoning: String::new(),
            sources: Vec::new(),
            confidence: 0.0,
            is_fake: None,
            error: Some("timeout".into()),
            raw_response: Value::Null,
        };
        let v = resolve_custom_model(&result);
        assert_eq!(v.verdict, "Error analyzing claim");
        assert_eq!(v.credibility, "Unknown");
    }

    #[test]
    fn test_strategy_from_config() {
        assert_eq!(
            VerdictStrategy::from_config("api"),
            VerdictStrategy::ApiPrecedence
        );
        assert_eq!(
            VerdictStrategy::from_config("custom-model"),
            VerdictStrategy::CustomModel
        );
    }
}
