//! Semantic similarity between two texts.
//!
//! Embeds both texts with the configured sentence-embedding model, scores
//! them with cosine similarity, and buckets the score into a label. The
//! bucketing is a total, non-overlapping partition of [-1, 1]:
//!
//! | Score | Label |
//! |-------|-------|
//! | `>= 0.7` | High Similarity |
//! | `>= 0.4` | Moderate Similarity |
//! | `< 0.4` | Low Similarity |

use anyhow::Result;

use crate::config::InferenceConfig;
use crate::inference::embed_texts;
use crate::models::Similarity;

/// Compute the bucketed cosine similarity between two texts.
pub async fn calculate_similarity(
    config: &InferenceConfig,
    token: Option<&str>,
    text1: &str,
    text2: &str,
) -> Result<Similarity> {
    let vectors = embed_texts(config, token, &[text1.to_string(), text2.to_string()]).await?;
    if vectors.len() != 2 {
        anyhow::bail!("Expected 2 embedding vectors, got {}", vectors.len());
    }

    let score = cosine_similarity(&vectors[0], &vectors[1]);
    Ok(Similarity {
        label: bucket_similarity(score),
        score,
    })
}

/// Cosine similarity between two embedding vectors, in [-1, 1].
///
/// Returns 0.0 for empty or length-mismatched vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }

    dot / denom
}

/// Bucket a cosine score into a similarity label.
pub fn bucket_similarity(score: f64) -> String {
    if score >= 0.7 {
        "High Similarity".to_string()
    } else if score >= 0.4 {
        "Moderate Similarity".to_string()
    } else {
        "Low Similarity".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_empty_and_mismatched() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket_similarity(0.7), "High Similarity");
        assert_eq!(bucket_similarity(0.9), "High Similarity");
        assert_eq!(bucket_similarity(0.4), "Moderate Similarity");
        assert_eq!(bucket_similarity(0.69), "Moderate Similarity");
        assert_eq!(bucket_similarity(0.39), "Low Similarity");
        assert_eq!(bucket_similarity(-1.0), "Low Similarity");
        assert_eq!(bucket_similarity(1.0), "High Similarity");
    }
}
