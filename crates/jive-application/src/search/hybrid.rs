//! Hybrid score fusion.
//!
//! Fuses cosine similarity and BM25 into one ranking:
//! `score = alpha * semantic + (1 - alpha) * keyword`, with both sub-scores
//! min-max normalised across the candidate pool first. Ties break on
//! `updated_at` descending, then id, so rankings are stable.

use chrono::{DateTime, Utc};
use jive_domain::constants::search::{HYBRID_KEYWORD_WEIGHT, HYBRID_SEMANTIC_WEIGHT};
use jive_domain::value_objects::ContentType;

/// A candidate entering fusion; either sub-score may be absent.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Entity id
    pub id: String,
    /// Corpus of the entity
    pub content_type: ContentType,
    /// Raw cosine similarity, when the semantic leg ran
    pub semantic: Option<f32>,
    /// Raw BM25 score, when the keyword leg ran
    pub keyword: Option<f32>,
    /// Tie-break timestamp
    pub updated_at: DateTime<Utc>,
}

/// A fused, ranked hit.
#[derive(Debug, Clone)]
pub struct FusedHit {
    /// Entity id
    pub id: String,
    /// Corpus of the entity
    pub content_type: ContentType,
    /// Fused score in [0, 1]
    pub score: f32,
    /// Tie-break timestamp
    pub updated_at: DateTime<Utc>,
}

/// Weighted fusion engine.
#[derive(Debug, Clone, Copy)]
pub struct HybridSearchEngine {
    semantic_weight: f32,
    keyword_weight: f32,
}

impl Default for HybridSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridSearchEngine {
    /// Engine with the canonical weights (alpha = 0.7 semantic).
    #[must_use]
    pub fn new() -> Self {
        Self {
            semantic_weight: HYBRID_SEMANTIC_WEIGHT,
            keyword_weight: HYBRID_KEYWORD_WEIGHT,
        }
    }

    /// Engine with explicit weights; single-leg searches use (1, 0) or (0, 1).
    #[must_use]
    pub fn with_weights(semantic_weight: f32, keyword_weight: f32) -> Self {
        Self {
            semantic_weight,
            keyword_weight,
        }
    }

    /// The semantic weight alpha.
    #[must_use]
    pub fn semantic_weight(&self) -> f32 {
        self.semantic_weight
    }

    /// The keyword weight 1 - alpha.
    #[must_use]
    pub fn keyword_weight(&self) -> f32 {
        self.keyword_weight
    }

    /// Fuse and rank the candidate pool, returning at most `limit` hits.
    #[must_use]
    pub fn fuse(&self, candidates: Vec<Candidate>, limit: usize) -> Vec<FusedHit> {
        let semantic_norm = min_max(candidates.iter().filter_map(|c| c.semantic));
        let keyword_norm = min_max(candidates.iter().filter_map(|c| c.keyword));

        let mut hits: Vec<FusedHit> = candidates
            .into_iter()
            .map(|c| {
                let semantic = c.semantic.map_or(0.0, |s| semantic_norm.apply(s));
                let keyword = c.keyword.map_or(0.0, |s| keyword_norm.apply(s));
                FusedHit {
                    id: c.id,
                    content_type: c.content_type,
                    score: (self.semantic_weight * semantic + self.keyword_weight * keyword)
                        .clamp(0.0, 1.0),
                    updated_at: c.updated_at,
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        hits
    }
}

#[derive(Debug, Clone, Copy)]
struct MinMax {
    min: f32,
    span: f32,
}

impl MinMax {
    fn apply(self, value: f32) -> f32 {
        if self.span <= f32::EPSILON {
            // A single-valued pool carries no ranking signal; treat every
            // member as a full match rather than zeroing the leg out.
            1.0
        } else {
            (value - self.min) / self.span
        }
    }
}

fn min_max(values: impl Iterator<Item = f32>) -> MinMax {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut any = false;
    for v in values {
        any = true;
        min = min.min(v);
        max = max.max(v);
    }
    if !any {
        return MinMax { min: 0.0, span: 0.0 };
    }
    MinMax {
        min,
        span: max - min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candidate(id: &str, semantic: Option<f32>, keyword: Option<f32>, secs: i64) -> Candidate {
        Candidate {
            id: id.to_owned(),
            content_type: ContentType::Troubleshoot,
            semantic,
            keyword,
            updated_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn canonical_weights() {
        let engine = HybridSearchEngine::new();
        assert!((engine.semantic_weight() - 0.7).abs() < f32::EPSILON);
        assert!((engine.keyword_weight() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn scores_land_in_unit_interval() {
        let engine = HybridSearchEngine::new();
        let hits = engine.fuse(
            vec![
                candidate("a", Some(0.9), Some(12.0), 0),
                candidate("b", Some(0.2), Some(1.0), 0),
                candidate("c", Some(0.5), None, 0),
            ],
            10,
        );
        for hit in &hits {
            assert!((0.0..=1.0).contains(&hit.score), "score {}", hit.score);
        }
    }

    #[test]
    fn stronger_candidate_wins_both_legs() {
        let engine = HybridSearchEngine::new();
        let hits = engine.fuse(
            vec![
                candidate("weak", Some(0.1), Some(0.5), 0),
                candidate("strong", Some(0.9), Some(4.0), 0),
            ],
            10,
        );
        assert_eq!(hits[0].id, "strong");
    }

    #[test]
    fn keyword_leg_can_overcome_semantic_tie() {
        let engine = HybridSearchEngine::new();
        let hits = engine.fuse(
            vec![
                candidate("m1", Some(0.5), Some(0.2), 0),
                candidate("m2", Some(0.5), Some(3.0), 0),
            ],
            10,
        );
        assert_eq!(hits[0].id, "m2");
    }

    #[test]
    fn ties_break_on_recency() {
        let engine = HybridSearchEngine::new();
        let hits = engine.fuse(
            vec![
                candidate("older", Some(0.5), Some(1.0), 100),
                candidate("newer", Some(0.5), Some(1.0), 200),
            ],
            10,
        );
        assert_eq!(hits[0].id, "newer");
    }

    #[test]
    fn limit_truncates() {
        let engine = HybridSearchEngine::new();
        let hits = engine.fuse(
            vec![
                candidate("a", Some(0.9), None, 0),
                candidate("b", Some(0.8), None, 0),
                candidate("c", Some(0.7), None, 0),
            ],
            2,
        );
        assert_eq!(hits.len(), 2);
    }
}
