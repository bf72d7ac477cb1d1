//! Search and BM25 algorithmic constants -- Single Source of Truth
//!
//! These are mathematical/algorithmic invariants, NOT operational config.

/// BM25 k1 parameter (term frequency saturation)
pub const BM25_K1: f32 = 1.2;
/// BM25 b parameter (document length normalization)
pub const BM25_B: f32 = 0.75;
/// BM25 token minimum length filter
pub const BM25_TOKEN_MIN_LENGTH: usize = 2;

/// Semantic weight in hybrid fusion (alpha)
pub const HYBRID_SEMANTIC_WEIGHT: f32 = 0.7;
/// Keyword weight in hybrid fusion (1 - alpha)
pub const HYBRID_KEYWORD_WEIGHT: f32 = 1.0 - HYBRID_SEMANTIC_WEIGHT;

/// Candidate over-fetch multiplier before fusion and filtering
pub const SEARCH_CANDIDATE_MULTIPLIER: usize = 3;
