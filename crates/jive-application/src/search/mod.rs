//! Keyword scoring and hybrid fusion.

mod bm25;
mod hybrid;

pub use bm25::{Bm25Params, Bm25Scorer};
pub use hybrid::{Candidate, FusedHit, HybridSearchEngine};
