//! Hybrid search service.
//!
//! Orchestrates the two ranking legs over the store port: cosine similarity
//! against the vector index and BM25 over the keyword fields, fused per the
//! canonical alpha = 0.7 weighting. Filters are pushed down before scoring.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use jive_domain::constants::limits::SEARCH_LIMIT_MAX;
use jive_domain::constants::search::SEARCH_CANDIDATE_MULTIPLIER;
use jive_domain::error::Result;
use jive_domain::ports::{EmbeddingProvider, NamespaceStore, SearchDoc};
use jive_domain::value_objects::{
    ContentType, SearchHit, SearchType, WorkItemFilter,
};

use crate::search::{Bm25Params, Bm25Scorer, Candidate, HybridSearchEngine};

/// Maximum preview length carried on a hit.
const PREVIEW_MAX_LEN: usize = 160;

/// Search over one namespace's corpora.
pub struct SearchService {
    store: Arc<dyn NamespaceStore>,
    embedding: Arc<dyn EmbeddingProvider>,
}

impl SearchService {
    /// Bind the service to a namespace store and embedding engine.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedding }
    }

    /// Execute a search.
    ///
    /// An empty query degrades to a recency listing over the requested
    /// corpora. `limit` is clamped to the tool cap.
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        content_types: &[ContentType],
        filter: &WorkItemFilter,
        limit: usize,
        include_scores: bool,
    ) -> Result<Vec<SearchHit>> {
        let limit = limit.clamp(1, SEARCH_LIMIT_MAX);
        let content_types = if content_types.is_empty() {
            ContentType::all()
        } else {
            content_types
        };

        let mut docs = self.store.search_documents(content_types).await?;
        if !filter.is_empty() && content_types.contains(&ContentType::WorkItem) {
            let allowed: HashSet<String> = self
                .store
                .list_work_items(filter)
                .await?
                .into_iter()
                .map(|item| item.id.to_string())
                .collect();
            docs.retain(|doc| doc.content_type != ContentType::WorkItem || allowed.contains(&doc.id));
        }

        if query.trim().is_empty() {
            return Ok(Self::recency_listing(docs, limit));
        }

        let keyword_scores: HashMap<String, f32> = if search_type == SearchType::Semantic {
            HashMap::new()
        } else {
            let scorer = Bm25Scorer::new(&docs, Bm25Params::default());
            let scores = scorer.score_all(query);
            docs.iter()
                .zip(&scores)
                .filter(|(_, score)| **score > 0.0)
                .map(|(doc, score)| (doc.id.clone(), *score))
                .collect()
        };

        let semantic_scores: HashMap<String, f32> = if search_type == SearchType::Keyword {
            HashMap::new()
        } else {
            let query_embedding = self.embedding.embed(query).await?;
            let hits = self
                .store
                .vector_search(
                    &query_embedding.vector,
                    limit * SEARCH_CANDIDATE_MULTIPLIER,
                    content_types,
                    self.embedding.model_id(),
                )
                .await?;
            hits.into_iter().map(|hit| (hit.id, hit.score)).collect()
        };

        let candidates: Vec<Candidate> = docs
            .iter()
            .filter_map(|doc| {
                let semantic = semantic_scores.get(&doc.id).copied();
                let keyword = keyword_scores.get(&doc.id).copied();
                if semantic.is_none() && keyword.is_none() {
                    return None;
                }
                Some(Candidate {
                    id: doc.id.clone(),
                    content_type: doc.content_type,
                    semantic,
                    keyword,
                    updated_at: doc.updated_at,
                })
            })
            .collect();

        // Single-leg searches score on their own leg alone; hybrid uses the
        // canonical alpha = 0.7 split.
        let engine = match search_type {
            SearchType::Semantic => HybridSearchEngine::with_weights(1.0, 0.0),
            SearchType::Keyword => HybridSearchEngine::with_weights(0.0, 1.0),
            SearchType::Hybrid => HybridSearchEngine::new(),
        };
        let fused = engine.fuse(candidates, limit);
        let by_id: HashMap<&str, &SearchDoc> =
            docs.iter().map(|doc| (doc.id.as_str(), doc)).collect();

        Ok(fused
            .into_iter()
            .filter_map(|hit| {
                by_id.get(hit.id.as_str()).map(|doc| SearchHit {
                    id: hit.id.clone(),
                    content_type: hit.content_type,
                    title: doc.title.clone(),
                    preview: preview_of(&doc.body),
                    score: include_scores.then_some(hit.score),
                    updated_at: hit.updated_at,
                })
            })
            .collect())
    }

    fn recency_listing(mut docs: Vec<SearchDoc>, limit: usize) -> Vec<SearchHit> {
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        docs.truncate(limit);
        docs.into_iter()
            .map(|doc| SearchHit {
                id: doc.id,
                content_type: doc.content_type,
                title: doc.title,
                preview: preview_of(&doc.body),
                score: None,
                updated_at: doc.updated_at,
            })
            .collect()
    }
}

fn preview_of(body: &str) -> String {
    if body.len() <= PREVIEW_MAX_LEN {
        return body.to_owned();
    }
    let mut end = PREVIEW_MAX_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(200);
        let preview = preview_of(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= PREVIEW_MAX_LEN + 3);
    }

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(preview_of("short"), "short");
    }
}
