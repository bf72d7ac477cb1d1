//! Deterministic hashing embedder.
//!
//! Feature-hashes tokens into a fixed-dimension vector. Not semantically
//! meaningful, but deterministic across processes and platforms, which makes
//! it the reference implementation for the unit-norm and determinism
//! guarantees the platform makes about every embedding provider.

use async_trait::async_trait;
use jive_domain::error::Result;
use jive_domain::ports::EmbeddingProvider;
use jive_domain::value_objects::Embedding;

use super::HASH_MODEL_ID;

/// Output dimension, matched to the default fastembed model.
pub const HASH_DIMENSIONS: usize = 384;

/// Token cap; mirrors the deterministic prefix truncation of real models.
const MAX_TOKENS: usize = 512;

/// Feature-hashing embedding provider.
#[derive(Debug, Default)]
pub struct HashingEmbeddingProvider;

impl HashingEmbeddingProvider {
    /// Create the provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn embed_one(text: &str) -> Embedding {
        let mut vector = vec![0.0f32; HASH_DIMENSIONS];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .take(MAX_TOKENS)
        {
            let h = seahash::hash(token.as_bytes());
            let bucket = (h % HASH_DIMENSIONS as u64) as usize;
            // Second hash bit decides the sign so buckets cancel rather than
            // accumulate systematic positive drift.
            let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        let mut embedding = Embedding::new(vector, HASH_MODEL_ID);
        embedding.l2_normalize();
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        HASH_DIMENSIONS
    }

    fn model_id(&self) -> &str {
        HASH_MODEL_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let provider = HashingEmbeddingProvider::new();
        let a = provider.embed("infinite render loop").await.unwrap();
        let b = provider.embed("infinite render loop").await.unwrap();
        assert_eq!(a.vector, b.vector);
        assert_eq!(a.model, HASH_MODEL_ID);
    }

    #[tokio::test]
    async fn embeddings_are_unit_norm() {
        let provider = HashingEmbeddingProvider::new();
        let e = provider.embed("react hooks patterns").await.unwrap();
        assert!((e.norm() - 1.0).abs() < 1e-6);
        assert_eq!(e.dimensions, HASH_DIMENSIONS);
    }

    #[tokio::test]
    async fn shared_tokens_raise_similarity() {
        let provider = HashingEmbeddingProvider::new();
        let loop_doc = provider
            .embed("useEffect infinite render loop")
            .await
            .unwrap();
        let close = provider.embed("infinite loop in useEffect").await.unwrap();
        let far = provider.embed("database connection pooling").await.unwrap();
        assert!(loop_doc.cosine(&close.vector) > loop_doc.cosine(&far.vector));
    }

    #[tokio::test]
    async fn health_check_passes() {
        let provider = HashingEmbeddingProvider::new();
        provider.health_check().await.unwrap();
    }
}
