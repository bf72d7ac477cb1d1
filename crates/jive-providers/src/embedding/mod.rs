//! Embedding providers.
//!
//! Two implementations of the [`EmbeddingProvider`] port: a local ONNX model
//! via fastembed (the default) and a deterministic hashing embedder used for
//! tests and offline deployments. Both produce unit-L2 vectors of the same
//! dimension so a store indexed by one can be probed by the other's tests.

mod hashing;
mod local;

use std::sync::Arc;

use jive_domain::error::{Error, Result};
use jive_domain::ports::EmbeddingProvider;
use tokio::sync::Semaphore;

pub use hashing::HashingEmbeddingProvider;
pub use local::LocalEmbeddingProvider;

/// Model id of the deterministic hashing embedder.
pub const HASH_MODEL_ID: &str = "hash-v1";

/// Build an embedding provider from the configured model id.
///
/// `hash-v1` selects the hashing embedder; anything else is resolved as a
/// fastembed model name. The worker semaphore bounds concurrent inference.
///
/// # Errors
///
/// Returns [`Error::Embedding`] when the model name is unknown or the model
/// fails to load.
pub fn build_provider(
    model_id: &str,
    workers: Arc<Semaphore>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    if model_id == HASH_MODEL_ID {
        return Ok(Arc::new(HashingEmbeddingProvider::new()));
    }
    let provider = LocalEmbeddingProvider::load(model_id, workers)
        .map_err(|e| Error::embedding(format!("failed to load model '{model_id}': {e}")))?;
    Ok(Arc::new(provider))
}
