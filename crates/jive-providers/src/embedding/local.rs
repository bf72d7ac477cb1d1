//! Local ONNX embedding provider backed by fastembed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use jive_domain::error::{Error, Result};
use jive_domain::ports::EmbeddingProvider;
use jive_domain::value_objects::Embedding;
use tokio::sync::Semaphore;

/// Default local model.
pub const DEFAULT_MODEL_ID: &str = "BAAI/bge-small-en-v1.5";

fn resolve_model(model_id: &str) -> Result<(EmbeddingModel, usize)> {
    match model_id {
        "BAAI/bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        "BAAI/bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
        "sentence-transformers/all-MiniLM-L6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        other => Err(Error::embedding(format!(
            "unsupported embedding model: {other}"
        ))),
    }
}

/// In-process embedding engine.
///
/// Inference is CPU-bound, so every call moves to the blocking pool and is
/// gated by the shared worker semaphore to keep the request loop responsive.
pub struct LocalEmbeddingProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_id: String,
    dimensions: usize,
    workers: Arc<Semaphore>,
}

impl LocalEmbeddingProvider {
    /// Load the named model and wrap it behind the worker semaphore.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] when the model name is unknown or the
    /// ONNX runtime fails to initialise it.
    pub fn load(model_id: &str, workers: Arc<Semaphore>) -> Result<Self> {
        let (model_kind, dimensions) = resolve_model(model_id)?;
        let model = TextEmbedding::try_new(
            InitOptions::new(model_kind).with_show_download_progress(false),
        )
        .map_err(|e| Error::embedding(e.to_string()))?;
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_id: model_id.to_owned(),
            dimensions,
            workers,
        })
    }
}

impl std::fmt::Debug for LocalEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbeddingProvider")
            .field("model_id", &self.model_id)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let _permit = self
            .workers
            .acquire()
            .await
            .map_err(|_| Error::Cancelled)?;

        let model = Arc::clone(&self.model);
        let model_id = self.model_id.clone();
        let inputs = texts.to_vec();
        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| Error::embedding("embedding model mutex poisoned"))?;
            model
                .embed(inputs, None)
                .map_err(|e| Error::embedding(e.to_string()))
        })
        .await
        .map_err(|e| Error::internal(format!("embedding task panicked: {e}")))??;

        Ok(vectors
            .into_iter()
            .map(|vector| {
                let mut embedding = Embedding::new(vector, model_id.clone());
                embedding.l2_normalize();
                embedding
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
