//! The long-lived service context.
//!
//! Built once at startup and torn down at shutdown; everything the request
//! path needs hangs off it. No module-level singletons anywhere.

use std::collections::BTreeMap;
use std::sync::Arc;

use jive_domain::error::Result;
use jive_domain::ports::{EmbeddingProvider, NamespaceStore, StoreHealth};
use jive_domain::value_objects::Namespace;
use jive_providers::embedding::build_provider;
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::namespace::NamespaceManager;

/// Health snapshot returned by the companion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Embedding model identity
    pub embedding_model: String,
    /// Embedding dimension
    pub embedding_dimensions: usize,
    /// Per-namespace table counts
    pub namespaces: BTreeMap<String, StoreHealth>,
}

/// Process-wide shared state: configuration, the embedding model, the
/// namespace handle cache, and the bounded worker pool.
pub struct ServiceContext {
    config: Arc<AppConfig>,
    embedding: Arc<dyn EmbeddingProvider>,
    namespaces: NamespaceManager,
    workers: Arc<Semaphore>,
}

impl ServiceContext {
    /// Construct the context: load the embedding model, verify it with the
    /// health probe, and make sure the default namespace exists.
    ///
    /// # Errors
    ///
    /// Fails when the embedding model cannot be loaded or probed, or the
    /// default namespace cannot be initialised.
    pub async fn initialize(config: AppConfig) -> Result<Arc<Self>> {
        let config = Arc::new(config);
        let workers = Arc::new(Semaphore::new(config.worker_pool_size));
        let embedding = build_provider(&config.embedding_model_id, Arc::clone(&workers))?;
        embedding.health_check().await?;
        tracing::info!(
            model = embedding.model_id(),
            dimensions = embedding.dimensions(),
            "embedding engine ready"
        );

        let namespaces = NamespaceManager::new(Arc::clone(&config));
        namespaces.create(&Namespace::default()).await?;

        Ok(Arc::new(Self {
            config,
            embedding,
            namespaces,
            workers,
        }))
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The shared embedding engine.
    #[must_use]
    pub fn embedding(&self) -> Arc<dyn EmbeddingProvider> {
        Arc::clone(&self.embedding)
    }

    /// The namespace manager.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    /// The bounded worker pool gating blocking store/embedding work.
    #[must_use]
    pub fn workers(&self) -> Arc<Semaphore> {
        Arc::clone(&self.workers)
    }

    /// Resolve a namespace and open its store in one step.
    pub async fn store(&self, requested: Option<&str>) -> Result<(Namespace, Arc<dyn NamespaceStore>)> {
        let namespace = self.namespaces.resolve(requested)?;
        let store = self.namespaces.store_for(&namespace).await?;
        Ok((namespace, store))
    }

    /// Health report: embedding identity plus per-namespace row counts.
    pub async fn health(&self) -> Result<HealthReport> {
        let mut namespaces = BTreeMap::new();
        for name in self.namespaces.list()? {
            let namespace = Namespace::parse(&name)?;
            let store = self.namespaces.store_for(&namespace).await?;
            namespaces.insert(name, store.row_counts().await?);
        }
        Ok(HealthReport {
            embedding_model: self.embedding.model_id().to_owned(),
            embedding_dimensions: self.embedding.dimensions(),
            namespaces,
        })
    }
}
