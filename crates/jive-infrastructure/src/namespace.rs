//! Namespace management: resolution, lifecycle, handle caching, and the
//! per-namespace write lock.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use jive_domain::error::{Error, Result};
use jive_domain::ports::NamespaceStore;
use jive_domain::value_objects::{DEFAULT_NAMESPACE, Namespace};
use jive_providers::store::SqliteNamespaceStore;
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppConfig;

/// Resolves namespaces, owns the handle cache, and hands out write locks.
///
/// Handles are opened lazily and evicted LRU-style once the cache cap is
/// reached, bounding concurrently open stores. Write locks serialise all
/// mutating operations within one namespace; reads bypass them.
pub struct NamespaceManager {
    config: Arc<AppConfig>,
    handles: Cache<Namespace, Arc<SqliteNamespaceStore>>,
    locks: DashMap<Namespace, Arc<Mutex<()>>>,
}

impl NamespaceManager {
    /// Build the manager for a configuration.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        let handles = Cache::builder()
            .max_capacity(config.namespace_cache_size)
            .build();
        Self {
            config,
            handles,
            locks: DashMap::new(),
        }
    }

    /// Resolve the effective namespace for a request.
    ///
    /// Order: request value, then the configured default (which environment
    /// variables may override), then `default`.
    pub fn resolve(&self, requested: Option<&str>) -> Result<Namespace> {
        match requested {
            Some(name) if !name.trim().is_empty() => Namespace::parse(name.trim()),
            _ => Namespace::parse(&self.config.default_namespace)
                .or_else(|_| Namespace::parse(DEFAULT_NAMESPACE)),
        }
    }

    /// All namespaces on disk, `default` always listed first.
    pub fn list(&self) -> Result<Vec<String>> {
        let dir = self.config.namespaces_dir();
        let mut names = vec![DEFAULT_NAMESPACE.to_owned()];
        if dir.exists() {
            let entries = std::fs::read_dir(&dir).map_err(|e| {
                Error::io_with_source(format!("cannot read {}", dir.display()), e)
            })?;
            for entry in entries.filter_map(std::result::Result::ok) {
                if !entry.path().is_dir() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if name != DEFAULT_NAMESPACE && Namespace::parse(&name).is_ok() {
                    names.push(name);
                }
            }
        }
        names[1..].sort();
        Ok(names)
    }

    /// Materialise a namespace root. Idempotent.
    pub async fn create(&self, namespace: &Namespace) -> Result<()> {
        self.open(namespace).await?;
        Ok(())
    }

    /// Delete a namespace and everything it owns. The default namespace is
    /// not deletable.
    pub async fn delete(&self, namespace: &Namespace) -> Result<()> {
        if namespace.as_str() == DEFAULT_NAMESPACE {
            return Err(Error::validation("the default namespace cannot be deleted"));
        }
        let _guard = self.write_lock(namespace).await;
        self.handles.invalidate(namespace).await;
        let root = self.root_of(namespace);
        if root.exists() {
            std::fs::remove_dir_all(&root).map_err(|e| {
                Error::io_with_source(format!("cannot remove {}", root.display()), e)
            })?;
        }
        self.locks.remove(namespace);
        tracing::info!(namespace = %namespace, "namespace deleted");
        Ok(())
    }

    /// Store handle for a namespace, opening it if needed.
    ///
    /// Unknown namespaces are auto-initialised when the configuration allows
    /// it, and rejected with [`Error::NamespaceUnknown`] otherwise.
    pub async fn store_for(&self, namespace: &Namespace) -> Result<Arc<dyn NamespaceStore>> {
        let root = self.root_of(namespace);
        if !root.exists()
            && !self.config.auto_create_namespaces
            && namespace.as_str() != DEFAULT_NAMESPACE
        {
            return Err(Error::NamespaceUnknown {
                name: namespace.to_string(),
            });
        }
        let store = self.open(namespace).await?;
        Ok(store)
    }

    /// Acquire the namespace write lock. For operations spanning multiple
    /// namespaces, acquire locks in lexicographic namespace order.
    pub async fn write_lock(&self, namespace: &Namespace) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(namespace.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    async fn open(&self, namespace: &Namespace) -> Result<Arc<SqliteNamespaceStore>> {
        let root = self.root_of(namespace);
        let owned = namespace.clone();
        self.handles
            .try_get_with(namespace.clone(), async move {
                SqliteNamespaceStore::open(owned, &root).await.map(Arc::new)
            })
            .await
            .map_err(|e: Arc<Error>| Error::store(format!("cannot open namespace store: {e}")))
    }

    fn root_of(&self, namespace: &Namespace) -> PathBuf {
        self.config.namespace_root(namespace.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir, auto_create: bool) -> NamespaceManager {
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            auto_create_namespaces: auto_create,
            ..Default::default()
        };
        NamespaceManager::new(Arc::new(config))
    }

    #[tokio::test]
    async fn resolution_order_prefers_the_request() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir, true);
        assert_eq!(mgr.resolve(Some("alpha")).unwrap().as_str(), "alpha");
        assert_eq!(mgr.resolve(None).unwrap().as_str(), "default");
        assert_eq!(mgr.resolve(Some("  ")).unwrap().as_str(), "default");
    }

    #[tokio::test]
    async fn invalid_request_namespace_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir, true);
        assert!(mgr.resolve(Some("Not Valid")).is_err());
        assert!(mgr.resolve(Some("admin")).is_err());
    }

    #[tokio::test]
    async fn unknown_namespace_fails_without_auto_create() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir, false);
        let ns = Namespace::parse("ghost").unwrap();
        assert!(matches!(
            mgr.store_for(&ns).await,
            Err(Error::NamespaceUnknown { .. })
        ));
    }

    #[tokio::test]
    async fn auto_create_materialises_the_root() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir, true);
        let ns = Namespace::parse("fresh").unwrap();
        mgr.store_for(&ns).await.unwrap();
        assert!(dir.path().join("namespaces/fresh").exists());
        assert!(mgr.list().unwrap().contains(&"fresh".to_owned()));
    }

    #[tokio::test]
    async fn list_puts_default_first() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir, true);
        for name in ["zeta", "alpha"] {
            mgr.create(&Namespace::parse(name).unwrap()).await.unwrap();
        }
        let names = mgr.list().unwrap();
        assert_eq!(names[0], "default");
        assert_eq!(&names[1..], ["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn default_namespace_cannot_be_deleted() {
        let dir = TempDir::new().unwrap();
        let mgr = manager(&dir, true);
        assert!(mgr.delete(&Namespace::default()).await.is_err());
    }
}
