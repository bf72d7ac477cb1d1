//! Application configuration.
//!
//! Layered with figment: built-in defaults, then an optional `jive.toml`,
//! then `JIVE_`-prefixed environment variables (highest priority). Every
//! recognised key maps one-to-one onto a field here.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use jive_domain::constants::REQUEST_TIMEOUT_DEFAULT_SECS;
use jive_domain::error::{Error, Result};
use jive_domain::value_objects::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};

/// Default embedding model loaded at startup.
pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-small-en-v1.5";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the namespaces directory
    pub data_dir: PathBuf,
    /// Fallback namespace when a request carries none
    pub default_namespace: String,
    /// Create namespaces on first reference instead of failing
    pub auto_create_namespaces: bool,
    /// Identifier of the local embedding model
    pub embedding_model_id: String,
    /// Bounded concurrency for store/embedding work
    pub worker_pool_size: usize,
    /// Default per-call timeout
    pub request_timeout_seconds: u64,
    /// Port for the network-attached transports (MCP + HTTP companion)
    pub mcp_port: u16,
    /// Cap on concurrently open namespace stores
    pub namespace_cache_size: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            default_namespace: DEFAULT_NAMESPACE.to_owned(),
            auto_create_namespaces: true,
            embedding_model_id: DEFAULT_EMBEDDING_MODEL.to_owned(),
            worker_pool_size: 4,
            request_timeout_seconds: REQUEST_TIMEOUT_DEFAULT_SECS,
            mcp_port: 8391,
            namespace_cache_size: 32,
        }
    }
}

impl AppConfig {
    /// Directory holding all namespace roots.
    #[must_use]
    pub fn namespaces_dir(&self) -> PathBuf {
        self.data_dir.join("namespaces")
    }

    /// Storage root of one namespace.
    #[must_use]
    pub fn namespace_root(&self, namespace: &str) -> PathBuf {
        self.namespaces_dir().join(namespace)
    }

    /// Load configuration: defaults < `jive.toml` (optional) < `JIVE_*` env.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when extraction or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        figment = match config_path {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment.merge(Toml::file("jive.toml")),
        };
        let config: Self = figment
            .merge(Env::prefixed("JIVE_"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.worker_pool_size == 0 {
            return Err(Error::config("worker_pool_size must be at least 1"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(Error::config("request_timeout_seconds must be at least 1"));
        }
        jive_domain::value_objects::Namespace::parse(&self.default_namespace)
            .map_err(|_| Error::config(format!(
                "default_namespace '{}' is not a valid namespace name",
                self.default_namespace
            )))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.default_namespace, "default");
        assert!(config.auto_create_namespaces);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config = AppConfig {
            worker_pool_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn reserved_default_namespace_is_rejected() {
        let config = AppConfig {
            default_namespace: "admin".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn namespace_root_nests_under_namespaces() {
        let config = AppConfig::default();
        assert!(
            config
                .namespace_root("alpha")
                .ends_with("data/namespaces/alpha")
        );
    }
}
