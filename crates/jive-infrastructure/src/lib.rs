//! Infrastructure layer for Jive.
//!
//! Configuration loading, logging setup, namespace lifecycle with the LRU
//! handle cache and per-namespace write locks, and the long-lived service
//! context the server layers are wired from.

pub mod config;
pub mod context;
pub mod logging;
pub mod namespace;

pub use config::AppConfig;
pub use context::{HealthReport, ServiceContext};
pub use namespace::NamespaceManager;
