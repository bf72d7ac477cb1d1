//! Application layer for Jive.
//!
//! Use-case services orchestrating the domain over the provider ports: work
//! item CRUD, hierarchy and ordering, hybrid search, progress and execution
//! tracking, the memory corpora, the Markdown codec, and file sync. Services
//! are cheap to construct and are built per request for the resolved
//! namespace; long-lived state (stores, the embedding model) lives behind
//! the injected ports.

pub mod codec;
pub mod search;
pub mod sync_service;
pub mod use_cases;

pub use sync_service::{SyncReport, SyncService};
