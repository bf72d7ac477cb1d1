//! Domain port interfaces.
//!
//! Ports define the contracts that providers and infrastructure implement.
//! High-level modules depend on these traits, never on concrete providers.

mod providers;

pub use providers::{
    EmbeddingProvider, NamespaceStore, SearchDoc, StoreHealth, VectorHit, WriteBatch, WriteOp,
};
