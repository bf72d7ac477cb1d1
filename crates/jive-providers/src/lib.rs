//! Provider implementations for Jive.
//!
//! Concrete implementations of the domain ports: local embedding engines and
//! the SQLite-backed namespace store. Everything here is swappable behind the
//! port traits; nothing above this crate knows which provider is wired in.

pub mod embedding;
pub mod store;
