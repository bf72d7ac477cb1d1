//! Domain layer for Jive.
//!
//! Core business types for the agent-driven work tracking platform: the work
//! item hierarchy, execution and progress tracking, the two memory corpora,
//! the error taxonomy with stable codes, and the ports implemented by the
//! provider and infrastructure layers.
//!
//! This crate is dependency-light by design: no I/O, no async runtime
//! specifics, no provider SDKs. Everything here is either a value, an entity,
//! a validation rule, or a boundary contract.
//!
//! ```
//! use jive_domain::entities::work_item::ItemType;
//!
//! assert!(ItemType::Epic.allows_child(ItemType::Feature));
//! assert!(!ItemType::Epic.allows_child(ItemType::Task));
//! ```

pub mod constants;
pub mod entities;
pub mod error;
mod macros;
pub mod ports;
pub mod validation;
pub mod value_objects;

pub use error::{Error, Result};
