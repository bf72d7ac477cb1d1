//! Error handling types
//!
//! Every variant carries a stable machine-readable code (see [`Error::code`])
//! that the tool layer surfaces in its response envelope. Messages are for
//! humans and may change; codes may not.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Jive platform
#[derive(Error, Debug)]
pub enum Error {
    // ------------------------------------------------------------------
    // Input errors
    // ------------------------------------------------------------------
    /// A field failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure
        message: String,
        /// The offending field, when known
        field: Option<String>,
    },

    /// Namespace name violates the pattern or is reserved
    #[error("Invalid namespace: {name}")]
    NamespaceInvalid {
        /// The rejected namespace name
        name: String,
    },

    /// Slug violates the allowed pattern
    #[error("Invalid slug: {slug}")]
    SlugInvalid {
        /// The rejected slug
        slug: String,
    },

    /// Slug already exists in the namespace
    #[error("Duplicate slug: {slug}")]
    SlugDuplicate {
        /// The conflicting slug
        slug: String,
    },

    /// The requested action is not part of the tool's action set
    #[error("Unknown action '{action}' for tool '{tool}'")]
    UnknownAction {
        /// The rejected action name
        action: String,
        /// The tool that received it
        tool: String,
    },

    /// The requested tool does not exist
    #[error("Unknown tool: {tool}")]
    UnknownTool {
        /// The rejected tool name
        tool: String,
    },

    // ------------------------------------------------------------------
    // State errors
    // ------------------------------------------------------------------
    /// Resource not found
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Delete refused because the item still has children
    #[error("Work item {id} has {child_count} children; pass delete_children to remove them")]
    HasChildren {
        /// The item that was targeted for deletion
        id: String,
        /// Number of direct children found
        child_count: usize,
    },

    /// Reorder list does not cover the full sibling set
    #[error("Reorder list is missing {} sibling(s)", missing.len())]
    IncompleteSiblingSet {
        /// Sibling ids absent from the submitted list
        missing: Vec<String>,
    },

    /// Swap requires both items to share a parent
    #[error("Cannot swap items with different parents")]
    DifferentParents,

    /// Adding the edge would close a cycle
    #[error("Cycle detected: adding edge {from} -> {to}")]
    CycleDetected {
        /// Source of the offending edge
        from: String,
        /// Target of the offending edge
        to: String,
    },

    /// Parent/child type pairing violates the hierarchy rule
    #[error("Hierarchy violation: {parent_type} cannot contain {child_type}")]
    HierarchyViolation {
        /// Type of the would-be parent
        parent_type: String,
        /// Type of the would-be child
        child_type: String,
    },

    /// A reference points at an id outside the current namespace
    #[error("Cross-namespace reference: {id}")]
    CrossNamespaceReference {
        /// The foreign id
        id: String,
    },

    // ------------------------------------------------------------------
    // Readiness errors
    // ------------------------------------------------------------------
    /// Execution preconditions failed
    #[error("Execution validation failed: {}", issues.join("; "))]
    ValidationFailed {
        /// The readiness issues, one per failed check
        issues: Vec<String>,
    },

    /// One or more dependencies are not completed
    #[error("Dependencies not satisfied: {}", missing.join(", "))]
    DependencyNotSatisfied {
        /// Ids of the unmet dependencies
        missing: Vec<String>,
    },

    // ------------------------------------------------------------------
    // Resource errors
    // ------------------------------------------------------------------
    /// Namespace does not exist and auto-creation is disabled
    #[error("Unknown namespace: {name}")]
    NamespaceUnknown {
        /// The unresolved namespace name
        name: String,
    },

    /// The operation exceeded its deadline
    #[error("Operation timed out after {seconds}s")]
    Timeout {
        /// The configured timeout
        seconds: u64,
    },

    /// The operation was cancelled by the transport
    #[error("Operation cancelled")]
    Cancelled,

    /// Sync detected a conflict it could not resolve
    #[error("Sync conflict: {path}")]
    Conflict {
        /// The conflicting file path
        path: String,
    },

    // ------------------------------------------------------------------
    // Internal errors
    // ------------------------------------------------------------------
    /// Persistent store operation error
    #[error("Store error: {message}")]
    Store {
        /// Description of the store failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding provider operation error
    #[error("Embedding provider error: {message}")]
    Embedding {
        /// Description of the embedding failure
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Stable machine-readable code for the response envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::NamespaceInvalid { .. } => "NamespaceInvalid",
            Self::SlugInvalid { .. } => "SlugInvalid",
            Self::SlugDuplicate { .. } => "SlugDuplicate",
            Self::UnknownAction { .. } => "UnknownAction",
            Self::UnknownTool { .. } => "UnknownTool",
            Self::NotFound { .. } => "NotFound",
            Self::HasChildren { .. } => "HasChildren",
            Self::IncompleteSiblingSet { .. } => "IncompleteSiblingSet",
            Self::DifferentParents => "DifferentParents",
            Self::CycleDetected { .. } => "CycleDetected",
            Self::HierarchyViolation { .. } => "HierarchyViolation",
            Self::CrossNamespaceReference { .. } => "CrossNamespaceReference",
            Self::ValidationFailed { .. } => "ValidationFailed",
            Self::DependencyNotSatisfied { .. } => "DependencyNotSatisfied",
            Self::NamespaceUnknown { .. } => "NamespaceUnknown",
            Self::Timeout { .. } => "Timeout",
            Self::Cancelled => "Cancelled",
            Self::Conflict { .. } => "Conflict",
            Self::Store { .. } => "StoreError",
            Self::Embedding { .. } => "EmbeddingError",
            Self::Io { .. } | Self::Json { .. } => "IOError",
            Self::Config { .. } | Self::Internal { .. } => "InternalError",
        }
    }

    /// Structured context for the `details` field of the error envelope.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation {
                field: Some(field), ..
            } => Some(serde_json::json!({ "field": field })),
            Self::HasChildren { id, child_count } => {
                Some(serde_json::json!({ "id": id, "child_count": child_count }))
            }
            Self::IncompleteSiblingSet { missing } => {
                Some(serde_json::json!({ "missing": missing }))
            }
            Self::CycleDetected { from, to } => {
                Some(serde_json::json!({ "edge": { "from": from, "to": to } }))
            }
            Self::HierarchyViolation {
                parent_type,
                child_type,
            } => Some(serde_json::json!({
                "parent_type": parent_type,
                "child_type": child_type,
            })),
            Self::ValidationFailed { issues } => Some(serde_json::json!({ "issues": issues })),
            Self::DependencyNotSatisfied { missing } => {
                Some(serde_json::json!({ "missing_dependencies": missing }))
            }
            _ => None,
        }
    }

    /// True for transient store/I-O failures the adapter may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::Io { .. })
    }
}

// Basic error creation methods
impl Error {
    /// Create a validation error without field context
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error naming the offending field
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an embedding provider error
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Store and I/O error creation methods
impl Error {
    /// Create a store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error with source
    pub fn store_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::validation("x").code(), "ValidationError");
        assert_eq!(Error::Cancelled.code(), "Cancelled");
        assert_eq!(
            Error::CycleDetected {
                from: "a".to_owned(),
                to: "b".to_owned(),
            }
            .code(),
            "CycleDetected"
        );
    }

    #[test]
    fn cycle_details_carry_the_edge() {
        let err = Error::CycleDetected {
            from: "c".to_owned(),
            to: "a".to_owned(),
        };
        let details = err.details().unwrap();
        assert_eq!(details["edge"]["from"], "c");
        assert_eq!(details["edge"]["to"], "a");
    }

    #[test]
    fn retryable_covers_store_and_io_only() {
        assert!(Error::store("boom").is_retryable());
        assert!(Error::io("disk").is_retryable());
        assert!(!Error::validation("nope").is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }
}
