//! Memory entities: the architecture and troubleshoot corpora.
//!
//! Memory items are independent of the work item hierarchy; deleting work
//! items never cascades into memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MemoryItemId, Slug};

/// Which memory corpus an item belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Reusable design specs
    Architecture,
    /// Problem/solution entries
    Troubleshoot,
}

impl MemoryType {
    /// String form used in tool payloads, storage, and file names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Troubleshoot => "troubleshoot",
        }
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "architecture" => Ok(Self::Architecture),
            "troubleshoot" => Ok(Self::Troubleshoot),
            _ => Err(format!("Unknown memory type: {s}")),
        }
    }
}

/// A reusable design spec in architecture memory.
///
/// `children_slugs` and `related_slugs` may reference slugs that do not exist
/// yet; import surfaces those as warnings, never errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureItem {
    /// Server-assigned id
    pub id: MemoryItemId,
    /// Unique-per-namespace human-readable key
    pub slug: Slug,
    /// Short title, up to 200 chars
    pub title: String,
    /// Markdown requirements body, up to 10k chars
    pub ai_requirements: String,
    /// Situations in which an agent should reach for this spec
    #[serde(default)]
    pub ai_when_to_use: Vec<String>,
    /// Retrieval keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Slugs of finer-grained child specs
    #[serde(default)]
    pub children_slugs: Vec<String>,
    /// Slugs of related specs
    #[serde(default)]
    pub related_slugs: Vec<String>,
    /// Epics this spec is linked to
    #[serde(default)]
    pub linked_epic_ids: Vec<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Revision counter, bumped on every update
    pub version: u32,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp (UTC)
    pub updated_at: DateTime<Utc>,
}

/// A problem/solution entry in troubleshoot memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroubleshootItem {
    /// Server-assigned id
    pub id: MemoryItemId,
    /// Unique-per-namespace human-readable key
    pub slug: Slug,
    /// Short title, up to 200 chars
    pub title: String,
    /// Problem statements this entry addresses
    pub ai_use_case: Vec<String>,
    /// Markdown solutions body
    pub ai_solutions: String,
    /// Retrieval keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Times the entry was surfaced to an agent
    #[serde(default)]
    pub usage_count: u64,
    /// Times the surfaced entry solved the problem
    #[serde(default)]
    pub success_count: u64,
    /// Revision counter, bumped on every update
    pub version: u32,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp (UTC)
    pub updated_at: DateTime<Utc>,
}

/// Either kind of memory item, the unit the memory tool operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "memory_type", rename_all = "snake_case")]
pub enum MemoryItem {
    /// Architecture memory entry
    Architecture(ArchitectureItem),
    /// Troubleshoot memory entry
    Troubleshoot(TroubleshootItem),
}

impl MemoryItem {
    /// The corpus this item belongs to.
    #[must_use]
    pub fn memory_type(&self) -> MemoryType {
        match self {
            Self::Architecture(_) => MemoryType::Architecture,
            Self::Troubleshoot(_) => MemoryType::Troubleshoot,
        }
    }

    /// Server-assigned id.
    #[must_use]
    pub fn id(&self) -> MemoryItemId {
        match self {
            Self::Architecture(item) => item.id,
            Self::Troubleshoot(item) => item.id,
        }
    }

    /// Namespace-unique slug.
    #[must_use]
    pub fn slug(&self) -> &Slug {
        match self {
            Self::Architecture(item) => &item.slug,
            Self::Troubleshoot(item) => &item.slug,
        }
    }

    /// Item title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Architecture(item) => &item.title,
            Self::Troubleshoot(item) => &item.title,
        }
    }

    /// Last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Self::Architecture(item) => item.updated_at,
            Self::Troubleshoot(item) => item.updated_at,
        }
    }

    /// Text that feeds the embedding pipeline.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        match self {
            Self::Architecture(item) => {
                let mut text = item.title.clone();
                for use_case in &item.ai_when_to_use {
                    text.push('\n');
                    text.push_str(use_case);
                }
                if !item.keywords.is_empty() {
                    text.push('\n');
                    text.push_str(&item.keywords.join(" "));
                }
                text.push('\n');
                text.push_str(&item.ai_requirements);
                text
            }
            Self::Troubleshoot(item) => {
                let mut text = item.title.clone();
                for problem in &item.ai_use_case {
                    text.push('\n');
                    text.push_str(problem);
                }
                if !item.keywords.is_empty() {
                    text.push('\n');
                    text.push_str(&item.keywords.join(" "));
                }
                text.push('\n');
                text.push_str(&item.ai_solutions);
                text
            }
        }
    }
}
