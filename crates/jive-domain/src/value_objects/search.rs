//! Search-related value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a search query is executed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Embedding similarity only
    Semantic,
    /// BM25 keyword scoring only
    Keyword,
    /// Fused semantic + keyword ranking
    #[default]
    Hybrid,
}

impl SearchType {
    /// String form used in tool payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Keyword => "keyword",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::str::FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic" => Ok(Self::Semantic),
            "keyword" => Ok(Self::Keyword),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("Unknown search type: {s}")),
        }
    }
}

/// Which corpora a search covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Work item hierarchy rows
    WorkItem,
    /// Architecture memory entries
    Architecture,
    /// Troubleshoot memory entries
    Troubleshoot,
}

impl ContentType {
    /// String form used in tool payloads and the search index.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkItem => "work_item",
            Self::Architecture => "architecture",
            Self::Troubleshoot => "troubleshoot",
        }
    }

    /// All content types, the default search scope.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::WorkItem, Self::Architecture, Self::Troubleshoot]
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work_item" => Ok(Self::WorkItem),
            "architecture" => Ok(Self::Architecture),
            "troubleshoot" => Ok(Self::Troubleshoot),
            _ => Err(format!("Unknown content type: {s}")),
        }
    }
}

/// One ranked result from the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Entity id (work item or memory item)
    pub id: String,
    /// Corpus the hit came from
    pub content_type: ContentType,
    /// Title of the entity
    pub title: String,
    /// Short content preview
    pub preview: String,
    /// Fused score in [0, 1]; present when scores were requested
    pub score: Option<f32>,
    /// Last modification time, used as the ranking tie-break
    pub updated_at: DateTime<Utc>,
}
