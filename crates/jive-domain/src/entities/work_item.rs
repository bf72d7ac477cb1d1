//! Work item entity: the primary unit of the five-level hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::WorkItemId;

/// Level of a work item in the hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Top-level strategic container
    Initiative,
    /// Major body of work under an initiative
    Epic,
    /// Deliverable capability under an epic
    Feature,
    /// User-facing slice under a feature
    Story,
    /// Leaf unit of work under a story
    Task,
}

impl ItemType {
    /// String form used in tool payloads and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiative => "initiative",
            Self::Epic => "epic",
            Self::Feature => "feature",
            Self::Story => "story",
            Self::Task => "task",
        }
    }

    /// The single child type this level may contain, if any.
    ///
    /// Encodes the hierarchy rule: initiative -> epic -> feature -> story ->
    /// task, with task as the leaf.
    #[must_use]
    pub fn allowed_child(&self) -> Option<Self> {
        match self {
            Self::Initiative => Some(Self::Epic),
            Self::Epic => Some(Self::Feature),
            Self::Feature => Some(Self::Story),
            Self::Story => Some(Self::Task),
            Self::Task => None,
        }
    }

    /// Whether `child` may be nested directly under this type.
    #[must_use]
    pub fn allows_child(&self, child: Self) -> bool {
        self.allowed_child() == Some(child)
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initiative" => Ok(Self::Initiative),
            "epic" => Ok(Self::Epic),
            "feature" => Ok(Self::Feature),
            "story" => Ok(Self::Story),
            "task" => Ok(Self::Task),
            _ => Err(format!("Unknown item type: {s}")),
        }
    }
}

/// Lifecycle status of a work item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Created but not begun
    #[default]
    NotStarted,
    /// Actively being worked
    InProgress,
    /// Finished
    Completed,
    /// Cannot proceed
    Blocked,
    /// Abandoned
    Cancelled,
}

impl ItemStatus {
    /// String form used in tool payloads and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal states admit no further execution.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "blocked" => Ok(Self::Blocked),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown item status: {s}")),
        }
    }
}

/// Priority of a work item. Ordering is ascending urgency, so sorting
/// descending puts `critical` first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Nice to have
    Low,
    /// Standard priority
    #[default]
    Medium,
    /// Needed soon
    High,
    /// Drop everything
    Critical,
}

impl Priority {
    /// String form used in tool payloads and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("Unknown priority: {s}")),
        }
    }
}

/// Author-judged complexity of a work item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Well understood, no unknowns
    Simple,
    /// Some unknowns
    Moderate,
    /// Significant unknowns or cross-cutting impact
    Complex,
}

impl Complexity {
    /// String form used in tool payloads and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            _ => Err(format!("Unknown complexity: {s}")),
        }
    }
}

/// A node in the work item hierarchy.
///
/// `parent_id` and `dependencies` may only reference items in the same
/// namespace; both graphs are kept acyclic by the hierarchy engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Server-assigned immutable id
    pub id: WorkItemId,
    /// Hierarchy level
    pub item_type: ItemType,
    /// Short title, 1-200 chars
    pub title: String,
    /// Long-form description, up to 10k chars
    #[serde(default)]
    pub description: String,
    /// Lifecycle status
    #[serde(default)]
    pub status: ItemStatus,
    /// Priority, defaults to medium
    #[serde(default)]
    pub priority: Priority,
    /// Optional complexity judgement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    /// Parent item, None for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<WorkItemId>,
    /// Dense position among siblings under `parent_id`
    pub sequence_order: i64,
    /// Ordered acceptance criteria; required non-empty for execution
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Free-form tags used for filtering
    #[serde(default)]
    pub context_tags: Vec<String>,
    /// Items this item depends on (directed edges, acyclic)
    #[serde(default)]
    pub dependencies: Vec<WorkItemId>,
    /// Short free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Author-set completion for leaves; derived for internal nodes
    #[serde(default)]
    pub progress_percentage: u8,
    /// Optional due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp (UTC)
    pub updated_at: DateTime<Utc>,
}

impl WorkItem {
    /// Text that feeds the embedding pipeline: title, description, criteria.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        let mut text = self.title.clone();
        if !self.description.is_empty() {
            text.push('\n');
            text.push_str(&self.description);
        }
        for criterion in &self.acceptance_criteria {
            text.push('\n');
            text.push_str(criterion);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn hierarchy_rule_is_a_strict_chain() {
        assert!(ItemType::Initiative.allows_child(ItemType::Epic));
        assert!(ItemType::Epic.allows_child(ItemType::Feature));
        assert!(ItemType::Feature.allows_child(ItemType::Story));
        assert!(ItemType::Story.allows_child(ItemType::Task));
        assert_eq!(ItemType::Task.allowed_child(), None);
        assert!(!ItemType::Epic.allows_child(ItemType::Task));
        assert!(!ItemType::Initiative.allows_child(ItemType::Initiative));
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn status_round_trips_and_knows_terminal_states() {
        for s in ["not_started", "in_progress", "completed", "blocked", "cancelled"] {
            assert_eq!(ItemStatus::from_str(s).unwrap().as_str(), s);
        }
        assert!(ItemStatus::Completed.is_terminal());
        assert!(ItemStatus::Cancelled.is_terminal());
        assert!(!ItemStatus::Blocked.is_terminal());
    }
}
