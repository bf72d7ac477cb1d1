//! Listing, filtering, and traversal value objects.

use serde::{Deserialize, Serialize};

use crate::entities::work_item::{ItemStatus, ItemType, Priority};
use crate::value_objects::ids::WorkItemId;

/// Sort key for work item listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Creation timestamp
    CreatedAt,
    /// Last update timestamp
    UpdatedAt,
    /// Priority (critical first)
    Priority,
    /// Position among siblings
    #[default]
    SequenceOrder,
    /// Lexicographic title
    Title,
}

impl SortBy {
    /// String form used in tool payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Priority => "priority",
            Self::SequenceOrder => "sequence_order",
            Self::Title => "title",
        }
    }
}

/// Relationship walked by the hierarchy tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Direct and transitive children via the parent edge
    Children,
    /// Ancestors via the parent edge
    Parents,
    /// Items this item depends on
    Dependencies,
    /// Items depending on this item
    Dependents,
    /// Full subtree with optional dependency annotations
    FullHierarchy,
}

/// Filter predicate for work item listings; all present fields must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkItemFilter {
    /// Restrict to one item type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    /// Restrict to one status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    /// Restrict to one priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Restrict to direct children of this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<WorkItemId>,
    /// Require a non-empty intersection with the item's context tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl WorkItemFilter {
    /// True when no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_type.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.parent_id.is_none()
            && self.tags.is_empty()
    }
}

/// Pagination window for list operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Page {
    /// Maximum rows to return
    pub limit: usize,
    /// Rows to skip
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// A page of results plus the continuation flag.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    /// Items in this page
    pub items: Vec<T>,
    /// Total matching rows before pagination
    pub total: usize,
    /// Whether more rows exist past this page
    pub has_more: bool,
}

impl<T> ListPage<T> {
    /// Build a page from a full, already-filtered row set.
    #[must_use]
    pub fn paginate(mut items: Vec<T>, page: Page) -> Self {
        let total = items.len();
        let end = (page.offset + page.limit).min(total);
        let start = page.offset.min(total);
        items.truncate(end);
        let items = items.split_off(start);
        Self {
            items,
            total,
            has_more: end < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_reports_has_more() {
        let page = ListPage::paginate(vec![1, 2, 3, 4, 5], Page {
            limit: 2,
            offset: 2,
        });
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert!(page.has_more);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = ListPage::paginate(vec![1, 2], Page {
            limit: 10,
            offset: 5,
        });
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }
}
