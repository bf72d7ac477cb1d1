//! Field validators and draft payloads.
//!
//! Drafts are the validated inputs the services accept before an entity is
//! constructed. Validation happens here, once, so every caller (MCP tools,
//! HTTP companion, import) goes through the same rules.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::constants::limits::{CRITERION_MAX_LEN, CRITERION_MIN_LEN, PROGRESS_MAX};
use crate::entities::work_item::{Complexity, ItemStatus, ItemType, Priority};
use crate::error::{Error, Result};
use crate::value_objects::WorkItemId;

fn criteria_entries_in_bounds(criteria: &Vec<String>) -> std::result::Result<(), ValidationError> {
    for criterion in criteria {
        let len = criterion.chars().count();
        if len < CRITERION_MIN_LEN || len > CRITERION_MAX_LEN {
            return Err(ValidationError::new("criterion_length"));
        }
    }
    Ok(())
}

/// Validated input for creating a work item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkItemDraft {
    /// Hierarchy level of the new item
    pub item_type: ItemType,
    /// Title, 1-200 chars
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Description, up to 10k chars
    #[serde(default)]
    #[validate(length(max = 10_000))]
    pub description: String,
    /// Initial status
    #[serde(default)]
    pub status: ItemStatus,
    /// Priority, defaults to medium
    #[serde(default)]
    pub priority: Priority,
    /// Optional complexity judgement
    #[serde(default)]
    pub complexity: Option<Complexity>,
    /// Parent item id
    #[serde(default)]
    pub parent_id: Option<WorkItemId>,
    /// Acceptance criteria, each 5-500 chars, at most 10
    #[serde(default)]
    #[validate(length(max = 10), custom(function = criteria_entries_in_bounds))]
    pub acceptance_criteria: Vec<String>,
    /// Context tags
    #[serde(default)]
    pub context_tags: Vec<String>,
    /// Dependency edges to peer items
    #[serde(default)]
    pub dependencies: Vec<WorkItemId>,
    /// Notes, up to 1000 chars
    #[serde(default)]
    #[validate(length(max = 1_000))]
    pub notes: Option<String>,
    /// Optional due date (RFC 3339)
    #[serde(default)]
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Validated field updates for a work item; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WorkItemPatch {
    /// New title
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New description
    #[validate(length(max = 10_000))]
    pub description: Option<String>,
    /// New status
    pub status: Option<ItemStatus>,
    /// New priority
    pub priority: Option<Priority>,
    /// New complexity
    pub complexity: Option<Complexity>,
    /// Replacement acceptance criteria
    #[validate(length(max = 10), custom(function = criteria_entries_in_bounds))]
    pub acceptance_criteria: Option<Vec<String>>,
    /// Replacement context tags
    pub context_tags: Option<Vec<String>>,
    /// Replacement dependency set
    pub dependencies: Option<Vec<WorkItemId>>,
    /// New notes
    #[validate(length(max = 1_000))]
    pub notes: Option<String>,
    /// New progress percentage, 0-100
    #[validate(range(max = 100))]
    pub progress_percentage: Option<u8>,
    /// New due date
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl WorkItemPatch {
    /// Whether the patch touches any field that feeds the embedding.
    #[must_use]
    pub fn touches_indexed_text(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.acceptance_criteria.is_some()
    }
}

/// Validated input for an architecture memory item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArchitectureDraft {
    /// Namespace-unique slug
    pub slug: String,
    /// Title, 1-200 chars
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Markdown requirements body
    #[serde(default)]
    #[validate(length(max = 10_000))]
    pub ai_requirements: String,
    /// When-to-use guidance, at most 10 entries
    #[serde(default)]
    #[validate(length(max = 10))]
    pub ai_when_to_use: Vec<String>,
    /// Keywords, at most 20
    #[serde(default)]
    #[validate(length(max = 20))]
    pub keywords: Vec<String>,
    /// Child spec slugs, at most 50
    #[serde(default)]
    #[validate(length(max = 50))]
    pub children_slugs: Vec<String>,
    /// Related spec slugs, at most 20
    #[serde(default)]
    #[validate(length(max = 20))]
    pub related_slugs: Vec<String>,
    /// Linked epic ids, at most 20
    #[serde(default)]
    #[validate(length(max = 20))]
    pub linked_epic_ids: Vec<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Validated input for a troubleshoot memory item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TroubleshootDraft {
    /// Namespace-unique slug
    pub slug: String,
    /// Title, 1-200 chars
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Problem statements; required non-empty
    #[validate(length(min = 1))]
    pub ai_use_case: Vec<String>,
    /// Markdown solutions body; required non-empty
    #[validate(length(min = 1, max = 10_000))]
    pub ai_solutions: String,
    /// Keywords, at most 20
    #[serde(default)]
    #[validate(length(max = 20))]
    pub keywords: Vec<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Run validator-derived checks and convert failures into the domain error.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the first offending field.
pub fn check<T: Validate>(payload: &T) -> Result<()> {
    payload.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string());
        Error::Validation {
            message: errors.to_string().replace('\n', "; "),
            field,
        }
    })
}

/// Validate a progress percentage.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the value exceeds 100.
pub fn check_percentage(value: u8) -> Result<()> {
    if value > PROGRESS_MAX {
        return Err(Error::validation_field(
            format!("progress percentage must be 0-100, got {value}"),
            "percentage",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> WorkItemDraft {
        WorkItemDraft {
            item_type: ItemType::Task,
            title: title.to_owned(),
            description: String::new(),
            status: ItemStatus::default(),
            priority: Priority::default(),
            complexity: None,
            parent_id: None,
            acceptance_criteria: Vec::new(),
            context_tags: Vec::new(),
            dependencies: Vec::new(),
            notes: None,
            due_date: None,
        }
    }

    #[test]
    fn title_boundaries() {
        assert!(check(&draft("")).is_err());
        assert!(check(&draft(&"x".repeat(200))).is_ok());
        assert!(check(&draft(&"x".repeat(201))).is_err());
    }

    #[test]
    fn criterion_length_enforced() {
        let mut d = draft("ok");
        d.acceptance_criteria = vec!["too".to_owned()];
        assert!(check(&d).is_err());
        d.acceptance_criteria = vec!["long enough criterion".to_owned()];
        assert!(check(&d).is_ok());
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = check(&draft("")).unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field.as_deref(), Some("title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn percentage_bounds() {
        assert!(check_percentage(0).is_ok());
        assert!(check_percentage(100).is_ok());
        assert!(check_percentage(101).is_err());
    }
}
