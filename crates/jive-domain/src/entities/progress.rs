//! Progress events: the append-only progress log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::work_item::ItemStatus;
use crate::value_objects::{ProgressEventId, WorkItemId};

/// One entry in the append-only progress log of a work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Server-assigned id
    pub id: ProgressEventId,
    /// The work item the event belongs to
    pub entity_id: WorkItemId,
    /// Completion percentage at the time of the event
    pub percentage: u8,
    /// Status at the time of the event
    pub status: ItemStatus,
    /// Optional free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Blockers reported with the event
    #[serde(default)]
    pub blockers: Vec<String>,
    /// When the event was recorded
    pub at: DateTime<Utc>,
}

impl ProgressEvent {
    /// Record a progress observation for a work item.
    #[must_use]
    pub fn record(
        entity_id: WorkItemId,
        percentage: u8,
        status: ItemStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProgressEventId::new(),
            entity_id,
            percentage,
            status,
            notes: None,
            blockers: Vec::new(),
            at: now,
        }
    }
}
