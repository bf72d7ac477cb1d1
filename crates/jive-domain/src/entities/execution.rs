//! Execution records: state tracking for agent-driven work item execution.
//!
//! The platform only records execution state; it never drives an external
//! agent. An `autonomous` record therefore transitions exactly like a
//! `guided` one — through explicit tool calls.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ExecutionId, WorkItemId};

/// Requested execution style.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Agent executes without human checkpoints
    #[default]
    Autonomous,
    /// Agent executes with external guidance
    Guided,
    /// Only the readiness checks run; no work is performed
    ValidationOnly,
}

impl ExecutionMode {
    /// String form used in tool payloads and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autonomous => "autonomous",
            Self::Guided => "guided",
            Self::ValidationOnly => "validation_only",
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "autonomous" => Ok(Self::Autonomous),
            "guided" => Ok(Self::Guided),
            "validation_only" => Ok(Self::ValidationOnly),
            _ => Err(format!("Unknown execution mode: {s}")),
        }
    }
}

/// Lifecycle status of an execution record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Created, not yet started
    #[default]
    Pending,
    /// In flight
    Running,
    /// Finished successfully
    Completed,
    /// Finished unsuccessfully
    Failed,
    /// Stopped before completion
    Cancelled,
}

impl ExecutionStatus {
    /// String form used in tool payloads and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the record can still change state.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown execution status: {s}")),
        }
    }
}

/// One tracked execution of a work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Server-assigned id
    pub execution_id: ExecutionId,
    /// The executed work item
    pub work_item_id: WorkItemId,
    /// Requested execution style
    pub mode: ExecutionMode,
    /// Current lifecycle status
    pub status: ExecutionStatus,
    /// When the record was created
    pub started_at: DateTime<Utc>,
    /// When the record reached a terminal state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Opaque key/value context supplied by the agent
    #[serde(default)]
    pub agent_context: HashMap<String, String>,
    /// Readiness issues recorded at creation time
    #[serde(default)]
    pub validation_issues: Vec<String>,
    /// Free-form artifact references produced during execution
    #[serde(default)]
    pub artifacts: Vec<String>,
}

impl ExecutionRecord {
    /// Start a fresh pending record for a work item.
    #[must_use]
    pub fn start(work_item_id: WorkItemId, mode: ExecutionMode, now: DateTime<Utc>) -> Self {
        Self {
            execution_id: ExecutionId::new(),
            work_item_id,
            mode,
            status: ExecutionStatus::Pending,
            started_at: now,
            ended_at: None,
            agent_context: HashMap::new(),
            validation_issues: Vec::new(),
            artifacts: Vec::new(),
        }
    }
}
