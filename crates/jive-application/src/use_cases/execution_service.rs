//! Execution tracking.
//!
//! Creates and transitions execution records. The platform never drives an
//! external agent; records change state only through these entry points.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use jive_domain::entities::execution::{ExecutionMode, ExecutionRecord, ExecutionStatus};
use jive_domain::entities::work_item::WorkItem;
use jive_domain::error::{Error, Result};
use jive_domain::ports::NamespaceStore;
use jive_domain::value_objects::ExecutionId;

/// Execution record operations over one namespace.
pub struct ExecutionService {
    store: Arc<dyn NamespaceStore>,
}

impl ExecutionService {
    /// Bind the service to a namespace store.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>) -> Self {
        Self { store }
    }

    /// Readiness issues for an item, empty when it may execute.
    pub async fn readiness_issues(&self, item: &WorkItem) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        let mut unmet = Vec::new();
        for dep in &item.dependencies {
            match self.store.get_work_item(*dep).await? {
                Some(dep_item) if dep_item.status == jive_domain::entities::work_item::ItemStatus::Completed => {}
                Some(dep_item) => unmet.push(dep_item.id.to_string()),
                None => unmet.push(dep.to_string()),
            }
        }
        if !unmet.is_empty() {
            issues.push(format!("dependencies not completed: {}", unmet.join(", ")));
        }
        if item.status.is_terminal() {
            issues.push(format!(
                "work item is in terminal state '{}'",
                item.status.as_str()
            ));
        }
        if item.acceptance_criteria.is_empty() {
            issues.push("acceptance criteria are empty".to_owned());
        }
        Ok(issues)
    }

    /// Create an execution record for an item.
    ///
    /// With `validate` (the default), readiness failures abort with
    /// [`Error::ValidationFailed`] and no record is created. In
    /// `validation_only` mode the record completes immediately; nothing runs.
    pub async fn execute(
        &self,
        item: &WorkItem,
        mode: ExecutionMode,
        validate: bool,
        agent_context: HashMap<String, String>,
    ) -> Result<ExecutionRecord> {
        if validate {
            let issues = self.readiness_issues(item).await?;
            if !issues.is_empty() {
                return Err(Error::ValidationFailed { issues });
            }
        }

        let mut record = ExecutionRecord::start(item.id, mode, Utc::now());
        record.agent_context = agent_context;
        if mode == ExecutionMode::ValidationOnly {
            record.status = ExecutionStatus::Completed;
            record.ended_at = Some(record.started_at);
        }
        self.store.put_execution(&record).await?;
        tracing::info!(
            execution_id = %record.execution_id,
            work_item_id = %item.id,
            mode = mode.as_str(),
            "execution record created"
        );
        Ok(record)
    }

    /// Fetch a record.
    pub async fn status(&self, id: ExecutionId) -> Result<ExecutionRecord> {
        self.store
            .get_execution(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("execution {id}")))
    }

    /// Cancel an active record.
    pub async fn cancel(&self, id: ExecutionId) -> Result<ExecutionRecord> {
        let mut record = self.status(id).await?;
        if !record.status.is_active() {
            return Err(Error::validation(format!(
                "execution {id} is already '{}'",
                record.status.as_str()
            )));
        }
        record.status = ExecutionStatus::Cancelled;
        record.ended_at = Some(Utc::now());
        self.store.put_execution(&record).await?;
        Ok(record)
    }

    /// History of a work item's executions, newest first.
    pub async fn history(&self, item: &WorkItem) -> Result<Vec<ExecutionRecord>> {
        self.store.list_executions(item.id).await
    }
}
