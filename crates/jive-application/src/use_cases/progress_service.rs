//! Progress tracking, reporting, and analytics.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use jive_domain::entities::progress::ProgressEvent;
use jive_domain::entities::work_item::{ItemStatus, ItemType, WorkItem};
use jive_domain::error::{Error, Result};
use jive_domain::ports::{NamespaceStore, WriteBatch, WriteOp};
use jive_domain::validation::check_percentage;
use jive_domain::value_objects::{WorkItemFilter, WorkItemId};

use super::hierarchy_service::{HierarchyService, compute_rollups};

/// A progress update applied to one work item.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressUpdate {
    /// The item after the update
    pub item: WorkItem,
    /// The appended log event
    pub event: ProgressEvent,
}

/// Aggregate progress over a scope of items.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ProgressReport {
    /// Items in scope
    pub total_items: usize,
    /// Items per status
    pub by_status: HashMap<String, usize>,
    /// Mean effective progress over the scope
    pub average_progress: f64,
    /// Items at 100%
    pub completed_items: usize,
    /// Progress events recorded inside the requested range
    pub events_in_range: usize,
}

/// Velocity and blockage analytics over a scope of items.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ProgressAnalytics {
    /// Completions per ISO week, keyed `YYYY-Www`
    pub completed_per_week: BTreeMap<String, usize>,
    /// Currently blocked items (id, title)
    pub blocked_items: Vec<(String, String)>,
    /// Items currently in progress
    pub in_progress_items: usize,
}

/// Progress operations over one namespace.
pub struct ProgressService {
    store: Arc<dyn NamespaceStore>,
    hierarchy: HierarchyService,
}

impl ProgressService {
    /// Bind the service to a namespace store.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>) -> Self {
        let hierarchy = HierarchyService::new(Arc::clone(&store));
        Self { store, hierarchy }
    }

    /// Record a progress observation and update the item.
    ///
    /// With `auto_calculate_status`, 100% completes the item and anything in
    /// (0, 100) marks it in progress; explicit `status` always wins.
    pub async fn update(
        &self,
        id: WorkItemId,
        percentage: u8,
        status: Option<ItemStatus>,
        notes: Option<String>,
        blockers: Vec<String>,
        auto_calculate_status: bool,
    ) -> Result<ProgressUpdate> {
        check_percentage(percentage)?;
        let mut item = self
            .store
            .get_work_item(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("work item {id}")))?;

        let new_status = status.unwrap_or(if auto_calculate_status {
            match percentage {
                100 => ItemStatus::Completed,
                0 => item.status,
                _ => ItemStatus::InProgress,
            }
        } else {
            item.status
        });

        item.progress_percentage = percentage;
        item.status = new_status;
        item.updated_at = Utc::now();

        let mut event = ProgressEvent::record(item.id, percentage, new_status, item.updated_at);
        event.notes = notes;
        event.blockers = blockers;

        let batch = WriteBatch::default()
            .with(WriteOp::PutWorkItem {
                item: item.clone(),
                embedding: None,
            })
            .with(WriteOp::AppendProgress {
                event: event.clone(),
            });
        self.store.apply(batch).await?;
        self.hierarchy.recompute_ancestors(item.parent_id).await?;

        Ok(ProgressUpdate { item, event })
    }

    /// Aggregate report over a type- or parent-scoped item set.
    pub async fn report(
        &self,
        item_type: Option<ItemType>,
        parent_id: Option<WorkItemId>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<ProgressReport> {
        let items = self.scope(item_type, parent_id).await?;
        let events = self.store.list_progress(None, since, until).await?;
        let in_scope: std::collections::HashSet<WorkItemId> =
            items.iter().map(|i| i.id).collect();

        let mut by_status: HashMap<String, usize> = HashMap::new();
        let mut progress_sum = 0u64;
        let mut completed = 0usize;
        for item in &items {
            *by_status.entry(item.status.as_str().to_owned()).or_default() += 1;
            progress_sum += u64::from(item.progress_percentage);
            if item.progress_percentage == 100 {
                completed += 1;
            }
        }

        Ok(ProgressReport {
            total_items: items.len(),
            by_status,
            average_progress: if items.is_empty() {
                0.0
            } else {
                progress_sum as f64 / items.len() as f64
            },
            completed_items: completed,
            events_in_range: events
                .iter()
                .filter(|e| in_scope.contains(&e.entity_id))
                .count(),
        })
    }

    /// Velocity (completions per ISO week) and blockage analytics.
    pub async fn analytics(
        &self,
        item_type: Option<ItemType>,
        parent_id: Option<WorkItemId>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<ProgressAnalytics> {
        let items = self.scope(item_type, parent_id).await?;
        let in_scope: std::collections::HashSet<WorkItemId> =
            items.iter().map(|i| i.id).collect();
        let events = self.store.list_progress(None, since, until).await?;

        // First completion event per item counts toward velocity.
        let mut completed_seen: std::collections::HashSet<WorkItemId> =
            std::collections::HashSet::new();
        let mut completed_per_week: BTreeMap<String, usize> = BTreeMap::new();
        for event in &events {
            if event.status == ItemStatus::Completed
                && in_scope.contains(&event.entity_id)
                && completed_seen.insert(event.entity_id)
            {
                let week = event.at.iso_week();
                let key = format!("{}-W{:02}", week.year(), week.week());
                *completed_per_week.entry(key).or_default() += 1;
            }
        }

        Ok(ProgressAnalytics {
            completed_per_week,
            blocked_items: items
                .iter()
                .filter(|i| i.status == ItemStatus::Blocked)
                .map(|i| (i.id.to_string(), i.title.clone()))
                .collect(),
            in_progress_items: items
                .iter()
                .filter(|i| i.status == ItemStatus::InProgress)
                .count(),
        })
    }

    async fn scope(
        &self,
        item_type: Option<ItemType>,
        parent_id: Option<WorkItemId>,
    ) -> Result<Vec<WorkItem>> {
        let filter = WorkItemFilter {
            item_type,
            parent_id,
            ..Default::default()
        };
        let mut items = self.store.list_work_items(&filter).await?;
        let all = self.store.list_work_items(&WorkItemFilter::default()).await?;
        let rollups = compute_rollups(&all);
        for item in &mut items {
            if let Some(rollup) = rollups.get(&item.id) {
                item.progress_percentage = rollup.progress;
                item.status = rollup.status;
            }
        }
        Ok(items)
    }
}
