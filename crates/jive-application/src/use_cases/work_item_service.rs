//! Work item CRUD service.
//!
//! The only write path for work items: validates drafts and patches, enforces
//! the hierarchy typing rule and dependency acyclicity, assigns sequence
//! positions, keeps the embedding index fresh, and records progress events on
//! status/progress transitions.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use jive_domain::entities::progress::ProgressEvent;
use jive_domain::entities::work_item::WorkItem;
use jive_domain::error::{Error, Result};
use jive_domain::ports::{EmbeddingProvider, NamespaceStore, WriteBatch, WriteOp};
use jive_domain::validation::{self, WorkItemDraft, WorkItemPatch};
use jive_domain::value_objects::{
    ListPage, Page, SortBy, WorkItemFilter, WorkItemId,
};

use super::hierarchy_service::{HierarchyService, compute_rollups};

/// Result of a delete, listing every removed row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeleteOutcome {
    /// Ids removed, post-order (children before parents)
    pub deleted_ids: Vec<WorkItemId>,
}

/// CRUD and listing over one namespace's work items.
pub struct WorkItemService {
    store: Arc<dyn NamespaceStore>,
    embedding: Arc<dyn EmbeddingProvider>,
    hierarchy: HierarchyService,
}

impl WorkItemService {
    /// Bind the service to a namespace store and embedding engine.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
        let hierarchy = HierarchyService::new(Arc::clone(&store));
        Self {
            store,
            embedding,
            hierarchy,
        }
    }

    /// Resolve a work item reference: UUID first, exact title as a fallback.
    pub async fn resolve(&self, reference: &str) -> Result<WorkItem> {
        if let Ok(id) = WorkItemId::from_str(reference) {
            return self
                .store
                .get_work_item(id)
                .await?
                .ok_or_else(|| Error::not_found(format!("work item {id}")));
        }
        let all = self.store.list_work_items(&WorkItemFilter::default()).await?;
        let mut matches: Vec<WorkItem> = all
            .into_iter()
            .filter(|item| item.title.eq_ignore_ascii_case(reference))
            .collect();
        match matches.len() {
            0 => Err(Error::not_found(format!("work item '{reference}'"))),
            1 => Ok(matches.remove(0)),
            n => Err(Error::validation(format!(
                "reference '{reference}' matches {n} items; use the id"
            ))),
        }
    }

    /// Create a work item from a validated draft.
    pub async fn create(&self, draft: WorkItemDraft) -> Result<WorkItem> {
        validation::check(&draft)?;

        if let Some(parent_id) = draft.parent_id {
            let parent = self
                .store
                .get_work_item(parent_id)
                .await?
                .ok_or_else(|| Error::not_found(format!("parent work item {parent_id}")))?;
            if !parent.item_type.allows_child(draft.item_type) {
                return Err(Error::HierarchyViolation {
                    parent_type: parent.item_type.as_str().to_owned(),
                    child_type: draft.item_type.as_str().to_owned(),
                });
            }
        }
        for dep in &draft.dependencies {
            if self.store.get_work_item(*dep).await?.is_none() {
                return Err(Error::not_found(format!("dependency work item {dep}")));
            }
        }

        let now = Utc::now();
        let item = WorkItem {
            id: WorkItemId::new(),
            item_type: draft.item_type,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            complexity: draft.complexity,
            parent_id: draft.parent_id,
            sequence_order: self.hierarchy.next_sequence(draft.parent_id).await?,
            acceptance_criteria: draft.acceptance_criteria,
            context_tags: draft.context_tags,
            dependencies: draft.dependencies,
            notes: draft.notes,
            progress_percentage: 0,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };

        let embedding = self.embedding.embed(&item.embedding_text()).await?;
        self.store.put_work_item(&item, Some(&embedding)).await?;
        self.hierarchy.recompute_ancestors(item.parent_id).await?;

        tracing::info!(id = %item.id, item_type = item.item_type.as_str(), "work item created");
        Ok(item)
    }

    /// Apply a patch to an existing item.
    pub async fn update(&self, reference: &str, patch: WorkItemPatch) -> Result<WorkItem> {
        validation::check(&patch)?;
        let mut item = self.resolve(reference).await?;
        let previous_status = item.status;
        let previous_progress = item.progress_percentage;
        let re_embed = patch.touches_indexed_text();

        if let Some(dependencies) = &patch.dependencies {
            for dep in dependencies {
                if self.store.get_work_item(*dep).await?.is_none() {
                    return Err(Error::not_found(format!("dependency work item {dep}")));
                }
            }
            self.hierarchy
                .ensure_acyclic_dependencies(item.id, dependencies)
                .await?;
        }

        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(priority) = patch.priority {
            item.priority = priority;
        }
        if let Some(complexity) = patch.complexity {
            item.complexity = Some(complexity);
        }
        if let Some(criteria) = patch.acceptance_criteria {
            item.acceptance_criteria = criteria;
        }
        if let Some(tags) = patch.context_tags {
            item.context_tags = tags;
        }
        if let Some(dependencies) = patch.dependencies {
            item.dependencies = dependencies;
        }
        if let Some(notes) = patch.notes {
            item.notes = Some(notes);
        }
        if let Some(progress) = patch.progress_percentage {
            item.progress_percentage = progress;
        }
        if let Some(due_date) = patch.due_date {
            item.due_date = Some(due_date);
        }
        item.updated_at = Utc::now();

        let embedding = if re_embed {
            Some(self.embedding.embed(&item.embedding_text()).await?)
        } else {
            None
        };

        let mut batch = WriteBatch::default().with(WriteOp::PutWorkItem {
            item: item.clone(),
            embedding,
        });
        let tracked_change =
            item.status != previous_status || item.progress_percentage != previous_progress;
        if tracked_change {
            batch.push(WriteOp::AppendProgress {
                event: ProgressEvent::record(
                    item.id,
                    item.progress_percentage,
                    item.status,
                    item.updated_at,
                ),
            });
        }
        self.store.apply(batch).await?;
        if tracked_change {
            self.hierarchy.recompute_ancestors(item.parent_id).await?;
        }
        Ok(item)
    }

    /// Delete an item; with `delete_children`, remove the whole subtree
    /// atomically in post-order.
    pub async fn delete(&self, reference: &str, delete_children: bool) -> Result<DeleteOutcome> {
        let item = self.resolve(reference).await?;
        let children = self.store.children_of(Some(item.id)).await?;
        if !children.is_empty() && !delete_children {
            return Err(Error::HasChildren {
                id: item.id.to_string(),
                child_count: children.len(),
            });
        }

        // Post-order: leaves first so no delete ever orphans a survivor.
        let mut deleted_ids = Vec::new();
        let mut stack = vec![(item.id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                deleted_ids.push(current);
                continue;
            }
            stack.push((current, true));
            for child in self.store.children_of(Some(current)).await? {
                stack.push((child.id, false));
            }
        }

        let mut batch = WriteBatch::default();
        for id in &deleted_ids {
            batch.push(WriteOp::DeleteWorkItem { id: *id });
        }

        // Scrub dangling dependency edges pointing into the deleted subtree.
        let doomed: std::collections::HashSet<WorkItemId> = deleted_ids.iter().copied().collect();
        let mut scrubbed: std::collections::HashMap<WorkItemId, WorkItem> =
            std::collections::HashMap::new();
        for id in &deleted_ids {
            for mut dependent in self.store.dependents_of(*id).await? {
                if doomed.contains(&dependent.id) {
                    continue;
                }
                let entry = scrubbed.entry(dependent.id).or_insert_with(|| {
                    dependent.dependencies.retain(|d| !doomed.contains(d));
                    dependent.clone()
                });
                entry.dependencies.retain(|d| !doomed.contains(d));
            }
        }
        for survivor in scrubbed.into_values() {
            batch.push(WriteOp::PutWorkItem {
                item: survivor,
                embedding: None,
            });
        }

        self.store.apply(batch).await?;
        self.hierarchy.recompute_ancestors(item.parent_id).await?;

        tracing::info!(
            id = %item.id,
            removed = deleted_ids.len(),
            "work item deleted"
        );
        Ok(DeleteOutcome { deleted_ids })
    }

    /// Fetch one item with the roll-up applied.
    pub async fn get(&self, reference: &str) -> Result<WorkItem> {
        let item = self.resolve(reference).await?;
        let all = self.store.list_work_items(&WorkItemFilter::default()).await?;
        let rollups = compute_rollups(&all);
        let mut item = item;
        if let Some(rollup) = rollups.get(&item.id) {
            item.progress_percentage = rollup.progress;
            item.status = rollup.status;
        }
        Ok(item)
    }

    /// List items with filtering, stable sorting, and pagination.
    pub async fn list(
        &self,
        filter: &WorkItemFilter,
        sort_by: SortBy,
        page: Page,
    ) -> Result<ListPage<WorkItem>> {
        let mut items = self.store.list_work_items(filter).await?;

        // Roll-up needs the full namespace, not just the filtered rows.
        let all = self.store.list_work_items(&WorkItemFilter::default()).await?;
        let rollups = compute_rollups(&all);
        for item in &mut items {
            if let Some(rollup) = rollups.get(&item.id) {
                item.progress_percentage = rollup.progress;
                item.status = rollup.status;
            }
        }

        items.sort_by(|a, b| {
            let ordering = match sort_by {
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortBy::Priority => b.priority.cmp(&a.priority),
                SortBy::SequenceOrder => a.sequence_order.cmp(&b.sequence_order),
                SortBy::Title => a.title.cmp(&b.title),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
        Ok(ListPage::paginate(items, page))
    }

    /// The hierarchy engine bound to the same store.
    #[must_use]
    pub fn hierarchy(&self) -> &HierarchyService {
        &self.hierarchy
    }
}
