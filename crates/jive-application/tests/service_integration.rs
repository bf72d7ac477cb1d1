//! End-to-end service tests over the real SQLite store and the
//! deterministic hashing embedder.

use std::collections::HashMap;
use std::sync::Arc;

use jive_application::codec::TransferService;
use jive_application::sync_service::SyncService;
use jive_application::use_cases::{
    ExecutionService, HierarchyService, MemoryService, ProgressService, SearchService,
    WorkItemService,
};
use jive_domain::entities::memory::MemoryItem;
use jive_domain::entities::work_item::{ItemStatus, ItemType};
use jive_domain::error::Error;
use jive_domain::ports::{EmbeddingProvider, NamespaceStore};
use jive_domain::validation::{ArchitectureDraft, TroubleshootDraft, WorkItemDraft, WorkItemPatch};
use jive_domain::value_objects::{
    ContentType, ImportMode, Namespace, Page, SearchType, SortBy, SyncDirection, WorkItemFilter,
    WorkItemId,
};
use jive_providers::embedding::HashingEmbeddingProvider;
use jive_providers::store::SqliteNamespaceStore;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    store: Arc<dyn NamespaceStore>,
    embedding: Arc<dyn EmbeddingProvider>,
}

impl Harness {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = SqliteNamespaceStore::open(Namespace::default(), dir.path())
            .await
            .unwrap();
        Self {
            _dir: dir,
            store: Arc::new(store),
            embedding: Arc::new(HashingEmbeddingProvider::new()),
        }
    }

    fn items(&self) -> WorkItemService {
        WorkItemService::new(Arc::clone(&self.store), Arc::clone(&self.embedding))
    }

    fn hierarchy(&self) -> HierarchyService {
        HierarchyService::new(Arc::clone(&self.store))
    }

    fn search(&self) -> SearchService {
        SearchService::new(Arc::clone(&self.store), Arc::clone(&self.embedding))
    }

    fn memory(&self) -> MemoryService {
        MemoryService::new(Arc::clone(&self.store), Arc::clone(&self.embedding))
    }

    fn progress(&self) -> ProgressService {
        ProgressService::new(Arc::clone(&self.store))
    }
}

fn draft(item_type: ItemType, title: &str, parent: Option<WorkItemId>) -> WorkItemDraft {
    WorkItemDraft {
        item_type,
        title: title.to_owned(),
        description: String::new(),
        status: ItemStatus::default(),
        priority: Default::default(),
        complexity: None,
        parent_id: parent,
        acceptance_criteria: vec!["acceptance criterion one".to_owned()],
        context_tags: Vec::new(),
        dependencies: Vec::new(),
        notes: None,
        due_date: None,
    }
}

// ---------------------------------------------------------------------------
// Scenario: create/read round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_read_round_trip() {
    let h = Harness::new().await;
    let service = h.items();

    let created = service
        .create(draft(ItemType::Task, "Add login", None))
        .await
        .unwrap();
    assert_eq!(created.status, ItemStatus::NotStarted);
    assert_eq!(created.sequence_order, 0);

    let fetched = service.get(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched.title, "Add login");
    assert_eq!(fetched.progress_percentage, 0);

    // Title resolution works as the slug-like shortcut.
    let by_title = service.get("add login").await.unwrap();
    assert_eq!(by_title.id, created.id);
}

#[tokio::test]
async fn sequence_orders_append_per_parent() {
    let h = Harness::new().await;
    let service = h.items();
    let story = service
        .create(draft(ItemType::Story, "Story", None))
        .await
        .unwrap();
    for i in 0..3 {
        let item = service
            .create(draft(ItemType::Task, &format!("t{i}"), Some(story.id)))
            .await
            .unwrap();
        assert_eq!(item.sequence_order, i);
    }
}

// ---------------------------------------------------------------------------
// Scenario: hierarchy rule enforced
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hierarchy_rule_enforced() {
    let h = Harness::new().await;
    let service = h.items();

    let epic = service
        .create(draft(ItemType::Epic, "Epic", None))
        .await
        .unwrap();

    let err = service
        .create(draft(ItemType::Task, "Task under epic", Some(epic.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HierarchyViolation { .. }));
    assert_eq!(err.code(), "HierarchyViolation");

    let feature = service
        .create(draft(ItemType::Feature, "Feature", Some(epic.id)))
        .await
        .unwrap();
    let story = service
        .create(draft(ItemType::Story, "Story", Some(feature.id)))
        .await
        .unwrap();
    service
        .create(draft(ItemType::Task, "Task", Some(story.id)))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Scenario: cycle detection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dependency_cycle_detected_with_edge() {
    let h = Harness::new().await;
    let service = h.items();

    let a = service.create(draft(ItemType::Task, "A", None)).await.unwrap();
    let b = service.create(draft(ItemType::Task, "B", None)).await.unwrap();
    let c = service.create(draft(ItemType::Task, "C", None)).await.unwrap();

    let dep_patch = |deps: Vec<WorkItemId>| WorkItemPatch {
        dependencies: Some(deps),
        ..Default::default()
    };
    service
        .update(&a.id.to_string(), dep_patch(vec![b.id]))
        .await
        .unwrap();
    service
        .update(&b.id.to_string(), dep_patch(vec![c.id]))
        .await
        .unwrap();

    let err = service
        .update(&c.id.to_string(), dep_patch(vec![a.id]))
        .await
        .unwrap_err();
    match err {
        Error::CycleDetected { from, to } => {
            assert_eq!(from, c.id.to_string());
            assert_eq!(to, a.id.to_string());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario: reorder densification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_assigns_dense_sequence() {
    let h = Harness::new().await;
    let service = h.items();
    let hierarchy = h.hierarchy();

    let story = service
        .create(draft(ItemType::Story, "Parent", None))
        .await
        .unwrap();
    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(
            service
                .create(draft(ItemType::Task, &format!("task {i}"), Some(story.id)))
                .await
                .unwrap()
                .id,
        );
    }

    let new_order = vec![ids[3], ids[0], ids[1], ids[2]];
    let siblings = hierarchy.reorder(&new_order).await.unwrap();
    let sequence: Vec<i64> = siblings.iter().map(|s| s.sequence_order).collect();
    assert_eq!(sequence, vec![0, 1, 2, 3]);
    let listed: Vec<WorkItemId> = siblings.iter().map(|s| s.id).collect();
    assert_eq!(listed, new_order);

    let page = service
        .list(
            &WorkItemFilter {
                parent_id: Some(story.id),
                ..Default::default()
            },
            SortBy::SequenceOrder,
            Page::default(),
        )
        .await
        .unwrap();
    let listed: Vec<WorkItemId> = page.items.iter().map(|s| s.id).collect();
    assert_eq!(listed, new_order);
}

#[tokio::test]
async fn reorder_rejects_incomplete_sibling_set() {
    let h = Harness::new().await;
    let service = h.items();
    let hierarchy = h.hierarchy();

    let story = service
        .create(draft(ItemType::Story, "Parent", None))
        .await
        .unwrap();
    let first = service
        .create(draft(ItemType::Task, "first", Some(story.id)))
        .await
        .unwrap();
    service
        .create(draft(ItemType::Task, "second", Some(story.id)))
        .await
        .unwrap();

    let err = hierarchy.reorder(&[first.id]).await.unwrap_err();
    assert!(matches!(err, Error::IncompleteSiblingSet { .. }));
}

#[tokio::test]
async fn swap_requires_shared_parent() {
    let h = Harness::new().await;
    let service = h.items();
    let hierarchy = h.hierarchy();

    let story_a = service
        .create(draft(ItemType::Story, "A", None))
        .await
        .unwrap();
    let story_b = service
        .create(draft(ItemType::Story, "B", None))
        .await
        .unwrap();
    let t1 = service
        .create(draft(ItemType::Task, "t1", Some(story_a.id)))
        .await
        .unwrap();
    let t2 = service
        .create(draft(ItemType::Task, "t2", Some(story_b.id)))
        .await
        .unwrap();

    let err = hierarchy.swap(t1.id, t2.id).await.unwrap_err();
    assert!(matches!(err, Error::DifferentParents));
}

#[tokio::test]
async fn move_reparents_and_redensifies() {
    let h = Harness::new().await;
    let service = h.items();
    let hierarchy = h.hierarchy();

    let epic = service
        .create(draft(ItemType::Epic, "Epic", None))
        .await
        .unwrap();
    let feature_a = service
        .create(draft(ItemType::Feature, "FA", Some(epic.id)))
        .await
        .unwrap();
    let feature_b = service
        .create(draft(ItemType::Feature, "FB", Some(epic.id)))
        .await
        .unwrap();
    let story = service
        .create(draft(ItemType::Story, "S", Some(feature_a.id)))
        .await
        .unwrap();

    let moved = hierarchy
        .move_item(story.id, Some(feature_b.id), Some(0))
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(feature_b.id));
    assert_eq!(moved.sequence_order, 0);

    // Moving a feature under a story breaks the typing rule.
    let err = hierarchy
        .move_item(feature_a.id, Some(story.id), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HierarchyViolation { .. }));
}

// ---------------------------------------------------------------------------
// Scenario: hybrid search fusion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hybrid_search_ranks_the_closer_memory_first() {
    let h = Harness::new().await;
    let memory = h.memory();
    let search = h.search();

    memory
        .create_architecture(ArchitectureDraft {
            slug: "react-patterns".to_owned(),
            title: "React hooks patterns".to_owned(),
            ai_requirements: "Guidance for structuring React hooks".to_owned(),
            ai_when_to_use: vec!["building React components".to_owned()],
            keywords: vec!["react".to_owned()],
            children_slugs: Vec::new(),
            related_slugs: Vec::new(),
            linked_epic_ids: Vec::new(),
            tags: Vec::new(),
        })
        .await
        .unwrap();
    let m2 = memory
        .create_troubleshoot(TroubleshootDraft {
            slug: "infinite-render-loop".to_owned(),
            title: "Infinite render loop".to_owned(),
            ai_use_case: vec!["useEffect re-renders forever".to_owned()],
            ai_solutions: "Add the missing dependency array to useEffect.".to_owned(),
            keywords: vec!["react".to_owned(), "useEffect".to_owned()],
            tags: Vec::new(),
        })
        .await
        .unwrap();

    let hits = search
        .search(
            "useEffect infinite loop",
            SearchType::Hybrid,
            ContentType::all(),
            &WorkItemFilter::default(),
            10,
            true,
        )
        .await
        .unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].id, m2.id().to_string());
    for hit in &hits {
        let score = hit.score.unwrap();
        assert!((0.0..=1.0).contains(&score), "score {score}");
    }

    let only_troubleshoot = search
        .search(
            "useEffect infinite loop",
            SearchType::Hybrid,
            &[ContentType::Troubleshoot],
            &WorkItemFilter::default(),
            10,
            false,
        )
        .await
        .unwrap();
    assert!(
        only_troubleshoot
            .iter()
            .all(|hit| hit.content_type == ContentType::Troubleshoot)
    );
}

#[tokio::test]
async fn empty_query_returns_recency_listing() {
    let h = Harness::new().await;
    let service = h.items();
    let search = h.search();

    service
        .create(draft(ItemType::Task, "older", None))
        .await
        .unwrap();
    let newer = service
        .create(draft(ItemType::Task, "newer", None))
        .await
        .unwrap();

    let hits = search
        .search(
            "",
            SearchType::Hybrid,
            &[ContentType::WorkItem],
            &WorkItemFilter::default(),
            10,
            true,
        )
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, newer.id.to_string());
    assert!(hits[0].score.is_none());
}

// ---------------------------------------------------------------------------
// Scenario: export/import round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_import_round_trip_preserves_fields() {
    let h = Harness::new().await;
    let memory = h.memory();
    let transfer = TransferService::new(Arc::clone(&h.store), Arc::clone(&h.embedding));

    let original = memory
        .create_architecture(ArchitectureDraft {
            slug: "react-patterns".to_owned(),
            title: "React Patterns".to_owned(),
            ai_requirements: "Prefer function components.".to_owned(),
            ai_when_to_use: vec!["building UIs".to_owned()],
            keywords: vec!["react".to_owned()],
            children_slugs: vec!["react-forms".to_owned()],
            related_slugs: vec!["state-management".to_owned()],
            linked_epic_ids: Vec::new(),
            tags: vec!["frontend".to_owned()],
        })
        .await
        .unwrap();

    let export_dir = TempDir::new().unwrap();
    let report = transfer.export(None, export_dir.path()).await.unwrap();
    assert_eq!(report.exported, 1);
    let manifest_path = report.directory.join("metadata.json");
    assert!(manifest_path.exists());

    memory
        .delete(
            jive_domain::entities::memory::MemoryType::Architecture,
            "react-patterns",
        )
        .await
        .unwrap();

    let import_report = transfer
        .import_directory(&report.directory, ImportMode::CreateOnly)
        .await
        .unwrap();
    assert_eq!(import_report.created, vec!["react-patterns"]);
    assert!(import_report.errors.is_empty());

    let restored = memory
        .resolve(
            jive_domain::entities::memory::MemoryType::Architecture,
            "react-patterns",
        )
        .await
        .unwrap();
    let (MemoryItem::Architecture(a), MemoryItem::Architecture(b)) = (&original, &restored) else {
        panic!("expected architecture items");
    };
    assert_eq!(a.title, b.title);
    assert_eq!(a.ai_requirements, b.ai_requirements);
    assert_eq!(a.ai_when_to_use, b.ai_when_to_use);
    assert_eq!(a.keywords, b.keywords);
    assert_eq!(a.children_slugs, b.children_slugs);
    assert_eq!(a.related_slugs, b.related_slugs);
    assert_eq!(a.tags, b.tags);
    assert_eq!(a.version, b.version);
    assert_eq!(
        a.created_at.timestamp_micros(),
        b.created_at.timestamp_micros()
    );
    assert_eq!(
        a.updated_at.timestamp_micros(),
        b.updated_at.timestamp_micros()
    );

    // Importing the same file again in create_only mode is a duplicate.
    let second = transfer
        .import_directory(&report.directory, ImportMode::CreateOnly)
        .await
        .unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.errors.len(), 1);
    assert!(second.errors[0].contains("Duplicate slug"));
}

// ---------------------------------------------------------------------------
// Progress roll-up
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_rolls_up_to_ancestors() {
    let h = Harness::new().await;
    let service = h.items();
    let progress = h.progress();

    let story = service
        .create(draft(ItemType::Story, "Story", None))
        .await
        .unwrap();
    let t1 = service
        .create(draft(ItemType::Task, "t1", Some(story.id)))
        .await
        .unwrap();
    let t2 = service
        .create(draft(ItemType::Task, "t2", Some(story.id)))
        .await
        .unwrap();

    progress
        .update(t1.id, 50, None, None, Vec::new(), true)
        .await
        .unwrap();
    let after_first = service.get(&story.id.to_string()).await.unwrap();
    assert_eq!(after_first.progress_percentage, 25);
    assert_eq!(after_first.status, ItemStatus::InProgress);

    progress
        .update(t1.id, 100, None, None, Vec::new(), true)
        .await
        .unwrap();
    progress
        .update(t2.id, 100, None, None, Vec::new(), true)
        .await
        .unwrap();
    let done = service.get(&story.id.to_string()).await.unwrap();
    assert_eq!(done.progress_percentage, 100);
    assert_eq!(done.status, ItemStatus::Completed);

    // The persisted row matches the derived value (write-path roll-up).
    let stored = h.store.get_work_item(story.id).await.unwrap().unwrap();
    assert_eq!(stored.progress_percentage, 100);
    assert_eq!(stored.status, ItemStatus::Completed);
}

#[tokio::test]
async fn auto_status_derivation() {
    let h = Harness::new().await;
    let service = h.items();
    let progress = h.progress();
    let task = service
        .create(draft(ItemType::Task, "solo", None))
        .await
        .unwrap();

    let mid = progress
        .update(task.id, 40, None, None, Vec::new(), true)
        .await
        .unwrap();
    assert_eq!(mid.item.status, ItemStatus::InProgress);

    let done = progress
        .update(task.id, 100, None, None, Vec::new(), true)
        .await
        .unwrap();
    assert_eq!(done.item.status, ItemStatus::Completed);
    assert_eq!(done.event.percentage, 100);
}

// ---------------------------------------------------------------------------
// Delete semantics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_with_children_requires_flag() {
    let h = Harness::new().await;
    let service = h.items();
    let story = service
        .create(draft(ItemType::Story, "Story", None))
        .await
        .unwrap();
    service
        .create(draft(ItemType::Task, "child", Some(story.id)))
        .await
        .unwrap();

    let err = service.delete(&story.id.to_string(), false).await.unwrap_err();
    assert!(matches!(err, Error::HasChildren { .. }));

    let outcome = service.delete(&story.id.to_string(), true).await.unwrap();
    assert_eq!(outcome.deleted_ids.len(), 2);
    // Post-order: the child precedes the story.
    assert_eq!(*outcome.deleted_ids.last().unwrap(), story.id);

    let page = service
        .list(&WorkItemFilter::default(), SortBy::SequenceOrder, Page::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn delete_scrubs_dangling_dependencies() {
    let h = Harness::new().await;
    let service = h.items();
    let doomed = service
        .create(draft(ItemType::Task, "doomed", None))
        .await
        .unwrap();
    let survivor = service
        .create(draft(ItemType::Task, "survivor", None))
        .await
        .unwrap();
    service
        .update(
            &survivor.id.to_string(),
            WorkItemPatch {
                dependencies: Some(vec![doomed.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    service.delete(&doomed.id.to_string(), false).await.unwrap();
    let after = service.get(&survivor.id.to_string()).await.unwrap();
    assert!(after.dependencies.is_empty());
}

// ---------------------------------------------------------------------------
// Execution readiness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn execution_requires_readiness() {
    let h = Harness::new().await;
    let service = h.items();
    let executions = ExecutionService::new(Arc::clone(&h.store));

    let dep = service
        .create(draft(ItemType::Task, "dep", None))
        .await
        .unwrap();
    let mut item_draft = draft(ItemType::Task, "main", None);
    item_draft.dependencies = vec![dep.id];
    item_draft.acceptance_criteria = Vec::new();
    let item = service.create(item_draft).await.unwrap();

    let err = executions
        .execute(&item, Default::default(), true, HashMap::new())
        .await
        .unwrap_err();
    let Error::ValidationFailed { issues } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(issues.len(), 2, "deps unmet + empty criteria: {issues:?}");
    // No record was created.
    assert!(executions.history(&item).await.unwrap().is_empty());

    // Satisfy readiness: complete the dependency, add criteria.
    service
        .update(
            &dep.id.to_string(),
            WorkItemPatch {
                status: Some(ItemStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let item = service
        .update(
            &item.id.to_string(),
            WorkItemPatch {
                acceptance_criteria: Some(vec!["does the thing".to_owned()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let record = executions
        .execute(&item, Default::default(), true, HashMap::new())
        .await
        .unwrap();
    let cancelled = executions.cancel(record.execution_id).await.unwrap();
    assert!(cancelled.ended_at.is_some());
    assert!(executions.cancel(record.execution_id).await.is_err());
}

// ---------------------------------------------------------------------------
// Sync engine
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_round_trips_files_and_rows() {
    let h = Harness::new().await;
    let memory = h.memory();
    let sync = SyncService::new(Arc::clone(&h.store), Arc::clone(&h.embedding));
    let workspace = TempDir::new().unwrap();

    memory
        .create_troubleshoot(TroubleshootDraft {
            slug: "db-timeouts".to_owned(),
            title: "Database timeouts".to_owned(),
            ai_use_case: vec!["queries hang under load".to_owned()],
            ai_solutions: "Raise the pool size.".to_owned(),
            keywords: Vec::new(),
            tags: Vec::new(),
        })
        .await
        .unwrap();

    let out = sync
        .sync(workspace.path(), SyncDirection::DbToFile)
        .await
        .unwrap();
    assert_eq!(out.created.len(), 1);
    let file = workspace.path().join("troubleshoot_db-timeouts.md");
    assert!(file.exists());

    // Unchanged on the second pass.
    let again = sync
        .sync(workspace.path(), SyncDirection::DbToFile)
        .await
        .unwrap();
    assert_eq!(again.unchanged.len(), 1);
    assert!(again.created.is_empty() && again.updated.is_empty());

    // Edit the file with a newer timestamp; bidirectional pulls it in.
    let content = std::fs::read_to_string(&file).unwrap();
    let future = (chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339();
    let edited = content
        .replace("Raise the pool size.", "Raise the pool size and add retries.")
        .replace(
            content
                .lines()
                .find(|l| l.starts_with("last_updated_on:"))
                .unwrap(),
            &format!("last_updated_on: {future}"),
        );
    std::fs::write(&file, edited).unwrap();

    let merged = sync
        .sync(workspace.path(), SyncDirection::Bidirectional)
        .await
        .unwrap();
    assert_eq!(merged.conflicts.len(), 1);

    let item = memory
        .resolve(
            jive_domain::entities::memory::MemoryType::Troubleshoot,
            "db-timeouts",
        )
        .await
        .unwrap();
    let MemoryItem::Troubleshoot(ts) = item else {
        panic!("expected troubleshoot item");
    };
    assert!(ts.ai_solutions.contains("add retries"));
}
