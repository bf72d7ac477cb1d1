//! Integration tests for the SQLite namespace store.

use std::sync::Arc;

use chrono::Utc;
use jive_domain::entities::memory::{MemoryItem, MemoryType, TroubleshootItem};
use jive_domain::entities::progress::ProgressEvent;
use jive_domain::entities::work_item::{ItemStatus, ItemType, Priority, WorkItem};
use jive_domain::error::Error;
use jive_domain::ports::{EmbeddingProvider, NamespaceStore, WriteBatch, WriteOp};
use jive_domain::value_objects::{
    ContentType, Namespace, Slug, WorkItemFilter, WorkItemId,
};
use jive_providers::embedding::HashingEmbeddingProvider;
use jive_providers::store::SqliteNamespaceStore;
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> SqliteNamespaceStore {
    SqliteNamespaceStore::open(Namespace::default(), dir.path())
        .await
        .unwrap()
}

fn task(title: &str, parent: Option<WorkItemId>, sequence: i64) -> WorkItem {
    let now = Utc::now();
    WorkItem {
        id: WorkItemId::new(),
        item_type: ItemType::Task,
        title: title.to_owned(),
        description: format!("{title} description"),
        status: ItemStatus::NotStarted,
        priority: Priority::Medium,
        complexity: None,
        parent_id: parent,
        sequence_order: sequence,
        acceptance_criteria: vec!["it does the thing".to_owned()],
        context_tags: vec!["backend".to_owned()],
        dependencies: Vec::new(),
        notes: None,
        progress_percentage: 0,
        due_date: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn work_item_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let item = task("Add login", None, 0);

    store.put_work_item(&item, None).await.unwrap();
    let fetched = store.get_work_item(item.id).await.unwrap().unwrap();

    assert_eq!(fetched.title, "Add login");
    assert_eq!(fetched.acceptance_criteria, item.acceptance_criteria);
    assert_eq!(fetched.context_tags, item.context_tags);
    assert_eq!(fetched.status, ItemStatus::NotStarted);
    assert_eq!(
        fetched.created_at.timestamp_micros(),
        item.created_at.timestamp_micros()
    );
}

#[tokio::test]
async fn reopening_preserves_rows() {
    let dir = TempDir::new().unwrap();
    let item = task("Persist me", None, 0);
    {
        let store = open_store(&dir).await;
        store.put_work_item(&item, None).await.unwrap();
    }
    let store = open_store(&dir).await;
    assert!(store.get_work_item(item.id).await.unwrap().is_some());
}

#[tokio::test]
async fn filters_push_down() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let mut epic = task("Epic A", None, 0);
    epic.item_type = ItemType::Epic;
    epic.priority = Priority::High;
    let todo = task("Task B", None, 1);
    store.put_work_item(&epic, None).await.unwrap();
    store.put_work_item(&todo, None).await.unwrap();

    let filter = WorkItemFilter {
        item_type: Some(ItemType::Epic),
        ..Default::default()
    };
    let items = store.list_work_items(&filter).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, epic.id);

    let filter = WorkItemFilter {
        tags: vec!["frontend".to_owned()],
        ..Default::default()
    };
    assert!(store.list_work_items(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn children_are_ordered_by_sequence() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let mut parent = task("Story", None, 0);
    parent.item_type = ItemType::Story;
    store.put_work_item(&parent, None).await.unwrap();

    for (i, title) in ["third", "first", "second"].iter().enumerate() {
        let mut child = task(title, Some(parent.id), match i {
            0 => 2,
            1 => 0,
            _ => 1,
        });
        child.item_type = ItemType::Task;
        store.put_work_item(&child, None).await.unwrap();
    }

    let children = store.children_of(Some(parent.id)).await.unwrap();
    let titles: Vec<&str> = children.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["first", "second", "third"]);
}

#[tokio::test]
async fn batch_is_atomic() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let a = task("A", None, 0);
    let b = task("B", None, 1);
    store.put_work_item(&a, None).await.unwrap();
    store.put_work_item(&b, None).await.unwrap();

    let batch = WriteBatch::default()
        .with(WriteOp::SetSequence {
            id: a.id,
            sequence_order: 1,
        })
        .with(WriteOp::SetSequence {
            id: b.id,
            sequence_order: 0,
        });
    store.apply(batch).await.unwrap();

    let roots = store.children_of(None).await.unwrap();
    assert_eq!(roots[0].id, b.id);
    assert_eq!(roots[1].id, a.id);
}

#[tokio::test]
async fn delete_removes_index_and_logs() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let embedder = HashingEmbeddingProvider::new();
    let item = task("Indexed", None, 0);
    let embedding = embedder.embed(&item.embedding_text()).await.unwrap();
    store.put_work_item(&item, Some(&embedding)).await.unwrap();
    store
        .append_progress(&ProgressEvent::record(
            item.id,
            10,
            ItemStatus::InProgress,
            Utc::now(),
        ))
        .await
        .unwrap();

    assert!(store.delete_work_item(item.id).await.unwrap());

    let health = store.row_counts().await.unwrap();
    assert_eq!(health.work_items, 0);
    assert_eq!(health.indexed_vectors, 0);
    assert_eq!(health.progress_events, 0);
}

#[tokio::test]
async fn vector_search_ranks_by_similarity_and_respects_model_id() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let embedder = HashingEmbeddingProvider::new();

    let near = task("useEffect infinite render loop", None, 0);
    let far = task("database connection pooling strategy", None, 1);
    for item in [&near, &far] {
        let embedding = embedder.embed(&item.embedding_text()).await.unwrap();
        store.put_work_item(item, Some(&embedding)).await.unwrap();
    }

    let query = embedder.embed("infinite loop useEffect").await.unwrap();
    let hits = store
        .vector_search(&query.vector, 10, &[ContentType::WorkItem], embedder.model_id())
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, near.id.to_string());
    assert!(hits[0].score > hits[1].score);

    let none = store
        .vector_search(&query.vector, 10, &[ContentType::WorkItem], "other-model")
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn memory_slug_is_unique_per_corpus() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let now = Utc::now();
    let make = |id_title: &str| {
        MemoryItem::Troubleshoot(TroubleshootItem {
            id: jive_domain::value_objects::MemoryItemId::new(),
            slug: Slug::parse("dup-slug").unwrap(),
            title: id_title.to_owned(),
            ai_use_case: vec!["problem".to_owned()],
            ai_solutions: "fix".to_owned(),
            keywords: Vec::new(),
            tags: Vec::new(),
            usage_count: 0,
            success_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    };

    store.put_memory_item(&make("first"), None).await.unwrap();
    let err = store.put_memory_item(&make("second"), None).await.unwrap_err();
    assert!(matches!(err, Error::SlugDuplicate { .. }));

    let found = store
        .get_memory_by_slug(MemoryType::Troubleshoot, &Slug::parse("dup-slug").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.title(), "first");
}

#[tokio::test]
async fn progress_range_queries() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let item = task("Tracked", None, 0);
    store.put_work_item(&item, None).await.unwrap();

    let early = Utc::now() - chrono::Duration::hours(2);
    let late = Utc::now();
    for (at, pct) in [(early, 25u8), (late, 75u8)] {
        store
            .append_progress(&ProgressEvent::record(item.id, pct, ItemStatus::InProgress, at))
            .await
            .unwrap();
    }

    let all = store.list_progress(Some(item.id), None, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].percentage, 25);

    let recent = store
        .list_progress(Some(item.id), Some(late - chrono::Duration::minutes(5)), None)
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].percentage, 75);
}

#[tokio::test]
async fn search_documents_cover_requested_corpora() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let item = task("A work item", None, 0);
    store.put_work_item(&item, None).await.unwrap();

    let docs = store
        .search_documents(&[ContentType::WorkItem, ContentType::Troubleshoot])
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content_type, ContentType::WorkItem);
    assert_eq!(docs[0].keywords, vec!["backend"]);
}

#[tokio::test]
async fn dependents_lookup_decodes_the_list() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let dep = task("Dependency", None, 0);
    let mut user = task("User", None, 1);
    user.dependencies = vec![dep.id];
    store.put_work_item(&dep, None).await.unwrap();
    store.put_work_item(&user, None).await.unwrap();

    let dependents = store.dependents_of(dep.id).await.unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].id, user.id);

    assert!(store.dependents_of(user.id).await.unwrap().is_empty());
}
