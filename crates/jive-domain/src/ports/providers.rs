//! External provider ports: embedding engine and namespace-scoped store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{ExecutionRecord, MemoryItem, MemoryType, ProgressEvent, WorkItem};
use crate::error::Result;
use crate::value_objects::{
    ContentType, Embedding, ExecutionId, MemoryItemId, Namespace, Slug, WorkItemFilter, WorkItemId,
};

// ============================================================================
// Embedding
// ============================================================================

/// Local text-to-vector engine.
///
/// Implementations run in-process, L2-normalise every vector, and truncate
/// over-long inputs deterministically (prefix, no sampling).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model fails.
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let embeddings = self.embed_batch(&[text.to_owned()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::Error::embedding("No embedding returned"))
    }

    /// Embed a batch of texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Fixed output dimension of the model.
    fn dimensions(&self) -> usize;

    /// Deterministic identifier of the loaded model.
    fn model_id(&self) -> &str;

    /// Startup probe: verifies the model produces vectors of the advertised
    /// dimension.
    async fn health_check(&self) -> Result<()> {
        let embedding = self.embed("health check").await?;
        if embedding.dimensions != self.dimensions() {
            return Err(crate::error::Error::embedding(format!(
                "model produced {} dimensions, expected {}",
                embedding.dimensions,
                self.dimensions()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Namespace store
// ============================================================================

/// One mutation inside an atomic write batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert or replace a work item, optionally re-indexing its vector
    PutWorkItem {
        /// The row to write
        item: WorkItem,
        /// Fresh embedding, when indexed text changed
        embedding: Option<Embedding>,
    },
    /// Remove a work item and its index entry
    DeleteWorkItem {
        /// Target row id
        id: WorkItemId,
    },
    /// Update only the sibling position of an item
    SetSequence {
        /// Target row id
        id: WorkItemId,
        /// New dense position
        sequence_order: i64,
    },
    /// Insert or replace a memory item, optionally re-indexing its vector
    PutMemoryItem {
        /// The row to write
        item: MemoryItem,
        /// Fresh embedding, when indexed text changed
        embedding: Option<Embedding>,
    },
    /// Remove a memory item and its index entry
    DeleteMemoryItem {
        /// Target row id
        id: MemoryItemId,
    },
    /// Append a progress event
    AppendProgress {
        /// The event to append
        event: ProgressEvent,
    },
}

/// An all-or-nothing group of mutations.
///
/// The store executes the whole batch inside one transaction; a failure on
/// any op restores the pre-batch state.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    /// Ordered mutations
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Append an op, builder-style.
    #[must_use]
    pub fn with(mut self, op: WriteOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Append an op in place.
    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }
}

/// One hit from the vector index.
#[derive(Debug, Clone)]
pub struct VectorHit {
    /// Entity id as stored in the index
    pub id: String,
    /// Corpus of the entity
    pub content_type: ContentType,
    /// Cosine similarity to the query vector
    pub score: f32,
}

/// One document fed to the keyword scorer.
#[derive(Debug, Clone)]
pub struct SearchDoc {
    /// Entity id
    pub id: String,
    /// Corpus of the entity
    pub content_type: ContentType,
    /// Title field
    pub title: String,
    /// Long-form body (description / requirements / solutions)
    pub body: String,
    /// Explicit keywords, when the entity carries them
    pub keywords: Vec<String>,
    /// Last modification time, the ranking tie-break
    pub updated_at: DateTime<Utc>,
}

/// Per-table row counts reported by the health probe.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreHealth {
    /// Rows in the work item table
    pub work_items: usize,
    /// Rows in the execution log
    pub executions: usize,
    /// Rows in the progress log
    pub progress_events: usize,
    /// Rows in architecture memory
    pub architecture_items: usize,
    /// Rows in troubleshoot memory
    pub troubleshoot_items: usize,
    /// Rows in the vector index
    pub indexed_vectors: usize,
}

/// Physical persistence for one namespace.
///
/// Every operation is scoped to the namespace the handle was opened for; no
/// operation accepts a reference outside it. Single writes are atomic and
/// durable before they return; multi-row writes go through [`Self::apply`].
#[async_trait]
pub trait NamespaceStore: Send + Sync {
    /// The namespace this handle is bound to.
    fn namespace(&self) -> &Namespace;

    // --- Work items ---

    /// Insert or replace a work item; re-indexes when an embedding is given.
    async fn put_work_item(&self, item: &WorkItem, embedding: Option<&Embedding>) -> Result<()>;

    /// Fetch a work item by id.
    async fn get_work_item(&self, id: WorkItemId) -> Result<Option<WorkItem>>;

    /// Delete a single work item; returns false when the row was absent.
    async fn delete_work_item(&self, id: WorkItemId) -> Result<bool>;

    /// All rows matching the filter, unsorted and unpaginated.
    async fn list_work_items(&self, filter: &WorkItemFilter) -> Result<Vec<WorkItem>>;

    /// Direct children of `parent_id` (roots for `None`), ordered by
    /// `sequence_order`.
    async fn children_of(&self, parent_id: Option<WorkItemId>) -> Result<Vec<WorkItem>>;

    /// Items whose dependency set contains `id`.
    async fn dependents_of(&self, id: WorkItemId) -> Result<Vec<WorkItem>>;

    // --- Batched writes ---

    /// Apply a batch atomically under the store's transaction.
    async fn apply(&self, batch: WriteBatch) -> Result<()>;

    // --- Memory items ---

    /// Insert or replace a memory item; re-indexes when an embedding is given.
    async fn put_memory_item(&self, item: &MemoryItem, embedding: Option<&Embedding>)
    -> Result<()>;

    /// Fetch a memory item by id.
    async fn get_memory_item(&self, id: MemoryItemId) -> Result<Option<MemoryItem>>;

    /// Fetch a memory item by corpus and slug.
    async fn get_memory_by_slug(
        &self,
        memory_type: MemoryType,
        slug: &Slug,
    ) -> Result<Option<MemoryItem>>;

    /// All memory items of a corpus.
    async fn list_memory_items(&self, memory_type: MemoryType) -> Result<Vec<MemoryItem>>;

    /// Delete a memory item; returns false when the row was absent.
    async fn delete_memory_item(&self, id: MemoryItemId) -> Result<bool>;

    // --- Execution log ---

    /// Insert or replace an execution record.
    async fn put_execution(&self, record: &ExecutionRecord) -> Result<()>;

    /// Fetch an execution record by id.
    async fn get_execution(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>>;

    /// All execution records for a work item, newest first.
    async fn list_executions(&self, work_item_id: WorkItemId) -> Result<Vec<ExecutionRecord>>;

    // --- Progress log ---

    /// Append a progress event.
    async fn append_progress(&self, event: &ProgressEvent) -> Result<()>;

    /// Progress events, optionally bounded to one item and a time range,
    /// oldest first.
    async fn list_progress(
        &self,
        entity_id: Option<WorkItemId>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProgressEvent>>;

    // --- Search ---

    /// Nearest rows by cosine similarity, restricted to `content_types` and
    /// to vectors produced by `model_id`.
    async fn vector_search(
        &self,
        query: &[f32],
        k: usize,
        content_types: &[ContentType],
        model_id: &str,
    ) -> Result<Vec<VectorHit>>;

    /// Keyword-searchable documents for the given corpora.
    async fn search_documents(&self, content_types: &[ContentType]) -> Result<Vec<SearchDoc>>;

    // --- Health ---

    /// Row counts for the health endpoint.
    async fn row_counts(&self) -> Result<StoreHealth>;
}
