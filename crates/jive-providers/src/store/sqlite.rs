//! SQLite implementation of the per-namespace store.
//!
//! One database file per namespace at `<root>/jive.db`, holding the six
//! logical tables. Multi-row writes run inside a single transaction via
//! [`NamespaceStore::apply`]; single writes are one-op batches so every
//! mutation goes down the same atomic path.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jive_domain::entities::{
    ExecutionRecord, MemoryItem, MemoryType, ProgressEvent, WorkItem,
};
use jive_domain::error::{Error, Result};
use jive_domain::ports::{
    NamespaceStore, SearchDoc, StoreHealth, VectorHit, WriteBatch, WriteOp,
};
use jive_domain::value_objects::{
    ContentType, Embedding, ExecutionId, MemoryItemId, Namespace, Slug, WorkItemFilter,
    WorkItemId, cosine_similarity,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Row, SqliteConnection};

use super::ddl::SCHEMA;
use super::retry::with_retry;
use super::rows;

/// Database file name inside the namespace root.
pub const DB_FILE_NAME: &str = "jive.db";

fn map_sqlx(e: sqlx::Error) -> Error {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            // The only unique constraints besides primary keys are the memory
            // slug columns.
            return Error::SlugDuplicate {
                slug: db_err.message().to_owned(),
            };
        }
    }
    Error::store_with_source("sqlite operation failed", e)
}

/// SQLite-backed namespace store.
#[derive(Debug, Clone)]
pub struct SqliteNamespaceStore {
    namespace: Namespace,
    pool: SqlitePool,
}

impl SqliteNamespaceStore {
    /// Open (creating if needed) the store for a namespace rooted at
    /// `namespace_root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the root cannot be created and
    /// [`Error::Store`] when the database cannot be opened or migrated.
    pub async fn open(namespace: Namespace, namespace_root: &Path) -> Result<Self> {
        std::fs::create_dir_all(namespace_root).map_err(|e| {
            Error::io_with_source(
                format!("cannot create namespace root {}", namespace_root.display()),
                e,
            )
        })?;
        let options = SqliteConnectOptions::new()
            .filename(namespace_root.join(DB_FILE_NAME))
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(map_sqlx)?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(map_sqlx)?;
        }
        Ok(Self { namespace, pool })
    }

    async fn exec_index_vector(
        conn: &mut SqliteConnection,
        entity_id: &str,
        content_type: ContentType,
        embedding: &Embedding,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO SearchIndex \
             (entity_id, content_type, model_id, dimensions, vector, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entity_id)
        .bind(content_type.as_str())
        .bind(&embedding.model)
        .bind(embedding.dimensions as i64)
        .bind(rows::encode_vector(&embedding.vector))
        .bind(rows::encode_time(updated_at))
        .execute(conn)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn exec_put_work_item(
        conn: &mut SqliteConnection,
        item: &WorkItem,
        embedding: Option<&Embedding>,
    ) -> Result<()> {
        let dependencies: Vec<String> =
            item.dependencies.iter().map(ToString::to_string).collect();
        sqlx::query(
            "INSERT OR REPLACE INTO WorkItem \
             (id, item_type, title, description, status, priority, complexity, parent_id, \
              sequence_order, acceptance_criteria, context_tags, dependencies, notes, \
              progress_percentage, due_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id.to_string())
        .bind(item.item_type.as_str())
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.priority.as_str())
        .bind(item.complexity.map(|c| c.as_str()))
        .bind(item.parent_id.map(|p| p.to_string()))
        .bind(item.sequence_order)
        .bind(rows::encode_json(&item.acceptance_criteria)?)
        .bind(rows::encode_json(&item.context_tags)?)
        .bind(rows::encode_json(&dependencies)?)
        .bind(item.notes.as_deref())
        .bind(i64::from(item.progress_percentage))
        .bind(item.due_date.map(rows::encode_time))
        .bind(rows::encode_time(item.created_at))
        .bind(rows::encode_time(item.updated_at))
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;

        if let Some(embedding) = embedding {
            Self::exec_index_vector(
                conn,
                &item.id.to_string(),
                ContentType::WorkItem,
                embedding,
                item.updated_at,
            )
            .await?;
        }
        Ok(())
    }

    async fn exec_delete_work_item(conn: &mut SqliteConnection, id: WorkItemId) -> Result<bool> {
        let id_text = id.to_string();
        let deleted = sqlx::query("DELETE FROM WorkItem WHERE id = ?")
            .bind(&id_text)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected();
        sqlx::query("DELETE FROM SearchIndex WHERE entity_id = ? AND content_type = ?")
            .bind(&id_text)
            .bind(ContentType::WorkItem.as_str())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?;
        sqlx::query("DELETE FROM ExecutionLog WHERE work_item_id = ?")
            .bind(&id_text)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?;
        sqlx::query("DELETE FROM ProgressEvent WHERE entity_id = ?")
            .bind(&id_text)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?;
        Ok(deleted > 0)
    }

    async fn exec_set_sequence(
        conn: &mut SqliteConnection,
        id: WorkItemId,
        sequence_order: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE WorkItem SET sequence_order = ? WHERE id = ?")
            .bind(sequence_order)
            .bind(id.to_string())
            .execute(conn)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn exec_put_memory_item(
        conn: &mut SqliteConnection,
        item: &MemoryItem,
        embedding: Option<&Embedding>,
    ) -> Result<()> {
        match item {
            MemoryItem::Architecture(arch) => {
                sqlx::query(
                    "INSERT OR REPLACE INTO ArchitectureMemory \
                     (id, slug, title, ai_requirements, ai_when_to_use, keywords, \
                      children_slugs, related_slugs, linked_epic_ids, tags, version, \
                      created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(arch.id.to_string())
                .bind(arch.slug.as_str())
                .bind(&arch.title)
                .bind(&arch.ai_requirements)
                .bind(rows::encode_json(&arch.ai_when_to_use)?)
                .bind(rows::encode_json(&arch.keywords)?)
                .bind(rows::encode_json(&arch.children_slugs)?)
                .bind(rows::encode_json(&arch.related_slugs)?)
                .bind(rows::encode_json(&arch.linked_epic_ids)?)
                .bind(rows::encode_json(&arch.tags)?)
                .bind(i64::from(arch.version))
                .bind(rows::encode_time(arch.created_at))
                .bind(rows::encode_time(arch.updated_at))
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx)?;
            }
            MemoryItem::Troubleshoot(ts) => {
                sqlx::query(
                    "INSERT OR REPLACE INTO TroubleshootMemory \
                     (id, slug, title, ai_use_case, ai_solutions, keywords, tags, \
                      usage_count, success_count, version, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(ts.id.to_string())
                .bind(ts.slug.as_str())
                .bind(&ts.title)
                .bind(rows::encode_json(&ts.ai_use_case)?)
                .bind(&ts.ai_solutions)
                .bind(rows::encode_json(&ts.keywords)?)
                .bind(rows::encode_json(&ts.tags)?)
                .bind(ts.usage_count as i64)
                .bind(ts.success_count as i64)
                .bind(i64::from(ts.version))
                .bind(rows::encode_time(ts.created_at))
                .bind(rows::encode_time(ts.updated_at))
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx)?;
            }
        }

        if let Some(embedding) = embedding {
            let content_type = match item.memory_type() {
                MemoryType::Architecture => ContentType::Architecture,
                MemoryType::Troubleshoot => ContentType::Troubleshoot,
            };
            Self::exec_index_vector(
                conn,
                &item.id().to_string(),
                content_type,
                embedding,
                item.updated_at(),
            )
            .await?;
        }
        Ok(())
    }

    async fn exec_delete_memory_item(
        conn: &mut SqliteConnection,
        id: MemoryItemId,
    ) -> Result<bool> {
        let id_text = id.to_string();
        let mut deleted = sqlx::query("DELETE FROM ArchitectureMemory WHERE id = ?")
            .bind(&id_text)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected();
        deleted += sqlx::query("DELETE FROM TroubleshootMemory WHERE id = ?")
            .bind(&id_text)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected();
        sqlx::query(
            "DELETE FROM SearchIndex WHERE entity_id = ? AND content_type IN (?, ?)",
        )
        .bind(&id_text)
        .bind(ContentType::Architecture.as_str())
        .bind(ContentType::Troubleshoot.as_str())
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
        Ok(deleted > 0)
    }

    async fn exec_append_progress(
        conn: &mut SqliteConnection,
        event: &ProgressEvent,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO ProgressEvent (id, entity_id, percentage, status, notes, blockers, at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(event.id.to_string())
        .bind(event.entity_id.to_string())
        .bind(i64::from(event.percentage))
        .bind(event.status.as_str())
        .bind(event.notes.as_deref())
        .bind(rows::encode_json(&event.blockers)?)
        .bind(rows::encode_time(event.at))
        .execute(conn)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn apply_once(&self, batch: &WriteBatch) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        for op in &batch.ops {
            match op {
                WriteOp::PutWorkItem { item, embedding } => {
                    Self::exec_put_work_item(&mut *tx, item, embedding.as_ref()).await?;
                }
                WriteOp::DeleteWorkItem { id } => {
                    Self::exec_delete_work_item(&mut *tx, *id).await?;
                }
                WriteOp::SetSequence { id, sequence_order } => {
                    Self::exec_set_sequence(&mut *tx, *id, *sequence_order).await?;
                }
                WriteOp::PutMemoryItem { item, embedding } => {
                    Self::exec_put_memory_item(&mut *tx, item, embedding.as_ref()).await?;
                }
                WriteOp::DeleteMemoryItem { id } => {
                    Self::exec_delete_memory_item(&mut *tx, *id).await?;
                }
                WriteOp::AppendProgress { event } => {
                    Self::exec_append_progress(&mut *tx, event).await?;
                }
            }
        }
        tx.commit().await.map_err(map_sqlx)?;
        Ok(())
    }

    async fn fetch_work_items(&self, filter: &WorkItemFilter) -> Result<Vec<WorkItem>> {
        let mut builder = sqlx::QueryBuilder::new("SELECT * FROM WorkItem WHERE 1 = 1");
        if let Some(item_type) = filter.item_type {
            builder.push(" AND item_type = ").push_bind(item_type.as_str());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(priority) = filter.priority {
            builder.push(" AND priority = ").push_bind(priority.as_str());
        }
        if let Some(parent_id) = filter.parent_id {
            builder.push(" AND parent_id = ").push_bind(parent_id.to_string());
        }
        let query_rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut items = Vec::with_capacity(query_rows.len());
        for row in &query_rows {
            items.push(rows::work_item_from_row(row)?);
        }
        if !filter.tags.is_empty() {
            items.retain(|item| {
                filter
                    .tags
                    .iter()
                    .any(|tag| item.context_tags.iter().any(|t| t == tag))
            });
        }
        Ok(items)
    }
}

#[async_trait]
impl NamespaceStore for SqliteNamespaceStore {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn put_work_item(&self, item: &WorkItem, embedding: Option<&Embedding>) -> Result<()> {
        let batch = WriteBatch::default().with(WriteOp::PutWorkItem {
            item: item.clone(),
            embedding: embedding.cloned(),
        });
        self.apply(batch).await
    }

    async fn get_work_item(&self, id: WorkItemId) -> Result<Option<WorkItem>> {
        with_retry("get_work_item", || async {
            let row = sqlx::query("SELECT * FROM WorkItem WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
            row.as_ref().map(rows::work_item_from_row).transpose()
        })
        .await
    }

    async fn delete_work_item(&self, id: WorkItemId) -> Result<bool> {
        let existed = self.get_work_item(id).await?.is_some();
        self.apply(WriteBatch::default().with(WriteOp::DeleteWorkItem { id }))
            .await?;
        Ok(existed)
    }

    async fn list_work_items(&self, filter: &WorkItemFilter) -> Result<Vec<WorkItem>> {
        with_retry("list_work_items", || self.fetch_work_items(filter)).await
    }

    async fn children_of(&self, parent_id: Option<WorkItemId>) -> Result<Vec<WorkItem>> {
        with_retry("children_of", || async {
            let query_rows = match parent_id {
                Some(parent) => {
                    sqlx::query(
                        "SELECT * FROM WorkItem WHERE parent_id = ? ORDER BY sequence_order, id",
                    )
                    .bind(parent.to_string())
                    .fetch_all(&self.pool)
                    .await
                }
                None => {
                    sqlx::query(
                        "SELECT * FROM WorkItem WHERE parent_id IS NULL \
                         ORDER BY sequence_order, id",
                    )
                    .fetch_all(&self.pool)
                    .await
                }
            }
            .map_err(map_sqlx)?;
            query_rows.iter().map(rows::work_item_from_row).collect()
        })
        .await
    }

    async fn dependents_of(&self, id: WorkItemId) -> Result<Vec<WorkItem>> {
        // LIKE narrows the scan; the decoded dependency list is the source of
        // truth.
        let pattern = format!("%{id}%");
        let query_rows = sqlx::query("SELECT * FROM WorkItem WHERE dependencies LIKE ?")
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        let mut dependents = Vec::new();
        for row in &query_rows {
            let item = rows::work_item_from_row(row)?;
            if item.dependencies.contains(&id) {
                dependents.push(item);
            }
        }
        Ok(dependents)
    }

    async fn apply(&self, batch: WriteBatch) -> Result<()> {
        with_retry("apply", || self.apply_once(&batch)).await
    }

    async fn put_memory_item(
        &self,
        item: &MemoryItem,
        embedding: Option<&Embedding>,
    ) -> Result<()> {
        let batch = WriteBatch::default().with(WriteOp::PutMemoryItem {
            item: item.clone(),
            embedding: embedding.cloned(),
        });
        self.apply(batch).await
    }

    async fn get_memory_item(&self, id: MemoryItemId) -> Result<Option<MemoryItem>> {
        let id_text = id.to_string();
        if let Some(row) = sqlx::query("SELECT * FROM ArchitectureMemory WHERE id = ?")
            .bind(&id_text)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
        {
            return rows::architecture_from_row(&row).map(Some);
        }
        if let Some(row) = sqlx::query("SELECT * FROM TroubleshootMemory WHERE id = ?")
            .bind(&id_text)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
        {
            return rows::troubleshoot_from_row(&row).map(Some);
        }
        Ok(None)
    }

    async fn get_memory_by_slug(
        &self,
        memory_type: MemoryType,
        slug: &Slug,
    ) -> Result<Option<MemoryItem>> {
        match memory_type {
            MemoryType::Architecture => {
                let row = sqlx::query("SELECT * FROM ArchitectureMemory WHERE slug = ?")
                    .bind(slug.as_str())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx)?;
                row.as_ref().map(rows::architecture_from_row).transpose()
            }
            MemoryType::Troubleshoot => {
                let row = sqlx::query("SELECT * FROM TroubleshootMemory WHERE slug = ?")
                    .bind(slug.as_str())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx)?;
                row.as_ref().map(rows::troubleshoot_from_row).transpose()
            }
        }
    }

    async fn list_memory_items(&self, memory_type: MemoryType) -> Result<Vec<MemoryItem>> {
        with_retry("list_memory_items", || async {
            match memory_type {
                MemoryType::Architecture => {
                    let query_rows =
                        sqlx::query("SELECT * FROM ArchitectureMemory ORDER BY slug")
                            .fetch_all(&self.pool)
                            .await
                            .map_err(map_sqlx)?;
                    query_rows.iter().map(rows::architecture_from_row).collect()
                }
                MemoryType::Troubleshoot => {
                    let query_rows =
                        sqlx::query("SELECT * FROM TroubleshootMemory ORDER BY slug")
                            .fetch_all(&self.pool)
                            .await
                            .map_err(map_sqlx)?;
                    query_rows.iter().map(rows::troubleshoot_from_row).collect()
                }
            }
        })
        .await
    }

    async fn delete_memory_item(&self, id: MemoryItemId) -> Result<bool> {
        let existed = self.get_memory_item(id).await?.is_some();
        self.apply(WriteBatch::default().with(WriteOp::DeleteMemoryItem { id }))
            .await?;
        Ok(existed)
    }

    async fn put_execution(&self, record: &ExecutionRecord) -> Result<()> {
        with_retry("put_execution", || async {
            sqlx::query(
                "INSERT OR REPLACE INTO ExecutionLog \
                 (execution_id, work_item_id, mode, status, started_at, ended_at, \
                  agent_context, validation_issues, artifacts) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(record.execution_id.to_string())
            .bind(record.work_item_id.to_string())
            .bind(record.mode.as_str())
            .bind(record.status.as_str())
            .bind(rows::encode_time(record.started_at))
            .bind(record.ended_at.map(rows::encode_time))
            .bind(rows::encode_json(&record.agent_context)?)
            .bind(rows::encode_json(&record.validation_issues)?)
            .bind(rows::encode_json(&record.artifacts)?)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
            Ok(())
        })
        .await
    }

    async fn get_execution(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>> {
        let row = sqlx::query("SELECT * FROM ExecutionLog WHERE execution_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.as_ref().map(rows::execution_from_row).transpose()
    }

    async fn list_executions(&self, work_item_id: WorkItemId) -> Result<Vec<ExecutionRecord>> {
        let query_rows = sqlx::query(
            "SELECT * FROM ExecutionLog WHERE work_item_id = ? ORDER BY started_at DESC",
        )
        .bind(work_item_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        query_rows.iter().map(rows::execution_from_row).collect()
    }

    async fn append_progress(&self, event: &ProgressEvent) -> Result<()> {
        with_retry("append_progress", || async {
            let mut conn = self.pool.acquire().await.map_err(map_sqlx)?;
            Self::exec_append_progress(&mut *conn, event).await
        })
        .await
    }

    async fn list_progress(
        &self,
        entity_id: Option<WorkItemId>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProgressEvent>> {
        let mut builder = sqlx::QueryBuilder::new("SELECT * FROM ProgressEvent WHERE 1 = 1");
        if let Some(entity) = entity_id {
            builder.push(" AND entity_id = ").push_bind(entity.to_string());
        }
        if let Some(since) = since {
            builder.push(" AND at >= ").push_bind(rows::encode_time(since));
        }
        if let Some(until) = until {
            builder.push(" AND at <= ").push_bind(rows::encode_time(until));
        }
        builder.push(" ORDER BY at ASC");
        let query_rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        query_rows.iter().map(rows::progress_from_row).collect()
    }

    async fn vector_search(
        &self,
        query: &[f32],
        k: usize,
        content_types: &[ContentType],
        model_id: &str,
    ) -> Result<Vec<VectorHit>> {
        if content_types.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT entity_id, content_type, vector FROM SearchIndex WHERE model_id = ",
        );
        builder.push_bind(model_id);
        builder.push(" AND content_type IN (");
        let mut separated = builder.separated(", ");
        for content_type in content_types {
            separated.push_bind(content_type.as_str());
        }
        builder.push(")");

        let query_rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut hits = Vec::with_capacity(query_rows.len());
        for row in &query_rows {
            let entity_id: String = row.try_get("entity_id").map_err(rows::map_row_err)?;
            let content_type: String = row.try_get("content_type").map_err(rows::map_row_err)?;
            let blob: Vec<u8> = row.try_get("vector").map_err(rows::map_row_err)?;
            let vector = rows::decode_vector(&blob);
            let content_type = content_type
                .parse::<ContentType>()
                .map_err(Error::store)?;
            hits.push(VectorHit {
                id: entity_id,
                content_type,
                score: cosine_similarity(query, &vector),
            });
        }
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn search_documents(&self, content_types: &[ContentType]) -> Result<Vec<SearchDoc>> {
        let mut docs = Vec::new();
        for content_type in content_types {
            match content_type {
                ContentType::WorkItem => {
                    let items = self.fetch_work_items(&WorkItemFilter::default()).await?;
                    docs.extend(items.into_iter().map(|item| SearchDoc {
                        id: item.id.to_string(),
                        content_type: ContentType::WorkItem,
                        title: item.title,
                        body: item.description,
                        keywords: item.context_tags,
                        updated_at: item.updated_at,
                    }));
                }
                ContentType::Architecture => {
                    for item in self.list_memory_items(MemoryType::Architecture).await? {
                        if let MemoryItem::Architecture(arch) = item {
                            docs.push(SearchDoc {
                                id: arch.id.to_string(),
                                content_type: ContentType::Architecture,
                                title: arch.title,
                                body: arch.ai_requirements,
                                keywords: arch.keywords,
                                updated_at: arch.updated_at,
                            });
                        }
                    }
                }
                ContentType::Troubleshoot => {
                    for item in self.list_memory_items(MemoryType::Troubleshoot).await? {
                        if let MemoryItem::Troubleshoot(ts) = item {
                            docs.push(SearchDoc {
                                id: ts.id.to_string(),
                                content_type: ContentType::Troubleshoot,
                                title: ts.title,
                                body: ts.ai_solutions,
                                keywords: ts.keywords,
                                updated_at: ts.updated_at,
                            });
                        }
                    }
                }
            }
        }
        Ok(docs)
    }

    async fn row_counts(&self) -> Result<StoreHealth> {
        async fn count(pool: &SqlitePool, table: &str) -> Result<usize> {
            let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
                .fetch_one(pool)
                .await
                .map_err(map_sqlx)?;
            let n: i64 = row.try_get("n").map_err(rows::map_row_err)?;
            Ok(n.max(0) as usize)
        }
        Ok(StoreHealth {
            work_items: count(&self.pool, "WorkItem").await?,
            executions: count(&self.pool, "ExecutionLog").await?,
            progress_events: count(&self.pool, "ProgressEvent").await?,
            architecture_items: count(&self.pool, "ArchitectureMemory").await?,
            troubleshoot_items: count(&self.pool, "TroubleshootMemory").await?,
            indexed_vectors: count(&self.pool, "SearchIndex").await?,
        })
    }
}
