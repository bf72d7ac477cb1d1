//! Memory corpus service.
//!
//! CRUD and usage tracking for the architecture and troubleshoot corpora.
//! Slugs are unique per namespace and immutable after creation; usage
//! counters only move through [`MemoryService::record_use`].

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use jive_domain::entities::memory::{
    ArchitectureItem, MemoryItem, MemoryType, TroubleshootItem,
};
use jive_domain::error::{Error, Result};
use jive_domain::ports::{EmbeddingProvider, NamespaceStore};
use jive_domain::validation::{self, ArchitectureDraft, TroubleshootDraft};
use jive_domain::value_objects::{ListPage, MemoryItemId, Page, Slug};
use serde::Deserialize;

/// Sort key for memory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySort {
    /// Last modification, newest first
    #[default]
    UpdatedAt,
    /// Lexicographic title
    Title,
    /// Usage counter, highest first (troubleshoot only)
    UsageCount,
}

/// Partial update for a memory item; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryPatch {
    /// New title
    pub title: Option<String>,
    /// New requirements body (architecture)
    pub ai_requirements: Option<String>,
    /// New when-to-use list (architecture)
    pub ai_when_to_use: Option<Vec<String>>,
    /// New problem statements (troubleshoot)
    pub ai_use_case: Option<Vec<String>>,
    /// New solutions body (troubleshoot)
    pub ai_solutions: Option<String>,
    /// New keywords
    pub keywords: Option<Vec<String>>,
    /// New child slugs (architecture)
    pub children_slugs: Option<Vec<String>>,
    /// New related slugs (architecture)
    pub related_slugs: Option<Vec<String>>,
    /// New epic links (architecture)
    pub linked_epic_ids: Option<Vec<String>>,
    /// New tags
    pub tags: Option<Vec<String>>,
}

impl MemoryPatch {
    fn touches_indexed_text(&self) -> bool {
        self.title.is_some()
            || self.ai_requirements.is_some()
            || self.ai_when_to_use.is_some()
            || self.ai_use_case.is_some()
            || self.ai_solutions.is_some()
            || self.keywords.is_some()
    }
}

/// Memory operations over one namespace.
pub struct MemoryService {
    store: Arc<dyn NamespaceStore>,
    embedding: Arc<dyn EmbeddingProvider>,
}

impl MemoryService {
    /// Bind the service to a namespace store and embedding engine.
    #[must_use]
    pub fn new(store: Arc<dyn NamespaceStore>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedding }
    }

    async fn index_and_put(&self, item: &MemoryItem) -> Result<()> {
        let embedding = self.embedding.embed(&item.embedding_text()).await?;
        self.store.put_memory_item(item, Some(&embedding)).await
    }

    async fn ensure_slug_free(&self, memory_type: MemoryType, slug: &Slug) -> Result<()> {
        if self
            .store
            .get_memory_by_slug(memory_type, slug)
            .await?
            .is_some()
        {
            return Err(Error::SlugDuplicate {
                slug: slug.to_string(),
            });
        }
        Ok(())
    }

    /// Create an architecture item from a validated draft.
    pub async fn create_architecture(&self, draft: ArchitectureDraft) -> Result<MemoryItem> {
        validation::check(&draft)?;
        let slug = Slug::parse(&draft.slug)?;
        self.ensure_slug_free(MemoryType::Architecture, &slug).await?;
        let now = Utc::now();
        let item = MemoryItem::Architecture(ArchitectureItem {
            id: MemoryItemId::new(),
            slug,
            title: draft.title,
            ai_requirements: draft.ai_requirements,
            ai_when_to_use: draft.ai_when_to_use,
            keywords: draft.keywords,
            children_slugs: draft.children_slugs,
            related_slugs: draft.related_slugs,
            linked_epic_ids: draft.linked_epic_ids,
            tags: draft.tags,
            version: 1,
            created_at: now,
            updated_at: now,
        });
        self.index_and_put(&item).await?;
        Ok(item)
    }

    /// Create a troubleshoot item from a validated draft.
    pub async fn create_troubleshoot(&self, draft: TroubleshootDraft) -> Result<MemoryItem> {
        validation::check(&draft)?;
        let slug = Slug::parse(&draft.slug)?;
        self.ensure_slug_free(MemoryType::Troubleshoot, &slug).await?;
        let now = Utc::now();
        let item = MemoryItem::Troubleshoot(TroubleshootItem {
            id: MemoryItemId::new(),
            slug,
            title: draft.title,
            ai_use_case: draft.ai_use_case,
            ai_solutions: draft.ai_solutions,
            keywords: draft.keywords,
            tags: draft.tags,
            usage_count: 0,
            success_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        });
        self.index_and_put(&item).await?;
        Ok(item)
    }

    /// Resolve a memory reference: UUID first, slug as a fallback.
    pub async fn resolve(&self, memory_type: MemoryType, reference: &str) -> Result<MemoryItem> {
        if let Ok(id) = MemoryItemId::from_str(reference) {
            if let Some(item) = self.store.get_memory_item(id).await? {
                if item.memory_type() == memory_type {
                    return Ok(item);
                }
            }
            return Err(Error::not_found(format!(
                "{} memory {reference}",
                memory_type.as_str()
            )));
        }
        let slug = Slug::parse(reference)?;
        self.store
            .get_memory_by_slug(memory_type, &slug)
            .await?
            .ok_or_else(|| {
                Error::not_found(format!("{} memory '{slug}'", memory_type.as_str()))
            })
    }

    /// Apply a patch, bumping version and re-indexing when text changed.
    pub async fn update(
        &self,
        memory_type: MemoryType,
        reference: &str,
        patch: MemoryPatch,
    ) -> Result<MemoryItem> {
        let re_embed = patch.touches_indexed_text();
        let mut item = self.resolve(memory_type, reference).await?;
        let now = Utc::now();
        match &mut item {
            MemoryItem::Architecture(arch) => {
                if let Some(title) = patch.title {
                    arch.title = title;
                }
                if let Some(requirements) = patch.ai_requirements {
                    arch.ai_requirements = requirements;
                }
                if let Some(when_to_use) = patch.ai_when_to_use {
                    arch.ai_when_to_use = when_to_use;
                }
                if let Some(keywords) = patch.keywords {
                    arch.keywords = keywords;
                }
                if let Some(children) = patch.children_slugs {
                    arch.children_slugs = children;
                }
                if let Some(related) = patch.related_slugs {
                    arch.related_slugs = related;
                }
                if let Some(epics) = patch.linked_epic_ids {
                    arch.linked_epic_ids = epics;
                }
                if let Some(tags) = patch.tags {
                    arch.tags = tags;
                }
                arch.version += 1;
                arch.updated_at = now;
            }
            MemoryItem::Troubleshoot(ts) => {
                if let Some(title) = patch.title {
                    ts.title = title;
                }
                if let Some(use_case) = patch.ai_use_case {
                    ts.ai_use_case = use_case;
                }
                if let Some(solutions) = patch.ai_solutions {
                    ts.ai_solutions = solutions;
                }
                if let Some(keywords) = patch.keywords {
                    ts.keywords = keywords;
                }
                if let Some(tags) = patch.tags {
                    ts.tags = tags;
                }
                ts.version += 1;
                ts.updated_at = now;
            }
        }

        if re_embed {
            self.index_and_put(&item).await?;
        } else {
            self.store.put_memory_item(&item, None).await?;
        }
        Ok(item)
    }

    /// Delete by id or slug.
    pub async fn delete(&self, memory_type: MemoryType, reference: &str) -> Result<MemoryItem> {
        let item = self.resolve(memory_type, reference).await?;
        self.store.delete_memory_item(item.id()).await?;
        Ok(item)
    }

    /// List one corpus with sorting and pagination.
    pub async fn list(
        &self,
        memory_type: MemoryType,
        sort: MemorySort,
        page: Page,
    ) -> Result<ListPage<MemoryItem>> {
        let mut items = self.store.list_memory_items(memory_type).await?;
        items.sort_by(|a, b| {
            let ordering = match sort {
                MemorySort::UpdatedAt => b.updated_at().cmp(&a.updated_at()),
                MemorySort::Title => a.title().cmp(b.title()),
                MemorySort::UsageCount => {
                    let usage = |item: &MemoryItem| match item {
                        MemoryItem::Troubleshoot(ts) => ts.usage_count,
                        MemoryItem::Architecture(_) => 0,
                    };
                    usage(b).cmp(&usage(a))
                }
            };
            ordering.then_with(|| a.id().cmp(&b.id()))
        });
        Ok(ListPage::paginate(items, page))
    }

    /// Record that a troubleshoot entry was surfaced, and whether it helped.
    pub async fn record_use(&self, reference: &str, success: bool) -> Result<MemoryItem> {
        let mut item = self.resolve(MemoryType::Troubleshoot, reference).await?;
        let MemoryItem::Troubleshoot(ts) = &mut item else {
            return Err(Error::validation("record_use applies to troubleshoot items"));
        };
        ts.usage_count += 1;
        if success {
            ts.success_count += 1;
        }
        ts.updated_at = Utc::now();
        self.store.put_memory_item(&item, None).await?;
        Ok(item)
    }
}
