//! Handlers for `jive_sync_data` and `jive_memory`.

use std::path::PathBuf;

use jive_application::codec::TransferService;
use jive_application::sync_service::SyncService;
use jive_application::use_cases::{MemoryPatch, MemoryService, MemorySort, SearchService};
use jive_domain::entities::memory::MemoryType;
use jive_domain::error::{Error, Result};
use jive_domain::validation::{ArchitectureDraft, TroubleshootDraft};
use jive_domain::value_objects::ContentType;
use jive_infrastructure::ServiceContext;
use serde_json::{Value, json};

use super::helpers;
use crate::args::{MemoryArgs, SyncDataArgs};

fn workspace_dir(ctx: &ServiceContext, namespace: &str, requested: Option<&str>) -> PathBuf {
    requested.map_or_else(
        || ctx.config().namespace_root(namespace).join("workspace"),
        PathBuf::from,
    )
}

/// `jive_sync_data`: bidirectional file <-> store synchronization.
pub async fn sync(ctx: &ServiceContext, args: SyncDataArgs) -> Result<Value> {
    let namespace = ctx.namespaces().resolve(args.namespace.as_deref())?;
    let direction = helpers::parse_sync_direction(args.direction.as_deref())?;
    let dir = workspace_dir(ctx, namespace.as_str(), args.workspace_dir.as_deref());

    let _guard = ctx.namespaces().write_lock(&namespace).await;
    let store = ctx.namespaces().store_for(&namespace).await?;
    let service = SyncService::new(store, ctx.embedding());
    let report = service.sync(&dir, direction).await?;
    Ok(json!({
        "direction": direction.as_str(),
        "workspace_dir": dir,
        "report": report,
    }))
}

/// `jive_memory`: unified memory operations across both corpora.
pub async fn memory(ctx: &ServiceContext, args: MemoryArgs) -> Result<Value> {
    let namespace = ctx.namespaces().resolve(args.namespace.as_deref())?;
    let memory_type = helpers::parse_memory_type(&args.memory_type)?;
    let action = args.action.clone();

    match action.as_str() {
        "create" | "update" | "delete" | "record_use" | "import" => {
            let _guard = ctx.namespaces().write_lock(&namespace).await;
            let store = ctx.namespaces().store_for(&namespace).await?;
            let service = MemoryService::new(store.clone(), ctx.embedding());
            match action.as_str() {
                "create" => create(&service, memory_type, args).await,
                "update" => {
                    let reference =
                        helpers::require(args.reference.as_deref(), "reference", "update")?
                            .to_owned();
                    let patch = MemoryPatch {
                        title: args.title,
                        ai_requirements: args.ai_requirements,
                        ai_when_to_use: args.ai_when_to_use,
                        ai_use_case: args.ai_use_case,
                        ai_solutions: args.ai_solutions,
                        keywords: args.keywords,
                        children_slugs: args.children_slugs,
                        related_slugs: args.related_slugs,
                        linked_epic_ids: args.linked_epic_ids,
                        tags: args.tags,
                    };
                    let item = service.update(memory_type, &reference, patch).await?;
                    Ok(json!({ "memory_item": item }))
                }
                "delete" => {
                    let reference =
                        helpers::require(args.reference.as_deref(), "reference", "delete")?;
                    let item = service.delete(memory_type, reference).await?;
                    Ok(json!({ "deleted": true, "slug": item.slug() }))
                }
                "record_use" => {
                    let reference =
                        helpers::require(args.reference.as_deref(), "reference", "record_use")?;
                    let item = service.record_use(reference, args.success).await?;
                    Ok(json!({ "memory_item": item }))
                }
                "import" => {
                    let transfer = TransferService::new(store, ctx.embedding());
                    let mode = helpers::parse_import_mode(args.import_mode.as_deref())?;
                    if let Some(content) = args.content.as_deref() {
                        let mut report = Default::default();
                        transfer
                            .import_content(content, None, mode, &mut report)
                            .await?;
                        return Ok(json!({ "report": report }));
                    }
                    let dir = helpers::require(args.source_dir.as_deref(), "source_dir", "import")?;
                    let report = transfer.import_directory(&PathBuf::from(dir), mode).await?;
                    Ok(json!({ "report": report }))
                }
                _ => unreachable!("outer match guards the action set"),
            }
        }
        "read" => {
            let (_, store) = ctx.store(args.namespace.as_deref()).await?;
            let service = MemoryService::new(store, ctx.embedding());
            let reference = helpers::require(args.reference.as_deref(), "reference", "read")?;
            let item = service.resolve(memory_type, reference).await?;
            Ok(json!({ "memory_item": item }))
        }
        "list" => {
            let (_, store) = ctx.store(args.namespace.as_deref()).await?;
            let service = MemoryService::new(store, ctx.embedding());
            let sort = match args.sort_by.as_deref() {
                None | Some("updated_at") => MemorySort::UpdatedAt,
                Some("title") => MemorySort::Title,
                Some("usage_count") => MemorySort::UsageCount,
                Some(other) => {
                    return Err(Error::validation_field(
                        format!("unknown sort key: {other}"),
                        "sort_by",
                    ));
                }
            };
            let page = helpers::page_from(args.limit, args.offset, 200);
            let listing = service.list(memory_type, sort, page).await?;
            Ok(json!({
                "memory_items": listing.items,
                "total": listing.total,
                "has_more": listing.has_more,
            }))
        }
        "search" => {
            let (_, store) = ctx.store(args.namespace.as_deref()).await?;
            let service = SearchService::new(store, ctx.embedding());
            let content_type = match memory_type {
                MemoryType::Architecture => ContentType::Architecture,
                MemoryType::Troubleshoot => ContentType::Troubleshoot,
            };
            let hits = service
                .search(
                    args.query.as_deref().unwrap_or_default(),
                    helpers::parse_search_type(args.search_type.as_deref())?,
                    &[content_type],
                    &Default::default(),
                    args.limit.unwrap_or(10),
                    true,
                )
                .await?;
            Ok(json!({ "total": hits.len(), "results": hits }))
        }
        "export" => {
            let (_, store) = ctx.store(args.namespace.as_deref()).await?;
            let transfer = TransferService::new(store, ctx.embedding());
            let target = args.target_dir.as_deref().map_or_else(
                || ctx.config().namespace_root(namespace.as_str()).join("exports"),
                PathBuf::from,
            );
            let report = transfer.export(Some(memory_type), &target).await?;
            Ok(json!({ "report": report }))
        }
        other => Err(Error::UnknownAction {
            action: other.to_owned(),
            tool: "jive_memory".to_owned(),
        }),
    }
}

async fn create(
    service: &MemoryService,
    memory_type: MemoryType,
    args: MemoryArgs,
) -> Result<Value> {
    let slug = helpers::require(args.slug.as_deref(), "slug", "create")?.to_owned();
    let title = helpers::require(args.title.as_deref(), "title", "create")?.to_owned();
    let item = match memory_type {
        MemoryType::Architecture => {
            service
                .create_architecture(ArchitectureDraft {
                    slug,
                    title,
                    ai_requirements: args.ai_requirements.unwrap_or_default(),
                    ai_when_to_use: args.ai_when_to_use.unwrap_or_default(),
                    keywords: args.keywords.unwrap_or_default(),
                    children_slugs: args.children_slugs.unwrap_or_default(),
                    related_slugs: args.related_slugs.unwrap_or_default(),
                    linked_epic_ids: args.linked_epic_ids.unwrap_or_default(),
                    tags: args.tags.unwrap_or_default(),
                })
                .await?
        }
        MemoryType::Troubleshoot => {
            service
                .create_troubleshoot(TroubleshootDraft {
                    slug,
                    title,
                    ai_use_case: args.ai_use_case.unwrap_or_default(),
                    ai_solutions: args.ai_solutions.unwrap_or_default(),
                    keywords: args.keywords.unwrap_or_default(),
                    tags: args.tags.unwrap_or_default(),
                })
                .await?
        }
    };
    Ok(json!({ "id": item.id(), "memory_item": item }))
}
