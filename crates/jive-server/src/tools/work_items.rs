//! Handlers for `jive_manage_work_item` and `jive_get_work_item`.

use jive_application::use_cases::{HierarchyService, WorkItemService};
use jive_domain::constants::limits::{LIST_LIMIT_MAX, MAX_DEPTH_DEFAULT};
use jive_domain::error::{Error, Result};
use jive_domain::validation::{WorkItemDraft, WorkItemPatch};
use jive_infrastructure::ServiceContext;
use serde_json::{Value, json};

use super::helpers;
use crate::args::{GetWorkItemArgs, ManageWorkItemArgs};

/// `jive_manage_work_item`: create, update, delete.
pub async fn manage(ctx: &ServiceContext, args: ManageWorkItemArgs) -> Result<Value> {
    let namespace = ctx.namespaces().resolve(args.namespace.as_deref())?;
    let _guard = ctx.namespaces().write_lock(&namespace).await;
    let store = ctx.namespaces().store_for(&namespace).await?;
    let service = WorkItemService::new(store, ctx.embedding());

    match args.action.as_str() {
        "create" => {
            let item_type =
                helpers::parse_item_type(helpers::require(args.r#type.as_deref(), "type", "create")?)?;
            let draft = WorkItemDraft {
                item_type,
                title: helpers::require(args.title.as_deref(), "title", "create")?.to_owned(),
                description: args.description.unwrap_or_default(),
                status: helpers::parse_opt_enum(args.status.as_deref(), "status")?
                    .unwrap_or_default(),
                priority: helpers::parse_opt_enum(args.priority.as_deref(), "priority")?
                    .unwrap_or_default(),
                complexity: helpers::parse_opt_complexity(args.complexity.as_deref())?,
                parent_id: args
                    .parent_id
                    .as_deref()
                    .map(|p| helpers::parse_work_item_id(p, "parent_id"))
                    .transpose()?,
                acceptance_criteria: args.acceptance_criteria.unwrap_or_default(),
                context_tags: args.tags.unwrap_or_default(),
                dependencies: args
                    .dependencies
                    .unwrap_or_default()
                    .iter()
                    .map(|d| helpers::parse_work_item_id(d, "dependencies"))
                    .collect::<Result<Vec<_>>>()?,
                notes: args.notes,
                due_date: helpers::parse_opt_time(args.due_date.as_deref(), "due_date")?,
            };
            let item = service.create(draft).await?;
            Ok(json!({ "id": item.id, "work_item": item }))
        }
        "update" => {
            let reference =
                helpers::require(args.work_item_id.as_deref(), "work_item_id", "update")?;
            let patch = WorkItemPatch {
                title: args.title,
                description: args.description,
                status: helpers::parse_opt_enum(args.status.as_deref(), "status")?,
                priority: helpers::parse_opt_enum(args.priority.as_deref(), "priority")?,
                complexity: helpers::parse_opt_complexity(args.complexity.as_deref())?,
                acceptance_criteria: args.acceptance_criteria,
                context_tags: args.tags,
                dependencies: args
                    .dependencies
                    .map(|deps| {
                        deps.iter()
                            .map(|d| helpers::parse_work_item_id(d, "dependencies"))
                            .collect::<Result<Vec<_>>>()
                    })
                    .transpose()?,
                notes: args.notes,
                progress_percentage: args.progress_percentage,
                due_date: helpers::parse_opt_time(args.due_date.as_deref(), "due_date")?,
            };
            let item = service.update(reference, patch).await?;
            Ok(json!({ "id": item.id, "work_item": item }))
        }
        "delete" => {
            let reference =
                helpers::require(args.work_item_id.as_deref(), "work_item_id", "delete")?;
            let outcome = service.delete(reference, args.delete_children).await?;
            Ok(json!({
                "deleted": outcome.deleted_ids.len(),
                "deleted_ids": outcome.deleted_ids,
            }))
        }
        other => Err(Error::UnknownAction {
            action: other.to_owned(),
            tool: "jive_manage_work_item".to_owned(),
        }),
    }
}

/// `jive_get_work_item`: single fetch (optionally with children) or a
/// filtered, sorted, paginated listing.
pub async fn get(ctx: &ServiceContext, args: GetWorkItemArgs) -> Result<Value> {
    let (_, store) = ctx.store(args.namespace.as_deref()).await?;
    let service = WorkItemService::new(store.clone(), ctx.embedding());

    if let Some(reference) = args.work_item_id.as_deref() {
        let item = service.get(reference).await?;
        if args.include_children || args.recursive {
            let hierarchy = HierarchyService::new(store);
            let max_depth = if args.recursive {
                args.max_depth.unwrap_or(MAX_DEPTH_DEFAULT)
            } else {
                1
            };
            let tree = hierarchy.full_hierarchy(item.id, max_depth, false).await?;
            return Ok(json!({ "work_item": tree.item, "children": tree.children }));
        }
        return Ok(json!({ "work_item": item }));
    }

    let filter = helpers::build_filter(args.filters.as_ref())?;
    let sort_by = helpers::parse_sort_by(args.sort_by.as_deref())?;
    let page = helpers::page_from(args.limit, args.offset, LIST_LIMIT_MAX);
    let listing = service.list(&filter, sort_by, page).await?;
    Ok(json!({
        "work_items": listing.items,
        "total": listing.total,
        "has_more": listing.has_more,
    }))
}
