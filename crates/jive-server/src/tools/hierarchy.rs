//! Handlers for `jive_get_hierarchy` and `jive_reorder_work_items`.

use jive_application::use_cases::{HierarchyService, WorkItemService};
use jive_domain::constants::limits::MAX_DEPTH_DEFAULT;
use jive_domain::error::{Error, Result};
use jive_infrastructure::ServiceContext;
use serde_json::{Value, json};

use super::helpers;
use crate::args::{GetHierarchyArgs, ReorderWorkItemsArgs};

/// `jive_get_hierarchy`: relationship walks over the parent and dependency
/// graphs.
pub async fn get_hierarchy(ctx: &ServiceContext, args: GetHierarchyArgs) -> Result<Value> {
    let (_, store) = ctx.store(args.namespace.as_deref()).await?;
    let service = WorkItemService::new(store.clone(), ctx.embedding());
    let hierarchy = HierarchyService::new(store);

    let root = service.resolve(&args.work_item_id).await?;
    let max_depth = args.max_depth.unwrap_or(MAX_DEPTH_DEFAULT).max(1);

    match args.relationship_type.as_str() {
        "children" => {
            let items = hierarchy
                .children(root.id, args.recursive, max_depth)
                .await?;
            Ok(json!({ "work_item_id": root.id, "children": items }))
        }
        "parents" => {
            let items = hierarchy.parents(root.id).await?;
            Ok(json!({ "work_item_id": root.id, "parents": items }))
        }
        "dependencies" => {
            let items = hierarchy.dependencies(root.id, max_depth).await?;
            Ok(json!({ "work_item_id": root.id, "dependencies": items }))
        }
        "dependents" => {
            let items = hierarchy.dependents(root.id, max_depth).await?;
            Ok(json!({ "work_item_id": root.id, "dependents": items }))
        }
        "full_hierarchy" => {
            let tree = hierarchy
                .full_hierarchy(root.id, max_depth, args.include_dependencies)
                .await?;
            Ok(json!({ "hierarchy": tree }))
        }
        other => Err(Error::UnknownAction {
            action: other.to_owned(),
            tool: "jive_get_hierarchy".to_owned(),
        }),
    }
}

/// `jive_reorder_work_items`: reorder, move, swap, recalculate.
pub async fn reorder(ctx: &ServiceContext, args: ReorderWorkItemsArgs) -> Result<Value> {
    let namespace = ctx.namespaces().resolve(args.namespace.as_deref())?;
    let _guard = ctx.namespaces().write_lock(&namespace).await;
    let store = ctx.namespaces().store_for(&namespace).await?;
    let hierarchy = HierarchyService::new(store);

    match args.action.as_str() {
        "reorder" => {
            let ids = args
                .work_item_ids
                .iter()
                .map(|id| helpers::parse_work_item_id(id, "work_item_ids"))
                .collect::<Result<Vec<_>>>()?;
            let siblings = hierarchy.reorder(&ids).await?;
            Ok(json!({ "reordered": siblings.len(), "siblings": siblings }))
        }
        "move" => {
            let id = helpers::parse_work_item_id(
                helpers::require(args.work_item_id.as_deref(), "work_item_id", "move")?,
                "work_item_id",
            )?;
            let new_parent = args
                .new_parent_id
                .as_deref()
                .map(|p| helpers::parse_work_item_id(p, "new_parent_id"))
                .transpose()?;
            let item = hierarchy.move_item(id, new_parent, args.position).await?;
            Ok(json!({ "work_item": item }))
        }
        "swap" => {
            let a = helpers::parse_work_item_id(
                helpers::require(args.work_item_id.as_deref(), "work_item_id", "swap")?,
                "work_item_id",
            )?;
            let b = helpers::parse_work_item_id(
                helpers::require(args.swap_with_id.as_deref(), "swap_with_id", "swap")?,
                "swap_with_id",
            )?;
            let (item_a, item_b) = hierarchy.swap(a, b).await?;
            Ok(json!({ "swapped": [item_a, item_b] }))
        }
        "recalculate" => {
            let parent = args
                .parent_id
                .as_deref()
                .map(|p| helpers::parse_work_item_id(p, "parent_id"))
                .transpose()?;
            let siblings = hierarchy.recalculate(parent).await?;
            Ok(json!({ "recalculated": siblings.len(), "siblings": siblings }))
        }
        other => Err(Error::UnknownAction {
            action: other.to_owned(),
            tool: "jive_reorder_work_items".to_owned(),
        }),
    }
}
