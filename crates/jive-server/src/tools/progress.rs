//! Handler for `jive_track_progress`.

use jive_application::use_cases::{ProgressService, WorkItemService};
use jive_domain::error::{Error, Result};
use jive_infrastructure::ServiceContext;
use serde_json::{Value, json};

use super::helpers;
use crate::args::TrackProgressArgs;

/// `jive_track_progress`: progress updates, aggregate reports, analytics.
pub async fn track(ctx: &ServiceContext, args: TrackProgressArgs) -> Result<Value> {
    let namespace = ctx.namespaces().resolve(args.namespace.as_deref())?;

    match args.action.as_str() {
        "update" => {
            let _guard = ctx.namespaces().write_lock(&namespace).await;
            let store = ctx.namespaces().store_for(&namespace).await?;
            let items = WorkItemService::new(store.clone(), ctx.embedding());
            let item = items
                .resolve(helpers::require(
                    args.work_item_id.as_deref(),
                    "work_item_id",
                    "update",
                )?)
                .await?;
            let percentage = args.percentage.ok_or_else(|| {
                Error::validation_field("'percentage' is required for update", "percentage")
            })?;
            let status = helpers::parse_opt_enum(args.status.as_deref(), "status")?;
            let service = ProgressService::new(store);
            let update = service
                .update(
                    item.id,
                    percentage,
                    status,
                    args.notes,
                    args.blockers,
                    args.auto_calculate_status,
                )
                .await?;
            Ok(json!({ "work_item": update.item, "event": update.event }))
        }
        "get_report" => {
            let store = ctx.namespaces().store_for(&namespace).await?;
            let service = ProgressService::new(store);
            let report = service
                .report(
                    helpers::parse_opt_enum(args.r#type.as_deref(), "type")?,
                    args.parent_id
                        .as_deref()
                        .map(|p| helpers::parse_work_item_id(p, "parent_id"))
                        .transpose()?,
                    helpers::parse_opt_time(args.since.as_deref(), "since")?,
                    helpers::parse_opt_time(args.until.as_deref(), "until")?,
                )
                .await?;
            Ok(json!({ "report": report }))
        }
        "get_analytics" => {
            let store = ctx.namespaces().store_for(&namespace).await?;
            let service = ProgressService::new(store);
            let analytics = service
                .analytics(
                    helpers::parse_opt_enum(args.r#type.as_deref(), "type")?,
                    args.parent_id
                        .as_deref()
                        .map(|p| helpers::parse_work_item_id(p, "parent_id"))
                        .transpose()?,
                    helpers::parse_opt_time(args.since.as_deref(), "since")?,
                    helpers::parse_opt_time(args.until.as_deref(), "until")?,
                )
                .await?;
            Ok(json!({ "analytics": analytics }))
        }
        other => Err(Error::UnknownAction {
            action: other.to_owned(),
            tool: "jive_track_progress".to_owned(),
        }),
    }
}
