//! Handler for `jive_execute_work_item`.

use jive_application::use_cases::{ExecutionService, WorkItemService};
use jive_domain::error::{Error, Result};
use jive_infrastructure::ServiceContext;
use serde_json::{Value, json};

use super::helpers;
use crate::args::ExecuteWorkItemArgs;

/// `jive_execute_work_item`: create an execution record after readiness
/// checks, or query/cancel an existing one. Tracking only; no agent runs
/// here.
pub async fn execute(ctx: &ServiceContext, args: ExecuteWorkItemArgs) -> Result<Value> {
    let namespace = ctx.namespaces().resolve(args.namespace.as_deref())?;
    let _guard = ctx.namespaces().write_lock(&namespace).await;
    let store = ctx.namespaces().store_for(&namespace).await?;
    let service = ExecutionService::new(store.clone());

    match args.action.as_deref().unwrap_or("execute") {
        "execute" => {
            let reference =
                helpers::require(args.work_item_id.as_deref(), "work_item_id", "execute")?;
            let items = WorkItemService::new(store, ctx.embedding());
            let item = items.resolve(reference).await?;
            let mode = helpers::parse_execution_mode(args.mode.as_deref())?;
            let record = service
                .execute(
                    &item,
                    mode,
                    args.validate_before_execution,
                    args.agent_context.unwrap_or_default(),
                )
                .await?;
            Ok(json!({ "execution_id": record.execution_id, "execution": record }))
        }
        "status" => {
            let id = helpers::parse_execution_id(helpers::require(
                args.execution_id.as_deref(),
                "execution_id",
                "status",
            )?)?;
            let record = service.status(id).await?;
            Ok(json!({ "execution": record }))
        }
        "cancel" => {
            let id = helpers::parse_execution_id(helpers::require(
                args.execution_id.as_deref(),
                "execution_id",
                "cancel",
            )?)?;
            let record = service.cancel(id).await?;
            Ok(json!({ "execution": record }))
        }
        other => Err(Error::UnknownAction {
            action: other.to_owned(),
            tool: "jive_execute_work_item".to_owned(),
        }),
    }
}
