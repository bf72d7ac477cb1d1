//! The consolidated tool dispatcher.
//!
//! Routes the nine tools to their handlers, enforces the per-call timeout,
//! and honours transport cancellation at the dispatch boundary. Writes that
//! have entered the store's commit step run to completion; cancellation is
//! then reported post-hoc, which keeps atomicity intact.

use std::sync::Arc;
use std::time::Duration;

use jive_domain::error::{Error, Result};
use jive_infrastructure::ServiceContext;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::envelope::ToolResponse;
use crate::tools;

/// Names of the nine advertised tools.
pub const TOOL_NAMES: [&str; 9] = [
    "jive_manage_work_item",
    "jive_get_work_item",
    "jive_search_content",
    "jive_get_hierarchy",
    "jive_reorder_work_items",
    "jive_execute_work_item",
    "jive_track_progress",
    "jive_sync_data",
    "jive_memory",
];

/// Validates, routes, and guards every tool call.
#[derive(Clone)]
pub struct Dispatcher {
    ctx: Arc<ServiceContext>,
}

impl Dispatcher {
    /// Bind the dispatcher to the service context.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// The shared service context.
    #[must_use]
    pub fn context(&self) -> &Arc<ServiceContext> {
        &self.ctx
    }

    /// Dispatch a tool call and wrap the outcome in the response envelope.
    pub async fn dispatch(
        &self,
        tool: &str,
        params: Value,
        cancel: Option<CancellationToken>,
    ) -> ToolResponse {
        ToolResponse::from(self.dispatch_guarded(tool, params, cancel).await)
    }

    async fn dispatch_guarded(
        &self,
        tool: &str,
        params: Value,
        cancel: Option<CancellationToken>,
    ) -> Result<Value> {
        let seconds = self.ctx.config().request_timeout_seconds;
        let deadline = Duration::from_secs(seconds);

        // The call runs on its own task: a cancelled or timed-out request
        // never aborts a write mid-transaction, it just stops waiting.
        let this = self.clone();
        let tool_name = tool.to_owned();
        let mut work = tokio::spawn(async move { this.route(&tool_name, params).await });

        let cancelled = async {
            match &cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = &mut work => {
                result.map_err(|e| Error::internal(format!("tool task failed: {e}")))?
            }
            () = cancelled => {
                tracing::warn!(tool, "call cancelled by transport; write completes in background");
                Err(Error::Cancelled)
            }
            () = tokio::time::sleep(deadline) => {
                tracing::warn!(tool, seconds, "call timed out; write completes in background");
                Err(Error::Timeout { seconds })
            }
        }
    }

    async fn route(&self, tool: &str, params: Value) -> Result<Value> {
        match tool {
            "jive_manage_work_item" => {
                tools::work_items::manage(&self.ctx, parse(params)?).await
            }
            "jive_get_work_item" => tools::work_items::get(&self.ctx, parse(params)?).await,
            "jive_search_content" => tools::search::search(&self.ctx, parse(params)?).await,
            "jive_get_hierarchy" => {
                tools::hierarchy::get_hierarchy(&self.ctx, parse(params)?).await
            }
            "jive_reorder_work_items" => {
                tools::hierarchy::reorder(&self.ctx, parse(params)?).await
            }
            "jive_execute_work_item" => {
                tools::execution::execute(&self.ctx, parse(params)?).await
            }
            "jive_track_progress" => tools::progress::track(&self.ctx, parse(params)?).await,
            "jive_sync_data" => tools::transfer::sync(&self.ctx, parse(params)?).await,
            "jive_memory" => tools::transfer::memory(&self.ctx, parse(params)?).await,
            other => Err(Error::UnknownTool {
                tool: other.to_owned(),
            }),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| Error::validation(format!("invalid parameters: {e}")))
}
