//! MCP tool surface.
//!
//! Advertises the nine consolidated tools and routes `tools/call` requests
//! into the dispatcher. Every response is the uniform envelope serialized as
//! text content, so agents parse one shape regardless of tool or outcome.

use std::sync::Arc;

use jive_infrastructure::ServiceContext;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};

use crate::args::{
    ExecuteWorkItemArgs, GetHierarchyArgs, GetWorkItemArgs, ManageWorkItemArgs, MemoryArgs,
    ReorderWorkItemsArgs, SearchContentArgs, SyncDataArgs, TrackProgressArgs,
};
use crate::dispatcher::Dispatcher;
use crate::envelope::ToolResponse;

/// The MCP server: one instance per process, cloned per connection.
#[derive(Clone)]
pub struct JiveServer {
    dispatcher: Dispatcher,
    tool_router: ToolRouter<Self>,
}

impl JiveServer {
    /// Build the server on top of the shared service context.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            dispatcher: Dispatcher::new(ctx),
            tool_router: Self::tool_router(),
        }
    }

    /// The dispatcher, shared with the HTTP companion.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    async fn call<T: serde::Serialize>(
        &self,
        tool: &str,
        args: T,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let params = serde_json::to_value(args)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let response = self
            .dispatcher
            .dispatch(tool, params, Some(context.ct))
            .await;
        Ok(render(&response))
    }
}

fn render(response: &ToolResponse) -> CallToolResult {
    let content = vec![Content::text(response.to_json())];
    if response.success {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    }
}

#[tool_router]
impl JiveServer {
    /// Create, update, or delete work items in the hierarchy.
    #[tool(
        description = "Manage work items: create, update, or delete initiatives, epics, features, stories, and tasks"
    )]
    pub async fn jive_manage_work_item(
        &self,
        Parameters(args): Parameters<ManageWorkItemArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_manage_work_item", args, context).await
    }

    /// Fetch a single work item or a filtered listing.
    #[tool(
        description = "Retrieve work items: a single item by id (optionally with children) or a filtered, sorted, paginated listing"
    )]
    pub async fn jive_get_work_item(
        &self,
        Parameters(args): Parameters<GetWorkItemArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_get_work_item", args, context).await
    }

    /// Hybrid semantic + keyword search across all corpora.
    #[tool(
        description = "Search work items and memory with semantic, keyword, or hybrid ranking (alpha = 0.7 semantic)"
    )]
    pub async fn jive_search_content(
        &self,
        Parameters(args): Parameters<SearchContentArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_search_content", args, context).await
    }

    /// Walk parent/child and dependency relationships.
    #[tool(
        description = "Walk the hierarchy: children, parents, dependencies, dependents, or the full annotated subtree"
    )]
    pub async fn jive_get_hierarchy(
        &self,
        Parameters(args): Parameters<GetHierarchyArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_get_hierarchy", args, context).await
    }

    /// Reorder, move, or swap siblings; recalculate dense sequences.
    #[tool(
        description = "Reorder siblings, move items across parents, swap two siblings, or re-densify sequence numbers"
    )]
    pub async fn jive_reorder_work_items(
        &self,
        Parameters(args): Parameters<ReorderWorkItemsArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_reorder_work_items", args, context).await
    }

    /// Create and track execution records for work items.
    #[tool(
        description = "Create an execution record after readiness validation, or query/cancel an existing execution (tracking only)"
    )]
    pub async fn jive_execute_work_item(
        &self,
        Parameters(args): Parameters<ExecuteWorkItemArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_execute_work_item", args, context).await
    }

    /// Record progress and derive reports/analytics.
    #[tool(
        description = "Track progress: record percentage/status updates, or aggregate reports and velocity analytics"
    )]
    pub async fn jive_track_progress(
        &self,
        Parameters(args): Parameters<TrackProgressArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_track_progress", args, context).await
    }

    /// Synchronize memory files with the store.
    #[tool(
        description = "Synchronize memory Markdown files with the store: file_to_db, db_to_file, or bidirectional (newer wins, store wins ties)"
    )]
    pub async fn jive_sync_data(
        &self,
        Parameters(args): Parameters<SyncDataArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_sync_data", args, context).await
    }

    /// Unified architecture/troubleshoot memory operations.
    #[tool(
        description = "Architecture and troubleshoot memory: create, read, update, delete, list, search, export, import, record_use"
    )]
    pub async fn jive_memory(
        &self,
        Parameters(args): Parameters<MemoryArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call("jive_memory", args, context).await
    }
}

#[tool_handler]
impl ServerHandler for JiveServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Jive - agent-driven work tracking over MCP. Nine consolidated tools \
                 manage a five-level work item hierarchy (initiative > epic > feature > \
                 story > task) plus architecture and troubleshoot memory, with hybrid \
                 semantic+keyword search, per-namespace isolation, progress roll-up, \
                 Markdown export/import, and file sync. Pass `namespace` on any call to \
                 target a project scope; everything else defaults to `default`."
                    .to_owned(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve MCP over stdio until the transport closes.
///
/// # Errors
///
/// Returns an error if the transport fails to start or terminates abnormally.
pub async fn serve_stdio(ctx: Arc<ServiceContext>) -> jive_domain::error::Result<()> {
    let server = JiveServer::new(ctx);
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| jive_domain::error::Error::internal(format!("mcp serve failed: {e}")))?;
    tracing::info!("mcp server running on stdio");
    service
        .waiting()
        .await
        .map_err(|e| jive_domain::error::Error::internal(format!("mcp transport failed: {e}")))?;
    Ok(())
}
