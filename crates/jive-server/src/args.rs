//! Tool parameter structs.
//!
//! Action fields are free strings rather than enums so an unknown action
//! surfaces as the stable `UnknownAction` code instead of a transport-level
//! schema failure. Enum-valued fields are parsed in the handlers for the
//! same reason.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Filter block shared by listing and search tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FilterArgs {
    /// Restrict to one item type (initiative|epic|feature|story|task)
    #[serde(default, alias = "item_type")]
    pub r#type: Option<String>,
    /// Restrict to one status
    #[serde(default)]
    pub status: Option<String>,
    /// Restrict to one priority
    #[serde(default)]
    pub priority: Option<String>,
    /// Restrict to direct children of this work item id
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Require at least one of these context tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parameters of `jive_manage_work_item`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ManageWorkItemArgs {
    /// One of: create, update, delete
    pub action: String,
    /// Target item id (update/delete); UUID or exact title
    #[serde(default)]
    pub work_item_id: Option<String>,
    /// Item type for create (initiative|epic|feature|story|task)
    #[serde(default)]
    pub r#type: Option<String>,
    /// Title (required on create, 1-200 chars)
    #[serde(default)]
    pub title: Option<String>,
    /// Long-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Status (not_started|in_progress|completed|blocked|cancelled)
    #[serde(default)]
    pub status: Option<String>,
    /// Priority (low|medium|high|critical)
    #[serde(default)]
    pub priority: Option<String>,
    /// Complexity (simple|moderate|complex)
    #[serde(default)]
    pub complexity: Option<String>,
    /// Parent item id
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Acceptance criteria, each 5-500 chars
    #[serde(default)]
    pub acceptance_criteria: Option<Vec<String>>,
    /// Context tags
    #[serde(default, alias = "context_tags")]
    pub tags: Option<Vec<String>>,
    /// Dependency item ids
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    /// Notes, up to 1000 chars
    #[serde(default)]
    pub notes: Option<String>,
    /// Progress percentage 0-100 (update only)
    #[serde(default)]
    pub progress_percentage: Option<u8>,
    /// Due date (RFC 3339)
    #[serde(default)]
    pub due_date: Option<String>,
    /// Delete the whole subtree instead of failing on children
    #[serde(default)]
    pub delete_children: bool,
    /// Target namespace (defaults to the configured namespace)
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_get_work_item`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetWorkItemArgs {
    /// Single item to fetch; UUID or exact title. Omit to list.
    #[serde(default)]
    pub work_item_id: Option<String>,
    /// Listing filters
    #[serde(default)]
    pub filters: Option<FilterArgs>,
    /// Sort key (created_at|updated_at|priority|sequence_order|title)
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Page size, capped at 200
    #[serde(default)]
    pub limit: Option<usize>,
    /// Page offset
    #[serde(default)]
    pub offset: Option<usize>,
    /// Attach one level of children (or more with `recursive`)
    #[serde(default)]
    pub include_children: bool,
    /// Walk the whole subtree instead of one level
    #[serde(default)]
    pub recursive: bool,
    /// Depth bound for recursive walks (default 10)
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_search_content`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchContentArgs {
    /// Query text; empty returns the most recently updated entries
    #[serde(default)]
    pub query: String,
    /// semantic | keyword | hybrid (default hybrid)
    #[serde(default)]
    pub search_type: Option<String>,
    /// Corpora to search (work_item|architecture|troubleshoot); all when omitted
    #[serde(default)]
    pub content_types: Vec<String>,
    /// Work item filters, applied before scoring
    #[serde(default)]
    pub filters: Option<FilterArgs>,
    /// Result cap, at most 50
    #[serde(default)]
    pub limit: Option<usize>,
    /// Attach fused scores to the hits
    #[serde(default = "default_true")]
    pub include_scores: bool,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_get_hierarchy`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetHierarchyArgs {
    /// Root of the walk; UUID or exact title
    pub work_item_id: String,
    /// children | parents | dependencies | dependents | full_hierarchy
    pub relationship_type: String,
    /// Depth bound (default 10)
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Annotate full_hierarchy nodes with dependency ids
    #[serde(default)]
    pub include_dependencies: bool,
    /// Walk transitively instead of one level (children)
    #[serde(default = "default_true")]
    pub recursive: bool,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_reorder_work_items`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReorderWorkItemsArgs {
    /// One of: reorder, move, swap, recalculate
    pub action: String,
    /// Complete sibling list in the desired order (reorder)
    #[serde(default)]
    pub work_item_ids: Vec<String>,
    /// Item to move or swap
    #[serde(default)]
    pub work_item_id: Option<String>,
    /// New parent for move; omit or null to make the item a root
    #[serde(default)]
    pub new_parent_id: Option<String>,
    /// Insertion position for move (append when omitted)
    #[serde(default)]
    pub position: Option<usize>,
    /// Sibling to swap with
    #[serde(default)]
    pub swap_with_id: Option<String>,
    /// Parent whose children to recalculate; omit for the root set
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_execute_work_item`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteWorkItemArgs {
    /// One of: execute (default), status, cancel
    #[serde(default)]
    pub action: Option<String>,
    /// Item to execute; UUID or exact title
    #[serde(default)]
    pub work_item_id: Option<String>,
    /// Execution record for status/cancel
    #[serde(default)]
    pub execution_id: Option<String>,
    /// autonomous | guided | validation_only (default autonomous)
    #[serde(default)]
    pub mode: Option<String>,
    /// Run readiness checks before creating the record
    #[serde(default = "default_true")]
    pub validate_before_execution: bool,
    /// Opaque key/value context stored on the record
    #[serde(default)]
    pub agent_context: Option<HashMap<String, String>>,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_track_progress`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrackProgressArgs {
    /// One of: update, get_report, get_analytics
    pub action: String,
    /// Item to update; UUID or exact title
    #[serde(default)]
    pub work_item_id: Option<String>,
    /// New progress percentage 0-100 (update)
    #[serde(default)]
    pub percentage: Option<u8>,
    /// Explicit status override (update)
    #[serde(default)]
    pub status: Option<String>,
    /// Note stored on the progress event
    #[serde(default)]
    pub notes: Option<String>,
    /// Blockers stored on the progress event
    #[serde(default)]
    pub blockers: Vec<String>,
    /// Derive status from the percentage (100 completes, (0,100) starts)
    #[serde(default = "default_true")]
    pub auto_calculate_status: bool,
    /// Aggregate reports by this item type
    #[serde(default)]
    pub r#type: Option<String>,
    /// Aggregate reports under this parent
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Range start (RFC 3339)
    #[serde(default)]
    pub since: Option<String>,
    /// Range end (RFC 3339)
    #[serde(default)]
    pub until: Option<String>,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_sync_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SyncDataArgs {
    /// file_to_db | db_to_file | bidirectional (default bidirectional)
    #[serde(default)]
    pub direction: Option<String>,
    /// Workspace directory; defaults to `<namespace root>/workspace`
    #[serde(default)]
    pub workspace_dir: Option<String>,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parameters of `jive_memory`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemoryArgs {
    /// One of: create, read, update, delete, list, search, export, import,
    /// record_use
    pub action: String,
    /// architecture | troubleshoot
    pub memory_type: String,
    /// Target item: UUID or slug (read/update/delete/record_use)
    #[serde(default, alias = "id")]
    pub reference: Option<String>,
    /// Slug for create
    #[serde(default)]
    pub slug: Option<String>,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Requirements body (architecture)
    #[serde(default)]
    pub ai_requirements: Option<String>,
    /// When-to-use guidance (architecture)
    #[serde(default)]
    pub ai_when_to_use: Option<Vec<String>>,
    /// Problem statements (troubleshoot)
    #[serde(default)]
    pub ai_use_case: Option<Vec<String>>,
    /// Solutions body (troubleshoot)
    #[serde(default)]
    pub ai_solutions: Option<String>,
    /// Retrieval keywords
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Child spec slugs (architecture)
    #[serde(default)]
    pub children_slugs: Option<Vec<String>>,
    /// Related spec slugs (architecture)
    #[serde(default)]
    pub related_slugs: Option<Vec<String>>,
    /// Linked epic ids (architecture)
    #[serde(default)]
    pub linked_epic_ids: Option<Vec<String>>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Sort key for list (updated_at|title|usage_count)
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Page size for list
    #[serde(default)]
    pub limit: Option<usize>,
    /// Page offset for list
    #[serde(default)]
    pub offset: Option<usize>,
    /// Query for search
    #[serde(default)]
    pub query: Option<String>,
    /// semantic | keyword | hybrid for search
    #[serde(default)]
    pub search_type: Option<String>,
    /// Target directory for export (defaults inside the namespace root)
    #[serde(default)]
    pub target_dir: Option<String>,
    /// Source directory or single file content for import
    #[serde(default)]
    pub source_dir: Option<String>,
    /// Raw file content for single-file import
    #[serde(default)]
    pub content: Option<String>,
    /// create_only | update_only | create_or_update (default) | replace
    #[serde(default)]
    pub import_mode: Option<String>,
    /// Whether the surfaced entry solved the problem (record_use)
    #[serde(default)]
    pub success: bool,
    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,
}
