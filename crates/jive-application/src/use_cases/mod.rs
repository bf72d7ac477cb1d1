//! Use-case services. One service per concern, all bound to a single
//! namespace store handle; the dispatcher constructs them per request after
//! namespace resolution.

pub mod execution_service;
pub mod hierarchy_service;
pub mod memory_service;
pub mod progress_service;
pub mod search_service;
pub mod work_item_service;

pub use execution_service::ExecutionService;
pub use hierarchy_service::{HierarchyService, Rollup, TreeNode, compute_rollups, ensure_acyclic};
pub use memory_service::{MemoryPatch, MemoryService, MemorySort};
pub use progress_service::{ProgressAnalytics, ProgressReport, ProgressService, ProgressUpdate};
pub use search_service::SearchService;
pub use work_item_service::{DeleteOutcome, WorkItemService};
