//! Domain entities: work items, execution records, progress events, and the
//! two memory corpora.

pub mod execution;
pub mod memory;
pub mod progress;
pub mod work_item;

pub use execution::{ExecutionMode, ExecutionRecord, ExecutionStatus};
pub use memory::{ArchitectureItem, MemoryItem, MemoryType, TroubleshootItem};
pub use progress::ProgressEvent;
pub use work_item::{Complexity, ItemStatus, ItemType, Priority, WorkItem};
