//! Strong-typed UUID identifiers for all domain entities.

use crate::macros::define_id;

define_id!(WorkItemId, "Strong typed identifier for a work item");
define_id!(ExecutionId, "Strong typed identifier for an execution record");
define_id!(
    ProgressEventId,
    "Strong typed identifier for a progress event"
);
define_id!(
    MemoryItemId,
    "Strong typed identifier for an architecture or troubleshoot memory item"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn from_name_is_deterministic_and_type_scoped() {
        assert_eq!(WorkItemId::from_name("x"), WorkItemId::from_name("x"));
        assert_ne!(
            WorkItemId::from_name("x").to_string(),
            MemoryItemId::from_name("x").to_string()
        );
    }

    #[test]
    fn round_trips_through_string() {
        let id = WorkItemId::new();
        assert_eq!(WorkItemId::from_str(&id.to_string()).unwrap(), id);
    }
}
