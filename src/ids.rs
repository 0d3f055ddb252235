//! Identifier generation.
//!
//! Every id handed out by the editor is a prefixed UUIDv4, so rapid scripted paste/add
//! sequences can never collide with each other or with ids loaded from a layout document.

use uuid::Uuid;

/// Generates a fresh node id.
pub fn new_node_id() -> String {
    format!("node-{}", Uuid::new_v4())
}

/// Generates a fresh edge id.
pub fn new_edge_id() -> String {
    format!("edge-{}", Uuid::new_v4())
}

/// Generates a fresh group tag.
pub fn new_group_id() -> String {
    format!("group-{}", Uuid::new_v4())
}

/// Generates a locally synthesized run id for executions the remote service did not identify.
pub fn new_local_run_id() -> String {
    format!("local-run-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let ids: HashSet<String> = (0..1000).map(|_| new_node_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("node-")));
        assert!(new_edge_id().starts_with("edge-"));
        assert!(new_group_id().starts_with("group-"));
        assert!(new_local_run_id().starts_with("local-run-"));
    }
}
