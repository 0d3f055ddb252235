//! Logical grouping and lock toggling over a set of nodes.
//!
//! A group is nothing more than a shared `group_id` tag; a node carries at most one.

use crate::constants::MIN_GROUP_SELECTION;
use crate::graph::GraphModel;
use crate::ids::new_group_id;
use crate::types::{GroupId, NodeId};

/// Tags every given node with one newly generated group id, replacing any previous tag.
///
/// # Returns
///
/// The new group id, or `None` if fewer than two nodes were given.
pub fn group_nodes(graph: &mut GraphModel, ids: &[NodeId]) -> Option<GroupId> {
    if ids.len() < MIN_GROUP_SELECTION {
        return None;
    }
    let group_id = new_group_id();
    for id in ids {
        graph.set_group(id, Some(group_id.clone()));
    }
    Some(group_id)
}

/// Returns true if any of the given nodes carries a group tag.
pub fn any_grouped(graph: &GraphModel, ids: &[NodeId]) -> bool {
    ids.iter()
        .filter_map(|id| graph.node(id))
        .any(|n| n.group_id.is_some())
}

/// Clears the group tag of every given node.
///
/// # Returns
///
/// Number of nodes that lost a tag.
pub fn ungroup_nodes(graph: &mut GraphModel, ids: &[NodeId]) -> usize {
    let tagged: Vec<NodeId> = ids
        .iter()
        .filter(|id| graph.node(id).is_some_and(|n| n.group_id.is_some()))
        .cloned()
        .collect();
    for id in &tagged {
        graph.set_group(id, None);
    }
    tagged.len()
}

/// Flips the lock flag of each given node independently; mixed selections stay mixed.
///
/// # Returns
///
/// Number of nodes toggled.
pub fn toggle_locks(graph: &mut GraphModel, ids: &[NodeId]) -> usize {
    let mut toggled = 0;
    for id in ids {
        let Some(locked) = graph.node(id).map(|n| n.locked) else {
            continue;
        };
        graph.set_locked(id, !locked);
        toggled += 1;
    }
    toggled
}
