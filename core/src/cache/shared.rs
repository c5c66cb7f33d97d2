//! The process-wide shared cache.
//!
//! A host initializes the instance once, before any rendering pass runs,
//! and hands the returned handle to each collaborator. Every call in the
//! process sees the same root node. There is no teardown.

use std::sync::OnceLock;

use tracing::debug;

use super::node::HierarchicalNode;


static SHARED_STATE: OnceLock<HierarchicalNode> = OnceLock::new();


/// Initialize the shared root node and return it.
///
/// Later calls return the same node without resetting it.
pub fn init_shared_state() -> HierarchicalNode {
    let mut created = false;
    let node = SHARED_STATE
        .get_or_init(|| {
            created = true;
            HierarchicalNode::new()
        })
        .clone();
    if created {
        debug!("shared cache initialized");
    } else {
        debug!("shared cache already initialized; reusing it");
    }
    node
}

/// The shared root node, created on first use if the host never called
/// [`init_shared_state`].
pub fn get_shared_state() -> HierarchicalNode {
    SHARED_STATE.get_or_init(HierarchicalNode::new).clone()
}
