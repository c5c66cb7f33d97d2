//! Attribute caches — flat and auto-vivifying hierarchical state.
//!
//! Provides a flat attribute mapping (`FlatMap`), the auto-vivifying tree
//! (`HierarchicalNode`) addressed by attribute chains or dotted paths
//! (e.g. `site.posts.latest`), and the process-wide shared instance.

pub mod flat;
pub mod key;
pub mod node;
pub mod path;
pub mod shared;

pub use flat::FlatMap;
pub use key::Key;
pub use node::{hierarchy_of, HierarchicalNode, NodeValue};
pub use path::{is_vivifiable, DottedPath, RESERVED_SENTINEL, SEPARATOR};
pub use shared::{get_shared_state, init_shared_state};
