//! Site cache — shared, auto-vivifying state passed between rendering passes.
//!
//! Templates and other collaborators that run in isolation store computed
//! values in one tree (`site.pageTitle`, `posts.archive.months`) and later
//! stages read them back, either by chaining attributes or by dotted path.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    get_shared_state, hierarchy_of, init_shared_state, DottedPath, FlatMap, HierarchicalNode,
    Key, NodeValue,
};
pub use config::{parse_assignment, HostConfig};
pub use error::{CacheError, ConfigError, ErrorKind};
