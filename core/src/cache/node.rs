//! Auto-vivifying hierarchical cache node.
//!
//! Reading an attribute that does not exist creates an empty child node,
//! registers it under that name, and returns it, so `site.posts.latest` can
//! be written without declaring `site` or `posts` first. The same entries
//! are reachable through dotted mapping keys (`"site.posts.latest"`); both
//! protocols walk the one underlying [`FlatMap`].
//!
//! Every auto-created node remembers its creator, the name it was created
//! under, and its dotted path. These exist only for diagnostics: error
//! messages name the path of the node that was misused.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{trace, warn};

use super::flat::FlatMap;
use super::key::Key;
use super::path::{is_vivifiable, DottedPath, SEPARATOR};
use crate::error::CacheError;


/// A mapping entry: a terminal value or a nested node.
#[derive(Clone)]
pub enum NodeValue {
    Leaf(Value),
    Branch(HierarchicalNode),
}

impl NodeValue {
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            NodeValue::Leaf(value) => Some(value),
            NodeValue::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&HierarchicalNode> {
        match self {
            NodeValue::Branch(node) => Some(node),
            NodeValue::Leaf(_) => None,
        }
    }

    pub fn into_branch(self) -> Option<HierarchicalNode> {
        match self {
            NodeValue::Branch(node) => Some(node),
            NodeValue::Leaf(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeValue::Leaf(_))
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, NodeValue::Branch(_))
    }
}

/// Leaves compare by value, branches by identity.
impl PartialEq for NodeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeValue::Leaf(a), NodeValue::Leaf(b)) => a == b,
            (NodeValue::Branch(a), NodeValue::Branch(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            NodeValue::Branch(node) => node.fmt(f),
        }
    }
}

impl From<Value> for NodeValue {
    fn from(value: Value) -> Self {
        NodeValue::Leaf(value)
    }
}

impl From<HierarchicalNode> for NodeValue {
    fn from(node: HierarchicalNode) -> Self {
        NodeValue::Branch(node)
    }
}

impl From<&str> for NodeValue {
    fn from(value: &str) -> Self {
        NodeValue::Leaf(Value::from(value))
    }
}

impl From<String> for NodeValue {
    fn from(value: String) -> Self {
        NodeValue::Leaf(Value::from(value))
    }
}

impl From<bool> for NodeValue {
    fn from(value: bool) -> Self {
        NodeValue::Leaf(Value::from(value))
    }
}

impl From<i64> for NodeValue {
    fn from(value: i64) -> Self {
        NodeValue::Leaf(Value::from(value))
    }
}

impl From<f64> for NodeValue {
    fn from(value: f64) -> Self {
        NodeValue::Leaf(Value::from(value))
    }
}


struct NodeShared {
    /// Node that auto-created this one. Fixed at creation.
    parent: Option<Weak<NodeShared>>,
    /// Name this node was registered under in `parent`.
    origin_key: Option<String>,
    /// Dotted path from the topmost ancestor, captured at creation so it
    /// survives the ancestors being dropped.
    origin_path: DottedPath,
    entries: Mutex<FlatMap<NodeValue>>,
}

/// Handle to a node in an auto-vivifying cache tree.
///
/// Cloning the handle shares the node. A lock is held only for a single
/// mapping read or write, never across a chained access.
#[derive(Clone)]
pub struct HierarchicalNode {
    shared: Arc<NodeShared>,
}

impl HierarchicalNode {
    /// Create an empty root node.
    pub fn new() -> Self {
        HierarchicalNode {
            shared: Arc::new(NodeShared {
                parent: None,
                origin_key: None,
                origin_path: DottedPath::root(),
                entries: Mutex::new(FlatMap::new()),
            }),
        }
    }

    fn child_of(parent: &HierarchicalNode, name: &str) -> Self {
        HierarchicalNode {
            shared: Arc::new(NodeShared {
                parent: Some(Arc::downgrade(&parent.shared)),
                origin_key: Some(name.to_owned()),
                origin_path: parent.path().child(name),
                entries: Mutex::new(FlatMap::new()),
            }),
        }
    }

    /// The node that auto-created this one, if it is still alive.
    pub fn parent(&self) -> Option<HierarchicalNode> {
        let shared = self.shared.parent.as_ref()?.upgrade()?;
        Some(HierarchicalNode { shared })
    }

    pub fn origin_key(&self) -> Option<&str> {
        self.shared.origin_key.as_deref()
    }

    /// True if this node was not auto-created by another node.
    ///
    /// A node whose creator has since been dropped is still not a root,
    /// and its [`path`](Self::path) still starts at the original root.
    pub fn is_root(&self) -> bool {
        self.shared.parent.is_none()
    }

    /// True if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &HierarchicalNode) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    // -------------------------------------------------------------------
    // Explicit child access
    // -------------------------------------------------------------------

    /// Look up an entry without creating anything.
    pub fn try_get_child(&self, key: impl Into<Key>) -> Option<NodeValue> {
        self.shared.entries.lock().try_get_key(&key.into()).cloned()
    }

    /// Return the entry under `name`, creating and registering an empty
    /// child node if there is none.
    ///
    /// Reserved names fail with [`CacheError::ReservedAttribute`] and leave
    /// the mapping untouched.
    pub fn get_or_create_child(&self, name: &str) -> Result<NodeValue, CacheError> {
        if !is_vivifiable(name) {
            return Err(CacheError::ReservedAttribute {
                key: name.to_owned(),
                path: self.path(),
            });
        }

        let mut entries = self.shared.entries.lock();
        if let Some(existing) = entries.try_get(name) {
            return Ok(existing.clone());
        }
        let child = HierarchicalNode::child_of(self, name);
        entries.set(name, NodeValue::Branch(child.clone()));
        drop(entries);

        trace!(path = %child.path(), "auto-vivified cache node");
        Ok(NodeValue::Branch(child))
    }

    // -------------------------------------------------------------------
    // Attribute-style access
    // -------------------------------------------------------------------

    /// Attribute read: an existing entry under any name, otherwise
    /// [`get_or_create_child`](Self::get_or_create_child).
    pub fn get_attr(&self, name: &str) -> Result<NodeValue, CacheError> {
        match self.try_get_child(name) {
            Some(value) => Ok(value),
            None => self.get_or_create_child(name),
        }
    }

    /// Attribute read that must yield a node, for chaining.
    pub fn attr(&self, name: &str) -> Result<HierarchicalNode, CacheError> {
        match self.get_attr(name)? {
            NodeValue::Branch(node) => Ok(node),
            NodeValue::Leaf(_) => Err(CacheError::LeafTraversal {
                key: name.to_owned(),
                path: self.path(),
            }),
        }
    }

    /// Attribute write. `name` is stored as-is; dots are not split.
    pub fn set_attr(&self, name: &str, value: impl Into<NodeValue>) {
        self.shared.entries.lock().set(name, value.into());
    }

    // -------------------------------------------------------------------
    // Mapping-style access
    // -------------------------------------------------------------------

    /// Mapping read by dotted path, auto-vivifying every missing segment.
    ///
    /// Non-string keys fail with [`CacheError::NotIndexable`].
    pub fn get_item(&self, key: impl Into<Key>) -> Result<NodeValue, CacheError> {
        match key.into() {
            Key::Name(path) => self.resolve(&path),
            key => Err(CacheError::NotIndexable { key, path: self.path() }),
        }
    }

    /// Mapping write by dotted path.
    ///
    /// All segments but the last are resolved as in [`get_item`](Self::get_item);
    /// the last is set directly on the node they lead to. A non-string key
    /// cannot be split, so the value is stored under it on this node.
    pub fn set_item(&self, key: impl Into<Key>, value: impl Into<NodeValue>) -> Result<(), CacheError> {
        let value = value.into();
        let path = match key.into() {
            Key::Name(path) => path,
            key => {
                warn!(node = %self.path(), %key, "non-string cache key stored on the current node");
                self.shared.entries.lock().set_key(key, value);
                return Ok(());
            }
        };

        let Some((prefix, last)) = path.rsplit_once(SEPARATOR) else {
            self.shared.entries.lock().set(path.as_str(), value);
            return Ok(());
        };

        let target = self.branch_at(prefix)?;
        trace!(node = %target.path(), key = last, "cache assignment");
        target.shared.entries.lock().set(last, value);
        Ok(())
    }

    fn resolve(&self, path: &str) -> Result<NodeValue, CacheError> {
        match path.rsplit_once(SEPARATOR) {
            Some((prefix, last)) => self.branch_at(prefix)?.get_attr(last),
            None => self.get_attr(path),
        }
    }

    /// Walk every segment of `prefix`, each of which must yield a node.
    fn branch_at(&self, prefix: &str) -> Result<HierarchicalNode, CacheError> {
        let mut node = self.clone();
        let mut reached = self.path();
        for segment in prefix.split(SEPARATOR) {
            node = match node.get_attr(segment)? {
                NodeValue::Branch(next) => next,
                NodeValue::Leaf(_) => {
                    return Err(CacheError::LeafTraversal {
                        key: segment.to_owned(),
                        path: reached,
                    })
                }
            };
            reached = reached.child(segment);
        }
        Ok(node)
    }

    // -------------------------------------------------------------------
    // Misuse diagnostics
    // -------------------------------------------------------------------

    /// Calling a node is never valid. The error names the node's path, which
    /// usually points at an attribute typo that auto-created an empty branch.
    pub fn invoke(&self, _args: &[Value]) -> Result<Value, CacheError> {
        Err(CacheError::NotCallable { path: self.path() })
    }

    /// This node's ancestry, root-first, ending with `self`.
    pub fn hierarchy(&self) -> Vec<HierarchicalNode> {
        hierarchy_of(self)
    }

    /// Dotted path from the topmost ancestor to this node.
    ///
    /// Matches the origin keys along [`hierarchy`](Self::hierarchy) while
    /// every ancestor is alive.
    pub fn path(&self) -> DottedPath {
        self.shared.origin_path.clone()
    }

    // -------------------------------------------------------------------
    // Mapping view
    // -------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.entries.lock().is_empty()
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.shared.entries.lock().contains_key(key)
    }

    /// Snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<Key> {
        self.shared.entries.lock().keys().cloned().collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn items(&self) -> Vec<(Key, NodeValue)> {
        self.shared
            .entries
            .lock()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl Default for HierarchicalNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyword-style construction of a root node. Keys are stored as given.
impl<K: Into<Key>, V: Into<NodeValue>> FromIterator<(K, V)> for HierarchicalNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let node = HierarchicalNode::new();
        {
            let mut entries = node.shared.entries.lock();
            for (key, value) in iter {
                entries.set_key(key.into(), value.into());
            }
        }
        node
    }
}

thread_local! {
    /// Nodes currently being formatted on this thread.
    static FORMATTING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// A node that contains itself prints as `{...}` on the second visit.
impl fmt::Debug for HierarchicalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = Arc::as_ptr(&self.shared) as usize;
        let entered = FORMATTING.with(|set| set.borrow_mut().insert(id));
        if !entered {
            return write!(f, "HierarchicalNode({}) {{...}}", self.path());
        }
        let result = write!(f, "HierarchicalNode({}) ", self.path()).and_then(|()| {
            f.debug_map()
                .entries(self.items().into_iter().map(|(key, value)| (key.to_string(), value)))
                .finish()
        });
        FORMATTING.with(|set| set.borrow_mut().remove(&id));
        result
    }
}


/// Walk parent links from `node` to the topmost ancestor.
///
/// Index 0 is the root; the last element is `node` itself.
pub fn hierarchy_of(node: &HierarchicalNode) -> Vec<HierarchicalNode> {
    let mut chain = vec![node.clone()];
    let mut current = node.parent();
    while let Some(parent) = current {
        current = parent.parent();
        chain.push(parent);
    }
    chain.reverse();
    chain
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
