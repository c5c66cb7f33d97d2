use std::path::PathBuf;

use thiserror::Error;

use crate::cache::key::Key;
use crate::cache::path::DottedPath;

// ---------------------------------------------------------------------------
// Cache errors
// ---------------------------------------------------------------------------

/// Coarse classification of a [`CacheError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested entry does not exist and will not be created.
    NotFound,
    /// The operation is not valid for a cache node at all.
    Type,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
    /// A flat map has no entry under `key`.
    #[error("'FlatMap' has no attribute '{key}'")]
    MissingAttribute { key: String },

    /// `key` is never auto-created (underscore prefix, `(`/`[`, or the
    /// introspection sentinel).
    #[error("'{key}' is reserved and is never created under '{path}'")]
    ReservedAttribute { key: String, path: DottedPath },

    /// The entry `key` under `path` is a leaf, but a node was needed to
    /// keep resolving.
    #[error("'{key}' under '{path}' holds a leaf value, not a branch")]
    LeafTraversal { key: String, path: DottedPath },

    /// Mapping-style read with a non-string key.
    #[error(
        "node '{path}' is not indexable by non-string key {key}; '{}' may be an empty branch",
        .path.leaf_name()
    )]
    NotIndexable { key: Key, path: DottedPath },

    /// A node was invoked as if it were a function.
    #[error("node '{path}' is not callable; '{}' may be an empty branch", .path.leaf_name())]
    NotCallable { path: DottedPath },
}

impl CacheError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::MissingAttribute { .. }
            | CacheError::ReservedAttribute { .. }
            | CacheError::LeafTraversal { .. } => ErrorKind::NotFound,
            CacheError::NotIndexable { .. } | CacheError::NotCallable { .. } => ErrorKind::Type,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }
}

// ---------------------------------------------------------------------------
// Host configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A `PATH=VALUE` assignment without `=` or with an empty path.
    #[error("invalid assignment '{0}': expected PATH=VALUE")]
    Assignment(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
