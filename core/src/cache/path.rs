//! Dotted path splitting and the attribute admission rule.
//!
//! Paths like `site.posts.per_page` address nested cache nodes one segment
//! at a time. Splitting is purely lexical: empty segments (`a..b`) are kept
//! and resolve like any other name.

use std::fmt;


/// Separator between segments of a dotted path.
pub const SEPARATOR: char = '.';

/// Attribute name looked up by introspection tooling. Never auto-created.
pub const RESERVED_SENTINEL: &str = "trait_names";

/// Placeholder shown in diagnostics for the path of a root node.
const ROOT_LABEL: &str = "<root>";


/// True if `name` may be auto-created by attribute access.
///
/// Names starting with `_`, containing `(` or `[`, or equal to
/// [`RESERVED_SENTINEL`] are treated as genuinely absent.
pub fn is_vivifiable(name: &str) -> bool {
    !name.starts_with('_')
        && !name.contains('(')
        && !name.contains('[')
        && name != RESERVED_SENTINEL
}


/// An ordered list of path segments, root-first.
///
/// The empty path denotes a root node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    /// The path of a root node.
    pub fn root() -> Self {
        DottedPath { segments: Vec::new() }
    }

    /// Split a dotted string into segments.
    pub fn parse(input: &str) -> Self {
        input.split(SEPARATOR).map(str::to_owned).collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, or `<root>` for the empty path.
    pub fn leaf_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or(ROOT_LABEL)
    }

    /// Everything but the final segment.
    pub fn parent(&self) -> DottedPath {
        let end = self.segments.len().saturating_sub(1);
        DottedPath { segments: self.segments[..end].to_vec() }
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: &str) -> DottedPath {
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        DottedPath { segments }
    }

    /// A new path with every segment of the dotted string `suffix` appended.
    pub fn join_dotted(&self, suffix: &str) -> DottedPath {
        let mut segments = self.segments.clone();
        segments.extend(suffix.split(SEPARATOR).map(str::to_owned));
        DottedPath { segments }
    }

    /// Format back to a dotted string. The root path is the empty string.
    pub fn to_dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(ROOT_LABEL)
        } else {
            f.write_str(&self.to_dotted())
        }
    }
}

impl FromIterator<String> for DottedPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        DottedPath { segments: iter.into_iter().collect() }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
