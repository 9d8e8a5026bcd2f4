//! Depth-first traversal of value graphs.
//!
//! The walker visits every reachable node, handing each one to a
//! [`Visitor`] together with its [`Path`] from the root. The visitor either
//! returns a node to descend into (possibly a replacement) or a finished
//! output fragment that is not descended.
//!
//! Walking never mutates the input graph. The output is a fresh, acyclic
//! [`Node`] tree ready for the text writer.

use crate::ser::Node;
use crate::{Result, Value};
use std::fmt;

/// One step from a parent to a child.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(key) if key.is_empty() => f.write_str("\"\""),
            PathSegment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
        }
    }
}

/// Location of a node, as the sequence of keys and indices from the root.
///
/// Paths compare by content. They display as `#/` followed by the
/// `/`-joined segments. An empty key displays as `""` so it stays distinct
/// from the root.
///
/// # Examples
///
/// ```rust
/// use json2::{Path, PathSegment};
///
/// let mut path = Path::root();
/// path.push(PathSegment::Key("items".to_string()));
/// path.push(PathSegment::Index(0));
/// assert_eq!(path.to_string(), "#/items/0");
/// assert_eq!(Path::root().to_string(), "#/");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    #[must_use]
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// The key under which the node sits; `None` at the root.
    #[must_use]
    pub fn key(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `self` lies strictly above `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json2::{Path, PathSegment};
    ///
    /// let mut child = Path::root();
    /// child.push(PathSegment::Key("a".to_string()));
    /// assert!(Path::root().is_strict_ancestor_of(&child));
    /// assert!(!child.is_strict_ancestor_of(&child));
    /// ```
    #[must_use]
    pub fn is_strict_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#/")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// What a visitor decided for one node.
pub(crate) enum Step {
    /// Walk this value: its children for composites, itself for leaves.
    Descend(Value),
    /// Finished output; children, if any, are not visited.
    Emit(Node),
}

pub(crate) trait Visitor {
    fn visit(&mut self, path: &Path, value: Value) -> Result<Step>;
}

/// Walks `value`, returning the output tree, or `None` when the root is absent.
///
/// Each node first goes through its conversion capability, then through the
/// visitor. Children are taken from whatever the visitor returned, not from
/// the original node. State lives only for this call.
pub(crate) fn walk<V: Visitor>(value: &Value, visitor: &mut V) -> Result<Option<Node>> {
    let mut path = Path::root();
    walk_node(value.clone(), &mut path, visitor)
}

fn walk_node<V: Visitor>(value: Value, path: &mut Path, visitor: &mut V) -> Result<Option<Node>> {
    let value = value.serialized(path.key());

    let value = match visitor.visit(path, value)? {
        Step::Emit(node) => return Ok(Some(node)),
        Step::Descend(value) => value,
    };

    match value {
        Value::Array(arr) => {
            let items = arr.to_vec();
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push(PathSegment::Index(i));
                let child = walk_node(item, path, visitor);
                path.pop();
                out.push(child?.unwrap_or(Node::Null));
            }
            Ok(Some(Node::Array(out)))
        }
        Value::Object(obj) => {
            let entries = obj.entries();
            let mut out = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                path.push(PathSegment::Key(key.clone()));
                let child = walk_node(item, path, visitor);
                path.pop();
                if let Some(node) = child? {
                    out.push((key, node));
                }
            }
            Ok(Some(Node::Object(out)))
        }
        leaf => Ok(Node::from_leaf(leaf)),
    }
}
