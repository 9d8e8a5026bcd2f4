//! Reference tracking for one traversal.
//!
//! Two trackers with different guarantees:
//!
//! - [`RefTable`] maps each composite node's handle to the path where it was
//!   first seen. A repeat is reported as a cycle when the first path is an
//!   ancestor of the current one, and as a duplicate otherwise. The debug
//!   renderer uses it.
//! - [`SeenList`] is an ordered list of nodes checked by identity. Any repeat
//!   is just "seen". Compact encoding uses it.
//!
//! Both keep every recorded node alive until the traversal ends, so a handle
//! is never reused by a later allocation while it is in the table.
//! Leaves are never recorded.

use crate::walk::Path;
use crate::Value;
use std::collections::HashMap;

/// Outcome of looking a node up in a [`RefTable`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reference {
    /// Not seen before, or seen at this very path.
    New,
    /// First seen at an ancestor of the current path.
    Cycle(Path),
    /// First seen on another branch.
    Duplicate(Path),
}

#[derive(Default)]
pub(crate) struct RefTable {
    paths: HashMap<usize, Path>,
    retained: Vec<Value>,
}

impl RefTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lookup(&self, value: &Value, path: &Path) -> Reference {
        let Some(first) = value.handle().and_then(|handle| self.paths.get(&handle)) else {
            return Reference::New;
        };
        if first == path {
            Reference::New
        } else if first.is_strict_ancestor_of(path) {
            Reference::Cycle(first.clone())
        } else {
            Reference::Duplicate(first.clone())
        }
    }

    /// Records a composite node at `path`. The first recorded path wins.
    pub(crate) fn record(&mut self, value: &Value, path: &Path) {
        if let Some(handle) = value.handle() {
            if !self.paths.contains_key(&handle) {
                self.paths.insert(handle, path.clone());
                self.retained.push(value.clone());
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }
}

#[derive(Default)]
pub(crate) struct SeenList {
    seen: Vec<Value>,
}

impl SeenList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        match value.handle() {
            Some(handle) => self.seen.iter().any(|seen| seen.handle() == Some(handle)),
            None => false,
        }
    }

    pub(crate) fn push(&mut self, value: &Value) {
        if value.is_composite() && !self.contains(value) {
            self.seen.push(value.clone());
        }
    }
}
