use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{EntryKind, ListingEntry};

/// Reserved name of the tree root; never replaced by a refresh.
pub const ROOT_NAME: &str = "root";

/// Split a slash-delimited path into child names. Empty segments and the
/// root sentinel address the enclosing node and are skipped.
pub fn normalize_path(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ROOT_NAME)
        .collect()
}

/// Build the path of a child from its parent's path and own name.
pub fn join_path(base: &str, name: &str) -> String {
    if normalize_path(base).is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}

/// One mirrored entry of the remote namespace.
///
/// Children are shared behind `Arc` so a refresh copies only the nodes on
/// the refreshed path; everything else keeps its allocation, and snapshots
/// taken earlier keep seeing the tree they were taken from.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub kind: EntryKind,
    /// Bytes; meaningful for files only
    pub size: Option<u64>,
    pub modified_at: DateTime<Utc>,
    /// Whether this folder's children reflect a completed fetch, as opposed
    /// to never having been listed
    pub loaded: bool,
    pub children: Vec<Arc<TreeNode>>,
}

impl TreeNode {
    pub fn folder(name: impl Into<String>, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
            size: None,
            modified_at,
            loaded: false,
            children: Vec::new(),
        }
    }

    pub fn from_entry(entry: ListingEntry, modified_at: DateTime<Utc>) -> Self {
        let size = match entry.kind {
            EntryKind::File => entry.size,
            EntryKind::Folder => None,
        };
        Self {
            name: entry.name,
            kind: entry.kind,
            size,
            modified_at,
            loaded: false,
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    pub fn child(&self, name: &str) -> Option<&Arc<TreeNode>> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Walk a slash-delimited path below this node.
    pub fn lookup(&self, path: &str) -> Option<&TreeNode> {
        let mut node = self;
        for segment in normalize_path(path) {
            node = node.child(segment)?.as_ref();
        }
        Some(node)
    }
}

/// Point-in-time view of the tree root, cheap to clone and safe to read
/// while later refreshes mutate the cache.
#[derive(Clone, Debug)]
pub struct TreeSnapshot {
    root: Arc<TreeNode>,
}

impl TreeSnapshot {
    pub(crate) fn new(root: Arc<TreeNode>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        self.root.lookup(path)
    }
}
