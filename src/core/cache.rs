use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;

use crate::models::{Listing, ROOT_NAME, TreeNode, TreeSnapshot, normalize_path};
use crate::remote::ListingFetcher;

/// Local mirror of one remote hierarchical namespace, refreshed one
/// directory level at a time.
///
/// Each `refresh` wholesale-replaces the children of a single node; the rest
/// of the tree keeps its allocations, so consumers holding earlier snapshots
/// can tell untouched subtrees apart by pointer identity and skip
/// re-rendering them. Independent caches share nothing.
pub struct TreeCache {
    root: Arc<TreeNode>,
}

impl TreeCache {
    pub fn new() -> Self {
        Self {
            root: Arc::new(TreeNode::folder(ROOT_NAME, Utc::now())),
        }
    }

    /// Re-list `path` on the remote and merge the result into the tree.
    ///
    /// The fetch always receives the original path string; normalization
    /// only governs the local walk. Missing intermediate segments are
    /// created as unloaded folders on the way down. On fetch failure the
    /// tree is left exactly as it was.
    pub async fn refresh<F: ListingFetcher>(
        &mut self,
        fetcher: &F,
        path: &str,
    ) -> Result<TreeSnapshot> {
        // Fetch before touching the tree; an error here must not leave a
        // partially applied merge behind.
        let listing = fetcher.fetch_listing(path).await?;
        debug!("refresh {path:?}: {} entries", listing.entries.len());

        let now = Utc::now();
        let mut node = Arc::make_mut(&mut self.root);
        for segment in normalize_path(path) {
            let index = match node.children.iter().position(|c| c.name == segment) {
                Some(index) => index,
                None => {
                    node.children.push(Arc::new(TreeNode::folder(segment, now)));
                    node.children.len() - 1
                }
            };
            node = Arc::make_mut(&mut node.children[index]);
        }

        node.children = convert_listing(listing, now);
        node.loaded = true;
        node.modified_at = now;

        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::new(Arc::clone(&self.root))
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        self.root.lookup(path)
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A listing that repeats a name collapses onto the earlier occurrence's
/// position, keeping the later entry's data.
fn convert_listing(listing: Listing, now: DateTime<Utc>) -> Vec<Arc<TreeNode>> {
    let mut children: Vec<Arc<TreeNode>> = Vec::with_capacity(listing.entries.len());
    for entry in listing.entries {
        let node = Arc::new(TreeNode::from_entry(entry, now));
        match children.iter().position(|c| c.name == node.name) {
            Some(index) => children[index] = node,
            None => children.push(node),
        }
    }
    children
}
