mod entry;
mod tree;

pub use entry::{EntryKind, Listing, ListingEntry};
pub use tree::{ROOT_NAME, TreeNode, TreeSnapshot, join_path, normalize_path};
