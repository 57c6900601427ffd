use std::cmp::Ordering;
use std::io::{self, Write};
use std::sync::Arc;

use number_prefix::NumberPrefix;

use crate::core::filter::{self, CompiledPatterns};
use crate::models::{EntryKind, TreeNode};

/// Display-side options. The cache mirrors the remote listing exactly, so
/// hiding and reordering happen here, against a snapshot.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pipe-separated names/globs to hide (e.g. "tmp|*.parquet")
    pub ignore_pattern: Option<String>,
    /// Whether to show entries starting with '.'
    pub show_hidden: bool,
    /// Whether to show only folders
    pub folders_only: bool,
    /// Whether to list folders before files
    pub folders_first: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ignore_pattern: None,
            show_hidden: true,
            folders_only: false,
            folders_first: false,
        }
    }
}

/// Write the subtree below `node` as an ASCII scaffold. Listing order is
/// preserved unless `folders_first` asks for regrouping; folders carry a
/// trailing `/`, files their size when known. A folder that was listed but
/// never refreshed simply renders without children.
pub fn write_children<W: Write>(
    writer: &mut W,
    node: &TreeNode,
    options: &RenderOptions,
) -> anyhow::Result<()> {
    let patterns = filter::compile(options.ignore_pattern.as_deref())?;
    let visible = visible_children(&node.children, options, patterns.as_ref());
    write_children_inner(writer, &visible, options, patterns.as_ref(), &[])?;
    Ok(())
}

fn write_children_inner<W: Write>(
    writer: &mut W,
    children: &[&TreeNode],
    options: &RenderOptions,
    patterns: Option<&CompiledPatterns>,
    ancestor_has_more: &[bool],
) -> io::Result<()> {
    for (index, &node) in children.iter().enumerate() {
        let is_last = index + 1 == children.len();

        for &has_more in ancestor_has_more {
            if has_more {
                writer.write_all(b"|   ")?;
            } else {
                writer.write_all(b"    ")?;
            }
        }

        if is_last {
            writer.write_all(b"`-- ")?;
        } else {
            writer.write_all(b"|-- ")?;
        }

        writer.write_all(entry_label(node).as_bytes())?;
        writer.write_all(b"\n")?;

        let grandchildren = visible_children(&node.children, options, patterns);
        if !grandchildren.is_empty() {
            let mut next_ancestor_has_more = ancestor_has_more.to_vec();
            next_ancestor_has_more.push(!is_last);
            write_children_inner(writer, &grandchildren, options, patterns, &next_ancestor_has_more)?;
        }
    }

    Ok(())
}

fn visible_children<'a>(
    children: &'a [Arc<TreeNode>],
    options: &RenderOptions,
    patterns: Option<&CompiledPatterns>,
) -> Vec<&'a TreeNode> {
    let mut nodes: Vec<&TreeNode> = children
        .iter()
        .map(|child| child.as_ref())
        .filter(|node| {
            if !options.show_hidden && node.name.starts_with('.') {
                return false;
            }
            if let Some(patterns) = patterns
                && patterns.matches(&node.name)
            {
                return false;
            }
            if options.folders_only && node.kind != EntryKind::Folder {
                return false;
            }
            true
        })
        .collect();

    if options.folders_first {
        nodes.sort_by(|a, b| match (a.kind, b.kind) {
            (EntryKind::Folder, EntryKind::Folder) => a.name.cmp(&b.name),
            (EntryKind::Folder, _) => Ordering::Less,
            (_, EntryKind::Folder) => Ordering::Greater,
            _ => a.name.cmp(&b.name),
        });
    }

    nodes
}

fn entry_label(node: &TreeNode) -> String {
    match node.kind {
        EntryKind::Folder => format!("{}/", node.name),
        EntryKind::File => match node.size {
            Some(size) => format!("{} ({})", node.name, format_size(size)),
            None => node.name.clone(),
        },
    }
}

pub fn format_size(size: u64) -> String {
    match NumberPrefix::binary(size as f64) {
        NumberPrefix::Standalone(bytes) => format!("{} B", bytes),
        NumberPrefix::Prefixed(prefix, n) => format!("{:.1} {}B", n, prefix),
    }
}
