use std::collections::VecDeque;

use anyhow::Result;
use log::warn;

use crate::core::cache::TreeCache;
use crate::core::filter::{self, CompiledPatterns};
use crate::models::{TreeSnapshot, join_path};
use crate::remote::ListingFetcher;

/// Options for prefetching a subtree through repeated one-level refreshes.
#[derive(Debug, Clone, Default)]
pub struct ExploreOptions {
    /// Levels of children to fetch below the starting path (None means
    /// unlimited)
    pub max_depth: Option<usize>,
    /// Pipe-separated folder names/globs that are not descended into
    pub ignore_pattern: Option<String>,
}

/// Breadth-first prefetch below `path`. The starting refresh must succeed;
/// failures further down are logged and skipped so one unreadable folder
/// does not abort the sweep.
pub async fn explore<F: ListingFetcher>(
    cache: &mut TreeCache,
    fetcher: &F,
    path: &str,
    options: &ExploreOptions,
) -> Result<TreeSnapshot> {
    let patterns = filter::compile(options.ignore_pattern.as_deref())?;

    let mut snapshot = cache.refresh(fetcher, path).await?;
    let mut queue = VecDeque::new();
    enqueue_folder_children(cache, path, 1, options, patterns.as_ref(), &mut queue);

    while let Some((current, level)) = queue.pop_front() {
        match cache.refresh(fetcher, &current).await {
            Ok(updated) => snapshot = updated,
            Err(err) => {
                warn!("skipping {current:?}: {err:#}");
                continue;
            }
        }
        enqueue_folder_children(cache, &current, level + 1, options, patterns.as_ref(), &mut queue);
    }

    Ok(snapshot)
}

/// Queue the folder children of `path` (sitting at `child_level` below the
/// starting point) for their own refresh, depth and ignore rules permitting.
fn enqueue_folder_children(
    cache: &TreeCache,
    path: &str,
    child_level: usize,
    options: &ExploreOptions,
    patterns: Option<&CompiledPatterns>,
    queue: &mut VecDeque<(String, usize)>,
) {
    let descend = match options.max_depth {
        Some(max) => child_level + 1 <= max,
        None => true,
    };
    if !descend {
        return;
    }

    let Some(node) = cache.find(path) else {
        return;
    };
    for child in &node.children {
        if !child.is_folder() {
            continue;
        }
        if let Some(patterns) = patterns
            && patterns.matches(&child.name)
        {
            continue;
        }
        queue.push_back((join_path(path, &child.name), child_level));
    }
}
