//! Conditional block pruning.
//!
//! Before substitution, content controls tagged `<key>_<N>` are compared
//! against the integer control value: the block whose suffix matches is
//! unwrapped (its content takes the wrapper's place), every other block is
//! removed entirely. The pass rebuilds each parent's child list, so node
//! removal never invalidates an iterator, and spliced content is itself
//! pruned before it is attached.

use crate::docx::content_control;
use crate::docx::tree::{DocumentTree, NodeId};

/// Counts of what a pruning pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Blocks removed entirely, wrapper and content
    pub deleted: usize,
    /// Blocks whose wrapper was removed with the content kept in place
    pub unwrapped: usize,
}

enum Action {
    Keep,
    Delete,
    Unwrap,
}

/// Prune all conditional blocks whose tag starts with `prefix`.
///
/// Blocks with suffix `expected` are unwrapped, all other integer suffixes
/// are deleted. Non-integer suffixes are left untouched.
pub(crate) fn prune(
    tree: &mut DocumentTree,
    prefix: &str,
    expected: i64,
) -> PruneSummary {
    let mut summary = PruneSummary::default();
    let roots = tree.roots().to_vec();
    let pruned = prune_list(tree, &roots, prefix, expected, &mut summary);
    tree.set_roots(pruned);
    summary
}

fn prune_list(
    tree: &mut DocumentTree,
    ids: &[NodeId],
    prefix: &str,
    expected: i64,
    summary: &mut PruneSummary,
) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        match classify(tree, id, prefix, expected) {
            Action::Delete => {
                summary.deleted += 1;
            },
            Action::Unwrap => {
                summary.unwrapped += 1;
                let content = content_control::content_node(tree, id)
                    .and_then(|node| tree.element(node))
                    .map(|el| el.children().to_vec())
                    .unwrap_or_default();
                // Spliced content may contain further conditional blocks.
                out.extend(prune_list(tree, &content, prefix, expected, summary));
            },
            Action::Keep => {
                if let Some(el) = tree.element(id) {
                    let children = el.children().to_vec();
                    let pruned = prune_list(tree, &children, prefix, expected, summary);
                    tree.set_children(id, pruned);
                }
                out.push(id);
            },
        }
    }
    out
}

fn classify(tree: &DocumentTree, id: NodeId, prefix: &str, expected: i64) -> Action {
    let Some(el) = tree.element(id) else {
        return Action::Keep;
    };
    if el.local_name() != "sdt" {
        return Action::Keep;
    }
    let Some(tag) = content_control::tag_value(tree, id) else {
        return Action::Keep;
    };
    let Some(suffix) = tag.strip_prefix(prefix) else {
        return Action::Keep;
    };
    match suffix.parse::<i64>() {
        Ok(n) if n == expected => Action::Unwrap,
        Ok(_) => Action::Delete,
        Err(_) => {
            log::debug!(
                "conditional block tag '{}' has a non-integer suffix, left untouched",
                tag
            );
            Action::Keep
        },
    }
}
