//! Descendant counting

use crate::node::TreeNode;

/// Running count of nodes across one or more forests
///
/// The counter is owned by the caller, so independent counts never share state.
/// Pass `reset = true` to [`DescendantCounter::count`] for a fresh total, or keep
/// accumulating over several forests with `reset = false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescendantCounter {
    total: usize,
}

impl DescendantCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the running count
    pub fn reset(&mut self) {
        self.total = 0;
    }

    /// The running count
    pub fn total(&self) -> usize {
        self.total
    }

    /// Add every node of `nodes`, at every depth, to the running count
    ///
    /// Returns the running count after counting. An empty forest adds nothing.
    pub fn count<D>(&mut self, nodes: &[TreeNode<D>], reset: bool) -> usize {
        if reset {
            self.reset();
        }

        let mut pending: Vec<&[TreeNode<D>]> = vec![nodes];
        while let Some(siblings) = pending.pop() {
            self.total += siblings.len();
            for node in siblings {
                if !node.children.is_empty() {
                    pending.push(&node.children);
                }
            }
        }

        self.total
    }
}

/// Count the nodes of a forest across all depths
pub fn count_descendants<D>(nodes: &[TreeNode<D>]) -> usize {
    DescendantCounter::new().count(nodes, true)
}
