//! Input model: identifiers and tree nodes

use derive_more::{Display, From};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a node, copied into the `menuid` of its record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[display(fmt = "{}", _0)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Get the inner value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A node of the input forest
///
/// Generic over the payload `D`. Children live next to the payload rather than
/// inside it, so records can carry a copy of `data` without the subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<D> {
    /// The node identifier. `None` only for malformed input.
    pub id: Option<NodeId>,
    /// The parent the node declares for itself
    pub parent: Option<NodeId>,
    /// Caller-defined payload
    pub data: D,
    /// Ordered children; empty for leaves
    pub children: Vec<TreeNode<D>>,
}

impl<D> TreeNode<D> {
    /// Create a leaf node with an identifier and no declared parent
    pub fn new(id: u64, data: D) -> Self {
        Self {
            id: Some(NodeId(id)),
            parent: None,
            data,
            children: Vec::new(),
        }
    }

    /// Create a node without identifier
    pub fn anonymous(data: D) -> Self {
        Self {
            id: None,
            parent: None,
            data,
            children: Vec::new(),
        }
    }

    /// Set the declared parent
    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent = Some(NodeId(parent));
        self
    }

    /// Replace the children
    pub fn with_children(mut self, children: Vec<TreeNode<D>>) -> Self {
        self.children = children;
        self
    }

    /// Append a child after the existing ones
    pub fn push_child(&mut self, child: TreeNode<D>) {
        self.children.push(child);
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Position of a node in a forest, as sibling indices from the top level down
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Sibling indices, outermost first
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.0.split_first() else {
            return write!(f, "<forest>");
        };
        write!(f, "[{first}]")?;
        for index in rest {
            write!(f, ".children[{index}]")?;
        }
        Ok(())
    }
}
