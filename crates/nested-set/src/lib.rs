//! Nested Set Encoding
//!
//! Converts an ordered forest of tree nodes into the flat nested-set table used to
//! persist hierarchies (menus, categories) in a single relation. Every node gets a
//! `left` and `right` boundary, a `level` and a resolved `parent`, so that subtree
//! questions become interval comparisons instead of recursive lookups.
//!
//! # Core Concepts
//!
//! - **TreeNode**: an input node with an identifier, a declared parent, a payload and children
//! - **DescendantCounter**: counts every node of a forest across all depths
//! - **Encoder**: one depth-first pass assigning left/right/level/parent
//! - **NestedSetMap**: the flat output, keyed by node identifier, with interval queries
//!
//! The forest is encoded below an external root that is never emitted. With the
//! default options that root owns `left = 1`, so the first top-level node starts at 2
//! and sits on level 2.
//!
//! # Example
//!
//! ```
//! use nested_set::{encode, EncodeOptions, NodeId, TreeNode};
//!
//! let forest = vec![
//!     TreeNode::new(1, "Category").with_children(vec![TreeNode::new(2, "Page")]),
//!     TreeNode::new(3, "Home"),
//! ];
//!
//! let map = encode(&forest, &EncodeOptions::default()).unwrap();
//!
//! let category = map.get(NodeId(1)).unwrap();
//! assert_eq!((category.left, category.right, category.level), (2, 5, 2));
//!
//! let page = map.get(NodeId(2)).unwrap();
//! assert_eq!((page.left, page.right, page.level), (3, 4, 3));
//! assert_eq!(page.parent, Some(NodeId(1)));
//! ```

mod counter;
mod encoder;
mod error;
#[cfg(feature = "serde")]
pub mod json;
mod node;
mod query;
mod record;

pub use counter::{count_descendants, DescendantCounter};
pub use encoder::{
    encode, DuplicatePolicy, EncodeOptions, Encoder, DEFAULT_ROOT_LEFT, DEFAULT_START_LEVEL,
};
pub use error::{NestedSetError, Result};
pub use node::{NodeId, NodePath, TreeNode};
pub use query::Outline;
pub use record::{NestedSetMap, NestedSetRecord};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        count_descendants, encode, DescendantCounter, DuplicatePolicy, EncodeOptions, Encoder,
        NestedSetError, NestedSetMap, NestedSetRecord, NodeId, Outline, TreeNode,
    };
}
