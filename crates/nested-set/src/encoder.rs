use derive_more::Display;
use log::{debug, trace, warn};

use crate::counter::DescendantCounter;
use crate::error::{NestedSetError, Result};
use crate::node::{NodeId, NodePath, TreeNode};
use crate::record::{NestedSetMap, NestedSetRecord};

/// Level of the top-level nodes when the external root sits on level 1
pub const DEFAULT_START_LEVEL: u32 = 2;

/// Left boundary of the external root
pub const DEFAULT_ROOT_LEFT: u64 = 1;

/// What to do when an identifier occurs more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum DuplicatePolicy {
    /// The later occurrence replaces the earlier record
    #[default]
    #[display(fmt = "overwrite")]
    Overwrite,

    /// Abort the encode with `DuplicateIdentifier`
    #[display(fmt = "reject")]
    Reject,
}

/// Settings for one encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Parent forced onto every top-level node. `None` or `NodeId(0)` keeps
    /// each node's declared parent.
    pub parent: Option<NodeId>,

    /// Level assigned to the top-level nodes
    pub start_level: u32,

    /// Left boundary of the external root; the first node gets this plus one
    pub root_left: u64,

    /// Handling of repeated identifiers
    pub duplicates: DuplicatePolicy,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            parent: None,
            start_level: DEFAULT_START_LEVEL,
            root_left: DEFAULT_ROOT_LEFT,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl EncodeOptions {
    /// Force the resolved parent of the top-level nodes
    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the level of the top-level nodes
    pub fn with_start_level(mut self, level: u32) -> Self {
        self.start_level = level;
        self
    }

    /// Set the left boundary of the external root
    pub fn with_root_left(mut self, left: u64) -> Self {
        self.root_left = left;
        self
    }

    /// Set the duplicate identifier policy
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    fn parent_override(&self) -> Option<NodeId> {
        self.parent.and_then(positive)
    }
}

/// Only positive identifiers override a declared parent
fn positive(id: NodeId) -> Option<NodeId> {
    (id.get() > 0).then_some(id)
}

/// Assigns nested-set boundaries to a forest in one depth-first pass
///
/// The encoder only holds configuration. The left-boundary cursor lives inside
/// each [`Encoder::encode`] call, so one encoder can serve independent forests,
/// including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: EncodeOptions,
}

/// A sibling list being walked, together with what its nodes inherit
struct Frame<'a, D> {
    siblings: &'a [TreeNode<D>],
    next: usize,
    parent: Option<NodeId>,
    level: u32,
    /// Right boundary of the node owning these siblings
    close: Option<u64>,
}

impl Encoder {
    /// Create an encoder with the given options
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// Get the options
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encode a forest into its flat nested-set table
    ///
    /// Nodes are visited in input order. A node gets `left` when entered. A leaf
    /// closes one step later; a node with children closes at
    /// `left + 2 * descendants + 1`, and numbering resumes after that boundary.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for a node without identifier,
    /// `DuplicateIdentifier` for a repeated identifier when duplicates are
    /// rejected, and `Overflow` when a boundary or level leaves its integer
    /// range. No partial table is returned.
    pub fn encode<D: Clone>(&self, nodes: &[TreeNode<D>]) -> Result<NestedSetMap<D>> {
        debug!(
            "Encoding forest of {} top-level nodes (level {}, root left {}, duplicates {})",
            nodes.len(),
            self.options.start_level,
            self.options.root_left,
            self.options.duplicates
        );

        let mut map = NestedSetMap::new();
        let mut counter = DescendantCounter::new();
        let mut cursor = self.options.root_left;
        let mut stack = vec![Frame {
            siblings: nodes,
            next: 0,
            parent: self.options.parent_override(),
            level: self.options.start_level,
            close: None,
        }];

        while let Some(frame) = stack.last_mut() {
            let siblings = frame.siblings;
            let Some(node) = siblings.get(frame.next) else {
                // Sibling list exhausted: resume after the owner's right boundary
                if let Some(close) = frame.close {
                    cursor = close;
                }
                stack.pop();
                continue;
            };
            frame.next += 1;
            let (inherited_parent, level) = (frame.parent, frame.level);

            let Some(id) = node.id else {
                return Err(NestedSetError::malformed(
                    current_path(&stack),
                    "node has no identifier",
                ));
            };

            let overflow = |what: &'static str| NestedSetError::Overflow {
                path: current_path(&stack),
                what,
            };
            let left = cursor.checked_add(1).ok_or_else(|| overflow("left boundary"))?;
            let right = if node.children.is_empty() {
                left.checked_add(1)
            } else {
                let descendants = counter.count(&node.children, true) as u64;
                descendants
                    .checked_mul(2)
                    .and_then(|width| width.checked_add(left))
                    .and_then(|right| right.checked_add(1))
            }
            .ok_or_else(|| overflow("right boundary"))?;
            // A leaf is closed; a parent's children number from its left boundary
            cursor = if node.children.is_empty() { right } else { left };

            let record = NestedSetRecord {
                menuid: id,
                left,
                right,
                level,
                parent: inherited_parent.or(node.parent),
                data: node.data.clone(),
            };
            trace!("Record {id}: [{left}, {right}] level {level}");

            if self.options.duplicates == DuplicatePolicy::Reject && map.contains(id) {
                return Err(NestedSetError::DuplicateIdentifier {
                    id,
                    path: current_path(&stack),
                });
            }
            if let Some(previous) = map.insert(record) {
                warn!(
                    "Identifier {id} occurs twice; record [{}, {}] replaced by [{left}, {right}]",
                    previous.left, previous.right
                );
            }

            if !node.children.is_empty() {
                let level = level.checked_add(1).ok_or_else(|| overflow("level"))?;
                stack.push(Frame {
                    siblings: &node.children,
                    next: 0,
                    parent: positive(id),
                    level,
                    close: Some(right),
                });
            }
        }

        debug!("Encoded {} records, last boundary {cursor}", map.len());
        Ok(map)
    }
}

/// Path of the node most recently taken from the top frame
fn current_path<D>(stack: &[Frame<'_, D>]) -> NodePath {
    stack
        .iter()
        .map(|frame| frame.next.saturating_sub(1))
        .collect::<Vec<_>>()
        .into()
}

/// Encode a forest with the given options
///
/// # Errors
///
/// See [`Encoder::encode`].
pub fn encode<D: Clone>(
    nodes: &[TreeNode<D>],
    options: &EncodeOptions,
) -> Result<NestedSetMap<D>> {
    Encoder::new(options.clone()).encode(nodes)
}
