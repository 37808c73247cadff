use std::collections::btree_map::{self, BTreeMap};
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::node::NodeId;

/// One row of the nested-set table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NestedSetRecord<D> {
    /// Copy of the node identifier
    pub menuid: NodeId,

    /// Left boundary, assigned when the node is entered
    pub left: u64,

    /// Right boundary, assigned when the node is closed
    pub right: u64,

    /// Depth, counted from the external root at level 1
    pub level: u32,

    /// Resolved parent: the enclosing node, the override, or the declared parent
    pub parent: Option<NodeId>,

    /// The node payload, without children
    pub data: D,
}

impl<D> NestedSetRecord<D> {
    /// Both boundaries as an inclusive range
    pub fn interval(&self) -> RangeInclusive<u64> {
        self.left..=self.right
    }

    /// Check if the record has no descendants
    pub fn is_leaf(&self) -> bool {
        self.right == self.left + 1
    }

    /// Number of descendants, derived from the interval width
    pub fn descendant_count(&self) -> u64 {
        self.right.saturating_sub(self.left + 1) / 2
    }

    /// Check if `other` lies strictly inside this record's interval
    pub fn contains<E>(&self, other: &NestedSetRecord<E>) -> bool {
        self.left < other.left && other.right < self.right
    }
}

/// The flat output of an encode: one record per node identifier
///
/// Records are keyed and iterated by identifier. Use [`NestedSetMap::by_left`]
/// for the pre-order of the original forest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct NestedSetMap<D> {
    records: BTreeMap<NodeId, NestedSetRecord<D>>,
}

impl<D> Default for NestedSetMap<D> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<D> NestedSetMap<D> {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, record: NestedSetRecord<D>) -> Option<NestedSetRecord<D>> {
        self.records.insert(record.menuid, record)
    }

    /// Get a record by identifier
    pub fn get(&self, id: NodeId) -> Option<&NestedSetRecord<D>> {
        self.records.get(&id)
    }

    /// Check if an identifier has a record
    pub fn contains(&self, id: NodeId) -> bool {
        self.records.contains_key(&id)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the map has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in identifier order
    pub fn iter(&self) -> btree_map::Values<'_, NodeId, NestedSetRecord<D>> {
        self.records.values()
    }

    /// Iterate over identifiers in order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.records.keys().copied()
    }

    /// Records sorted by left boundary
    pub fn by_left(&self) -> Vec<&NestedSetRecord<D>> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by_key(|r| r.left);
        records
    }

    /// The largest right boundary, or `None` for an empty map
    ///
    /// The external root closes at this value plus one.
    pub fn right_boundary(&self) -> Option<u64> {
        self.records.values().map(|r| r.right).max()
    }

    /// Consume the map, returning the records in identifier order
    pub fn into_records(self) -> Vec<NestedSetRecord<D>> {
        self.records.into_values().collect()
    }
}

impl<'a, D> IntoIterator for &'a NestedSetMap<D> {
    type Item = &'a NestedSetRecord<D>;
    type IntoIter = btree_map::Values<'a, NodeId, NestedSetRecord<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, left: u64, right: u64, level: u32) -> NestedSetRecord<()> {
        NestedSetRecord {
            menuid: NodeId(id),
            left,
            right,
            level,
            parent: None,
            data: (),
        }
    }

    #[test]
    fn test_record_helpers() {
        let outer = record(1, 2, 7, 2);
        let inner = record(2, 3, 4, 3);
        let sibling = record(3, 8, 9, 2);

        assert!(!outer.is_leaf());
        assert!(inner.is_leaf());
        assert_eq!(outer.descendant_count(), 2);
        assert_eq!(inner.descendant_count(), 0);
        assert_eq!(outer.interval(), 2..=7);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&sibling));
        assert!(!outer.contains(&outer));
    }

    #[test]
    fn test_map_operations() {
        let mut map = NestedSetMap::new();
        assert!(map.is_empty());
        assert_eq!(map.right_boundary(), None);

        assert!(map.insert(record(9, 2, 3, 2)).is_none());
        assert!(map.insert(record(4, 4, 5, 2)).is_none());
        assert_eq!(map.len(), 2);
        assert!(map.contains(NodeId(9)));
        assert!(!map.contains(NodeId(1)));

        // Identifier order differs from left order
        assert_eq!(map.ids().collect::<Vec<_>>(), vec![NodeId(4), NodeId(9)]);
        let lefts: Vec<_> = map.by_left().iter().map(|r| r.menuid).collect();
        assert_eq!(lefts, vec![NodeId(9), NodeId(4)]);
        assert_eq!(map.right_boundary(), Some(5));

        let replaced = map.insert(record(9, 6, 7, 2)).unwrap();
        assert_eq!(replaced.left, 2);
        assert_eq!(map.get(NodeId(9)).unwrap().left, 6);
        assert_eq!(map.len(), 2);

        let records = map.into_records();
        assert_eq!(records[0].menuid, NodeId(4));
    }
}
