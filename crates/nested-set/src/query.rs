//! Interval queries on an encoded table
//!
//! Everything here works from the boundaries alone, the way a database query
//! against a nested-set table would: a record is inside another when its
//! interval is strictly contained in the other's.

use crate::error::{NestedSetError, Result};
use crate::node::NodeId;
use crate::record::{NestedSetMap, NestedSetRecord};

/// Shape of a forest rebuilt from intervals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Identifier of the node
    pub id: NodeId,
    /// Child outlines in sibling order
    pub children: Vec<Outline>,
}

impl Outline {
    /// Create an outline without children
    pub fn leaf(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    /// Create an outline with children
    pub fn node(id: impl Into<NodeId>, children: Vec<Outline>) -> Self {
        Self {
            id: id.into(),
            children,
        }
    }
}

impl<D> NestedSetMap<D> {
    /// Records strictly inside `id`'s interval, in left order
    ///
    /// Returns an empty vector for unknown identifiers.
    pub fn descendants(&self, id: NodeId) -> Vec<&NestedSetRecord<D>> {
        let Some(outer) = self.get(id) else {
            return Vec::new();
        };
        self.by_left()
            .into_iter()
            .filter(|r| outer.contains(*r))
            .collect()
    }

    /// Records whose interval strictly contains `id`'s, outermost first
    pub fn ancestors(&self, id: NodeId) -> Vec<&NestedSetRecord<D>> {
        let Some(inner) = self.get(id) else {
            return Vec::new();
        };
        self.by_left()
            .into_iter()
            .filter(|r| r.contains(inner))
            .collect()
    }

    /// Direct children of `id`, in sibling order
    pub fn children(&self, id: NodeId) -> Vec<&NestedSetRecord<D>> {
        let mut children = Vec::new();
        let mut covered_until = 0;
        for record in self.descendants(id) {
            if record.left > covered_until {
                covered_until = record.right;
                children.push(record);
            }
        }
        children
    }

    /// Check if `descendant` lies inside `ancestor`
    pub fn is_descendant(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        match (self.get(ancestor), self.get(descendant)) {
            (Some(outer), Some(inner)) => outer.contains(inner),
            _ => false,
        }
    }

    /// Rebuild the forest shape from interval containment alone
    pub fn reconstruct(&self) -> Vec<Outline> {
        let mut roots = Vec::new();
        let mut open: Vec<(u64, Outline)> = Vec::new();

        for record in self.by_left() {
            while open.last().is_some_and(|(right, _)| *right < record.left) {
                close_outline(&mut open, &mut roots);
            }
            open.push((record.right, Outline::leaf(record.menuid)));
        }
        while !open.is_empty() {
            close_outline(&mut open, &mut roots);
        }

        roots
    }

    /// Check the table against the nested-set invariants
    ///
    /// Every interval must be well formed and either nest inside or be disjoint
    /// from every other interval. Nested records must sit one level below, and
    /// name as parent, their enclosing record unless its identifier is 0;
    /// top-level records share a level.
    /// The interval width must match the number of records inside it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEncoding` for the first record that breaks an invariant.
    pub fn validate(&self) -> Result<()> {
        let mut top_level = None;
        // Enclosing records with the number of records seen inside each
        let mut open: Vec<(&NestedSetRecord<D>, u64)> = Vec::new();

        for record in self.by_left() {
            if record.right <= record.left {
                return Err(NestedSetError::invalid(
                    record.menuid,
                    format!("right {} does not exceed left {}", record.right, record.left),
                ));
            }
            if (record.right - record.left) % 2 == 0 {
                return Err(NestedSetError::invalid(
                    record.menuid,
                    format!("interval [{}, {}] has even width", record.left, record.right),
                ));
            }

            while open.last().is_some_and(|(outer, _)| outer.right < record.left) {
                close_checked(&mut open)?;
            }

            match open.last() {
                Some((outer, _)) => {
                    if !outer.contains(record) {
                        return Err(NestedSetError::invalid(
                            record.menuid,
                            format!("interval overlaps record {}", outer.menuid),
                        ));
                    }
                    if outer.level.checked_add(1) != Some(record.level) {
                        return Err(NestedSetError::invalid(
                            record.menuid,
                            format!("level {} below level {}", record.level, outer.level),
                        ));
                    }
                    // Identifier 0 never becomes a parent
                    if outer.menuid.get() > 0 && record.parent != Some(outer.menuid) {
                        return Err(NestedSetError::invalid(
                            record.menuid,
                            format!("parent is not the enclosing record {}", outer.menuid),
                        ));
                    }
                }
                None => {
                    let level = *top_level.get_or_insert(record.level);
                    if level != record.level {
                        return Err(NestedSetError::invalid(
                            record.menuid,
                            format!("top-level record on level {}, expected {level}", record.level),
                        ));
                    }
                }
            }

            open.push((record, 0));
        }
        while !open.is_empty() {
            close_checked(&mut open)?;
        }

        Ok(())
    }
}

fn close_outline(open: &mut Vec<(u64, Outline)>, roots: &mut Vec<Outline>) {
    let Some((_, done)) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some((_, parent)) => parent.children.push(done),
        None => roots.push(done),
    }
}

fn close_checked<D>(open: &mut Vec<(&NestedSetRecord<D>, u64)>) -> Result<()> {
    let Some((record, inside)) = open.pop() else {
        return Ok(());
    };
    if record.descendant_count() != inside {
        return Err(NestedSetError::invalid(
            record.menuid,
            format!(
                "interval [{}, {}] spans {} descendants but contains {inside}",
                record.left,
                record.right,
                record.descendant_count()
            ),
        ));
    }
    if let Some((_, count)) = open.last_mut() {
        *count += inside + 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, EncodeOptions, TreeNode};
    use pretty_assertions::assert_eq;

    // 15 ─┬─ 17 ── 18
    //     ├─ 19 ── 21 ── 22
    //     └─ 23
    // 16 ─── 20
    fn sample() -> NestedSetMap<()> {
        let forest = vec![
            TreeNode::new(15, ()).with_children(vec![
                TreeNode::new(17, ()).with_children(vec![TreeNode::new(18, ())]),
                TreeNode::new(19, ()).with_children(vec![
                    TreeNode::new(21, ()).with_children(vec![TreeNode::new(22, ())])
                ]),
                TreeNode::new(23, ()),
            ]),
            TreeNode::new(16, ()).with_children(vec![TreeNode::new(20, ())]),
        ];
        encode(&forest, &EncodeOptions::default()).unwrap()
    }

    fn ids(records: Vec<&NestedSetRecord<()>>) -> Vec<u64> {
        records.iter().map(|r| r.menuid.get()).collect()
    }

    #[test]
    fn test_descendants_and_ancestors() {
        let map = sample();
        assert_eq!(ids(map.descendants(NodeId(15))), vec![17, 18, 19, 21, 22, 23]);
        assert_eq!(ids(map.descendants(NodeId(22))), Vec::<u64>::new());
        assert_eq!(ids(map.ancestors(NodeId(22))), vec![15, 19, 21]);
        assert_eq!(ids(map.ancestors(NodeId(16))), Vec::<u64>::new());
        assert!(map.descendants(NodeId(404)).is_empty());
    }

    #[test]
    fn test_children() {
        let map = sample();
        assert_eq!(ids(map.children(NodeId(15))), vec![17, 19, 23]);
        assert_eq!(ids(map.children(NodeId(19))), vec![21]);
        assert_eq!(ids(map.children(NodeId(23))), Vec::<u64>::new());
    }

    #[test]
    fn test_is_descendant() {
        let map = sample();
        assert!(map.is_descendant(NodeId(15), NodeId(22)));
        assert!(!map.is_descendant(NodeId(22), NodeId(15)));
        assert!(!map.is_descendant(NodeId(16), NodeId(18)));
        assert!(!map.is_descendant(NodeId(15), NodeId(15)));
        assert!(!map.is_descendant(NodeId(15), NodeId(404)));
    }

    #[test]
    fn test_reconstruct() {
        let expected = vec![
            Outline::node(
                15u64,
                vec![
                    Outline::node(17u64, vec![Outline::leaf(18u64)]),
                    Outline::node(19u64, vec![Outline::node(21u64, vec![Outline::leaf(22u64)])]),
                    Outline::leaf(23u64),
                ],
            ),
            Outline::node(16u64, vec![Outline::leaf(20u64)]),
        ];
        assert_eq!(sample().reconstruct(), expected);
        assert!(NestedSetMap::<()>::new().reconstruct().is_empty());
    }

    #[test]
    fn test_validate_accepts_encoding() {
        sample().validate().unwrap();
        NestedSetMap::<()>::new().validate().unwrap();
    }

    fn record(
        id: u64,
        left: u64,
        right: u64,
        level: u32,
        parent: Option<u64>,
    ) -> NestedSetRecord<()> {
        NestedSetRecord {
            menuid: NodeId(id),
            left,
            right,
            level,
            parent: parent.map(NodeId),
            data: (),
        }
    }

    #[test]
    fn test_validate_zero_identifier_parent() {
        // Children of identifier 0 keep their declared parent
        let mut map = NestedSetMap::new();
        map.insert(record(0, 2, 7, 2, None));
        map.insert(record(9, 3, 4, 3, Some(77)));
        map.insert(record(10, 5, 6, 3, None));
        map.validate().unwrap();
    }

    fn expect_invalid(map: &NestedSetMap<()>, bad: u64) {
        match map.validate() {
            Err(NestedSetError::InvalidEncoding { id, .. }) => assert_eq!(id, NodeId(bad)),
            other => panic!("expected invalid encoding for {bad}, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_broken_tables() {
        let mut map = NestedSetMap::new();
        map.insert(record(1, 5, 4, 2, None));
        expect_invalid(&map, 1);

        // Partial overlap
        let mut map = NestedSetMap::new();
        map.insert(record(1, 2, 5, 2, None));
        map.insert(record(2, 4, 7, 3, Some(1)));
        expect_invalid(&map, 2);

        // Level skips a step
        let mut map = NestedSetMap::new();
        map.insert(record(1, 2, 5, 2, None));
        map.insert(record(2, 3, 4, 4, Some(1)));
        expect_invalid(&map, 2);

        // Parent does not match the enclosing record
        let mut map = NestedSetMap::new();
        map.insert(record(1, 2, 5, 2, None));
        map.insert(record(2, 3, 4, 3, Some(9)));
        expect_invalid(&map, 2);

        // Top-level records disagree on level
        let mut map = NestedSetMap::new();
        map.insert(record(1, 2, 3, 2, None));
        map.insert(record(2, 4, 5, 3, None));
        expect_invalid(&map, 2);

        // Interval claims a descendant that has no record
        let mut map = NestedSetMap::new();
        map.insert(record(1, 2, 5, 2, None));
        expect_invalid(&map, 1);
    }
}
