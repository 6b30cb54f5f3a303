// Unravel
// Copyright (c) 2026 The Project Unravel Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `tree` module defines the link table, a binary decision tree flattened into an array.
//!
//! Each entry of a link table describes one node of the tree, and is indexed by its node id. Node
//! 0 is the root. A positive entry, `m`, is an internal node whose children are node `m`, taken
//! when the next bit is 1, and node `m - 1`, taken when the next bit is 0. Therefore, the children
//! of an internal node always occupy adjacent positions in the table. An entry less-than or equal
//! to 0 is a leaf node, and the negation of the entry is the decoded symbol value.

use log::debug;

use crate::errors::{decode_error, malformed_tree_error, Result};

/// The node id of the root of a link table.
pub const ROOT_NODE: usize = 0;

/// A `Node` is a decoded link table entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An internal node. Reading a 1 bit continues at node `one`, and reading a 0 bit continues at
    /// node `zero`.
    Internal { one: usize, zero: usize },
    /// A leaf node with the decoded symbol value.
    Leaf(u64),
}

impl Node {
    /// Decodes a raw link table entry.
    #[inline(always)]
    pub fn from_entry(entry: i64) -> Node {
        if entry > 0 {
            // The children of an internal node are adjacent, so the 0 child can never underflow.
            let one = entry as usize;
            Node::Internal { one, zero: one - 1 }
        }
        else {
            // Negation of the entry. For entries <= 0 the magnitude is the negated value, and it
            // cannot overflow even for i64::MIN.
            Node::Leaf(entry.unsigned_abs())
        }
    }

    /// Returns true if the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// For internal nodes, returns the child selected by `bit`.
    #[inline(always)]
    pub fn child(&self, bit: bool) -> Option<usize> {
        match *self {
            Node::Internal { one, zero } => Some(if bit { one } else { zero }),
            Node::Leaf(_) => None,
        }
    }
}

/// A `LinkTable` is a binary decision tree flattened into an array of signed entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkTable {
    entries: Vec<i64>,
}

impl LinkTable {
    /// Instantiate a new `LinkTable` from its raw entries.
    pub fn new(entries: Vec<i64>) -> Self {
        LinkTable { entries }
    }

    /// Instantiate a new `LinkTable` from entries stored as floating point values.
    ///
    /// Hosts commonly store link tables as double precision values. Every value must be finite,
    /// integral, and representable as an `i64`.
    pub fn try_from_f64(entries: &[f64]) -> Result<Self> {
        // 2^63 is the first double that does not fit in an i64.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        let mut table = Vec::with_capacity(entries.len());

        for &entry in entries {
            if !entry.is_finite() || entry.fract() != 0.0 {
                return decode_error("link table entry is not an integer");
            }

            if entry >= LIMIT || entry < -LIMIT {
                return decode_error("link table entry is out of range");
            }

            table.push(entry as i64);
        }

        Ok(LinkTable { entries: table })
    }

    /// Gets the number of entries in the link table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the link table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the raw entries of the link table.
    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    /// Gets the node with the given id, or returns a malformed tree error if the id is outside of
    /// the link table.
    #[inline(always)]
    pub fn node(&self, id: usize) -> Result<Node> {
        match self.entries.get(id) {
            Some(&entry) => Ok(Node::from_entry(entry)),
            None => malformed_tree_error(id),
        }
    }

    /// Verifies that every bit pattern, starting from the root, ends at a leaf.
    ///
    /// The decoder itself only checks that each node it visits exists. A table that passes
    /// verification also has no cycles among the nodes reachable from the root.
    pub fn verify(&self) -> Result<()> {
        self.max_depth().map(|_| ())
    }

    /// Gets the largest number of bits required to decode a single symbol. This is the length of
    /// the longest path from the root to a leaf.
    ///
    /// Returns a malformed tree error if a reachable node is outside of the link table, or if the
    /// nodes reachable from the root form a cycle.
    pub fn max_depth(&self) -> Result<u32> {
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            Visiting,
            Done(u32),
        }

        let mut marks = vec![Mark::Unvisited; self.entries.len()];

        // Iterative depth-first walk. Each stack item is a node id and whether its children have
        // already been pushed.
        let mut stack = vec![(ROOT_NODE, false)];

        while let Some((id, expanded)) = stack.pop() {
            let node = self.node(id)?;

            match node {
                Node::Leaf(_) => marks[id] = Mark::Done(0),
                Node::Internal { one, zero } if !expanded => {
                    match marks[id] {
                        Mark::Done(_) => continue,
                        Mark::Visiting => return malformed_tree_error(id),
                        Mark::Unvisited => (),
                    }

                    marks[id] = Mark::Visiting;
                    stack.push((id, true));

                    for child in [one, zero] {
                        // Check the child exists before reading its mark.
                        self.node(child)?;

                        match marks[child] {
                            Mark::Visiting => {
                                debug!("link table cycle through node {}", child);
                                return malformed_tree_error(child);
                            }
                            Mark::Unvisited => stack.push((child, false)),
                            Mark::Done(_) => (),
                        }
                    }
                }
                Node::Internal { one, zero } => {
                    let depth = |child: usize| match marks[child] {
                        Mark::Done(depth) => depth,
                        // Children are always finished before their parent is revisited.
                        _ => 0,
                    };

                    let max_child = depth(one).max(depth(zero));
                    marks[id] = Mark::Done(1 + max_child);
                }
            }
        }

        match marks.first() {
            Some(Mark::Done(depth)) => Ok(*depth),
            _ => malformed_tree_error(ROOT_NODE),
        }
    }
}

impl From<Vec<i64>> for LinkTable {
    fn from(entries: Vec<i64>) -> Self {
        LinkTable::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::{LinkTable, Node};
    use crate::errors::Error;

    #[test]
    fn verify_node_from_entry() {
        assert_eq!(Node::from_entry(2), Node::Internal { one: 2, zero: 1 });
        assert_eq!(Node::from_entry(1), Node::Internal { one: 1, zero: 0 });
        assert_eq!(Node::from_entry(0), Node::Leaf(0));
        assert_eq!(Node::from_entry(-7), Node::Leaf(7));
        assert_eq!(Node::from_entry(i64::MIN), Node::Leaf(1 << 63));

        assert_eq!(Node::from_entry(2).child(true), Some(2));
        assert_eq!(Node::from_entry(2).child(false), Some(1));
        assert_eq!(Node::from_entry(-3).child(true), None);
    }

    #[test]
    fn verify_link_table_node_bounds() {
        let table = LinkTable::new(vec![2, -5, -7]);

        assert_eq!(table.node(0).unwrap(), Node::Internal { one: 2, zero: 1 });
        assert_eq!(table.node(2).unwrap(), Node::Leaf(7));
        assert!(matches!(table.node(3), Err(Error::MalformedTree { node: 3 })));
    }

    #[test]
    fn verify_link_table_try_from_f64() {
        let table = LinkTable::try_from_f64(&[2.0, -5.0, -0.0]).unwrap();
        assert_eq!(table.entries(), &[2, -5, 0]);

        assert!(matches!(LinkTable::try_from_f64(&[2.5]), Err(Error::DecodeError(_))));
        assert!(matches!(LinkTable::try_from_f64(&[f64::NAN]), Err(Error::DecodeError(_))));
        assert!(matches!(LinkTable::try_from_f64(&[f64::INFINITY]), Err(Error::DecodeError(_))));
        assert!(matches!(LinkTable::try_from_f64(&[1.0e19]), Err(Error::DecodeError(_))));
    }

    #[test]
    fn verify_link_table_max_depth() {
        // Degenerate tree.
        assert_eq!(LinkTable::new(vec![-4]).max_depth().unwrap(), 0);

        assert_eq!(LinkTable::new(vec![2, -5, -7]).max_depth().unwrap(), 1);

        // Root -> (0: leaf 1, 1: node 2) -> node 2 -> (0: leaf 2, 1: leaf 3).
        let table = LinkTable::new(vec![2, -1, 4, -2, -3]);
        assert_eq!(table.max_depth().unwrap(), 2);
        assert!(table.verify().is_ok());
    }

    #[test]
    fn verify_link_table_rejects_malformed() {
        // Child out of range.
        let table = LinkTable::new(vec![3, -1, -2]);
        assert!(matches!(table.verify(), Err(Error::MalformedTree { node: 3 })));

        // Node 2 loops back to itself on a 1 bit.
        let table = LinkTable::new(vec![2, -1, 2]);
        assert!(matches!(table.verify(), Err(Error::MalformedTree { node: 2 })));

        // Node 0 loops back to the root on a 0 bit.
        let table = LinkTable::new(vec![1, -1]);
        assert!(matches!(table.verify(), Err(Error::MalformedTree { node: 0 })));

        // An empty table has no root.
        assert!(matches!(LinkTable::default().verify(), Err(Error::MalformedTree { node: 0 })));
    }
}
