// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal and lookup.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::NodeTree;

/// An iterator over the direct children of a node, in insertion order.
///
/// Created by [`NodeTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a NodeTree,
    slots: core::slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a NodeTree, slots: &'a [u32]) -> Self {
        Self {
            tree,
            slots: slots.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.slots.next().map(|&idx| self.tree.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

impl NodeTree {
    /// Finds a descendant of `parent` by name.
    ///
    /// Direct children are looked up in the parent's name index. With `deep`,
    /// the search continues breadth first, returning the shallowest match
    /// (ties resolved in child order).
    #[must_use]
    pub fn find_by_name(&self, parent: NodeId, name: &str, deep: bool) -> Option<NodeId> {
        self.validate(parent);
        if let Some(&hit) = self.name_index[parent.idx as usize].get(name) {
            return Some(self.id_at(hit));
        }
        if !deep {
            return None;
        }
        let mut queue: VecDeque<u32> = self.children[parent.idx as usize].iter().copied().collect();
        while let Some(idx) = queue.pop_front() {
            if let Some(&hit) = self.name_index[idx as usize].get(name) {
                return Some(self.id_at(hit));
            }
            queue.extend(self.children[idx as usize].iter().copied());
        }
        None
    }

    /// Collects descendants of `parent` carrying `tag`, breadth first.
    ///
    /// Without `deep` only direct children are examined. `parent` itself is
    /// never included.
    #[must_use]
    pub fn query_by_tag(&self, parent: NodeId, tag: &str, deep: bool) -> Vec<NodeId> {
        self.validate(parent);
        let mut found = Vec::new();
        let mut queue: VecDeque<u32> = self.children[parent.idx as usize].iter().copied().collect();
        while let Some(idx) = queue.pop_front() {
            if self.tags[idx as usize].contains(tag) {
                found.push(self.id_at(idx));
            }
            if deep {
                queue.extend(self.children[idx as usize].iter().copied());
            }
        }
        found
    }

    /// Returns the path from the topmost ancestor down to `node`, inclusive.
    #[must_use]
    pub fn ancestor_path(&self, node: NodeId) -> Vec<NodeId> {
        self.validate(node);
        let mut path: Vec<NodeId> = self.ancestor_slots(node.idx).map(|i| self.id_at(i)).collect();
        path.reverse();
        path
    }

    /// Returns the topmost ancestor of `node` (the node itself when detached).
    #[must_use]
    pub fn root_of(&self, node: NodeId) -> NodeId {
        self.validate(node);
        let top = self.ancestor_slots(node.idx).last().unwrap_or(node.idx);
        self.id_at(top)
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        self.ancestor_slots(node.idx).any(|i| i == ancestor.idx)
    }

    /// Visits `node` and every descendant in pre-order.
    pub fn traverse(&self, node: NodeId, mut visitor: impl FnMut(NodeId)) {
        self.validate(node);
        let mut stack = alloc::vec![node.idx];
        while let Some(idx) = stack.pop() {
            visitor(self.id_at(idx));
            stack.extend(self.children[idx as usize].iter().rev().copied());
        }
    }

    /// Walks `idx` and its ancestors, nearest first.
    pub(crate) fn ancestor_slots(&self, idx: u32) -> impl Iterator<Item = u32> + '_ {
        core::iter::successors(Some(idx), |&i| {
            let p = self.parent[i as usize];
            (p != INVALID).then_some(p)
        })
    }
}
