// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty propagation and the lazy matrix / effective-z update pass.
//!
//! Three bits per node drive redraw and recomputation:
//!
//! - **dirty**: "this node or something below it changed since the last
//!   successful redraw". Setting it walks up to the root; clearing it walks
//!   down the subtree, so a dirty node always has dirty ancestors.
//! - **needs local**: the local transform or z changed; the local matrix must
//!   be recomposed.
//! - **needs world**: the world matrix must be recomposed from the parent's.
//!
//! [`NodeTree::update_subtree`] recomputes top-down. Recomputing a node
//! forces its whole (displayed) subtree to recompute its world matrix and
//! effective z, even where a descendant's own local transform is unchanged.

use super::id::{INVALID, NodeId};
use super::store::NodeTree;

impl NodeTree {
    /// Sets or clears the dirty bit.
    ///
    /// `true` marks the node and every ancestor; `false` clears the node and
    /// every descendant.
    pub fn set_dirty(&mut self, id: NodeId, dirty: bool) {
        self.validate(id);
        if dirty {
            self.mark_dirty_upward(id.idx);
        } else {
            self.clear_dirty_downward(id.idx);
        }
    }

    /// Returns the dirty bit.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.validate(id);
        self.dirty[id.idx as usize]
    }

    /// Whether the local matrix is stale.
    #[must_use]
    pub fn needs_local_update(&self, id: NodeId) -> bool {
        self.validate(id);
        self.needs_local[id.idx as usize]
    }

    /// Whether the world matrix is stale.
    #[must_use]
    pub fn needs_world_update(&self, id: NodeId) -> bool {
        self.validate(id);
        self.needs_world[id.idx as usize]
    }

    /// Whether `id` (or anything displayed below it) must be redrawn.
    ///
    /// A node that is not displayed never needs a redraw, whatever its bits.
    #[must_use]
    pub fn needs_redraw(&self, id: NodeId) -> bool {
        self.validate(id);
        self.is_displayed(id) && self.needs_redraw_at(id.idx)
    }

    fn needs_redraw_at(&self, idx: u32) -> bool {
        let mut stack = alloc::vec![idx];
        while let Some(i) = stack.pop() {
            let i = i as usize;
            if self.dirty[i] || self.needs_local[i] || self.needs_world[i] {
                return true;
            }
            stack.extend(
                self.children[i]
                    .iter()
                    .copied()
                    .filter(|&c| self.display[c as usize].resolve(true)),
            );
        }
        false
    }

    /// Brings world matrices and effective z up to date for `start`'s subtree.
    ///
    /// The ancestor chain is refreshed first. When an ancestor is recomputed,
    /// its children off the path to `start` are flagged for a world update so
    /// their subtrees pick up the change on their own next pass. Subtrees that
    /// are not displayed are skipped; a forced update reaching one is recorded
    /// on its root as `needs world`.
    pub fn update_subtree(&mut self, start: NodeId) {
        self.validate(start);

        let mut chain: alloc::vec::Vec<u32> = self.ancestor_slots(start.idx).skip(1).collect();
        chain.reverse();
        let mut forced = false;
        for (depth, &idx) in chain.iter().enumerate() {
            if forced || self.needs_local[idx as usize] || self.needs_world[idx as usize] {
                self.recompute(idx);
                forced = true;
                let next_on_path = chain.get(depth + 1).copied().unwrap_or(start.idx);
                for k in 0..self.children[idx as usize].len() {
                    let c = self.children[idx as usize][k];
                    if c != next_on_path {
                        self.needs_world[c as usize] = true;
                    }
                }
            }
        }

        let displayed = self.is_displayed(start);
        if displayed {
            self.update_from(start.idx, forced);
        } else if forced {
            self.needs_world[start.idx as usize] = true;
        }
    }

    /// Pre-order, so a parent is always recomputed before its children.
    fn update_from(&mut self, idx: u32, forced: bool) {
        let mut stack = alloc::vec![(idx, forced)];
        while let Some((idx, forced)) = stack.pop() {
            let i = idx as usize;
            let recompute = forced || self.needs_local[i] || self.needs_world[i];
            if recompute {
                self.recompute(idx);
            }
            for k in 0..self.children[i].len() {
                let c = self.children[i][k];
                if self.display[c as usize].resolve(true) {
                    stack.push((c, recompute));
                } else if recompute {
                    self.needs_world[c as usize] = true;
                }
            }
        }
    }

    fn recompute(&mut self, idx: u32) {
        let i = idx as usize;
        if self.needs_local[i] {
            self.local_matrix[i] = self.transform[i].to_affine();
            self.needs_local[i] = false;
        }
        let p = self.parent[i];
        let (parent_world, parent_z) = if p == INVALID {
            (kurbo::Affine::IDENTITY, 0.0)
        } else {
            (self.world_matrix[p as usize], self.effective_z[p as usize])
        };
        self.world_matrix[i] = parent_world * self.local_matrix[i];
        self.effective_z[i] = parent_z + self.z[i];
        self.needs_world[i] = false;
    }

    pub(crate) fn mark_dirty_upward(&mut self, idx: u32) {
        let mut i = idx;
        loop {
            self.dirty[i as usize] = true;
            let p = self.parent[i as usize];
            if p == INVALID {
                break;
            }
            i = p;
        }
    }

    pub(crate) fn clear_dirty_downward(&mut self, idx: u32) {
        let mut stack = alloc::vec![idx];
        while let Some(i) = stack.pop() {
            self.dirty[i as usize] = false;
            stack.extend(self.children[i as usize].iter().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;
    use crate::node::Cascade;

    fn chain(tree: &mut NodeTree) -> (NodeId, NodeId, NodeId) {
        let a = tree.create_group(Some("grandparent"));
        let b = tree.create_group(Some("parent"));
        let c = tree.create_group(Some("grandchild"));
        tree.insert(a, b).unwrap();
        tree.insert(b, c).unwrap();
        (a, b, c)
    }

    #[test]
    fn set_dirty_walks_up_and_clear_walks_down() {
        let mut tree = NodeTree::new();
        let (a, b, c) = chain(&mut tree);
        tree.set_dirty(a, false);
        assert!(!tree.is_dirty(a) && !tree.is_dirty(b) && !tree.is_dirty(c));

        tree.set_dirty(c, true);
        assert!(tree.is_dirty(b), "parent marked");
        assert!(tree.is_dirty(a), "grandparent marked");

        tree.set_dirty(a, false);
        assert!(!tree.is_dirty(b), "descendant cleared");
        assert!(!tree.is_dirty(c), "descendant cleared");
    }

    #[test]
    fn clearing_a_subtree_leaves_ancestors_and_siblings() {
        let mut tree = NodeTree::new();
        let (a, b, c) = chain(&mut tree);
        let sibling = tree.create_group(None);
        tree.insert(a, sibling).unwrap();
        tree.set_dirty(b, false);
        assert!(!tree.is_dirty(c));
        assert!(tree.is_dirty(a));
        assert!(tree.is_dirty(sibling));
    }

    #[test]
    fn world_matrix_composes_parent_translation() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let child = tree.create_group(None);
        tree.insert(parent, child).unwrap();
        tree.set_translation(parent, Vec2::new(5.0, 5.0));
        tree.set_translation(child, Vec2::new(10.0, 0.0));
        tree.update_subtree(parent);

        let mapped = tree.world_transform(child) * Point::ORIGIN;
        assert_eq!(mapped, Point::new(15.0, 5.0));
        assert!(!tree.needs_local_update(child));
        assert!(!tree.needs_world_update(child));
    }

    #[test]
    fn grandchild_follows_grandparent_change() {
        let mut tree = NodeTree::new();
        let (a, _b, c) = chain(&mut tree);
        tree.update_subtree(a);
        assert_eq!(tree.world_transform(c) * Point::ORIGIN, Point::ORIGIN);

        tree.set_translation(a, Vec2::new(7.0, -3.0));
        assert!(
            !tree.needs_local_update(c),
            "grandchild's own transform is untouched"
        );
        tree.update_subtree(a);
        assert_eq!(tree.world_transform(c) * Point::ORIGIN, Point::new(7.0, -3.0));
    }

    #[test]
    fn updating_a_subtree_refreshes_ancestors_and_flags_siblings() {
        let mut tree = NodeTree::new();
        let (a, b, c) = chain(&mut tree);
        let sibling = tree.create_group(None);
        tree.insert(a, sibling).unwrap();
        tree.update_subtree(a);

        tree.set_translation(a, Vec2::new(1.0, 0.0));
        tree.update_subtree(b);
        assert_eq!(tree.world_transform(c) * Point::ORIGIN, Point::new(1.0, 0.0));
        assert!(
            tree.needs_world_update(sibling),
            "off-path child keeps the forced update"
        );

        tree.update_subtree(sibling);
        assert_eq!(
            tree.world_transform(sibling) * Point::ORIGIN,
            Point::new(1.0, 0.0)
        );
    }

    #[test]
    fn hidden_subtree_records_pending_update() {
        let mut tree = NodeTree::new();
        let (a, b, c) = chain(&mut tree);
        tree.update_subtree(a);
        tree.set_display(b, false);
        tree.set_translation(a, Vec2::new(3.0, 0.0));
        tree.update_subtree(a);
        assert!(tree.needs_world_update(b), "skipped node remembers");
        assert_eq!(tree.world_transform(c) * Point::ORIGIN, Point::ORIGIN);

        tree.set_display(b, Cascade::Inherit);
        tree.update_subtree(a);
        assert_eq!(tree.world_transform(c) * Point::ORIGIN, Point::new(3.0, 0.0));
    }

    #[test]
    fn effective_z_accumulates() {
        let mut tree = NodeTree::new();
        let (a, b, c) = chain(&mut tree);
        tree.set_z(a, 1.0);
        tree.set_z(b, 2.0);
        tree.set_z(c, 0.5);
        tree.update_subtree(a);
        assert!((tree.effective_z(c) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn needs_redraw_ignores_hidden_nodes() {
        let mut tree = NodeTree::new();
        let (a, b, _c) = chain(&mut tree);
        tree.update_subtree(a);
        tree.set_dirty(a, false);
        assert!(!tree.needs_redraw(a));

        tree.set_display(b, false);
        tree.set_rotation(b, 1.0);
        assert!(tree.needs_redraw(a), "ancestor dirty bit was set");
        tree.set_dirty(a, false);
        assert!(!tree.needs_redraw(b), "not displayed");
        assert!(!tree.needs_redraw(a), "only hidden descendants changed");
    }

    #[test]
    fn very_deep_chains_update_without_recursion() {
        const DEPTH: usize = 200_000;
        let mut tree = NodeTree::new();
        let leaf = tree.create_group(None);
        let mut top = leaf;
        // Built leaf-first so each insert sees a detached parent.
        for _ in 0..DEPTH {
            let group = tree.create_group(None);
            tree.insert(group, top).unwrap();
            top = group;
        }
        tree.set_translation(top, Vec2::new(4.0, 0.0));
        tree.update_subtree(top);
        assert_eq!(tree.world_transform(leaf) * Point::ORIGIN, Point::new(4.0, 0.0));

        tree.set_dirty(top, false);
        assert!(!tree.needs_redraw(top), "every level is clean");
        tree.set_rotation(leaf, 0.5);
        tree.set_dirty(top, false);
        assert!(tree.needs_redraw(top), "leaf still needs its local matrix");
    }
}
