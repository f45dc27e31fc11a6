// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles and roles for tree nodes.

use core::fmt;

/// Parent slot of a detached node or of the root.
pub const INVALID: u32 = u32::MAX;

/// Generational handle into a [`NodeTree`](super::NodeTree).
///
/// Slots are recycled after [`dispose`](super::NodeTree::dispose). The
/// generation changes on every dispose, so an old handle never resolves to
/// the slot's next occupant; tree accessors panic on it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Slot number. Stable for the node's lifetime; shared with later nodes.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// How many times the slot had been freed when this node took it.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.idx, self.generation)
    }
}

/// What a node may hold and where it may sit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The scene root. Holds layers only; never a child.
    Root,
    /// An independently buffered layer. Lives directly under the root.
    Layer,
    /// A pure container without visuals.
    Group,
    /// A leaf carrying a [`Shape`](crate::shape::Shape).
    Drawable,
}

impl NodeKind {
    /// Whether nodes of this kind may have children.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        !matches!(self, Self::Drawable)
    }
}
