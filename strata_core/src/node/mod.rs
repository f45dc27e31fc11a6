// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree data model.
//!
//! Every node of a scene lives in one [`NodeTree`]. A node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is disposed.
//! - A [`NodeKind`]: root, layer, group, or drawable.
//! - Topology: a parent slot, an ordered child array, and a name index over
//!   named children. Sibling names are unique.
//! - **Local properties** set by the caller: [`LocalTransform`], z, three
//!   [`Cascade`] flags, tags, an optional payload, and (for drawables) a
//!   [`Shape`](crate::shape::Shape).
//! - **Computed properties** written by
//!   [`update_subtree`](NodeTree::update_subtree): local and world matrices and
//!   effective z.
//!
//! # Dirty tracking
//!
//! Mutations set the node's `dirty` bit and every ancestor's. Transform and z
//! changes also flag a local recompute. Clearing `dirty` (after a redraw)
//! walks down instead, so the bit always means "something in this subtree
//! changed since it was last drawn".

mod cascade;
mod id;
mod store;
mod traverse;
mod update;

pub use cascade::Cascade;
pub use id::{INVALID, NodeId, NodeKind};
pub use store::{LocalTransform, NodeTree};
pub use traverse::Children;
