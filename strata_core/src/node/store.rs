// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and properties.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use kurbo::{Affine, Vec2};

use super::cascade::Cascade;
use super::id::{INVALID, NodeId, NodeKind};
use super::traverse::Children;
use crate::error::SceneError;
use crate::event::ListenerRegistry;
use crate::shape::Shape;

/// Translation, rotation, and scale of a node relative to its parent.
///
/// Composes as `translate ∘ rotate ∘ scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    /// Offset from the parent origin.
    pub translation: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
    /// Per-axis scale factors.
    pub scale: Vec2,
}

impl LocalTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Returns the composed affine matrix.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translation)
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Struct-of-arrays storage for every node of a scene.
///
/// Nodes are addressed by [`NodeId`] handles. Disposed slots are recycled via
/// a free list; generation counters turn outstanding handles stale.
///
/// Children are kept twice: an ordered slot array and a per-parent name index
/// for named children. Both are updated together on every insert and remove.
pub struct NodeTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) name_index: Vec<BTreeMap<String, u32>>,
    pub(crate) kind: Vec<NodeKind>,

    // -- Identity and user data --
    pub(crate) name: Vec<Option<String>>,
    pub(crate) tags: Vec<BTreeSet<String>>,
    pub(crate) payload: Vec<Option<Box<dyn Any>>>,
    pub(crate) listeners: Vec<Option<Box<ListenerRegistry>>>,

    // -- Local properties --
    pub(crate) visible: Vec<Cascade>,
    pub(crate) display: Vec<Cascade>,
    pub(crate) pointer: Vec<Cascade>,
    pub(crate) transform: Vec<LocalTransform>,
    pub(crate) z: Vec<f64>,
    pub(crate) shape: Vec<Option<Shape>>,

    // -- Computed by the update pass --
    pub(crate) local_matrix: Vec<Affine>,
    pub(crate) world_matrix: Vec<Affine>,
    pub(crate) effective_z: Vec<f64>,

    // -- Update bits --
    pub(crate) dirty: Vec<bool>,
    pub(crate) needs_local: Vec<bool>,
    pub(crate) needs_world: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("parent", &self.parent)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            name_index: Vec::new(),
            kind: Vec::new(),
            name: Vec::new(),
            tags: Vec::new(),
            payload: Vec::new(),
            listeners: Vec::new(),
            visible: Vec::new(),
            display: Vec::new(),
            pointer: Vec::new(),
            transform: Vec::new(),
            z: Vec::new(),
            shape: Vec::new(),
            local_matrix: Vec::new(),
            world_matrix: Vec::new(),
            effective_z: Vec::new(),
            dirty: Vec::new(),
            needs_local: Vec::new(),
            needs_world: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a detached group (pure container).
    pub fn create_group(&mut self, name: Option<&str>) -> NodeId {
        self.create(NodeKind::Group, name, None)
    }

    /// Creates a detached drawable leaf carrying `shape`.
    pub fn create_drawable(&mut self, name: Option<&str>, shape: Shape) -> NodeId {
        self.create(NodeKind::Drawable, name, Some(shape))
    }

    pub(crate) fn create_root(&mut self) -> NodeId {
        self.create(NodeKind::Root, None, None)
    }

    pub(crate) fn create_layer(&mut self, name: Option<&str>) -> NodeId {
        self.create(NodeKind::Layer, name, None)
    }

    fn create(&mut self, kind: NodeKind, name: Option<&str>, shape: Option<Shape>) -> NodeId {
        let name = name.map(String::from);
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.name_index[i].clear();
            self.kind[i] = kind;
            self.name[i] = name;
            self.tags[i].clear();
            self.payload[i] = None;
            self.listeners[i] = None;
            self.visible[i] = Cascade::Inherit;
            self.display[i] = Cascade::Inherit;
            self.pointer[i] = Cascade::Inherit;
            self.transform[i] = LocalTransform::IDENTITY;
            self.z[i] = 0.0;
            self.shape[i] = shape;
            self.local_matrix[i] = Affine::IDENTITY;
            self.world_matrix[i] = Affine::IDENTITY;
            self.effective_z[i] = 0.0;
            self.dirty[i] = true;
            self.needs_local[i] = true;
            self.needs_world[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.name_index.push(BTreeMap::new());
            self.kind.push(kind);
            self.name.push(name);
            self.tags.push(BTreeSet::new());
            self.payload.push(None);
            self.listeners.push(None);
            self.visible.push(Cascade::Inherit);
            self.display.push(Cascade::Inherit);
            self.pointer.push(Cascade::Inherit);
            self.transform.push(LocalTransform::IDENTITY);
            self.z.push(0.0);
            self.shape.push(shape);
            self.local_matrix.push(Affine::IDENTITY);
            self.world_matrix.push(Affine::IDENTITY);
            self.effective_z.push(0.0);
            self.dirty.push(true);
            self.needs_local.push(true);
            self.needs_world.push(true);
            self.generation.push(0);
            idx
        };
        self.id_at(idx)
    }

    /// Disposes `node` and its whole subtree.
    ///
    /// Detaches the node from its parent (marking the parent dirty), drops
    /// payloads, shapes, and listeners, and recycles every slot. All handles
    /// into the subtree become stale.
    pub fn dispose(&mut self, node: NodeId) {
        self.validate(node);
        if self.parent[node.idx as usize] != INVALID {
            self.unlink(node.idx);
        }
        let mut stack = alloc::vec![node.idx];
        while let Some(idx) = stack.pop() {
            let i = idx as usize;
            stack.append(&mut self.children[i]);
            self.parent[i] = INVALID;
            self.name_index[i].clear();
            self.tags[i].clear();
            self.payload[i] = None;
            self.listeners[i] = None;
            self.shape[i] = None;
            self.generation[i] = self.generation[i].wrapping_add(1);
            self.free_list.push(idx);
        }
    }

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Appends `child` to `parent`'s children.
    ///
    /// A child attached elsewhere is detached first. The insert is rejected,
    /// leaving the tree untouched, when a sibling already carries the child's
    /// name, when `parent` cannot hold children, when it would create a cycle,
    /// or when layer placement rules are violated.
    ///
    /// Marks `parent` (and thus every ancestor) dirty and flags `child` for a
    /// world update.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn insert(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        let parent_kind = self.kind[p as usize];
        let child_kind = self.kind[c as usize];

        if child_kind == NodeKind::Root {
            return Err(SceneError::RootNotInsertable);
        }
        if !parent_kind.is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        if (child_kind == NodeKind::Layer) != (parent_kind == NodeKind::Root) {
            return Err(SceneError::LayerOutsideRoot(child));
        }
        if self.ancestor_slots(p).any(|i| i == c) {
            return Err(SceneError::WouldCycle(child));
        }
        if let Some(name) = &self.name[c as usize] {
            if let Some(&existing) = self.name_index[p as usize].get(name) {
                if existing != c {
                    return Err(SceneError::DuplicateName { name: name.clone() });
                }
            }
        }

        if self.parent[c as usize] != INVALID {
            self.unlink(c);
        }
        self.parent[c as usize] = p;
        self.children[p as usize].push(c);
        if let Some(name) = &self.name[c as usize] {
            self.name_index[p as usize].insert(name.clone(), c);
        }
        self.needs_world[c as usize] = true;
        self.mark_dirty_upward(c);
        Ok(())
    }

    /// Detaches `child` from its parent. Returns `false` if it had none.
    ///
    /// The former parent is marked dirty; the child keeps its subtree and can
    /// be inserted elsewhere.
    pub fn remove(&mut self, child: NodeId) -> bool {
        self.validate(child);
        if self.parent[child.idx as usize] == INVALID {
            return false;
        }
        self.unlink(child.idx);
        self.needs_world[child.idx as usize] = true;
        true
    }

    /// Detaches every child of `parent`.
    pub fn remove_all(&mut self, parent: NodeId) {
        self.validate(parent);
        let p = parent.idx as usize;
        let detached = core::mem::take(&mut self.children[p]);
        self.name_index[p].clear();
        for c in detached {
            self.parent[c as usize] = INVALID;
            self.needs_world[c as usize] = true;
        }
        self.mark_dirty_upward(parent.idx);
    }

    /// Renames `node`, keeping the parent's name index in sync.
    ///
    /// Fails without change if a sibling already uses `name`.
    pub fn set_name(&mut self, node: NodeId, name: Option<&str>) -> Result<(), SceneError> {
        self.validate(node);
        let i = node.idx as usize;
        let p = self.parent[i];
        if p != INVALID {
            if let Some(new) = name {
                if let Some(&existing) = self.name_index[p as usize].get(new) {
                    if existing != node.idx {
                        return Err(SceneError::DuplicateName { name: new.into() });
                    }
                }
            }
            if let Some(old) = &self.name[i] {
                self.name_index[p as usize].remove(old);
            }
            if let Some(new) = name {
                self.name_index[p as usize].insert(new.into(), node.idx);
            }
        }
        self.name[i] = name.map(String::from);
        Ok(())
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    // -- Property getters --

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.validate(id);
        self.name[id.idx as usize].as_deref()
    }

    /// Returns the local transform of a node.
    #[must_use]
    pub fn local_transform(&self, id: NodeId) -> LocalTransform {
        self.validate(id);
        self.transform[id.idx as usize]
    }

    /// Returns the stacking hint of a node.
    #[must_use]
    pub fn z(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.z[id.idx as usize]
    }

    /// Returns the world matrix computed by the last update pass.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Affine {
        self.validate(id);
        self.world_matrix[id.idx as usize]
    }

    /// Returns the effective z computed by the last update pass.
    #[must_use]
    pub fn effective_z(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.effective_z[id.idx as usize]
    }

    /// Returns the shape of a drawable.
    #[must_use]
    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.validate(id);
        self.shape[id.idx as usize].as_ref()
    }

    /// Returns the raw visibility cascade of a node.
    #[must_use]
    pub fn visible(&self, id: NodeId) -> Cascade {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the raw display cascade of a node.
    #[must_use]
    pub fn display(&self, id: NodeId) -> Cascade {
        self.validate(id);
        self.display[id.idx as usize]
    }

    /// Returns the raw pointer-enabled cascade of a node.
    #[must_use]
    pub fn pointer_enabled(&self, id: NodeId) -> Cascade {
        self.validate(id);
        self.pointer[id.idx as usize]
    }

    /// Resolved visibility.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.resolve(&self.visible, id.idx)
    }

    /// Resolved display state.
    #[must_use]
    pub fn is_displayed(&self, id: NodeId) -> bool {
        self.validate(id);
        self.resolve(&self.display, id.idx)
    }

    /// Resolved pointer-enabled state.
    #[must_use]
    pub fn is_pointer_enabled(&self, id: NodeId) -> bool {
        self.validate(id);
        self.resolve(&self.pointer, id.idx)
    }

    /// Whether `id` carries `tag`.
    #[must_use]
    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.validate(id);
        self.tags[id.idx as usize].contains(tag)
    }

    /// Iterates the tags of a node in sorted order.
    pub fn tags(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.validate(id);
        self.tags[id.idx as usize].iter().map(String::as_str)
    }

    /// Returns the payload of a node if it has type `T`.
    #[must_use]
    pub fn payload<T: Any>(&self, id: NodeId) -> Option<&T> {
        self.validate(id);
        self.payload[id.idx as usize].as_ref()?.downcast_ref()
    }

    /// Mutable access to a payload of type `T`.
    #[must_use]
    pub fn payload_mut<T: Any>(&mut self, id: NodeId) -> Option<&mut T> {
        self.validate(id);
        self.payload[id.idx as usize].as_mut()?.downcast_mut()
    }

    // -- Mutation API --

    /// Sets the local transform. Flags a local recompute and marks dirty.
    pub fn set_transform(&mut self, id: NodeId, transform: LocalTransform) {
        self.validate(id);
        self.transform[id.idx as usize] = transform;
        self.touch_local(id.idx);
    }

    /// Sets the translation component of the local transform.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec2) {
        self.validate(id);
        self.transform[id.idx as usize].translation = translation;
        self.touch_local(id.idx);
    }

    /// Sets the rotation (radians) of the local transform.
    pub fn set_rotation(&mut self, id: NodeId, rotation: f64) {
        self.validate(id);
        self.transform[id.idx as usize].rotation = rotation;
        self.touch_local(id.idx);
    }

    /// Sets the scale of the local transform.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.validate(id);
        self.transform[id.idx as usize].scale = scale;
        self.touch_local(id.idx);
    }

    /// Sets the stacking hint. Effective z is refreshed by the update pass.
    pub fn set_z(&mut self, id: NodeId, z: f64) {
        self.validate(id);
        self.z[id.idx as usize] = z;
        self.touch_local(id.idx);
    }

    /// Sets the visibility cascade and marks the node dirty.
    pub fn set_visible(&mut self, id: NodeId, value: impl Into<Cascade>) {
        self.validate(id);
        self.visible[id.idx as usize] = value.into();
        self.mark_dirty_upward(id.idx);
    }

    /// Sets the display cascade and marks the node dirty.
    pub fn set_display(&mut self, id: NodeId, value: impl Into<Cascade>) {
        self.validate(id);
        self.display[id.idx as usize] = value.into();
        self.mark_dirty_upward(id.idx);
    }

    /// Sets the pointer-enabled cascade.
    pub fn set_pointer_enabled(&mut self, id: NodeId, value: impl Into<Cascade>) {
        self.validate(id);
        self.pointer[id.idx as usize] = value.into();
    }

    /// Replaces the shape of a drawable and marks it dirty.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a drawable.
    pub fn set_shape(&mut self, id: NodeId, shape: Shape) {
        self.update_shape(id, |s| *s = shape);
    }

    /// Edits the shape of a drawable in place and marks it dirty.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a drawable.
    pub fn update_shape<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Shape) -> R) -> R {
        self.validate(id);
        let Some(shape) = self.shape[id.idx as usize].as_mut() else {
            panic!("{id:?} is not a drawable");
        };
        let out = f(shape);
        self.mark_dirty_upward(id.idx);
        out
    }

    /// Adds a tag. Returns `false` if it was already present.
    pub fn add_tag(&mut self, id: NodeId, tag: &str) -> bool {
        self.validate(id);
        self.tags[id.idx as usize].insert(tag.into())
    }

    /// Removes a tag. Returns `false` if it was absent.
    pub fn remove_tag(&mut self, id: NodeId, tag: &str) -> bool {
        self.validate(id);
        self.tags[id.idx as usize].remove(tag)
    }

    /// Attaches an arbitrary payload, returning the previous one.
    pub fn set_payload<T: Any>(&mut self, id: NodeId, value: T) -> Option<Box<dyn Any>> {
        self.validate(id);
        self.payload[id.idx as usize].replace(Box::new(value))
    }

    /// Removes and returns the payload.
    pub fn take_payload(&mut self, id: NodeId) -> Option<Box<dyn Any>> {
        self.validate(id);
        self.payload[id.idx as usize].take()
    }

    // -- Listener storage --

    pub(crate) fn listeners(&self, id: NodeId) -> Option<&ListenerRegistry> {
        self.listeners[id.idx as usize].as_deref()
    }

    pub(crate) fn listeners_mut(&mut self, id: NodeId) -> Option<&mut ListenerRegistry> {
        self.listeners[id.idx as usize].as_deref_mut()
    }

    pub(crate) fn listeners_or_default(&mut self, id: NodeId) -> &mut ListenerRegistry {
        self.validate(id);
        self.listeners[id.idx as usize].get_or_insert_with(Box::default)
    }

    /// Iterates every live node that has a listener registry.
    pub(crate) fn listener_slots(&self) -> impl Iterator<Item = &ListenerRegistry> {
        self.listeners.iter().filter_map(|l| l.as_deref())
    }

    // -- Internal helpers --

    /// Builds the current handle for a raw slot.
    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Resolves a cascade column at `idx` by walking up to the nearest
    /// explicit value.
    pub(crate) fn resolve(&self, column: &[Cascade], idx: u32) -> bool {
        self.ancestor_slots(idx)
            .find_map(|i| column[i as usize].explicit())
            .unwrap_or(true)
    }

    /// Removes `idx` from its parent's child array and name index and marks
    /// the former parent dirty.
    fn unlink(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        self.children[p as usize].retain(|&c| c != idx);
        if let Some(name) = &self.name[idx as usize] {
            if self.name_index[p as usize].get(name) == Some(&idx) {
                self.name_index[p as usize].remove(name);
            }
        }
        self.parent[idx as usize] = INVALID;
        self.mark_dirty_upward(p);
    }

    fn touch_local(&mut self, idx: u32) {
        self.needs_local[idx as usize] = true;
        self.mark_dirty_upward(idx);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::paint::Paint;

    fn dot() -> Shape {
        Shape::rect(Rect::new(0.0, 0.0, 1.0, 1.0), Paint::default())
    }

    #[test]
    fn create_and_dispose() {
        let mut tree = NodeTree::new();
        let id = tree.create_group(None);
        assert!(tree.is_alive(id));
        tree.dispose(id);
        assert!(!tree.is_alive(id));
        assert_eq!(tree.live_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = NodeTree::new();
        let a = tree.create_group(None);
        tree.dispose(a);
        let b = tree.create_group(None);
        assert!(!tree.is_alive(a));
        assert!(tree.is_alive(b));
        assert_eq!(a.idx, b.idx, "slot is recycled");
        assert_ne!(a.generation, b.generation);
    }

    #[test]
    fn insert_keeps_order_and_parent() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let a = tree.create_group(Some("a"));
        let b = tree.create_group(Some("b"));
        tree.insert(parent, a).unwrap();
        tree.insert(parent, b).unwrap();
        assert_eq!(tree.parent(a), Some(parent));
        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.find_by_name(parent, "b", false), Some(b));
    }

    #[test]
    fn duplicate_sibling_name_is_rejected_without_mutation() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let first = tree.create_group(Some("handle"));
        let second = tree.create_group(Some("handle"));
        tree.insert(parent, first).unwrap();

        let err = tree.insert(parent, second).unwrap_err();
        assert_eq!(
            err,
            SceneError::DuplicateName {
                name: "handle".into()
            }
        );
        assert_eq!(tree.children(parent).len(), 1, "child count unchanged");
        assert_eq!(tree.find_by_name(parent, "handle", false), Some(first));
        assert_eq!(tree.parent(second), None, "rejected child stays detached");
    }

    #[test]
    fn reinsert_moves_between_parents() {
        let mut tree = NodeTree::new();
        let p1 = tree.create_group(None);
        let p2 = tree.create_group(None);
        let child = tree.create_group(Some("c"));
        tree.insert(p1, child).unwrap();
        tree.insert(p2, child).unwrap();
        assert_eq!(tree.parent(child), Some(p2));
        assert_eq!(tree.children(p1).len(), 0);
        assert_eq!(tree.find_by_name(p1, "c", false), None, "name index follows");
        assert_eq!(tree.find_by_name(p2, "c", false), Some(child));
    }

    #[test]
    fn structural_rules() {
        let mut tree = NodeTree::new();
        let root = tree.create_root();
        let layer = tree.create_layer(None);
        let group = tree.create_group(None);
        let leaf = tree.create_drawable(None, dot());

        assert_eq!(tree.insert(group, root), Err(SceneError::RootNotInsertable));
        assert_eq!(tree.insert(leaf, group), Err(SceneError::NotAContainer(leaf)));
        assert_eq!(
            tree.insert(group, layer),
            Err(SceneError::LayerOutsideRoot(layer))
        );
        assert_eq!(
            tree.insert(root, group),
            Err(SceneError::LayerOutsideRoot(group))
        );
        tree.insert(root, layer).unwrap();
        tree.insert(layer, group).unwrap();
        let inner = tree.create_group(None);
        tree.insert(group, inner).unwrap();
        assert_eq!(tree.insert(inner, group), Err(SceneError::WouldCycle(group)));
        assert_eq!(tree.insert(group, group), Err(SceneError::WouldCycle(group)));
    }

    #[test]
    fn remove_all_clears_name_index() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let a = tree.create_group(Some("a"));
        tree.insert(parent, a).unwrap();
        tree.remove_all(parent);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.find_by_name(parent, "a", false), None);
        assert!(!tree.remove(a), "already detached");
    }

    #[test]
    fn rename_respects_siblings() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let a = tree.create_group(Some("a"));
        let b = tree.create_group(Some("b"));
        tree.insert(parent, a).unwrap();
        tree.insert(parent, b).unwrap();
        assert!(tree.set_name(b, Some("a")).is_err());
        tree.set_name(b, Some("c")).unwrap();
        assert_eq!(tree.find_by_name(parent, "c", false), Some(b));
        assert_eq!(tree.find_by_name(parent, "b", false), None);
    }

    #[test]
    fn dispose_recycles_subtree() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let child = tree.create_group(None);
        let leaf = tree.create_drawable(None, dot());
        tree.insert(parent, child).unwrap();
        tree.insert(child, leaf).unwrap();
        tree.set_payload(leaf, 42_u32);

        tree.dispose(child);
        assert!(!tree.is_alive(child));
        assert!(!tree.is_alive(leaf));
        assert_eq!(tree.children(parent).len(), 0);
        assert_eq!(tree.live_count(), 1);
    }

    #[test]
    fn payload_downcasts() {
        let mut tree = NodeTree::new();
        let id = tree.create_group(None);
        tree.set_payload(id, "meta");
        assert_eq!(tree.payload::<&str>(id), Some(&"meta"));
        assert_eq!(tree.payload::<u32>(id), None);
    }

    #[test]
    fn cascades_resolve_through_ancestors() {
        let mut tree = NodeTree::new();
        let a = tree.create_group(None);
        let b = tree.create_group(None);
        let c = tree.create_group(None);
        tree.insert(a, b).unwrap();
        tree.insert(b, c).unwrap();

        assert!(tree.is_visible(c), "default is visible");
        tree.set_visible(a, false);
        assert!(!tree.is_visible(c), "inherits nearest explicit ancestor");
        tree.set_visible(c, true);
        assert!(tree.is_visible(c), "explicit descendant ignores ancestor");
        assert!(!tree.is_visible(b));
        tree.set_visible(a, Cascade::Inherit);
        assert!(tree.is_visible(b));
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn disposed_handle_panics_on_parent() {
        let mut tree = NodeTree::new();
        let id = tree.create_group(None);
        tree.dispose(id);
        let _ = tree.parent(id);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn disposed_handle_panics_on_insert() {
        let mut tree = NodeTree::new();
        let parent = tree.create_group(None);
        let id = tree.create_group(None);
        tree.dispose(id);
        let _ = tree.insert(parent, id);
    }
}
