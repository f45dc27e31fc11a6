// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer draw queues, viewport culling, and drawing.
//!
//! A layer is a tree node that owns one [`RenderBackend`] and a cached draw
//! queue: the displayed drawables of its subtree, ordered by ascending
//! effective z and then by tree order. The queue is rebuilt only when the
//! layer's own dirty bit is set, in a single pre-order traversal.
//!
//! Drawing a layer runs the update pass over its subtree, refreshes the queue
//! if needed, clears the dirty bit of the layer's subtree (never its siblings
//! or the scene root), optionally culls against the viewport, and replays
//! each visible item into the backend.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect};

use crate::backend::RenderBackend;
use crate::node::{NodeId, NodeKind, NodeTree};
use crate::resource::ImageState;
use crate::shape::{Geometry, HitRasterizer, Shape};

/// Construction options for a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerOptions {
    /// Draw and pick order; higher priorities sit on top.
    pub priority: i32,
    /// Whether drawables outside the viewport are skipped.
    pub culling: bool,
    /// Culling viewport in surface coordinates; `None` uses the backend size
    /// at the origin.
    pub viewport: Option<Rect>,
}

impl LayerOptions {
    /// Options with the given priority, culling enabled, default viewport.
    #[must_use]
    pub const fn new(priority: i32) -> Self {
        Self {
            priority,
            culling: true,
            viewport: None,
        }
    }

    /// Returns a copy with culling toggled.
    #[must_use]
    pub const fn with_culling(mut self, culling: bool) -> Self {
        self.culling = culling;
        self
    }

    /// Returns a copy with an explicit viewport.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = Some(viewport);
        self
    }
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Counters from drawing one layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Items in the draw queue.
    pub queued: usize,
    /// Items replayed into the backend.
    pub drawn: usize,
    /// Items rejected by viewport culling.
    pub culled: usize,
    /// Whether the queue was rebuilt this call.
    pub rebuilt: bool,
}

/// Scene-side state of one layer.
pub(crate) struct LayerState {
    pub(crate) node: NodeId,
    pub(crate) options: LayerOptions,
    pub(crate) backend: Box<dyn RenderBackend>,
    pub(crate) queue: Vec<NodeId>,
    pub(crate) built: bool,
}

impl fmt::Debug for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerState")
            .field("node", &self.node)
            .field("options", &self.options)
            .field("queue", &self.queue)
            .field("built", &self.built)
            .finish_non_exhaustive()
    }
}

impl LayerState {
    pub(crate) fn new(node: NodeId, options: LayerOptions, backend: Box<dyn RenderBackend>) -> Self {
        Self {
            node,
            options,
            backend,
            queue: Vec::new(),
            built: false,
        }
    }

    /// The culling viewport in surface coordinates.
    pub(crate) fn viewport(&self) -> Rect {
        self.options
            .viewport
            .unwrap_or_else(|| Rect::from_origin_size(Point::ORIGIN, self.backend.size()))
    }

    /// Runs the update pass and rebuilds the queue if the layer is dirty.
    ///
    /// Clears the dirty bit of the layer's subtree. Returns whether the queue
    /// was rebuilt.
    pub(crate) fn refresh(&mut self, tree: &mut NodeTree) -> bool {
        tree.update_subtree(self.node);
        let rebuild = !self.built || tree.is_dirty(self.node);
        if rebuild {
            build_queue(tree, self.node, &mut self.queue);
            self.built = true;
        }
        tree.set_dirty(self.node, false);
        rebuild
    }

    /// Replays the queue into the backend. Call after [`refresh`](Self::refresh).
    pub(crate) fn paint(&mut self, tree: &NodeTree, rebuilt: bool) -> DrawStats {
        let viewport = self.viewport();
        let mut stats = DrawStats {
            queued: self.queue.len(),
            rebuilt,
            ..DrawStats::default()
        };

        self.backend.clear();
        for &id in &self.queue {
            if !tree.is_visible(id) {
                continue;
            }
            let Some(shape) = tree.shape(id) else {
                continue;
            };
            let world = tree.world_transform(id);
            if self.options.culling && is_culled(shape, world, viewport) {
                stats.culled += 1;
                continue;
            }
            if draw_item(self.backend.as_mut(), shape, world) {
                stats.drawn += 1;
            }
        }
        stats
    }

    /// Returns the topmost drawable in this layer's queue hit by `point`
    /// (surface coordinates).
    pub(crate) fn pick(
        &self,
        tree: &NodeTree,
        point: Point,
        raster: &mut Option<Box<dyn HitRasterizer>>,
    ) -> Option<NodeId> {
        for &id in self.queue.iter().rev() {
            // The queue may predate a `remove` of this item or an ancestor.
            if !tree.is_alive(id)
                || !tree.is_ancestor_or_self(self.node, id)
                || !tree.is_displayed(id)
                || !tree.is_visible(id)
                || !tree.is_pointer_enabled(id)
            {
                continue;
            }
            let Some(shape) = tree.shape(id) else {
                continue;
            };
            let world = tree.world_transform(id);
            if world.determinant() == 0.0 {
                continue;
            }
            let local = world.inverse() * point;
            let hit = match raster {
                Some(r) => shape.hit_test(local, Some(r.as_mut())),
                None => shape.hit_test(local, None),
            };
            if hit {
                return Some(id);
            }
        }
        None
    }
}

/// Collects the displayed drawables under `layer` in pre-order, then stably
/// sorts them by effective z.
pub(crate) fn build_queue(tree: &NodeTree, layer: NodeId, queue: &mut Vec<NodeId>) {
    queue.clear();
    let mut stack = alloc::vec![layer.idx];
    while let Some(idx) = stack.pop() {
        let i = idx as usize;
        if idx != layer.idx && !tree.display[i].resolve(true) {
            continue;
        }
        if tree.kind[i] == NodeKind::Drawable {
            queue.push(tree.id_at(idx));
        }
        stack.extend(tree.children[i].iter().rev().copied());
    }
    queue.sort_by(|a, b| {
        tree.effective_z[a.idx as usize].total_cmp(&tree.effective_z[b.idx as usize])
    });
}

/// Whether the world-space bounding box of `shape` misses `viewport`.
///
/// Boxes that only touch the viewport edge are culled. Shapes without a
/// bounding box are always kept.
pub(crate) fn is_culled(shape: &Shape, world: Affine, viewport: Rect) -> bool {
    let Some(local) = shape.local_bounds() else {
        return false;
    };
    let aabb = world.transform_rect_bbox(local);
    let overlaps = aabb.x0 < viewport.x1
        && aabb.x1 > viewport.x0
        && aabb.y0 < viewport.y1
        && aabb.y1 > viewport.y0;
    !overlaps
}

/// Replays one drawable. Returns `false` when skipped (image not loaded).
fn draw_item(backend: &mut dyn RenderBackend, shape: &Shape, world: Affine) -> bool {
    if let Geometry::Image(image) = &shape.geometry {
        if image.state != ImageState::Ready {
            return false;
        }
    }
    backend.save();
    if let Some(clip) = shape.reveal_clip() {
        backend.clip(world.transform_rect_bbox(clip));
    }
    backend.set_transform(world);
    backend.set_attributes(&shape.paint);
    match &shape.geometry {
        Geometry::Rect(r) => backend.draw_rect(*r),
        Geometry::Circle(c) => backend.draw_circle(*c),
        Geometry::Line(l) => backend.draw_line(*l),
        Geometry::Path(p) => backend.draw_path(p),
        Geometry::Text(t) => backend.draw_text(t),
        Geometry::Image(i) => backend.draw_image(i),
    }
    backend.restore();
    true
}
