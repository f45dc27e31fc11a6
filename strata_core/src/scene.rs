// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: root node, layer list, picking, and the camera.
//!
//! A [`Scene`] owns the [`NodeTree`], one [`LayerState`] per layer (sorted by
//! ascending priority), a non-rendering event layer, the optional
//! [`HitRasterizer`] (a [`VectorHitRasterizer`] unless replaced), attached
//! animations, and dispatcher state.
//!
//! The root node's local transform is the camera. Every layer hangs directly
//! off the root, so the camera applies to all of them.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};

use crate::animation::Animations;
use crate::backend::RenderBackend;
use crate::error::SceneError;
use crate::layer::{DrawStats, LayerOptions, LayerState};
use crate::node::{LocalTransform, NodeId, NodeTree};
use crate::resource::ImageState;
use crate::shape::{Geometry, HitRasterizer, VectorHitRasterizer};

/// What one [`Scene::draw`] call did to one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerReport {
    /// The layer node.
    pub node: NodeId,
    /// The layer's priority.
    pub priority: i32,
    /// Queue and draw counters.
    pub stats: DrawStats,
}

/// Result of [`Scene::draw`]: the layers that were redrawn, bottom to top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Redrawn layers in priority order.
    pub layers: Vec<LayerReport>,
}

impl DrawReport {
    /// Whether no layer was redrawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total items replayed into backends.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.layers.iter().map(|l| l.stats.drawn).sum()
    }
}

/// Layers refreshed by [`Scene::prepare_draw`] and waiting to be painted.
#[derive(Debug, Default)]
pub(crate) struct PendingDraw {
    slots: Vec<(usize, bool)>,
}

/// A layered 2D scene.
pub struct Scene {
    pub(crate) tree: NodeTree,
    pub(crate) root: NodeId,
    pub(crate) layers: Vec<LayerState>,
    pub(crate) event_layer: LayerState,
    pub(crate) hit: Option<Box<dyn HitRasterizer>>,
    pub(crate) animations: Animations,
    pub(crate) last_target: Option<NodeId>,
    pub(crate) next_listener: u64,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.root)
            .field("layers", &self.layers)
            .field("event_layer", &self.event_layer.node)
            .field("hit", &self.hit.is_some())
            .field("animations", &self.animations)
            .field("last_target", &self.last_target)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Creates an empty scene.
    ///
    /// `event_backend` belongs to the event layer: it is never drawn into,
    /// only asked to map client coordinates to surface coordinates.
    #[must_use]
    pub fn new(event_backend: Box<dyn RenderBackend>) -> Self {
        let mut tree = NodeTree::new();
        let root = tree.create_root();
        let event_node = tree.create_layer(None);
        let attached = tree.insert(root, event_node);
        debug_assert!(attached.is_ok(), "event layer attaches to a fresh root");
        tree.set_display(event_node, false);
        let event_layer = LayerState::new(
            event_node,
            LayerOptions::new(i32::MAX).with_culling(false),
            event_backend,
        );
        Self {
            tree,
            root,
            layers: Vec::new(),
            event_layer,
            hit: Some(Box::new(VectorHitRasterizer::default())),
            animations: Animations::default(),
            last_target: None,
            next_listener: 0,
        }
    }

    /// The node tree.
    #[must_use]
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// The node tree, for mutation.
    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The event layer node.
    #[must_use]
    pub fn event_layer(&self) -> NodeId {
        self.event_layer.node
    }

    // -- Layers --

    /// Creates a layer drawing into `backend` and attaches it to the root.
    ///
    /// Layers with equal priority keep insertion order. Fails, dropping
    /// `backend`, when another layer already has the name.
    pub fn add_layer(
        &mut self,
        name: Option<&str>,
        options: LayerOptions,
        backend: Box<dyn RenderBackend>,
    ) -> Result<NodeId, SceneError> {
        let node = self.tree.create_layer(name);
        if let Err(err) = self.tree.insert(self.root, node) {
            self.tree.dispose(node);
            return Err(err);
        }
        let at = self
            .layers
            .partition_point(|l| l.options.priority <= options.priority);
        self.layers.insert(at, LayerState::new(node, options, backend));
        Ok(node)
    }

    /// Disposes a layer, its subtree, and its backend.
    ///
    /// Returns `false` if `node` is not a layer of this scene.
    pub fn remove_layer(&mut self, node: NodeId) -> bool {
        let Some(at) = self.layer_slot(node) else {
            return false;
        };
        let mut state = self.layers.remove(at);
        state.backend.dispose();
        if self.tree.is_alive(node) {
            self.tree.dispose(node);
        }
        true
    }

    /// Finds a layer by name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<NodeId> {
        self.layers
            .iter()
            .find(|l| self.tree.is_alive(l.node) && self.tree.name(l.node) == Some(name))
            .map(|l| l.node)
    }

    /// Layer nodes, bottom to top. The event layer is not included.
    pub fn layers(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.layers.iter().map(|l| l.node)
    }

    /// The backend of a layer.
    #[must_use]
    pub fn layer_backend(&self, node: NodeId) -> Option<&dyn RenderBackend> {
        let at = self.layer_slot(node)?;
        Some(self.layers[at].backend.as_ref())
    }

    /// The backend of a layer, for mutation.
    pub fn layer_backend_mut(&mut self, node: NodeId) -> Option<&mut dyn RenderBackend> {
        let at = self.layer_slot(node)?;
        Some(self.layers[at].backend.as_mut())
    }

    /// The options of a layer.
    #[must_use]
    pub fn layer_options(&self, node: NodeId) -> Option<LayerOptions> {
        self.layer_slot(node).map(|at| self.layers[at].options)
    }

    /// Replaces a layer's options, re-sorting by priority and marking the
    /// layer dirty. Returns `false` if `node` is not a layer of this scene.
    pub fn set_layer_options(&mut self, node: NodeId, options: LayerOptions) -> bool {
        let Some(at) = self.layer_slot(node) else {
            return false;
        };
        let mut state = self.layers.remove(at);
        state.options = options;
        let at = self
            .layers
            .partition_point(|l| l.options.priority <= options.priority);
        self.layers.insert(at, state);
        self.tree.set_dirty(node, true);
        true
    }

    /// Resizes every backend, including the event layer's, and marks every
    /// layer dirty.
    pub fn resize(&mut self, size: Size) {
        self.event_layer.backend.resize(size);
        for layer in &mut self.layers {
            layer.backend.resize(size);
            if self.tree.is_alive(layer.node) {
                self.tree.set_dirty(layer.node, true);
            }
        }
    }

    fn layer_slot(&self, node: NodeId) -> Option<usize> {
        self.layers.iter().position(|l| l.node == node)
    }

    /// Drops layers whose node was disposed through the tree.
    fn prune_layers(&mut self) {
        let tree = &self.tree;
        self.layers.retain_mut(|l| {
            let alive = tree.is_alive(l.node);
            if !alive {
                l.backend.dispose();
            }
            alive
        });
    }

    // -- Drawing --

    /// Installs (or removes) the rasterizer used for line and path picking,
    /// returning the previous one.
    ///
    /// A new scene starts with a [`VectorHitRasterizer`]. With `None`, lines
    /// and paths are never picked.
    pub fn set_hit_rasterizer(
        &mut self,
        rasterizer: Option<Box<dyn HitRasterizer>>,
    ) -> Option<Box<dyn HitRasterizer>> {
        core::mem::replace(&mut self.hit, rasterizer)
    }

    /// Redraws every displayed layer that needs it, then clears the dirty
    /// bits of the whole tree.
    pub fn draw(&mut self) -> DrawReport {
        let pending = self.prepare_draw();
        self.paint(pending)
    }

    /// Runs the update pass and refreshes the queue of every layer that needs
    /// a redraw. A camera change redraws every displayed layer.
    pub(crate) fn prepare_draw(&mut self) -> PendingDraw {
        self.prune_layers();
        let camera_moved =
            self.tree.needs_local_update(self.root) || self.tree.needs_world_update(self.root);
        if camera_moved {
            self.tree.update_subtree(self.root);
        }
        let mut pending = PendingDraw::default();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            if !self.tree.is_displayed(layer.node) {
                continue;
            }
            if camera_moved || self.tree.needs_redraw(layer.node) {
                let rebuilt = layer.refresh(&mut self.tree);
                pending.slots.push((i, rebuilt));
            }
        }
        pending
    }

    /// Replays refreshed layers into their backends and clears the tree's
    /// dirty bits.
    pub(crate) fn paint(&mut self, pending: PendingDraw) -> DrawReport {
        let mut report = DrawReport::default();
        for (i, rebuilt) in pending.slots {
            let layer = &mut self.layers[i];
            let stats = layer.paint(&self.tree, rebuilt);
            report.layers.push(LayerReport {
                node: layer.node,
                priority: layer.options.priority,
                stats,
            });
        }
        self.tree.set_dirty(self.root, false);
        report
    }

    /// Whether anything displayed changed since the last draw.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.tree.needs_redraw(self.root)
    }

    /// Marks an image drawable as loaded so the next draw includes it.
    ///
    /// Returns `false` if `node` is not an image or was already ready.
    pub fn image_ready(&mut self, node: NodeId) -> bool {
        let loading = matches!(
            self.tree.shape(node).map(|s| &s.geometry),
            Some(Geometry::Image(i)) if i.state == ImageState::Loading
        );
        if loading {
            self.tree.update_shape(node, |s| {
                if let Geometry::Image(i) = &mut s.geometry {
                    i.state = ImageState::Ready;
                }
            });
        }
        loading
    }

    // -- Picking and coordinates --

    /// Returns the topmost pointer-enabled drawable under `point`, given in
    /// surface coordinates.
    ///
    /// Layers are tested from the highest priority down using the queues
    /// built by the last draw.
    pub fn pick(&mut self, point: Point) -> Option<NodeId> {
        for layer in self.layers.iter().rev() {
            if !self.tree.is_alive(layer.node) || !self.tree.is_displayed(layer.node) {
                continue;
            }
            if let Some(hit) = layer.pick(&self.tree, point, &mut self.hit) {
                return Some(hit);
            }
        }
        None
    }

    /// The camera (the root's local transform).
    #[must_use]
    pub fn camera(&self) -> LocalTransform {
        self.tree.local_transform(self.root)
    }

    /// Moves the camera. Every displayed layer redraws on the next draw.
    pub fn set_camera(&mut self, camera: LocalTransform) {
        self.tree.set_transform(self.root, camera);
    }

    /// Maps a surface point into world coordinates.
    ///
    /// A degenerate camera yields non-finite coordinates.
    #[must_use]
    pub fn screen_to_world(&self, point: Point) -> Point {
        self.camera().to_affine().inverse() * point
    }

    /// Maps a world point onto the surface.
    #[must_use]
    pub fn world_to_screen(&self, point: Point) -> Point {
        self.camera().to_affine() * point
    }

    /// Maps host client coordinates to surface coordinates through the event
    /// layer's backend.
    #[must_use]
    pub fn client_to_local(&self, client: Point) -> Point {
        self.event_layer.backend.client_to_local(client)
    }

    /// Disposes every backend, including the event layer's.
    pub fn dispose(mut self) {
        for layer in &mut self.layers {
            layer.backend.dispose();
        }
        self.event_layer.backend.dispose();
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Line, Rect, Shape as _, Vec2};

    use super::*;
    use crate::backend::{CommandLog, RecordingBackend};
    use crate::paint::{Paint, Rgba};
    use crate::resource::ResourceKey;
    use crate::shape::{Image, Shape};

    fn recorder() -> (Box<dyn RenderBackend>, CommandLog) {
        let backend = RecordingBackend::new(Size::new(100.0, 100.0));
        let log = backend.log();
        (Box::new(backend), log)
    }

    fn scene() -> Scene {
        Scene::new(Box::new(RecordingBackend::new(Size::new(100.0, 100.0))))
    }

    fn square(scene: &mut Scene, layer: NodeId, name: &str, x: f64) -> NodeId {
        let node = scene.tree_mut().create_drawable(
            Some(name),
            Shape::rect(Rect::new(x, 0.0, x + 10.0, 10.0), Paint::default()),
        );
        scene.tree_mut().insert(layer, node).unwrap();
        node
    }

    #[test]
    fn layers_sort_by_priority() {
        let mut scene = scene();
        let top = scene
            .add_layer(Some("top"), LayerOptions::new(5), recorder().0)
            .unwrap();
        let bottom = scene
            .add_layer(Some("bottom"), LayerOptions::new(-1), recorder().0)
            .unwrap();
        let middle = scene
            .add_layer(Some("middle"), LayerOptions::new(0), recorder().0)
            .unwrap();
        assert_eq!(scene.layers().collect::<Vec<_>>(), [bottom, middle, top]);
        assert_eq!(scene.layer("middle"), Some(middle));

        scene.set_layer_options(bottom, LayerOptions::new(10));
        assert_eq!(scene.layers().collect::<Vec<_>>(), [middle, top, bottom]);
    }

    #[test]
    fn duplicate_layer_name_is_rejected() {
        let mut scene = scene();
        scene
            .add_layer(Some("ui"), LayerOptions::default(), recorder().0)
            .unwrap();
        let live = scene.tree().live_count();
        let err = scene
            .add_layer(Some("ui"), LayerOptions::default(), recorder().0)
            .unwrap_err();
        assert_eq!(err, SceneError::DuplicateName { name: "ui".into() });
        assert_eq!(scene.layers().len(), 1);
        assert_eq!(scene.tree().live_count(), live, "rejected node is recycled");
    }

    #[test]
    fn draw_skips_clean_and_hidden_layers() {
        let mut scene = scene();
        let (backend_a, log_a) = recorder();
        let (backend_b, log_b) = recorder();
        let a = scene.add_layer(None, LayerOptions::new(0), backend_a).unwrap();
        let b = scene.add_layer(None, LayerOptions::new(1), backend_b).unwrap();
        square(&mut scene, a, "a", 0.0);
        let item_b = square(&mut scene, b, "b", 0.0);

        let report = scene.draw();
        assert_eq!(report.layers.len(), 2);
        assert_eq!(report.drawn(), 2);
        assert!(!scene.tree().is_dirty(scene.root()), "root cleared");
        log_a.take();
        log_b.take();

        scene.tree_mut().set_translation(item_b, Vec2::new(1.0, 1.0));
        let report = scene.draw();
        assert_eq!(report.layers.len(), 1);
        assert_eq!(report.layers[0].node, b);
        assert!(log_a.is_empty(), "clean layer untouched");
        assert!(!log_b.is_empty());

        scene.tree_mut().set_display(b, false);
        assert!(scene.draw().is_empty(), "hidden layers are not drawn");
    }

    #[test]
    fn camera_change_redraws_every_layer() {
        let mut scene = scene();
        let a = scene.add_layer(None, LayerOptions::new(0), recorder().0).unwrap();
        let b = scene.add_layer(None, LayerOptions::new(1), recorder().0).unwrap();
        let item = square(&mut scene, a, "a", 0.0);
        square(&mut scene, b, "b", 0.0);
        scene.draw();

        scene.set_camera(LocalTransform {
            translation: Vec2::new(30.0, 0.0),
            ..LocalTransform::IDENTITY
        });
        let report = scene.draw();
        assert_eq!(report.layers.len(), 2);
        assert_eq!(
            scene.tree().world_transform(item) * Point::ORIGIN,
            Point::new(30.0, 0.0)
        );
        assert!(!scene.needs_redraw(), "nothing left pending");
    }

    #[test]
    fn pick_prefers_higher_layers() {
        let mut scene = scene();
        let low = scene.add_layer(None, LayerOptions::new(0), recorder().0).unwrap();
        let high = scene.add_layer(None, LayerOptions::new(1), recorder().0).unwrap();
        let under = square(&mut scene, low, "under", 0.0);
        let over = square(&mut scene, high, "over", 0.0);
        scene.draw();

        assert_eq!(scene.pick(Point::new(5.0, 5.0)), Some(over));
        scene.tree_mut().set_pointer_enabled(over, false);
        assert_eq!(scene.pick(Point::new(5.0, 5.0)), Some(under));
        assert_eq!(scene.pick(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn lines_and_paths_pick_by_default() {
        let mut scene = scene();
        let layer = scene.add_layer(None, LayerOptions::new(0), recorder().0).unwrap();
        let outline = Rect::new(0.0, 0.0, 20.0, 20.0).to_path(0.1);
        let path = scene.tree_mut().create_drawable(
            Some("path"),
            Shape::new(Geometry::Path(outline), Paint::default()),
        );
        let line = scene.tree_mut().create_drawable(
            Some("line"),
            Shape::new(
                Geometry::Line(Line::new((40.0, 50.0), (90.0, 50.0))),
                Paint::stroke(Rgba::BLACK, 4.0),
            ),
        );
        scene.tree_mut().insert(layer, path).unwrap();
        scene.tree_mut().insert(layer, line).unwrap();
        scene.draw();

        assert_eq!(scene.pick(Point::new(10.0, 10.0)), Some(path));
        assert_eq!(scene.pick(Point::new(60.0, 51.0)), Some(line));
        assert_eq!(scene.pick(Point::new(60.0, 55.0)), None);

        let previous = scene.set_hit_rasterizer(None);
        assert!(previous.is_some(), "a new scene carries a rasterizer");
        assert_eq!(scene.pick(Point::new(10.0, 10.0)), None);
        assert_eq!(scene.pick(Point::new(60.0, 51.0)), None);
    }

    #[test]
    fn detached_drawables_are_not_picked() {
        let mut scene = scene();
        let layer = scene.add_layer(None, LayerOptions::new(0), recorder().0).unwrap();
        let group = scene.tree_mut().create_group(Some("group"));
        scene.tree_mut().insert(layer, group).unwrap();
        let inner = square(&mut scene, group, "inner", 0.0);
        let item = square(&mut scene, layer, "item", 20.0);
        scene.draw();
        assert_eq!(scene.pick(Point::new(25.0, 5.0)), Some(item));
        assert_eq!(scene.pick(Point::new(5.0, 5.0)), Some(inner));

        scene.tree_mut().remove(item);
        scene.tree_mut().remove(group);
        assert_eq!(scene.pick(Point::new(25.0, 5.0)), None);
        assert_eq!(scene.pick(Point::new(5.0, 5.0)), None);
        assert_eq!(scene.tree().parent(item), None);
    }

    #[test]
    fn pick_follows_the_camera() {
        let mut scene = scene();
        let layer = scene.add_layer(None, LayerOptions::new(0), recorder().0).unwrap();
        let item = square(&mut scene, layer, "item", 0.0);
        scene.set_camera(LocalTransform {
            translation: Vec2::new(50.0, 50.0),
            ..LocalTransform::IDENTITY
        });
        scene.draw();
        assert_eq!(scene.pick(Point::new(55.0, 55.0)), Some(item));
        assert_eq!(scene.pick(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn screen_and_world_are_inverse() {
        let mut scene = scene();
        scene.set_camera(LocalTransform {
            translation: Vec2::new(10.0, 20.0),
            rotation: 0.0,
            scale: Vec2::new(2.0, 2.0),
        });
        let world = scene.screen_to_world(Point::new(30.0, 40.0));
        assert_eq!(world, Point::new(10.0, 10.0));
        assert_eq!(scene.world_to_screen(world), Point::new(30.0, 40.0));

        scene.set_camera(LocalTransform {
            scale: Vec2::ZERO,
            ..LocalTransform::IDENTITY
        });
        let degenerate = scene.screen_to_world(Point::new(1.0, 1.0));
        assert!(!degenerate.x.is_finite());
    }

    #[test]
    fn client_to_local_uses_the_event_backend() {
        let mut backend = RecordingBackend::new(Size::new(100.0, 100.0));
        backend.origin = Point::new(8.0, 8.0);
        let scene = Scene::new(Box::new(backend));
        assert_eq!(
            scene.client_to_local(Point::new(10.0, 10.0)),
            Point::new(2.0, 2.0)
        );
    }

    #[test]
    fn removing_a_layer_disposes_its_backend() {
        let mut scene = scene();
        let backend = RecordingBackend::new(Size::new(10.0, 10.0));
        let disposed = backend.disposed_flag();
        let layer = scene
            .add_layer(Some("gone"), LayerOptions::default(), Box::new(backend))
            .unwrap();
        assert!(scene.remove_layer(layer));
        assert!(disposed.get());
        assert!(!scene.tree().is_alive(layer));
        assert!(!scene.remove_layer(layer));
    }

    #[test]
    fn layers_disposed_through_the_tree_are_pruned() {
        let mut scene = scene();
        let backend = RecordingBackend::new(Size::new(10.0, 10.0));
        let disposed = backend.disposed_flag();
        let layer = scene
            .add_layer(None, LayerOptions::default(), Box::new(backend))
            .unwrap();
        scene.tree_mut().dispose(layer);
        scene.draw();
        assert_eq!(scene.layers().len(), 0);
        assert!(disposed.get());
    }

    #[test]
    fn resize_reaches_every_backend() {
        let mut scene = scene();
        let layer = scene.add_layer(None, LayerOptions::default(), recorder().0).unwrap();
        scene.draw();
        scene.resize(Size::new(300.0, 200.0));
        assert!(scene.tree().is_dirty(layer));
        assert_eq!(
            scene.layer_backend(layer).map(|b| b.size()),
            Some(Size::new(300.0, 200.0))
        );
    }

    #[test]
    fn ready_images_are_drawn() {
        let mut scene = scene();
        let (backend, log) = recorder();
        let layer = scene.add_layer(None, LayerOptions::default(), backend).unwrap();
        let image = scene.tree_mut().create_drawable(
            None,
            Shape::new(
                Geometry::Image(Image {
                    source: ResourceKey(7),
                    rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                    state: ImageState::Loading,
                }),
                Paint::default(),
            ),
        );
        scene.tree_mut().insert(layer, image).unwrap();
        scene.draw();
        assert_eq!(log.primitive_count(), 0);

        assert!(scene.image_ready(image));
        assert!(!scene.image_ready(image), "already ready");
        log.take();
        scene.draw();
        assert_eq!(log.primitive_count(), 1);
    }
}
