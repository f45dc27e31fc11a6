// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot to live scene.

use kurbo::{BezPath, Circle, Line, PathEl, Point, Rect, Vec2};
use strata_core::backend::RenderBackend;
use strata_core::layer::LayerOptions;
use strata_core::node::{Cascade, LocalTransform, NodeId, NodeTree};
use strata_core::paint::{FillRule, Paint, Rgba};
use strata_core::resource::{ImageState, ResourceKey};
use strata_core::scene::Scene;
use strata_core::shape::{Geometry, Image, Shape, ShapeKind, Text};

use crate::SnapshotError;
use crate::model::{
    LayerSnapshot, NodeSnapshot, PaintSnapshot, PathElSnapshot, SceneSnapshot, ShapeSnapshot,
    TransformSnapshot,
};

/// Rebuilds a scene from `snapshot`.
///
/// `event_backend` becomes the scene's event layer backend. `backend_for` is
/// called once per layer, bottom to top, to create its render backend.
/// Images come back in [`ImageState::Loading`] until the host reports them
/// ready through [`Scene::image_ready`].
///
/// On error every backend created so far is disposed with the scene.
pub fn restore(
    snapshot: &SceneSnapshot,
    event_backend: Box<dyn RenderBackend>,
    mut backend_for: impl FnMut(&LayerSnapshot) -> Box<dyn RenderBackend>,
) -> Result<Scene, SnapshotError> {
    let mut scene = Scene::new(event_backend);
    scene.set_camera(transform(&snapshot.camera));
    for layer in &snapshot.layers {
        if let Err(err) = restore_layer(&mut scene, layer, &mut backend_for) {
            scene.dispose();
            return Err(err);
        }
    }
    Ok(scene)
}

fn restore_layer(
    scene: &mut Scene,
    layer: &LayerSnapshot,
    backend_for: &mut impl FnMut(&LayerSnapshot) -> Box<dyn RenderBackend>,
) -> Result<(), SnapshotError> {
    let mut options = LayerOptions::new(layer.priority).with_culling(layer.culling);
    if let Some(viewport) = layer.viewport {
        options = options.with_viewport(rect(viewport));
    }
    let node = scene.add_layer(layer.node.name.as_deref(), options, backend_for(layer))?;
    let tree = scene.tree_mut();
    apply_attributes(tree, node, &layer.node);
    for child in &layer.node.children {
        restore_node(tree, node, child)?;
    }
    Ok(())
}

fn restore_node(
    tree: &mut NodeTree,
    parent: NodeId,
    snapshot: &NodeSnapshot,
) -> Result<(), SnapshotError> {
    let name = snapshot.name.as_deref();
    let node = match &snapshot.shape {
        Some(shape) => tree.create_drawable(name, restore_shape(shape)?),
        None => tree.create_group(name),
    };
    if let Err(err) = tree.insert(parent, node) {
        tree.dispose(node);
        return Err(err.into());
    }
    apply_attributes(tree, node, snapshot);
    for child in &snapshot.children {
        restore_node(tree, node, child)?;
    }
    Ok(())
}

fn apply_attributes(tree: &mut NodeTree, node: NodeId, snapshot: &NodeSnapshot) {
    tree.set_transform(node, transform(&snapshot.transform));
    tree.set_z(node, snapshot.z);
    tree.set_visible(node, cascade(snapshot.visible));
    tree.set_display(node, cascade(snapshot.display));
    tree.set_pointer_enabled(node, cascade(snapshot.pointer));
    for tag in &snapshot.tags {
        tree.add_tag(node, tag);
    }
}

fn restore_shape(snapshot: &ShapeSnapshot) -> Result<Shape, SnapshotError> {
    let kind: ShapeKind = snapshot.kind.parse()?;
    let missing = |field: &'static str| SnapshotError::MissingField { kind, field };
    let geometry = match kind {
        ShapeKind::Rect => Geometry::Rect(rect(snapshot.rect.ok_or_else(|| missing("rect"))?)),
        ShapeKind::Circle => {
            let center = snapshot.center.ok_or_else(|| missing("center"))?;
            let radius = snapshot.radius.ok_or_else(|| missing("radius"))?;
            Geometry::Circle(Circle::new(point(center), radius))
        }
        ShapeKind::Line => {
            let [x0, y0, x1, y1] = snapshot.line.ok_or_else(|| missing("line"))?;
            Geometry::Line(Line::new((x0, y0), (x1, y1)))
        }
        ShapeKind::Path => {
            let elements = snapshot.path.as_ref().ok_or_else(|| missing("path"))?;
            Geometry::Path(BezPath::from_vec(elements.iter().map(path_el).collect()))
        }
        ShapeKind::Text => {
            let text = snapshot.text.as_ref().ok_or_else(|| missing("text"))?;
            Geometry::Text(Text {
                content: text.content.clone(),
                origin: point(text.origin),
                font_size: text.font_size,
                measured: None,
            })
        }
        ShapeKind::Image => Geometry::Image(Image {
            source: ResourceKey(snapshot.source.ok_or_else(|| missing("source"))?),
            rect: rect(snapshot.rect.ok_or_else(|| missing("rect"))?),
            state: ImageState::Loading,
        }),
    };
    let mut shape = Shape::new(geometry, paint(&snapshot.paint));
    shape.reveal = snapshot.reveal;
    Ok(shape)
}

fn paint(snapshot: &PaintSnapshot) -> Paint {
    Paint {
        fill: snapshot.fill.map(color),
        stroke: snapshot.stroke.map(color),
        line_width: snapshot.line_width,
        opacity: snapshot.opacity,
        fill_rule: if snapshot.even_odd {
            FillRule::EvenOdd
        } else {
            FillRule::NonZero
        },
    }
}

fn path_el(el: &PathElSnapshot) -> PathEl {
    match *el {
        PathElSnapshot::Move(p) => PathEl::MoveTo(point(p)),
        PathElSnapshot::Line(p) => PathEl::LineTo(point(p)),
        PathElSnapshot::Quad([cx, cy, x, y]) => PathEl::QuadTo((cx, cy).into(), (x, y).into()),
        PathElSnapshot::Curve([c1x, c1y, c2x, c2y, x, y]) => {
            PathEl::CurveTo((c1x, c1y).into(), (c2x, c2y).into(), (x, y).into())
        }
        PathElSnapshot::Close => PathEl::ClosePath,
    }
}

fn transform(t: &TransformSnapshot) -> LocalTransform {
    LocalTransform {
        translation: Vec2::new(t.translation[0], t.translation[1]),
        rotation: t.rotation,
        scale: Vec2::new(t.scale[0], t.scale[1]),
    }
}

fn cascade(value: Option<bool>) -> Cascade {
    value.map_or(Cascade::Inherit, Cascade::from)
}

fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}

fn rect([x0, y0, x1, y1]: [f64; 4]) -> Rect {
    Rect::new(x0, y0, x1, y1)
}

fn color([r, g, b, a]: [f64; 4]) -> Rgba {
    Rgba::new(r, g, b, a)
}
