// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live scene to snapshot.

use kurbo::{PathEl, Point, Rect};
use strata_core::node::{LocalTransform, NodeId, NodeTree};
use strata_core::paint::{FillRule, Paint, Rgba};
use strata_core::scene::Scene;
use strata_core::shape::{Geometry, Shape};

use crate::model::{
    LayerSnapshot, NodeSnapshot, PaintSnapshot, PathElSnapshot, SceneSnapshot, ShapeSnapshot,
    TextSnapshot, TransformSnapshot,
};

/// Captures the camera and every layer of `scene`.
///
/// The hidden event layer is skipped.
#[must_use]
pub fn capture(scene: &Scene) -> SceneSnapshot {
    let tree = scene.tree();
    let layers = scene
        .layers()
        .filter(|&node| tree.is_alive(node))
        .filter_map(|node| {
            let options = scene.layer_options(node)?;
            let size = scene.layer_backend(node)?.size();
            Some(LayerSnapshot {
                priority: options.priority,
                culling: options.culling,
                viewport: options.viewport.map(rect),
                size: [size.width, size.height],
                node: capture_node(tree, node),
            })
        })
        .collect();
    SceneSnapshot {
        camera: transform(scene.camera()),
        layers,
    }
}

fn capture_node(tree: &NodeTree, node: NodeId) -> NodeSnapshot {
    let mut tags: Vec<String> = tree.tags(node).map(String::from).collect();
    tags.sort_unstable();
    NodeSnapshot {
        name: tree.name(node).map(String::from),
        tags,
        transform: transform(tree.local_transform(node)),
        z: tree.z(node),
        visible: tree.visible(node).explicit(),
        display: tree.display(node).explicit(),
        pointer: tree.pointer_enabled(node).explicit(),
        shape: tree.shape(node).map(shape),
        children: tree
            .children(node)
            .map(|child| capture_node(tree, child))
            .collect(),
    }
}

fn transform(t: LocalTransform) -> TransformSnapshot {
    TransformSnapshot {
        translation: [t.translation.x, t.translation.y],
        rotation: t.rotation,
        scale: [t.scale.x, t.scale.y],
    }
}

fn shape(shape: &Shape) -> ShapeSnapshot {
    let mut out = ShapeSnapshot::empty(shape.geometry.kind().as_str());
    match &shape.geometry {
        Geometry::Rect(r) => out.rect = Some(rect(*r)),
        Geometry::Circle(c) => {
            out.center = Some(point(c.center));
            out.radius = Some(c.radius);
        }
        Geometry::Line(l) => out.line = Some([l.p0.x, l.p0.y, l.p1.x, l.p1.y]),
        Geometry::Path(p) => out.path = Some(p.elements().iter().map(path_el).collect()),
        Geometry::Text(t) => {
            out.text = Some(TextSnapshot {
                content: t.content.clone(),
                origin: point(t.origin),
                font_size: t.font_size,
            });
        }
        Geometry::Image(i) => {
            out.rect = Some(rect(i.rect));
            out.source = Some(i.source.0);
        }
    }
    out.paint = paint(&shape.paint);
    out.reveal = shape.reveal;
    out
}

fn paint(paint: &Paint) -> PaintSnapshot {
    PaintSnapshot {
        fill: paint.fill.map(color),
        stroke: paint.stroke.map(color),
        line_width: paint.line_width,
        opacity: paint.opacity,
        even_odd: paint.fill_rule == FillRule::EvenOdd,
    }
}

fn path_el(el: &PathEl) -> PathElSnapshot {
    match *el {
        PathEl::MoveTo(p) => PathElSnapshot::Move(point(p)),
        PathEl::LineTo(p) => PathElSnapshot::Line(point(p)),
        PathEl::QuadTo(c, p) => PathElSnapshot::Quad([c.x, c.y, p.x, p.y]),
        PathEl::CurveTo(c1, c2, p) => PathElSnapshot::Curve([c1.x, c1.y, c2.x, c2.y, p.x, p.y]),
        PathEl::ClosePath => PathElSnapshot::Close,
    }
}

fn point(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

fn rect(r: Rect) -> [f64; 4] {
    [r.x0, r.y0, r.x1, r.y1]
}

fn color(c: Rgba) -> [f64; 4] {
    [c.r, c.g, c.b, c.a]
}
