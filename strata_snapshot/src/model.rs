// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain data mirrors of scene state.
//!
//! Points are `[x, y]`, rectangles `[x0, y0, x1, y1]`, colors `[r, g, b, a]`
//! with channels in `0.0..=1.0`. Cascades are `None` for inherit and
//! `Some(bool)` for an explicit value.

use serde::{Deserialize, Serialize};

/// A whole scene: camera plus layers from bottom to top.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Camera transform applied at the scene root.
    #[serde(default)]
    pub camera: TransformSnapshot,
    /// Layers in draw order, bottom first.
    #[serde(default)]
    pub layers: Vec<LayerSnapshot>,
}

/// One layer: its options, surface size, and node subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    /// Draw and pick priority.
    pub priority: i32,
    /// Whether viewport culling is enabled.
    #[serde(default = "default_true")]
    pub culling: bool,
    /// Explicit culling viewport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<[f64; 4]>,
    /// Backend surface size when captured.
    pub size: [f64; 2],
    /// The layer node itself. Its `shape` is always `None`.
    pub node: NodeSnapshot,
}

/// One node and its subtree.
///
/// A node with a `shape` is restored as a drawable leaf, any other node as a
/// group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Sibling-unique name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tags in sorted order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Local transform.
    #[serde(default)]
    pub transform: TransformSnapshot,
    /// Local z.
    #[serde(default)]
    pub z: f64,
    /// Visibility cascade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Display cascade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    /// Pointer-enabled cascade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<bool>,
    /// Geometry and paint of a drawable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeSnapshot>,
    /// Children in tree order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Translation, rotation (radians), and scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    /// Offset from the parent origin.
    pub translation: [f64; 2],
    /// Rotation in radians.
    pub rotation: f64,
    /// Per-axis scale.
    pub scale: [f64; 2],
}

impl Default for TransformSnapshot {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

/// A drawable's geometry, keyed by `kind`.
///
/// Which geometry field must be present depends on `kind`:
///
/// | kind     | fields                 |
/// |----------|------------------------|
/// | `rect`   | `rect`                 |
/// | `circle` | `center`, `radius`     |
/// | `line`   | `line`                 |
/// | `path`   | `path`                 |
/// | `text`   | `text`                 |
/// | `image`  | `rect`, `source`       |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    /// Geometry kind name.
    pub kind: String,
    /// Rectangle for `rect`, destination for `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f64; 4]>,
    /// Circle center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    /// Circle radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Line endpoints `[x0, y0, x1, y1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<[f64; 4]>,
    /// Path elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathElSnapshot>>,
    /// Text run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSnapshot>,
    /// Image resource key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<u64>,
    /// Paint attributes.
    #[serde(default)]
    pub paint: PaintSnapshot,
    /// Clip-reveal fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<f64>,
}

impl ShapeSnapshot {
    /// A shape of `kind` with no geometry fields and default paint.
    #[must_use]
    pub fn empty(kind: &str) -> Self {
        Self {
            kind: kind.into(),
            rect: None,
            center: None,
            radius: None,
            line: None,
            path: None,
            text: None,
            source: None,
            paint: PaintSnapshot::default(),
            reveal: None,
        }
    }
}

/// One path element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathElSnapshot {
    /// Starts a subpath at `[x, y]`.
    Move([f64; 2]),
    /// Line to `[x, y]`.
    Line([f64; 2]),
    /// Quadratic to `[cx, cy, x, y]`.
    Quad([f64; 4]),
    /// Cubic to `[c1x, c1y, c2x, c2y, x, y]`.
    Curve([f64; 6]),
    /// Closes the subpath.
    Close,
}

/// A text run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextSnapshot {
    /// The string.
    pub content: String,
    /// Top-left corner.
    pub origin: [f64; 2],
    /// Font size in local units.
    pub font_size: f64,
}

/// Paint attributes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintSnapshot {
    /// Fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<[f64; 4]>,
    /// Stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<[f64; 4]>,
    /// Stroke width.
    pub line_width: f64,
    /// Opacity multiplier.
    pub opacity: f64,
    /// Even-odd fill rule instead of non-zero.
    #[serde(default, skip_serializing_if = "is_false")]
    pub even_odd: bool,
}

impl Default for PaintSnapshot {
    fn default() -> Self {
        Self {
            fill: Some([0.0, 0.0, 0.0, 1.0]),
            stroke: None,
            line_width: 1.0,
            opacity: 1.0,
            even_odd: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}
