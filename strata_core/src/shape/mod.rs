// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable geometry, bounding boxes, and precise hit testing.
//!
//! A drawable node owns one [`Shape`]: a [`Geometry`] in node-local
//! coordinates, its [`Paint`], and an optional clip-reveal fraction.
//!
//! # Hit testing
//!
//! [`Shape::hit_test`] answers "does this local point touch the painted
//! shape". Closed-form primitives (rects, circles, text and image boxes) are
//! tested directly. Lines and free-form paths are delegated to a
//! [`HitRasterizer`], the scene's explicitly owned offscreen resource; when no
//! rasterizer is available those shapes simply report no hit.

mod hit;

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use kurbo::{BezPath, Circle, Line, Point, Rect, Shape as _, Size};

use crate::error::SceneError;
use crate::paint::Paint;
use crate::resource::{ImageState, ResourceKey};

pub use hit::{HitRasterizer, VectorHitRasterizer};

/// Flattening tolerance used when converting primitives to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// A text run positioned by its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// The string to draw.
    pub content: String,
    /// Top-left corner of the text box.
    pub origin: Point,
    /// Font size in local units.
    pub font_size: f64,
    /// Measured extent; `None` until the host measures the run.
    pub measured: Option<Size>,
}

/// An image drawn into a destination rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Image {
    /// Backend resource holding the decoded pixels.
    pub source: ResourceKey,
    /// Destination rectangle in local coordinates.
    pub rect: Rect,
    /// Whether the source has finished loading.
    pub state: ImageState,
}

/// Local-space geometry of a drawable.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle.
    Circle(Circle),
    /// A single line segment (stroke only).
    Line(Line),
    /// A free-form Bézier path.
    Path(BezPath),
    /// A text run.
    Text(Text),
    /// A raster image.
    Image(Image),
}

impl Geometry {
    /// Returns the kind tag of this geometry.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect(_) => ShapeKind::Rect,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Line(_) => ShapeKind::Line,
            Self::Path(_) => ShapeKind::Path,
            Self::Text(_) => ShapeKind::Text,
            Self::Image(_) => ShapeKind::Image,
        }
    }
}

/// Kind tag of a [`Geometry`], used at the persistence boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    /// [`Geometry::Rect`].
    Rect,
    /// [`Geometry::Circle`].
    Circle,
    /// [`Geometry::Line`].
    Line,
    /// [`Geometry::Path`].
    Path,
    /// [`Geometry::Text`].
    Text,
    /// [`Geometry::Image`].
    Image,
}

impl ShapeKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Path => "path",
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" => Ok(Self::Rect),
            "circle" => Ok(Self::Circle),
            "line" => Ok(Self::Line),
            "path" => Ok(Self::Path),
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(SceneError::UnknownShapeKind(other.into())),
        }
    }
}

/// Geometry plus paint: everything a drawable node renders.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Local-space geometry.
    pub geometry: Geometry,
    /// Paint attributes.
    pub paint: Paint,
    /// Clip-reveal fraction in `0.0..=1.0`; `None` draws unclipped.
    pub reveal: Option<f64>,
}

impl Shape {
    /// Creates a shape with no reveal clip.
    #[must_use]
    pub fn new(geometry: Geometry, paint: Paint) -> Self {
        Self {
            geometry,
            paint,
            reveal: None,
        }
    }

    /// Shorthand for a rectangle shape.
    #[must_use]
    pub fn rect(rect: Rect, paint: Paint) -> Self {
        Self::new(Geometry::Rect(rect), paint)
    }

    /// Shorthand for a circle shape.
    #[must_use]
    pub fn circle(center: Point, radius: f64, paint: Paint) -> Self {
        Self::new(Geometry::Circle(Circle::new(center, radius)), paint)
    }

    /// Returns the local-space bounding box including half the stroke width,
    /// or `None` when the extent is unknown (unmeasured text, empty path) or
    /// not finite.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Rect> {
        let half_stroke = if self.paint.stroke.is_some() {
            self.paint.line_width.max(0.0) * 0.5
        } else {
            0.0
        };
        let raw = match &self.geometry {
            Geometry::Rect(r) => r.abs().inflate(half_stroke, half_stroke),
            Geometry::Circle(c) => c.bounding_box().inflate(half_stroke, half_stroke),
            Geometry::Line(l) => {
                let half = self.paint.line_width.max(0.0) * 0.5;
                l.bounding_box().inflate(half, half)
            }
            Geometry::Path(p) => {
                if p.elements().is_empty() {
                    return None;
                }
                p.bounding_box().inflate(half_stroke, half_stroke)
            }
            Geometry::Text(t) => Rect::from_origin_size(t.origin, t.measured?),
            Geometry::Image(i) => i.rect.abs(),
        };
        raw.is_finite().then_some(raw)
    }

    /// Returns the clip rectangle for the current reveal fraction.
    ///
    /// The clip exposes the left `reveal` fraction of the bounding box.
    #[must_use]
    pub fn reveal_clip(&self) -> Option<Rect> {
        let fraction = self.reveal?.clamp(0.0, 1.0);
        let bounds = self.local_bounds()?;
        Some(Rect::new(
            bounds.x0,
            bounds.y0,
            bounds.x0 + bounds.width() * fraction,
            bounds.y1,
        ))
    }

    /// Tests whether `local` touches the painted shape.
    ///
    /// `rasterizer` is consulted for lines and paths only; passing `None`
    /// makes those shapes unhittable rather than failing.
    pub fn hit_test(&self, local: Point, rasterizer: Option<&mut dyn HitRasterizer>) -> bool {
        let paint = &self.paint;
        let half = paint.line_width.max(0.0) * 0.5;
        match &self.geometry {
            Geometry::Rect(r) => {
                let r = r.abs();
                let filled = paint.fill.is_some() && contains_inclusive(r, local);
                let stroked = paint.stroke.is_some()
                    && contains_inclusive(r.inflate(half, half), local)
                    && !contains_exclusive(r.inflate(-half, -half), local);
                filled || stroked
            }
            Geometry::Circle(c) => {
                let d = local.distance(c.center);
                let filled = paint.fill.is_some() && d <= c.radius;
                let stroked = paint.stroke.is_some() && (d - c.radius).abs() <= half;
                filled || stroked
            }
            Geometry::Line(l) => match rasterizer {
                Some(r) => r.stroke_contains(&l.to_path(PATH_TOLERANCE), paint.line_width, local),
                None => false,
            },
            Geometry::Path(p) => match rasterizer {
                Some(r) => {
                    (paint.fill.is_some() && r.fill_contains(p, paint.fill_rule, local))
                        || (paint.stroke.is_some() && r.stroke_contains(p, paint.line_width, local))
                }
                None => false,
            },
            Geometry::Text(_) => self
                .local_bounds()
                .is_some_and(|b| contains_inclusive(b, local)),
            Geometry::Image(i) => {
                i.state == ImageState::Ready && contains_inclusive(i.rect.abs(), local)
            }
        }
    }
}

fn contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

fn contains_exclusive(r: Rect, p: Point) -> bool {
    p.x > r.x0 && p.x < r.x1 && p.y > r.y0 && p.y < r.y1
}
