// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path hit testing.

use kurbo::{BezPath, PathEl, Point, Shape as _};

use crate::paint::FillRule;

/// Answers point-in-path questions for geometry without a closed-form test.
///
/// The scene owns at most one rasterizer. Implementations may keep scratch
/// buffers between calls, hence `&mut self`.
pub trait HitRasterizer {
    /// Whether `point` lies inside the filled interior of `path`.
    fn fill_contains(&mut self, path: &BezPath, rule: FillRule, point: Point) -> bool;

    /// Whether `point` lies within a stroke of `width` centred on `path`.
    fn stroke_contains(&mut self, path: &BezPath, width: f64, point: Point) -> bool;
}

/// Analytic [`HitRasterizer`]: winding numbers for fills, distance to the
/// flattened outline for strokes.
#[derive(Clone, Copy, Debug)]
pub struct VectorHitRasterizer {
    /// Flattening tolerance for curves, in local units.
    pub tolerance: f64,
}

impl Default for VectorHitRasterizer {
    fn default() -> Self {
        Self { tolerance: 0.25 }
    }
}

impl HitRasterizer for VectorHitRasterizer {
    fn fill_contains(&mut self, path: &BezPath, rule: FillRule, point: Point) -> bool {
        let winding = path.winding(point);
        match rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    fn stroke_contains(&mut self, path: &BezPath, width: f64, point: Point) -> bool {
        let half = width.max(0.0) * 0.5;
        let limit = half * half;
        let mut hit = false;
        let mut start = Point::ZERO;
        let mut last = Point::ZERO;
        kurbo::flatten(path.iter(), self.tolerance, |el| match el {
            PathEl::MoveTo(p) => {
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                hit |= segment_distance_sq(last, p, point) <= limit;
                last = p;
            }
            PathEl::ClosePath => {
                hit |= segment_distance_sq(last, start, point) <= limit;
                last = start;
            }
            // `flatten` only emits the three variants above.
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        hit
    }
}

fn segment_distance_sq(a: Point, b: Point, p: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (a + ab * t - p).hypot2()
}

#[cfg(test)]
mod tests {
    use kurbo::{Circle, Line, Rect};

    use super::*;

    #[test]
    fn nonzero_and_evenodd_differ_on_overlap() {
        let mut path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1);
        path.extend(Rect::new(2.0, 2.0, 8.0, 8.0).to_path(0.1));
        let mut r = VectorHitRasterizer::default();
        let p = Point::new(5.0, 5.0);
        assert!(r.fill_contains(&path, FillRule::NonZero, p));
        assert!(
            !r.fill_contains(&path, FillRule::EvenOdd, p),
            "doubly wound region is a hole under even-odd"
        );
    }

    #[test]
    fn stroke_respects_half_width() {
        let line = Line::new((0.0, 0.0), (100.0, 0.0)).to_path(0.1);
        let mut r = VectorHitRasterizer::default();
        assert!(r.stroke_contains(&line, 4.0, Point::new(50.0, 1.9)));
        assert!(!r.stroke_contains(&line, 4.0, Point::new(50.0, 2.1)));
        assert!(
            !r.stroke_contains(&line, 4.0, Point::new(103.0, 0.0)),
            "no caps past the endpoint"
        );
    }

    #[test]
    fn curved_stroke_is_flattened() {
        let ring = Circle::new((0.0, 0.0), 10.0).to_path(0.1);
        let mut r = VectorHitRasterizer::default();
        assert!(r.stroke_contains(&ring, 2.0, Point::new(0.0, 10.5)));
        assert!(!r.stroke_contains(&ring, 2.0, Point::new(0.0, 0.0)));
    }
}
