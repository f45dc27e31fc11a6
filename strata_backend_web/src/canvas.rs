// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas 2D render backend.
//!
//! [`CanvasBackend`] replays a layer's draw calls into a
//! `CanvasRenderingContext2d`. One canvas per layer; the page stacks the
//! canvases with CSS in layer priority order.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::TAU;

use kurbo::{Affine, BezPath, Circle, Line, PathEl, Point, Rect, Size};
use wasm_bindgen::JsCast as _;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement, HtmlImageElement};

use strata_core::backend::RenderBackend;
use strata_core::paint::{FillRule, Paint, Rgba};
use strata_core::resource::ResourceKey;
use strata_core::shape::{Image, Text};

const FONT_FAMILY: &str = "sans-serif";

/// A [`RenderBackend`] drawing into an `HtmlCanvasElement`.
pub struct CanvasBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    paint: Paint,
    transform: Affine,
    saved: Vec<(Paint, Affine)>,
    images: BTreeMap<ResourceKey, HtmlImageElement>,
    disposed: bool,
}

impl core::fmt::Debug for CanvasBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasBackend")
            .field("canvas", &"HtmlCanvasElement")
            .field("size", &self.size())
            .field("images", &self.images.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl CanvasBackend {
    /// Wraps `canvas`, or returns `None` if it has no 2D context.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            paint: Paint::default(),
            transform: Affine::IDENTITY,
            saved: Vec::new(),
            images: BTreeMap::new(),
            disposed: false,
        })
    }

    /// The wrapped canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Associates a loaded `<img>` with `key`.
    ///
    /// Call [`Scene::image_ready`](strata_core::scene::Scene::image_ready) for
    /// the drawables using `key` once the element has loaded.
    pub fn register_image(&mut self, key: ResourceKey, image: HtmlImageElement) {
        self.images.insert(key, image);
    }

    /// Forgets the image registered under `key`.
    pub fn unregister_image(&mut self, key: ResourceKey) -> Option<HtmlImageElement> {
        self.images.remove(&key)
    }

    /// Measures a text run with this canvas's font metrics.
    ///
    /// Store the result in [`Text::measured`] so the run gets a bounding box.
    #[must_use]
    pub fn measure_text(&self, text: &Text) -> Size {
        self.ctx.save();
        self.ctx.set_font(&font(text.font_size));
        let width = self
            .ctx
            .measure_text(&text.content)
            .map_or(0.0, |m| m.width());
        self.ctx.restore();
        Size::new(width, text.font_size)
    }

    fn fill_and_stroke(&self) {
        if self.paint.fill.is_some() {
            match self.paint.fill_rule {
                FillRule::NonZero => self.ctx.fill(),
                FillRule::EvenOdd => self
                    .ctx
                    .fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd),
            }
        }
        if self.paint.stroke.is_some() {
            self.ctx.stroke();
        }
    }

    fn apply_transform(&self) {
        let [a, b, c, d, e, f] = self.transform.as_coeffs();
        let _ = self.ctx.set_transform(a, b, c, d, e, f);
    }
}

impl RenderBackend for CanvasBackend {
    fn clear(&mut self) {
        self.ctx.save();
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
        self.ctx.restore();
    }

    fn save(&mut self) {
        self.saved.push((self.paint, self.transform));
        self.ctx.save();
    }

    fn restore(&mut self) {
        if let Some((paint, transform)) = self.saved.pop() {
            self.paint = paint;
            self.transform = transform;
        }
        self.ctx.restore();
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.apply_transform();
    }

    fn set_attributes(&mut self, paint: &Paint) {
        self.paint = *paint;
        if let Some(fill) = paint.fill {
            self.ctx.set_fill_style_str(&css_color(fill));
        }
        if let Some(stroke) = paint.stroke {
            self.ctx.set_stroke_style_str(&css_color(stroke));
        }
        self.ctx.set_line_width(paint.line_width);
        self.ctx.set_global_alpha(paint.opacity.clamp(0.0, 1.0));
    }

    fn clip(&mut self, rect: Rect) {
        // The clip rectangle is in surface space, not the current transform.
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.begin_path();
        self.ctx.rect(rect.x0, rect.y0, rect.width(), rect.height());
        self.ctx.clip();
        self.apply_transform();
    }

    fn draw_rect(&mut self, rect: Rect) {
        let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
        if self.paint.fill.is_some() {
            self.ctx.fill_rect(x, y, w, h);
        }
        if self.paint.stroke.is_some() {
            self.ctx.stroke_rect(x, y, w, h);
        }
    }

    fn draw_circle(&mut self, circle: Circle) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(circle.center.x, circle.center.y, circle.radius, 0.0, TAU);
        self.fill_and_stroke();
    }

    fn draw_line(&mut self, line: Line) {
        self.ctx.begin_path();
        self.ctx.move_to(line.p0.x, line.p0.y);
        self.ctx.line_to(line.p1.x, line.p1.y);
        self.ctx.stroke();
    }

    fn draw_text(&mut self, text: &Text) {
        self.ctx.set_font(&font(text.font_size));
        self.ctx.set_text_baseline("top");
        let (x, y) = (text.origin.x, text.origin.y);
        if self.paint.fill.is_some() {
            let _ = self.ctx.fill_text(&text.content, x, y);
        }
        if self.paint.stroke.is_some() {
            let _ = self.ctx.stroke_text(&text.content, x, y);
        }
    }

    fn draw_path(&mut self, path: &BezPath) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
        self.fill_and_stroke();
    }

    fn draw_image(&mut self, image: &Image) {
        let Some(element) = self.images.get(&image.source) else {
            return;
        };
        let r = image.rect;
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                element,
                r.x0,
                r.y0,
                r.width(),
                r.height(),
            );
    }

    fn resize(&mut self, size: Size) {
        self.canvas.set_width(pixels(size.width));
        self.canvas.set_height(pixels(size.height));
        // Resizing resets the context state.
        self.saved.clear();
        self.transform = Affine::IDENTITY;
    }

    fn size(&self) -> Size {
        Size::new(
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.images.clear();
        self.canvas.remove();
    }

    fn client_to_local(&self, client: Point) -> Point {
        let bounds = self.canvas.get_bounding_client_rect();
        let size = self.size();
        // CSS size and backing-store size may differ.
        let sx = if bounds.width() > 0.0 {
            size.width / bounds.width()
        } else {
            1.0
        };
        let sy = if bounds.height() > 0.0 {
            size.height / bounds.height()
        } else {
            1.0
        };
        Point::new(
            (client.x - bounds.left()) * sx,
            (client.y - bounds.top()) * sy,
        )
    }
}

fn font(size: f64) -> String {
    format!("{size}px {FONT_FAMILY}")
}

fn css_color(c: Rgba) -> String {
    let [r, g, b, _] = c.to_rgba8();
    format!("rgba({r}, {g}, {b}, {})", c.a.clamp(0.0, 1.0))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "clamped to the u32 range first"
)]
fn pixels(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
