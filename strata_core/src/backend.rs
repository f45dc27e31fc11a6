// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render backend contract.
//!
//! Every layer owns exactly one [`RenderBackend`]: an independently buffered
//! surface with an immediate-mode 2D drawing API. The scene never inspects
//! pixels; it only issues the commands below in a fixed per-drawable order:
//!
//! ```text
//! save → [clip(reveal)] → set_transform(world) → set_attributes(paint)
//!      → draw_<primitive> → restore
//! ```
//!
//! The event layer's backend is never drawn into. It exists to answer
//! [`client_to_local`](RenderBackend::client_to_local), the mapping from host
//! client coordinates to surface-local coordinates.
//!
//! # Crate boundaries
//!
//! `strata_core` owns the contract and [`RecordingBackend`], a headless
//! implementation that records commands into a shared [`CommandLog`] for
//! tests and tooling. Platform crates
//! (e.g. `strata_backend_web`) provide real surfaces.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Size};

use crate::paint::Paint;
use crate::shape::{Image, Text};

/// An immediate-mode 2D surface owned by one layer.
pub trait RenderBackend {
    /// Erases the whole surface.
    fn clear(&mut self);

    /// Pushes the current transform, clip, and attributes.
    fn save(&mut self);

    /// Pops state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Replaces the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Replaces the current paint attributes.
    fn set_attributes(&mut self, paint: &Paint);

    /// Intersects the clip with `rect`, given in surface coordinates.
    fn clip(&mut self, rect: Rect);

    /// Draws an axis-aligned rectangle.
    fn draw_rect(&mut self, rect: Rect);

    /// Draws a circle.
    fn draw_circle(&mut self, circle: Circle);

    /// Strokes a line segment.
    fn draw_line(&mut self, line: Line);

    /// Draws a text run.
    fn draw_text(&mut self, text: &Text);

    /// Draws a path.
    fn draw_path(&mut self, path: &BezPath);

    /// Draws a loaded image.
    fn draw_image(&mut self, image: &Image);

    /// Resizes the surface.
    fn resize(&mut self, size: Size);

    /// Returns the current surface size.
    fn size(&self) -> Size;

    /// Releases the surface. No further calls follow.
    fn dispose(&mut self);

    /// Maps host client coordinates to surface-local coordinates.
    fn client_to_local(&self, client: Point) -> Point;
}

/// One recorded [`RenderBackend`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`RenderBackend::clear`].
    Clear,
    /// [`RenderBackend::save`].
    Save,
    /// [`RenderBackend::restore`].
    Restore,
    /// [`RenderBackend::set_transform`].
    SetTransform(Affine),
    /// [`RenderBackend::set_attributes`].
    SetAttributes(Paint),
    /// [`RenderBackend::clip`].
    Clip(Rect),
    /// [`RenderBackend::draw_rect`].
    Rect(Rect),
    /// [`RenderBackend::draw_circle`].
    Circle(Circle),
    /// [`RenderBackend::draw_line`].
    Line(Line),
    /// [`RenderBackend::draw_text`].
    Text(Text),
    /// [`RenderBackend::draw_path`].
    Path(BezPath),
    /// [`RenderBackend::draw_image`].
    Image(Image),
}

impl DrawCommand {
    /// Whether this command draws a primitive.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Rect(_)
                | Self::Circle(_)
                | Self::Line(_)
                | Self::Text(_)
                | Self::Path(_)
                | Self::Image(_)
        )
    }
}

/// Shared view of the commands a [`RecordingBackend`] has recorded.
///
/// The backend itself is usually boxed inside a layer; keeping a log handle
/// lets the host inspect what was drawn.
#[derive(Clone, Debug, Default)]
pub struct CommandLog(Rc<RefCell<Vec<DrawCommand>>>);

impl CommandLog {
    /// Drains recorded commands.
    #[must_use]
    pub fn take(&self) -> Vec<DrawCommand> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    /// Copies the recorded commands without draining them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DrawCommand> {
        self.0.borrow().clone()
    }

    /// Counts primitive draws.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.0.borrow().iter().filter(|c| c.is_primitive()).count()
    }

    /// Whether nothing has been recorded since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn push(&self, command: DrawCommand) {
        self.0.borrow_mut().push(command);
    }
}

/// A headless backend that records every call into a [`CommandLog`].
///
/// `origin` emulates where the surface sits in host client space, so
/// [`client_to_local`](RenderBackend::client_to_local) subtracts it.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    log: CommandLog,
    disposed: Rc<Cell<bool>>,
    /// Surface size.
    pub size: Size,
    /// Surface origin in client coordinates.
    pub origin: Point,
}

impl RecordingBackend {
    /// Creates a recorder for a surface of `size` at the client origin.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Returns a handle sharing this backend's log.
    #[must_use]
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Returns a flag that flips once the backend is disposed.
    #[must_use]
    pub fn disposed_flag(&self) -> Rc<Cell<bool>> {
        self.disposed.clone()
    }
}

impl RenderBackend for RecordingBackend {
    fn clear(&mut self) {
        self.log.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.log.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.log.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.log.push(DrawCommand::SetTransform(transform));
    }

    fn set_attributes(&mut self, paint: &Paint) {
        self.log.push(DrawCommand::SetAttributes(*paint));
    }

    fn clip(&mut self, rect: Rect) {
        self.log.push(DrawCommand::Clip(rect));
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.log.push(DrawCommand::Rect(rect));
    }

    fn draw_circle(&mut self, circle: Circle) {
        self.log.push(DrawCommand::Circle(circle));
    }

    fn draw_line(&mut self, line: Line) {
        self.log.push(DrawCommand::Line(line));
    }

    fn draw_text(&mut self, text: &Text) {
        self.log.push(DrawCommand::Text(text.clone()));
    }

    fn draw_path(&mut self, path: &BezPath) {
        self.log.push(DrawCommand::Path(path.clone()));
    }

    fn draw_image(&mut self, image: &Image) {
        self.log.push(DrawCommand::Image(*image));
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn dispose(&mut self) {
        self.disposed.set(true);
    }

    fn client_to_local(&self, client: Point) -> Point {
        client - self.origin.to_vec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_to_local_subtracts_origin() {
        let mut backend = RecordingBackend::new(Size::new(100.0, 100.0));
        backend.origin = Point::new(10.0, 20.0);
        assert_eq!(
            backend.client_to_local(Point::new(15.0, 25.0)),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn log_is_shared_with_the_backend() {
        let mut backend = RecordingBackend::default();
        let log = backend.log();
        backend.clear();
        backend.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(log.primitive_count(), 1);
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());

        let flag = backend.disposed_flag();
        backend.dispose();
        assert!(flag.get());
    }
}
