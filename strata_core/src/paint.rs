// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint attributes handed to [`RenderBackend::set_attributes`].
//!
//! [`RenderBackend::set_attributes`]: crate::backend::RenderBackend::set_attributes

use core::fmt;

/// A non-premultiplied RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from float components.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    /// Component-wise linear interpolation.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Returns 8-bit channels, rounding and clamping each component.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "components are clamped to 0..=255 before the cast"
    )]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        write!(f, "Rgba(#{r:02x}{g:02x}{b:02x}{a:02x})")
    }
}

/// Fill rule used for path fills and path hit testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd parity.
    EvenOdd,
}

/// Paint attributes of a drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Fill color; `None` disables filling (and fill hit testing).
    pub fill: Option<Rgba>,
    /// Stroke color; `None` disables stroking (and stroke hit testing).
    pub stroke: Option<Rgba>,
    /// Stroke width in local units.
    pub line_width: f64,
    /// Opacity multiplier applied to both fill and stroke.
    pub opacity: f64,
    /// Fill rule for paths.
    pub fill_rule: FillRule,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Some(Rgba::BLACK),
            stroke: None,
            line_width: 1.0,
            opacity: 1.0,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl Paint {
    /// A fill-only paint.
    #[must_use]
    pub fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// A stroke-only paint.
    #[must_use]
    pub fn stroke(color: Rgba, line_width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            line_width,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_midpoint() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-12, "red should be halfway");
        assert!((mid.a - 1.0).abs() < 1e-12, "alpha stays opaque");
    }

    #[test]
    fn rgba8_round_trip() {
        let c = Rgba::from_rgb8(0x12, 0x80, 0xff);
        assert_eq!(c.to_rgba8(), [0x12, 0x80, 0xff, 0xff]);
    }
}
