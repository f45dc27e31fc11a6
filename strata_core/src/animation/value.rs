// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interpolated channel values.

use crate::paint::Rgba;

/// A value an animation channel interpolates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimValue {
    /// A number (position, angle, width, fraction, …).
    Scalar(f64),
    /// A color, interpolated per component.
    Color(Rgba),
}

impl AnimValue {
    /// Interpolates towards `to` at `t` in `0.0..=1.0`.
    ///
    /// Mismatched variants do not interpolate: the result is `self` until
    /// `t` reaches `1.0`, then `to`.
    #[must_use]
    pub fn lerp(self, to: Self, t: f64) -> Self {
        match (self, to) {
            (Self::Scalar(a), Self::Scalar(b)) => {
                if t >= 1.0 {
                    Self::Scalar(b)
                } else {
                    Self::Scalar(a + (b - a) * t)
                }
            }
            (Self::Color(a), Self::Color(b)) => {
                if t >= 1.0 {
                    Self::Color(b)
                } else {
                    Self::Color(a.lerp(b, t))
                }
            }
            _ if t >= 1.0 => to,
            _ => self,
        }
    }

    /// The scalar payload, if any.
    #[must_use]
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    /// The color payload, if any.
    #[must_use]
    pub fn as_color(self) -> Option<Rgba> {
        match self {
            Self::Color(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }
}

impl From<f64> for AnimValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Rgba> for AnimValue {
    fn from(c: Rgba) -> Self {
        Self::Color(c)
    }
}
