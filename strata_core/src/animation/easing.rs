// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves.

use core::fmt;
use core::str::FromStr;

use crate::error::SceneError;

/// A monotone easing curve mapping `0.0..=1.0` onto itself.
///
/// Every curve satisfies `apply(0) == 0`, `apply(1) == 1`, and never
/// overshoots, so interpolated values stay between their endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// Cubic acceleration.
    EaseIn,
    /// Cubic deceleration.
    EaseOut,
    /// Cubic acceleration then deceleration.
    EaseInOut,
    /// Quadratic acceleration.
    QuadIn,
    /// Quadratic deceleration.
    QuadOut,
    /// Quadratic acceleration then deceleration.
    QuadInOut,
}

impl Easing {
    /// Every curve, in id order.
    pub const ALL: [Self; 7] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::QuadIn,
        Self::QuadOut,
        Self::QuadInOut,
    ];

    /// The string id of this curve.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::QuadIn => "quad-in",
            Self::QuadOut => "quad-out",
            Self::QuadInOut => "quad-in-out",
        }
    }

    /// Evaluates the curve at `t`, clamping `t` to `0.0..=1.0` first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Easing {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.id() == s)
            .ok_or_else(|| SceneError::UnknownEasing(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in Easing::ALL {
            assert_eq!(e.apply(0.0), 0.0, "{e} at 0");
            assert_eq!(e.apply(1.0), 1.0, "{e} at 1");
        }
    }

    #[test]
    fn curves_are_monotone_without_overshoot() {
        for e in Easing::ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = e.apply(f64::from(i) / 100.0);
                assert!(v >= prev - 1e-12, "{e} decreases at step {i}");
                assert!((0.0..=1.0).contains(&v), "{e} leaves the unit range");
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::QuadIn.apply(2.0), 1.0);
        assert_eq!(Easing::EaseOut.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(f64::NAN), 0.0);
    }

    #[test]
    fn ids_parse() {
        assert_eq!("ease-in-out".parse::<Easing>(), Ok(Easing::EaseInOut));
        assert_eq!(
            "bounce".parse::<Easing>(),
            Err(SceneError::UnknownEasing("bounce".into()))
        );
    }
}
