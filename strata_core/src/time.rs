// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host clock values.
//!
//! The scene never reads a clock itself. Hosts pass [`HostTime`] stamps in
//! with frame ticks and raw inputs, and animation timing is written in the
//! same ticks, so the unit only matters when printing diagnostics. The web
//! backend counts microseconds; [`Timebase`] says how to turn a tick count
//! into nanoseconds.

use core::fmt;

/// A reading of the host's monotonic clock, in host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// The tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Microsecond ticks from a fractional millisecond stamp such as
    /// `performance.now()` or `Event.timeStamp`.
    ///
    /// Anything negative, NaN, or infinite becomes zero.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the float-to-int cast saturates and stamps are far below u64::MAX µs"
    )]
    pub fn from_millis_f64(ms: f64) -> Self {
        if !ms.is_finite() || ms <= 0.0 {
            return Self(0);
        }
        Self((ms * 1000.0) as u64)
    }

    /// Ticks elapsed since `earlier`; zero if `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// A span of host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// No time at all.
    pub const ZERO: Self = Self(0);

    /// The tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// `self - rhs`, stopping at zero.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// How far `self` gets through `whole`, as a ratio.
    ///
    /// An empty `whole` is already complete, so the result is `1.0`.
    #[must_use]
    pub fn fraction_of(self, whole: Self) -> f64 {
        match whole.0 {
            0 => 1.0,
            w => self.0 as f64 / w as f64,
        }
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

/// How many nanoseconds one host tick is worth, as `numer / denom`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Nanoseconds per `denom` ticks.
    pub numer: u32,
    /// Must be non-zero.
    pub denom: u32,
}

impl Timebase {
    /// One tick per nanosecond.
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// One tick per microsecond.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Nanoseconds in `ticks`, saturating at `u64::MAX`.
    #[must_use]
    pub fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let nanos = u128::from(ticks) * u128::from(self.numer) / u128::from(self.denom);
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}
