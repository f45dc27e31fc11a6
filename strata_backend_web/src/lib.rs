// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host for strata scenes.
//!
//! Three pieces connect a [`Scene`](strata_core::scene::Scene) to a page:
//!
//! - [`CanvasBackend`] paints one layer into one `<canvas>` with the 2D API.
//! - [`DomInputSource`] turns DOM pointer, click, and wheel events into
//!   [`RawInput`](strata_core::event::RawInput).
//! - [`RafHost`] schedules frames with `requestAnimationFrame`.
//!
//! ```text
//!   DOM event ─► DomInputSource ─► EventObserver::handle ─► RafHost::request_frame
//!   rAF        ─► RafHost        ─► RedrawScheduler::on_frame ─► CanvasBackend
//! ```
//!
//! Clock values are microseconds; pass [`timebase`] to the trace sinks.

#![no_std]

extern crate alloc;

mod canvas;
mod input;
mod raf;

pub use canvas::CanvasBackend;
pub use input::DomInputSource;
pub use raf::{RafFrame, RafHost};

use strata_core::time::{HostTime, Timebase};

/// `performance.now()` as a [`HostTime`].
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(raf::performance_now())
}

/// The tick unit of every [`HostTime`] this crate produces.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_millisecond_stamp_prints_as_a_millisecond() {
        let stamp = HostTime::from_millis_f64(2.0);
        assert_eq!(timebase().ticks_to_nanos(stamp.ticks()), 2_000_000);
    }
}
