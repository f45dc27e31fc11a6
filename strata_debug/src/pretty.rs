// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line-oriented trace log.
//!
//! [`PrettyPrintSink`] prints one line per trace event, tagged with the event
//! family in brackets. Times are printed in microseconds after conversion
//! through the host [`Timebase`]. Write errors are ignored.

use std::fmt;
use std::io::{self, Write};

use strata_core::time::{HostTime, Timebase};
use strata_core::trace::{
    DispatchEvent, FrameSummary, FrameTickEvent, LayerDrawEvent, PhaseEdge, PhaseEvent, TraceSink,
};

/// A [`TraceSink`] that logs readable lines to any [`Write`].
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    out: W,
    timebase: Timebase,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Logs to standard error.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(io::stderr()), timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Logs to `out`.
    #[must_use]
    pub fn with_writer(out: W, timebase: Timebase) -> Self {
        Self { out, timebase }
    }

    /// Returns the writer, e.g. to inspect a `Vec<u8>` buffer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn us(&self, ticks: u64) -> Micros {
        Micros(self.timebase.ticks_to_nanos(ticks))
    }

    fn at(&self, t: HostTime) -> Micros {
        self.us(t.ticks())
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
        let _ = self.out.write_all(b"\n");
    }
}

/// Nanoseconds shown as microseconds with one decimal.
struct Micros(u64);

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}µs", self.0 / 1000, self.0 % 1000 / 100)
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let now = self.at(e.now);
        self.line(format_args!("[tick] frame={} now={now}", e.frame_index));
    }

    fn on_phase(&mut self, e: &PhaseEvent) {
        let edge = match e.edge {
            PhaseEdge::Begin => '>',
            PhaseEdge::End => '<',
        };
        let at = self.at(e.timestamp);
        self.line(format_args!(
            "[phase] frame={} {edge} {} @{at}",
            e.frame_index,
            e.phase.as_str(),
        ));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let (animate, update, draw) = (
            self.us(s.animate_ticks),
            self.us(s.update_ticks),
            self.us(s.draw_ticks),
        );
        let next = match (s.rearmed, s.animating) {
            (false, _) => "idle",
            (true, true) => "animating",
            (true, false) => "dirty",
        };
        self.line(format_args!(
            "[frame] #{} animate={animate} update={update} draw={draw} layers={} next={next}",
            s.frame_index, s.layers_drawn,
        ));
    }

    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        let queue = if e.rebuilt { "rebuilt" } else { "reused" };
        self.line(format_args!(
            "[layer] #{} node={} priority={} drawn={}/{} culled={} queue={queue}",
            e.frame_index, e.layer_index, e.priority, e.drawn, e.queued, e.culled,
        ));
    }

    fn on_dispatch(&mut self, e: &DispatchEvent<'_>) {
        let at = self.at(e.timestamp);
        let synthetic = if e.synthetic { " (synthetic)" } else { "" };
        self.line(format_args!(
            "[event] {} node={}{synthetic} @{at}",
            e.kind, e.target_index,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::trace::PhaseKind;

    fn lines(sink: PrettyPrintSink<Vec<u8>>) -> Vec<String> {
        String::from_utf8(sink.into_inner())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn micros_keep_one_decimal() {
        assert_eq!(Micros(1_234_567).to_string(), "1234.5µs");
        assert_eq!(Micros(999).to_string(), "0.9µs");
    }

    #[test]
    fn phase_edges_print_direction() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new(), Timebase::MICROS);
        for (edge, t) in [(PhaseEdge::Begin, 10), (PhaseEdge::End, 12)] {
            sink.on_phase(&PhaseEvent {
                frame_index: 2,
                phase: PhaseKind::Update,
                edge,
                timestamp: HostTime(t),
            });
        }
        assert_eq!(
            lines(sink),
            ["[phase] frame=2 > update @10.0µs", "[phase] frame=2 < update @12.0µs"]
        );
    }

    #[test]
    fn summary_names_why_the_loop_continues() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new(), Timebase::NANOS);
        let mut summary = FrameSummary {
            frame_index: 5,
            now: HostTime(0),
            animate_ticks: 1_500,
            update_ticks: 0,
            draw_ticks: 20_000,
            layers_drawn: 2,
            animating: true,
            rearmed: true,
        };
        sink.on_frame_summary(&summary);
        summary.animating = false;
        sink.on_frame_summary(&summary);
        summary.rearmed = false;
        sink.on_frame_summary(&summary);

        let out = lines(sink);
        assert_eq!(
            out[0],
            "[frame] #5 animate=1.5µs update=0.0µs draw=20.0µs layers=2 next=animating"
        );
        assert!(out[1].ends_with("next=dirty"), "got: {}", out[1]);
        assert!(out[2].ends_with("next=idle"), "got: {}", out[2]);
    }

    #[test]
    fn dispatch_and_layer_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new(), Timebase::NANOS);
        sink.on_dispatch(&DispatchEvent {
            kind: "pointerenter",
            target_index: 4,
            synthetic: true,
            timestamp: HostTime(0),
        });
        sink.on_layer_draw(&LayerDrawEvent {
            frame_index: 3,
            layer_index: 1,
            priority: 0,
            queued: 5,
            drawn: 3,
            culled: 2,
            rebuilt: true,
        });
        assert_eq!(
            lines(sink),
            [
                "[event] pointerenter node=4 (synthetic) @0.0µs",
                "[layer] #3 node=1 priority=0 drawn=3/5 culled=2 queue=rebuilt",
            ]
        );
    }
}
