// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format export.
//!
//! [`ChromeTraceSink`] collects trace events in memory and writes them as a
//! [Chrome Trace Event Format][format] JSON array, suitable for loading into
//! `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
//!
//! Frame phases become duration events (`B`/`E`) on thread 0; dispatches are
//! instant events on thread 1 so they read as a separate track.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::time::Timebase;
use strata_core::trace::{
    DispatchEvent, FrameSummary, FrameTickEvent, LayerDrawEvent, PhaseEdge, PhaseEvent, TraceSink,
};

const FRAME_TID: u32 = 0;
const INPUT_TID: u32 = 1;

/// Collects trace events as Chrome trace JSON objects.
#[derive(Debug)]
pub struct ChromeTraceSink {
    timebase: Timebase,
    events: Vec<Value>,
    // Layer events carry no timestamp of their own.
    last_ts: f64,
}

impl ChromeTraceSink {
    /// Creates an empty sink converting ticks with `timebase`.
    #[must_use]
    pub fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            events: Vec::new(),
            last_ts: 0.0,
        }
    }

    /// The events collected so far.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Drops every collected event.
    pub fn clear(&mut self) {
        self.events.clear();
        self.last_ts = 0.0;
    }

    /// Writes the collected events as one pretty-printed JSON array.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn ts(&mut self, ticks: u64) -> f64 {
        let ts = self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0;
        self.last_ts = ts;
        ts
    }
}

impl TraceSink for ChromeTraceSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let ts = self.ts(e.now.ticks());
        self.events.push(json!({
            "ph": "i",
            "name": "FrameTick",
            "cat": "Scheduler",
            "ts": ts,
            "pid": 0,
            "tid": FRAME_TID,
            "s": "g",
            "args": {
                "frame_index": e.frame_index,
            }
        }));
    }

    fn on_phase(&mut self, e: &PhaseEvent) {
        let ts = self.ts(e.timestamp.ticks());
        let ph = match e.edge {
            PhaseEdge::Begin => "B",
            PhaseEdge::End => "E",
        };
        self.events.push(json!({
            "ph": ph,
            "name": format!("{:?}", e.phase),
            "cat": "Frame",
            "ts": ts,
            "pid": 0,
            "tid": FRAME_TID,
            "args": {
                "frame_index": e.frame_index,
            }
        }));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let ts = self.ts(s.now.ticks());
        let us = |ticks: u64| self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0;
        let args = json!({
            "frame_index": s.frame_index,
            "animate_us": us(s.animate_ticks),
            "update_us": us(s.update_ticks),
            "draw_us": us(s.draw_ticks),
            "layers_drawn": s.layers_drawn,
            "animating": s.animating,
            "rearmed": s.rearmed,
        });
        self.events.push(json!({
            "ph": "i",
            "name": "FrameSummary",
            "cat": "Summary",
            "ts": ts,
            "pid": 0,
            "tid": FRAME_TID,
            "s": "g",
            "args": args,
        }));
    }

    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "LayerDraw",
            "cat": "Rich",
            "ts": self.last_ts,
            "pid": 0,
            "tid": FRAME_TID,
            "s": "t",
            "args": {
                "frame_index": e.frame_index,
                "layer": e.layer_index,
                "priority": e.priority,
                "queued": e.queued,
                "drawn": e.drawn,
                "culled": e.culled,
                "rebuilt": e.rebuilt,
            }
        }));
    }

    fn on_dispatch(&mut self, e: &DispatchEvent<'_>) {
        let ts = self.ts(e.timestamp.ticks());
        self.events.push(json!({
            "ph": "i",
            "name": e.kind,
            "cat": "Input",
            "ts": ts,
            "pid": 0,
            "tid": INPUT_TID,
            "s": "t",
            "args": {
                "target": e.target_index,
                "synthetic": e.synthetic,
            }
        }));
    }
}
