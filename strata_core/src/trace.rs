// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-loop and dispatch diagnostics.
//!
//! The scheduler and the dispatcher report what they do through a
//! [`Tracer`], which forwards to a caller-supplied [`TraceSink`]. Every sink
//! method has an empty default body.
//!
//! Without the `trace` feature a [`Tracer`] forwards nothing and the calls
//! optimize away. `trace-rich` adds per-layer draw statistics
//! ([`LayerDrawEvent`]) and per-delivery dispatch records ([`DispatchEvent`]).
//!
//! A frame reports, in order: one [`FrameTickEvent`], a begin/end
//! [`PhaseEvent`] pair for each [`PhaseKind`], then one [`FrameSummary`]
//! assembled by a [`FrameSummaryBuilder`].

use crate::frame::FrameTick;
use crate::time::HostTime;

/// A timed section of [`RedrawScheduler::on_frame`](crate::frame::RedrawScheduler::on_frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Animation ticking.
    Animate,
    /// World matrices, effective z, and draw-queue rebuilds.
    Update,
    /// Backend replay.
    Draw,
}

impl PhaseKind {
    /// All phases in the order a frame runs them.
    pub const ALL: [Self; 3] = [Self::Animate, Self::Update, Self::Draw];

    /// Lowercase name, as printed in trace output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Animate => "animate",
            Self::Update => "update",
            Self::Draw => "draw",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Whether a [`PhaseEvent`] opens or closes its phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEdge {
    /// The phase starts.
    Begin,
    /// The phase is over.
    End,
}

/// A host frame callback arrived.
#[derive(Clone, Copy, Debug)]
pub struct FrameTickEvent {
    /// Host frame counter.
    pub frame_index: u64,
    /// Time the host reported for the frame.
    pub now: HostTime,
}

impl From<&FrameTick> for FrameTickEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
        }
    }
}

/// One edge of a frame phase, stamped with [`FrameHost::now`](crate::frame::FrameHost::now).
#[derive(Clone, Copy, Debug)]
pub struct PhaseEvent {
    /// Host frame counter.
    pub frame_index: u64,
    /// The phase this edge belongs to.
    pub phase: PhaseKind,
    /// Opening or closing edge.
    pub edge: PhaseEdge,
    /// Host clock at the edge.
    pub timestamp: HostTime,
}

/// Totals for one frame.
///
/// Phase durations are in host ticks; a phase with a missing edge counts as
/// zero.
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Host frame counter.
    pub frame_index: u64,
    /// Time the host reported for the frame.
    pub now: HostTime,
    /// Length of [`PhaseKind::Animate`].
    pub animate_ticks: u64,
    /// Length of [`PhaseKind::Update`].
    pub update_ticks: u64,
    /// Length of [`PhaseKind::Draw`].
    pub draw_ticks: u64,
    /// Layers whose backend was repainted.
    pub layers_drawn: u32,
    /// Some animation was still running after the animate phase.
    pub animating: bool,
    /// The scheduler asked the host for another frame.
    pub rearmed: bool,
}

/// Draw statistics for one repainted layer.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LayerDrawEvent {
    /// Host frame counter.
    pub frame_index: u64,
    /// Slot index of the layer's root node.
    pub layer_index: u32,
    /// Stacking priority of the layer.
    pub priority: i32,
    /// Queue length before culling.
    pub queued: u32,
    /// Items handed to the backend.
    pub drawn: u32,
    /// Items outside the camera rectangle.
    pub culled: u32,
    /// The queue was rebuilt this frame rather than reused.
    pub rebuilt: bool,
}

/// One listener invocation round on one node.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct DispatchEvent<'a> {
    /// Event kind, e.g. `"click"`.
    pub kind: &'a str,
    /// Slot index of the node the event was delivered to.
    pub target_index: u32,
    /// Produced by hover tracking rather than by a native input.
    pub synthetic: bool,
    /// Timestamp carried by the event.
    pub timestamp: HostTime,
}

/// Receiver for diagnostics.
pub trait TraceSink {
    /// A frame callback started.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// A phase began or ended.
    fn on_phase(&mut self, e: &PhaseEvent) {
        _ = e;
    }

    /// The frame finished.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// A layer was repainted.
    #[cfg(feature = "trace-rich")]
    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        _ = e;
    }

    /// Listeners on one node were run.
    #[cfg(feature = "trace-rich")]
    fn on_dispatch(&mut self, e: &DispatchEvent<'_>) {
        _ = e;
    }
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Borrowed handle to an optional [`TraceSink`].
///
/// Pass [`Tracer::none`] when nobody is listening.
pub struct Tracer<'a> {
    sink: Option<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl<'a> Tracer<'a> {
    /// Forwards to `sink` when the `trace` feature is on.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// Forwards nowhere.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self { sink: None }
    }

    /// Whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "trace") && self.sink.is_some()
    }

    #[inline]
    fn emit(&mut self, f: impl FnOnce(&mut (dyn TraceSink + 'a))) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            f(sink);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = f;
        }
    }

    /// Reports a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        self.emit(|sink| sink.on_frame_tick(e));
    }

    /// Reports a [`PhaseEvent`].
    #[inline]
    pub fn phase(&mut self, e: &PhaseEvent) {
        self.emit(|sink| sink.on_phase(e));
    }

    /// Reports a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        self.emit(|sink| sink.on_frame_summary(s));
    }

    /// Reports a [`LayerDrawEvent`].
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_draw(&mut self, e: &LayerDrawEvent) {
        self.emit(|sink| sink.on_layer_draw(e));
    }

    /// Reports a [`DispatchEvent`].
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn dispatch(&mut self, e: &DispatchEvent<'_>) {
        self.emit(|sink| sink.on_dispatch(e));
    }
}

/// Accumulates a frame's phase edges and outcome into a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    frame_index: u64,
    now: HostTime,
    spans: [(Option<HostTime>, Option<HostTime>); 3],
    layers_drawn: u32,
    animating: bool,
    rearmed: bool,
}

impl FrameSummaryBuilder {
    /// Starts an empty summary for `tick`.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            spans: [(None, None); 3],
            layers_drawn: 0,
            animating: false,
            rearmed: false,
        }
    }

    /// Notes the timestamp of a phase edge. A repeated edge overwrites.
    pub fn record(&mut self, e: &PhaseEvent) {
        let span = &mut self.spans[e.phase.slot()];
        match e.edge {
            PhaseEdge::Begin => span.0 = Some(e.timestamp),
            PhaseEdge::End => span.1 = Some(e.timestamp),
        }
    }

    /// Sets [`FrameSummary::layers_drawn`].
    pub fn set_layers_drawn(&mut self, count: u32) {
        self.layers_drawn = count;
    }

    /// Sets [`FrameSummary::animating`] and [`FrameSummary::rearmed`].
    pub fn set_outcome(&mut self, animating: bool, rearmed: bool) {
        self.animating = animating;
        self.rearmed = rearmed;
    }

    /// Computes phase lengths and returns the summary.
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        let [animate_ticks, update_ticks, draw_ticks] =
            PhaseKind::ALL.map(|phase| self.elapsed(phase));
        FrameSummary {
            frame_index: self.frame_index,
            now: self.now,
            animate_ticks,
            update_ticks,
            draw_ticks,
            layers_drawn: self.layers_drawn,
            animating: self.animating,
            rearmed: self.rearmed,
        }
    }

    fn elapsed(&self, phase: PhaseKind) -> u64 {
        match self.spans[phase.slot()] {
            (Some(begin), Some(end)) => end.saturating_duration_since(begin).ticks(),
            _ => 0,
        }
    }
}
