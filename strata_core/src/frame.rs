// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalesced redraw scheduling over a host "next paint" primitive.
//!
//! The host implements [`FrameHost`] (the web backend's `RafHost` wraps
//! `requestAnimationFrame`). Anything that changes the scene calls
//! [`RedrawScheduler::request`]; at most one frame callback is pending at a
//! time. When the callback arrives the host passes it to
//! [`RedrawScheduler::on_frame`], which runs one frame:
//!
//! ```text
//! Animate ─► tick_animations(now)
//! Update  ─► update pass + queue rebuilds (only if something changed)
//! Draw    ─► replay refreshed layers
//! re-arm  ─► while animations remain or the scene is still dirty
//! ```

use crate::scene::{DrawReport, PendingDraw, Scene};
#[cfg(feature = "trace-rich")]
use crate::trace::LayerDrawEvent;
use crate::time::HostTime;
use crate::trace::{FrameSummaryBuilder, FrameTickEvent, PhaseEdge, PhaseEvent, PhaseKind, Tracer};

/// The host's frame primitive.
pub trait FrameHost {
    /// Asks for one frame callback before the next paint.
    fn request_frame(&mut self);

    /// The current host time.
    fn now(&self) -> HostTime;
}

/// One frame callback as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Host time of the callback.
    pub now: HostTime,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Coalesces redraw requests into at most one pending frame callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    /// Creates a scheduler with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Arms a frame callback unless one is already pending.
    ///
    /// Returns whether the host was asked for a frame.
    pub fn request(&mut self, host: &mut dyn FrameHost) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        host.request_frame();
        true
    }

    /// Whether a frame callback is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Runs one frame and re-arms if more frames are needed.
    ///
    /// Returns whether another frame was requested.
    pub fn on_frame(
        &mut self,
        scene: &mut Scene,
        tick: &FrameTick,
        host: &mut dyn FrameHost,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        self.pending = false;
        let tick_event = FrameTickEvent::from(tick);
        tracer.frame_tick(&tick_event);
        let mut summary = FrameSummaryBuilder::new(&tick_event);
        let frame_index = tick.frame_index;

        let mut phase = |phase: PhaseKind, edge: PhaseEdge| {
            let event = PhaseEvent {
                frame_index,
                phase,
                edge,
                timestamp: host.now(),
            };
            summary.record(&event);
            tracer.phase(&event);
        };

        phase(PhaseKind::Animate, PhaseEdge::Begin);
        let animating = scene.tick_animations(tick.now);
        phase(PhaseKind::Animate, PhaseEdge::End);

        phase(PhaseKind::Update, PhaseEdge::Begin);
        let needs_redraw = scene.needs_redraw();
        let pending = if needs_redraw {
            scene.prepare_draw()
        } else {
            PendingDraw::default()
        };
        phase(PhaseKind::Update, PhaseEdge::End);

        phase(PhaseKind::Draw, PhaseEdge::Begin);
        let report = if needs_redraw {
            scene.paint(pending)
        } else {
            DrawReport::default()
        };
        phase(PhaseKind::Draw, PhaseEdge::End);

        #[cfg(feature = "trace-rich")]
        trace_layers(tracer, frame_index, &report);

        let rearm = animating || scene.needs_redraw();
        if rearm {
            self.request(host);
        }

        summary.set_layers_drawn(u32::try_from(report.layers.len()).unwrap_or(u32::MAX));
        summary.set_outcome(animating, rearm);
        tracer.frame_summary(&summary.finish());
        rearm
    }
}

#[cfg(feature = "trace-rich")]
fn trace_layers(tracer: &mut Tracer<'_>, frame_index: u64, report: &DrawReport) {
    let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    for layer in &report.layers {
        tracer.layer_draw(&LayerDrawEvent {
            frame_index,
            layer_index: layer.node.index(),
            priority: layer.priority,
            queued: count(layer.stats.queued),
            drawn: count(layer.stats.drawn),
            culled: count(layer.stats.culled),
            rebuilt: layer.stats.rebuilt,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use core::cell::Cell;

    use kurbo::{Rect, Size};

    use super::*;
    use crate::animation::{Animation, Property, Timing};
    use crate::backend::{CommandLog, RecordingBackend};
    use crate::layer::LayerOptions;
    use crate::node::NodeId;
    use crate::paint::Paint;
    use crate::shape::Shape;
    use crate::time::Duration;

    #[derive(Default)]
    struct ManualHost {
        requests: u32,
        clock: Cell<u64>,
    }

    impl FrameHost for ManualHost {
        fn request_frame(&mut self) {
            self.requests += 1;
        }

        fn now(&self) -> HostTime {
            let t = self.clock.get();
            self.clock.set(t + 1);
            HostTime(t)
        }
    }

    fn scene() -> (Scene, NodeId, CommandLog) {
        let mut scene = Scene::new(Box::new(RecordingBackend::default()));
        let backend = RecordingBackend::new(Size::new(100.0, 100.0));
        let log = backend.log();
        let layer = scene
            .add_layer(None, LayerOptions::default(), Box::new(backend))
            .unwrap();
        let item = scene.tree_mut().create_drawable(
            None,
            Shape::rect(Rect::new(0.0, 0.0, 10.0, 10.0), Paint::default()),
        );
        scene.tree_mut().insert(layer, item).unwrap();
        (scene, item, log)
    }

    fn tick(now: u64, frame_index: u64) -> FrameTick {
        FrameTick {
            now: HostTime(now),
            frame_index,
        }
    }

    #[test]
    fn requests_are_coalesced() {
        let mut host = ManualHost::default();
        let mut scheduler = RedrawScheduler::new();
        assert!(scheduler.request(&mut host));
        assert!(!scheduler.request(&mut host));
        assert!(scheduler.is_pending());
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn idle_frames_do_not_rearm() {
        let (mut scene, _item, log) = scene();
        let mut host = ManualHost::default();
        let mut scheduler = RedrawScheduler::new();
        scheduler.request(&mut host);

        let rearmed = scheduler.on_frame(&mut scene, &tick(0, 0), &mut host, &mut Tracer::none());
        assert!(!rearmed);
        assert!(!scheduler.is_pending());
        assert_eq!(log.primitive_count(), 1, "dirty scene was drawn");
        log.take();

        scheduler.on_frame(&mut scene, &tick(16, 1), &mut host, &mut Tracer::none());
        assert!(log.is_empty(), "clean scene is not redrawn");
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn animations_keep_the_loop_alive_until_they_end() {
        let (mut scene, item, log) = scene();
        scene.animate(
            item,
            Animation::new(Timing::new(Duration(20))).with_track(Property::X, 0.0, 40.0),
        );
        let mut host = ManualHost::default();
        let mut scheduler = RedrawScheduler::new();
        scheduler.request(&mut host);

        let mut frames = 0;
        let mut now = 0;
        while scheduler.is_pending() {
            scheduler.on_frame(&mut scene, &tick(now, frames), &mut host, &mut Tracer::none());
            frames += 1;
            now += 10;
            assert!(frames < 10, "loop must stop");
        }
        // 0, 10, 20 run; 30 is Last; 40 ends.
        assert_eq!(frames, 5);
        assert_eq!(
            scene.tree().local_transform(item).translation.x,
            40.0,
            "exact end value"
        );
        assert!(log.primitive_count() >= 4);
        assert!(!scene.is_animating());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn phases_are_traced_in_order() {
        use alloc::vec::Vec;

        use crate::trace::{FrameSummary, TraceSink};

        #[derive(Default)]
        struct Phases {
            seen: Vec<(PhaseKind, PhaseEdge)>,
            summary: Option<FrameSummary>,
        }

        impl TraceSink for Phases {
            fn on_phase(&mut self, e: &PhaseEvent) {
                self.seen.push((e.phase, e.edge));
            }
            fn on_frame_summary(&mut self, s: &FrameSummary) {
                self.summary = Some(*s);
            }
        }

        let (mut scene, _item, _log) = scene();
        let mut host = ManualHost::default();
        let mut sink = Phases::default();
        RedrawScheduler::new().on_frame(
            &mut scene,
            &tick(0, 7),
            &mut host,
            &mut Tracer::new(&mut sink),
        );
        assert_eq!(
            sink.seen,
            [
                (PhaseKind::Animate, PhaseEdge::Begin),
                (PhaseKind::Animate, PhaseEdge::End),
                (PhaseKind::Update, PhaseEdge::Begin),
                (PhaseKind::Update, PhaseEdge::End),
                (PhaseKind::Draw, PhaseEdge::Begin),
                (PhaseKind::Draw, PhaseEdge::End),
            ]
        );
        let summary = sink.summary.unwrap();
        assert_eq!(summary.frame_index, 7);
        assert_eq!(summary.layers_drawn, 1);
        assert!(!summary.rearmed);
    }
}
