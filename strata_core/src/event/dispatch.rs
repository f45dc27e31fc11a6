// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration and capture → target → bubble dispatch.

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use core::cell::RefCell;

use super::kind::{EventKind, RawKind};
use super::registry::{Entry, Handler, ListenerId};
use super::simulated::{Phase, SimulatedEvent};
use crate::node::NodeId;
use crate::scene::Scene;
#[cfg(feature = "trace-rich")]
use crate::trace::DispatchEvent;
use crate::trace::Tracer;

/// How far a flow travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Delivery {
    /// Capture, target, bubble.
    Full,
    /// Capture and target.
    NoBubble,
    /// Target only.
    TargetOnly,
}

impl Scene {
    /// Registers a listener for `kind` on `node`.
    ///
    /// Capture listeners run on the way down to a descendant target; plain
    /// listeners run at the target and on the way back up. The node's
    /// registry is allocated on first use.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale.
    pub fn on(
        &mut self,
        node: NodeId,
        kind: impl Into<EventKind>,
        capture: bool,
        handler: impl FnMut(&mut Self, &mut SimulatedEvent) + 'static,
    ) -> ListenerId {
        self.listen(node, kind.into(), capture, false, Rc::new(RefCell::new(handler)))
    }

    /// Like [`on`](Self::on), but the listener is removed right before its
    /// first invocation.
    pub fn once(
        &mut self,
        node: NodeId,
        kind: impl Into<EventKind>,
        capture: bool,
        handler: impl FnMut(&mut Self, &mut SimulatedEvent) + 'static,
    ) -> ListenerId {
        self.listen(node, kind.into(), capture, true, Rc::new(RefCell::new(handler)))
    }

    fn listen(
        &mut self,
        node: NodeId,
        kind: EventKind,
        capture: bool,
        once: bool,
        handler: Handler,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.tree
            .listeners_or_default(node)
            .add(kind, capture, Entry { id, handler, once });
        id
    }

    /// Removes a listener. Returns `false` if it was not registered on `node`.
    pub fn off(&mut self, node: NodeId, id: ListenerId) -> bool {
        self.tree.validate(node);
        self.tree
            .listeners_mut(node)
            .is_some_and(|registry| registry.remove(id))
    }

    /// Routes `event` through the tree: capture listeners of the target's
    /// ancestors from the root down, then the target's listeners, then plain
    /// listeners of the ancestors from the parent up.
    ///
    /// The bubble walk is skipped if propagation was stopped before it.
    /// Nothing happens if the target has been disposed.
    pub fn flow(&mut self, event: &mut SimulatedEvent) {
        self.flow_with(event, Delivery::Full);
    }

    fn flow_with(&mut self, event: &mut SimulatedEvent, delivery: Delivery) {
        if !self.tree.is_alive(event.target) {
            return;
        }
        if event.path().is_empty() {
            *event.path_mut() = self.tree.ancestor_path(event.target);
        }
        let path = event.path().to_vec();
        let Some((&target, ancestors)) = path.split_last() else {
            return;
        };

        if delivery != Delivery::TargetOnly {
            event.phase = Phase::Capture;
            for &node in ancestors {
                self.invoke(node, event, true);
            }
        }

        event.phase = Phase::Target;
        self.invoke(target, event, false);

        if delivery == Delivery::Full && !event.propagation_stopped() {
            event.phase = Phase::Bubble;
            for &node in ancestors.iter().rev() {
                self.invoke(node, event, false);
            }
        }

        event.phase = Phase::None;
        event.current_target = event.target;
    }

    /// Runs the listeners of one phase on one node.
    ///
    /// Works from a snapshot, so listeners added meanwhile wait for the next
    /// event and listeners removed meanwhile are skipped. A handler that is
    /// already running further up the stack is not re-entered.
    fn invoke(&mut self, node: NodeId, event: &mut SimulatedEvent, capture: bool) {
        let Some(registry) = self
            .tree
            .is_alive(node)
            .then(|| self.tree.listeners(node))
            .flatten()
        else {
            return;
        };
        let entries = registry.snapshot(&event.kind, capture);
        event.current_target = node;

        for entry in entries {
            if !self.tree.is_alive(node) {
                return;
            }
            let Some(registry) = self.tree.listeners_mut(node) else {
                return;
            };
            if !registry.contains(entry.id) {
                continue;
            }
            let Ok(mut handler) = entry.handler.try_borrow_mut() else {
                continue;
            };
            if entry.once {
                registry.remove(entry.id);
            }
            (&mut *handler)(self, event);
        }
    }

    /// Dispatches an event, synthesizing pointer transitions first.
    pub fn dispatch(&mut self, event: &mut SimulatedEvent) {
        self.dispatch_traced(event, &mut Tracer::none());
    }

    /// [`dispatch`](Self::dispatch) with instrumentation.
    ///
    /// For a genuine `pointermove` whose target differs from the previous
    /// genuine target, `pointerout` (no bubble) and `pointerleave` (target
    /// only) fire at the previous target, then `pointerover` (bubbles) and
    /// `pointerenter` (target only) at the new one, before the move itself.
    /// A disposed previous target counts as absent. Every genuine event
    /// records its target as the previous target afterwards.
    pub fn dispatch_traced(&mut self, event: &mut SimulatedEvent, tracer: &mut Tracer<'_>) {
        if event.genuine && event.kind == EventKind::POINTER_MOVE {
            let last = self.last_target.filter(|&n| self.tree.is_alive(n));
            let next = event.target;
            if last != Some(next) {
                if let Some(last) = last {
                    self.synthesize(event, EventKind::POINTER_OUT, last, Delivery::NoBubble, tracer);
                    self.synthesize(event, EventKind::POINTER_LEAVE, last, Delivery::TargetOnly, tracer);
                }
                self.synthesize(event, EventKind::POINTER_OVER, next, Delivery::Full, tracer);
                self.synthesize(event, EventKind::POINTER_ENTER, next, Delivery::TargetOnly, tracer);
            }
        }

        trace_dispatch(tracer, event);
        self.flow_with(event, Delivery::Full);
        if event.genuine {
            self.last_target = Some(event.target);
        }
    }

    fn synthesize(
        &mut self,
        source: &SimulatedEvent,
        kind: EventKind,
        target: NodeId,
        delivery: Delivery,
        tracer: &mut Tracer<'_>,
    ) {
        let mut event = source.derive(kind, target);
        trace_dispatch(tracer, &event);
        self.flow_with(&mut event, delivery);
    }

    /// The target of the last genuine event, if still alive.
    #[must_use]
    pub fn last_target(&self) -> Option<NodeId> {
        self.last_target.filter(|&n| self.tree.is_alive(n))
    }

    /// The raw inputs that registered listeners need bound.
    #[must_use]
    pub fn wanted_raw_kinds(&self) -> BTreeSet<RawKind> {
        self.tree
            .listener_slots()
            .flat_map(|registry| registry.kinds())
            .filter_map(RawKind::for_listener)
            .collect()
    }
}

#[cfg(feature = "trace-rich")]
fn trace_dispatch(tracer: &mut Tracer<'_>, event: &SimulatedEvent) {
    tracer.dispatch(&DispatchEvent {
        kind: event.kind.as_str(),
        target_index: event.target.index(),
        synthetic: !event.genuine,
        timestamp: event.timestamp,
    });
}

#[cfg(not(feature = "trace-rich"))]
fn trace_dispatch(tracer: &mut Tracer<'_>, event: &SimulatedEvent) {
    _ = (tracer, event);
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use kurbo::{Rect, Size};

    use super::*;
    use crate::backend::RecordingBackend;
    use crate::layer::LayerOptions;
    use crate::paint::Paint;
    use crate::shape::Shape;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Fixture {
        scene: Scene,
        mid: NodeId,
        a: NodeId,
        b: NodeId,
        log: Log,
    }

    /// root → layer → mid → {a, b}
    fn fixture() -> Fixture {
        let mut scene = Scene::new(Box::new(RecordingBackend::new(Size::new(100.0, 100.0))));
        let layer = scene
            .add_layer(Some("main"), LayerOptions::default(), Box::new(RecordingBackend::default()))
            .unwrap();
        let tree = scene.tree_mut();
        let mid = tree.create_group(Some("mid"));
        let shape = Shape::rect(Rect::new(0.0, 0.0, 10.0, 10.0), Paint::default());
        let a = tree.create_drawable(Some("a"), shape.clone());
        let b = tree.create_drawable(Some("b"), shape);
        tree.insert(layer, mid).unwrap();
        tree.insert(mid, a).unwrap();
        tree.insert(mid, b).unwrap();
        Fixture {
            scene,
            mid,
            a,
            b,
            log: Log::default(),
        }
    }

    fn record(
        scene: &mut Scene,
        node: NodeId,
        kind: EventKind,
        capture: bool,
        label: &'static str,
        log: &Log,
    ) -> ListenerId {
        let log = log.clone();
        scene.on(node, kind, capture, move |_, ev| {
            log.borrow_mut().push(format!("{}@{label}", ev.kind));
        })
    }

    fn phases(scene: &mut Scene, node: NodeId, label: &'static str, log: &Log) {
        for capture in [true, false] {
            let log = log.clone();
            scene.on(node, EventKind::CLICK, capture, move |_, ev| {
                log.borrow_mut().push(format!("{:?}-{label}", ev.phase));
            });
        }
    }

    fn pointer_move(target: NodeId) -> SimulatedEvent {
        let mut ev = SimulatedEvent::new(EventKind::POINTER_MOVE, target);
        ev.genuine = true;
        ev
    }

    #[test]
    fn phases_run_in_order() {
        let Fixture {
            mut scene,
            mid,
            a,
            log,
            ..
        } = fixture();
        let root = scene.root();
        phases(&mut scene, root, "root", &log);
        phases(&mut scene, mid, "mid", &log);
        phases(&mut scene, a, "target", &log);

        let mut ev = SimulatedEvent::new(EventKind::CLICK, a);
        scene.dispatch(&mut ev);
        assert_eq!(
            *log.borrow(),
            [
                "Capture-root",
                "Capture-mid",
                "Target-target",
                "Bubble-mid",
                "Bubble-root"
            ],
            "capture listeners on the target itself stay silent"
        );
        assert_eq!(ev.phase, Phase::None);
        assert_eq!(ev.path().len(), 4, "root, layer, mid, target");
    }

    #[test]
    fn stop_at_target_suppresses_bubble_only() {
        let Fixture {
            mut scene,
            mid,
            a,
            log,
            ..
        } = fixture();
        let root = scene.root();
        phases(&mut scene, root, "root", &log);
        phases(&mut scene, mid, "mid", &log);
        scene.on(a, EventKind::CLICK, false, |_, ev| ev.stop_propagation());

        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!(*log.borrow(), ["Capture-root", "Capture-mid"]);
    }

    #[test]
    fn stop_during_capture_still_reaches_the_target() {
        let Fixture {
            mut scene,
            mid,
            a,
            log,
            ..
        } = fixture();
        scene.on(mid, EventKind::CLICK, true, |_, ev| ev.stop_propagation());
        phases(&mut scene, a, "target", &log);
        phases(&mut scene, mid, "mid", &log);

        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!(*log.borrow(), ["Capture-mid", "Target-target"]);
    }

    #[test]
    fn moving_between_targets_synthesizes_transitions() {
        let Fixture {
            mut scene,
            a,
            b,
            log,
            ..
        } = fixture();
        for (node, label) in [(a, "A"), (b, "B")] {
            for kind in [
                EventKind::POINTER_OUT,
                EventKind::POINTER_LEAVE,
                EventKind::POINTER_OVER,
                EventKind::POINTER_ENTER,
                EventKind::POINTER_MOVE,
            ] {
                record(&mut scene, node, kind, false, label, &log);
            }
        }

        scene.dispatch(&mut pointer_move(a));
        assert_eq!(
            *log.borrow(),
            ["pointerover@A", "pointerenter@A", "pointermove@A"]
        );
        log.borrow_mut().clear();

        scene.dispatch(&mut pointer_move(b));
        assert_eq!(
            *log.borrow(),
            [
                "pointerout@A",
                "pointerleave@A",
                "pointerover@B",
                "pointerenter@B",
                "pointermove@B"
            ]
        );
        log.borrow_mut().clear();

        scene.dispatch(&mut pointer_move(b));
        assert_eq!(*log.borrow(), ["pointermove@B"]);
        assert_eq!(scene.last_target(), Some(b));
    }

    #[test]
    fn over_bubbles_but_enter_does_not() {
        let Fixture {
            mut scene,
            mid,
            b,
            log,
            ..
        } = fixture();
        record(&mut scene, mid, EventKind::POINTER_OVER, false, "mid", &log);
        record(&mut scene, mid, EventKind::POINTER_ENTER, false, "mid", &log);

        scene.dispatch(&mut pointer_move(b));
        assert_eq!(*log.borrow(), ["pointerover@mid"]);
    }

    #[test]
    fn synthetic_events_are_not_genuine() {
        let Fixture { mut scene, a, .. } = fixture();
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        scene.on(a, EventKind::POINTER_ENTER, false, move |_, ev| {
            sink.set(Some(ev.genuine));
        });
        scene.dispatch(&mut pointer_move(a));
        assert_eq!(seen.get(), Some(false));
    }

    #[test]
    fn disposed_last_target_counts_as_absent() {
        let Fixture {
            mut scene,
            a,
            b,
            log,
            ..
        } = fixture();
        scene.dispatch(&mut pointer_move(a));
        scene.tree_mut().dispose(a);
        record(&mut scene, b, EventKind::POINTER_OVER, false, "B", &log);
        record(&mut scene, b, EventKind::POINTER_ENTER, false, "B", &log);

        scene.dispatch(&mut pointer_move(b));
        assert_eq!(*log.borrow(), ["pointerover@B", "pointerenter@B"]);
    }

    #[test]
    fn untrusted_moves_do_not_track_the_target() {
        let Fixture { mut scene, a, .. } = fixture();
        scene.dispatch(&mut SimulatedEvent::new(EventKind::POINTER_MOVE, a));
        assert_eq!(scene.last_target(), None);
    }

    #[test]
    fn once_listeners_fire_once_and_off_removes() {
        let Fixture { mut scene, a, .. } = fixture();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        scene.once(a, EventKind::CLICK, false, move |_, _| {
            counter.set(counter.get() + 1);
        });
        let steady = Rc::new(Cell::new(0));
        let counter = steady.clone();
        let id = scene.on(a, EventKind::CLICK, false, move |_, _| {
            counter.set(counter.get() + 1);
        });

        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!((hits.get(), steady.get()), (1, 2));

        assert!(scene.off(a, id));
        assert!(!scene.off(a, id));
        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!(steady.get(), 2);
    }

    #[test]
    fn running_handlers_are_not_reentered() {
        let Fixture { mut scene, a, .. } = fixture();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        scene.on(a, EventKind::CLICK, false, move |scene, ev| {
            counter.set(counter.get() + 1);
            let mut again = SimulatedEvent::new(EventKind::CLICK, ev.target);
            scene.dispatch(&mut again);
        });
        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listeners_added_during_dispatch_wait_for_the_next_event() {
        let Fixture { mut scene, a, .. } = fixture();
        let late = Rc::new(Cell::new(0));
        let counter = late.clone();
        scene.once(a, EventKind::CLICK, false, move |scene, ev| {
            let counter = counter.clone();
            scene.on(ev.target, EventKind::CLICK, false, move |_, _| {
                counter.set(counter.get() + 1);
            });
        });
        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!(late.get(), 0);
        scene.dispatch(&mut SimulatedEvent::new(EventKind::CLICK, a));
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn handlers_can_mutate_the_scene() {
        let Fixture { mut scene, a, .. } = fixture();
        scene.on(a, "custom:hide", false, |scene, ev| {
            scene.tree_mut().set_visible(ev.target, false);
        });
        scene.dispatch(&mut SimulatedEvent::new("custom:hide", a));
        assert!(!scene.tree().is_visible(a));
    }

    #[test]
    fn raw_kinds_follow_registered_listeners() {
        let Fixture { mut scene, a, b, .. } = fixture();
        assert!(scene.wanted_raw_kinds().is_empty());
        scene.on(a, EventKind::POINTER_ENTER, false, |_, _| {});
        scene.on(b, EventKind::CLICK, true, |_, _| {});
        scene.on(b, "custom:ping", false, |_, _| {});
        let kinds: Vec<_> = scene.wanted_raw_kinds().into_iter().collect();
        assert_eq!(kinds, [RawKind::PointerMove, RawKind::Click]);
    }
}
