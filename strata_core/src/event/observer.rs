// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw host input to [`SimulatedEvent`]s.

use alloc::collections::BTreeSet;

use kurbo::{Point, Vec2};

use super::kind::RawKind;
use super::simulated::{Modifiers, SimulatedEvent};
use crate::scene::Scene;
use crate::time::HostTime;
use crate::trace::Tracer;

/// A host that delivers native input, such as a DOM element.
pub trait InputSource {
    /// Starts delivering `kind`. Called at most once per kind.
    fn bind(&mut self, kind: RawKind, passive: bool);
}

/// One native input as the host reports it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawInput {
    /// Input kind.
    pub kind: RawKind,
    /// Position in host client coordinates.
    pub client: Point,
    /// Host timestamp.
    pub timestamp: HostTime,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Pressed button, `-1` when none.
    pub button: i16,
    /// Wheel delta for [`RawKind::Wheel`].
    pub wheel_delta: Vec2,
    /// Host pointer identifier.
    pub pointer_id: i32,
}

impl RawInput {
    /// An input of `kind` at `client` with no modifiers or buttons.
    #[must_use]
    pub fn new(kind: RawKind, client: Point, timestamp: HostTime) -> Self {
        Self {
            kind,
            client,
            timestamp,
            modifiers: Modifiers::default(),
            button: -1,
            wheel_delta: Vec2::ZERO,
            pointer_id: 0,
        }
    }
}

/// Binds native input on demand and turns it into dispatched events.
///
/// The observer keeps exactly one native binding per raw kind that some
/// registered listener needs. Call [`sync`](Self::sync) after registering
/// listeners; bindings are never removed.
#[derive(Clone, Debug, Default)]
pub struct EventObserver {
    bound: BTreeSet<RawKind>,
}

impl EventObserver {
    /// Creates an observer with nothing bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every raw kind the scene's listeners need that is not bound yet.
    ///
    /// Returns the number of new bindings.
    pub fn sync(&mut self, scene: &Scene, source: &mut dyn InputSource) -> usize {
        let mut added = 0;
        for kind in scene.wanted_raw_kinds() {
            if self.bound.insert(kind) {
                source.bind(kind, kind.is_passive());
                added += 1;
            }
        }
        added
    }

    /// Raw kinds bound so far.
    #[must_use]
    pub fn bound(&self) -> &BTreeSet<RawKind> {
        &self.bound
    }

    /// Builds a genuine event from `input` and dispatches it.
    ///
    /// Client coordinates are mapped through the event layer's backend, then
    /// through the inverse camera for world coordinates. The target is the
    /// topmost picked drawable, or the scene root when nothing is hit.
    /// Returns the event after dispatch.
    pub fn handle(
        &mut self,
        scene: &mut Scene,
        input: &RawInput,
        tracer: &mut Tracer<'_>,
    ) -> SimulatedEvent {
        let offset = scene.client_to_local(input.client);
        let target = scene.pick(offset).unwrap_or(scene.root());

        let mut event = SimulatedEvent::new(input.kind.event_kind(), target);
        event.timestamp = input.timestamp;
        event.offset = offset;
        event.world = scene.screen_to_world(offset);
        event.genuine = true;
        event.modifiers = input.modifiers;
        event.button = input.button;
        event.wheel_delta = input.wheel_delta;
        event.pointer_id = input.pointer_id;

        scene.dispatch_traced(&mut event, tracer);
        event
    }
}
