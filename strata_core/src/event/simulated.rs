// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event object handed to listeners.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use super::kind::EventKind;
use crate::node::NodeId;
use crate::time::HostTime;

/// Propagation phase, numbered like the DOM's `eventPhase`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Not being dispatched.
    #[default]
    None = 0,
    /// Walking from the root towards the target.
    Capture = 1,
    /// At the target.
    Target = 2,
    /// Walking from the target back to the root.
    Bubble = 3,
}

/// Keyboard modifiers held during an input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
    /// Meta / Command.
    pub meta: bool,
}

/// A snapshot of one input, routed through the tree.
///
/// Built once per raw input by the [`EventObserver`](super::EventObserver),
/// or by the application for custom kinds.
#[derive(Clone, Debug)]
pub struct SimulatedEvent {
    /// Event kind.
    pub kind: EventKind,
    /// The node the event is aimed at.
    pub target: NodeId,
    /// The node whose listeners are currently running.
    pub current_target: NodeId,
    /// Current propagation phase.
    pub phase: Phase,
    /// Host timestamp of the originating input.
    pub timestamp: HostTime,
    /// Surface-local coordinates.
    pub offset: Point,
    /// World coordinates (surface coordinates through the inverse camera).
    pub world: Point,
    /// `true` for events built from real input, `false` for synthesized
    /// transitions and application events.
    pub genuine: bool,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Pressed button (DOM numbering, `-1` when none).
    pub button: i16,
    /// Wheel delta for `wheel` events.
    pub wheel_delta: Vec2,
    /// Host pointer identifier.
    pub pointer_id: i32,
    stopped: bool,
    path: Vec<NodeId>,
}

impl SimulatedEvent {
    /// Creates an event aimed at `target` with zeroed input data.
    #[must_use]
    pub fn new(kind: impl Into<EventKind>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
            current_target: target,
            phase: Phase::None,
            timestamp: HostTime::default(),
            offset: Point::ORIGIN,
            world: Point::ORIGIN,
            genuine: false,
            modifiers: Modifiers::default(),
            button: -1,
            wheel_delta: Vec2::ZERO,
            pointer_id: 0,
            stopped: false,
            path: Vec::new(),
        }
    }

    /// Prevents the bubble phase from running.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.stopped
    }

    /// The root-to-target path, filled in on first dispatch.
    #[must_use]
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub(crate) fn path_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.path
    }

    /// Derives a synthesized event sharing this event's input data.
    pub(crate) fn derive(&self, kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            phase: Phase::None,
            genuine: false,
            stopped: false,
            path: Vec::new(),
            ..self.clone()
        }
    }
}
