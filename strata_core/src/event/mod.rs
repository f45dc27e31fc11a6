// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event simulation and dispatch.
//!
//! Input reaches the scene in three steps:
//!
//! 1. An [`InputSource`] (a DOM element, a test fixture) delivers
//!    [`RawInput`]. The [`EventObserver`] binds one native listener per raw
//!    kind that registered listeners need.
//! 2. The observer maps the client position through the event layer's
//!    backend and the inverse camera, picks a target, and builds one
//!    [`SimulatedEvent`].
//! 3. [`Scene::dispatch`](crate::Scene::dispatch) synthesizes pointer
//!    transitions for moves and routes the event capture → target → bubble.
//!
//! Listeners are closures receiving `&mut Scene`, so they can mutate the tree
//! directly. Registries are allocated on a node's first listener.

mod dispatch;
mod kind;
mod observer;
mod registry;
mod simulated;

pub use kind::{EventKind, RawKind};
pub use observer::{EventObserver, InputSource, RawInput};
pub use registry::{ListenerId, ListenerRegistry};
pub use simulated::{Modifiers, Phase, SimulatedEvent};
