// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM input source.
//!
//! [`DomInputSource`] registers one native listener per [`RawKind`] on a DOM
//! element, on demand, and forwards each native event as a [`RawInput`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Vec2};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget, MouseEvent, PointerEvent, WheelEvent};

use strata_core::event::{InputSource, Modifiers, RawInput, RawKind};
use strata_core::time::HostTime;

type Handler = Rc<RefCell<Box<dyn FnMut(RawInput)>>>;
type Listener = Closure<dyn FnMut(Event)>;

/// An [`InputSource`] over a DOM element.
///
/// Pass it to [`EventObserver::sync`](strata_core::event::EventObserver::sync)
/// after registering scene listeners; each newly needed kind gets one native
/// listener. Dropping the source removes every listener it added.
pub struct DomInputSource {
    target: EventTarget,
    handler: Handler,
    listeners: Vec<(RawKind, Listener)>,
}

impl DomInputSource {
    /// Creates a source that delivers inputs on `target` to `handler`.
    ///
    /// `handler` typically calls
    /// [`EventObserver::handle`](strata_core::event::EventObserver::handle)
    /// and then requests a frame.
    pub fn new(target: EventTarget, handler: impl FnMut(RawInput) + 'static) -> Self {
        Self {
            target,
            handler: Rc::new(RefCell::new(Box::new(handler))),
            listeners: Vec::new(),
        }
    }

    /// The element listeners are attached to.
    #[must_use]
    pub fn target(&self) -> &EventTarget {
        &self.target
    }

    /// Raw kinds with a native listener, in binding order.
    pub fn bound(&self) -> impl Iterator<Item = RawKind> + '_ {
        self.listeners.iter().map(|(kind, _)| *kind)
    }
}

impl InputSource for DomInputSource {
    fn bind(&mut self, kind: RawKind, passive: bool) {
        if self.listeners.iter().any(|(k, _)| *k == kind) {
            return;
        }
        let handler = Rc::clone(&self.handler);
        let listener = Closure::wrap(Box::new(move |event: Event| {
            let input = raw_input(kind, &event);
            // Input arriving while the handler runs (e.g. a synchronous
            // `click()` from a listener) is dropped.
            if let Ok(mut handler) = handler.try_borrow_mut() {
                handler(input);
            }
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        let registered = self
            .target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.as_str(),
                listener.as_ref().unchecked_ref(),
                &options,
            );
        if registered.is_ok() {
            self.listeners.push((kind, listener));
        }
    }
}

impl Drop for DomInputSource {
    fn drop(&mut self) {
        for (kind, listener) in self.listeners.drain(..) {
            let callback: &JsValue = listener.as_ref();
            let _ = self
                .target
                .remove_event_listener_with_callback(kind.as_str(), callback.unchecked_ref());
        }
    }
}

impl core::fmt::Debug for DomInputSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomInputSource")
            .field("target", &"EventTarget")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn raw_input(kind: RawKind, event: &Event) -> RawInput {
    let mut input = RawInput::new(kind, Point::ZERO, HostTime::from_millis_f64(event.time_stamp()));
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        input.client = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
        input.button = mouse.button();
        input.modifiers = Modifiers {
            shift: mouse.shift_key(),
            ctrl: mouse.ctrl_key(),
            alt: mouse.alt_key(),
            meta: mouse.meta_key(),
        };
    }
    if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
        input.pointer_id = pointer.pointer_id();
    }
    if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
        input.wheel_delta = Vec2::new(wheel.delta_x(), wheel.delta_y());
    }
    input
}
