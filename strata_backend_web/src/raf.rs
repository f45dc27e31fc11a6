// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame host.
//!
//! [`RafHost`] arms at most one `requestAnimationFrame` callback at a time.
//! Each callback receives a [`DOMHighResTimeStamp`][mdn] (milliseconds from
//! `performance.now()`), which is converted to microsecond [`HostTime`] ticks
//! and handed to the user callback as a [`FrameTick`] together with a
//! [`RafFrame`], the [`FrameHost`] to re-arm from inside the callback.
//!
//! Unlike a free-running loop, nothing is requested until someone asks; an
//! idle scene costs no frames.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use strata_core::frame::{FrameHost, FrameTick};
use strata_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods: no Window or
// Performance lookups per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type JsFrameCallback = Closure<dyn FnMut(f64)>;
type FrameCallback = Box<dyn FnMut(FrameTick, &mut dyn FrameHost)>;

/// A [`FrameHost`] backed by `requestAnimationFrame`.
///
/// Create with [`RafHost::new`], then call
/// [`request_frame`](FrameHost::request_frame) whenever the scene changes.
/// Dropping the host cancels any pending callback.
pub struct RafHost {
    inner: Rc<RafInner>,
}

struct RafInner {
    /// Handed to `requestAnimationFrame`; `None` once the host is dropped.
    closure: RefCell<Option<JsFrameCallback>>,
    callback: RefCell<FrameCallback>,
    delivered: Cell<u64>,
    /// The pending request, if any.
    raf_id: Cell<Option<i32>>,
}

impl RafInner {
    fn request(&self) {
        if self.raf_id.get().is_some() {
            return;
        }
        if let Some(closure) = self.closure.borrow().as_ref() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.raf_id.set(Some(id));
        }
    }

    fn cancel(&self) {
        if let Some(id) = self.raf_id.take() {
            cancel_animation_frame(id);
        }
    }
}

/// The [`FrameHost`] passed to a [`RafHost`] callback.
///
/// Requests made through it arm the next `requestAnimationFrame`.
pub struct RafFrame<'a> {
    inner: &'a RafInner,
}

impl FrameHost for RafFrame<'_> {
    fn request_frame(&mut self) {
        self.inner.request();
    }

    fn now(&self) -> HostTime {
        crate::now()
    }
}

impl core::fmt::Debug for RafFrame<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafFrame")
            .field("pending", &self.inner.raf_id.get().is_some())
            .finish()
    }
}

impl RafHost {
    /// Creates a host with nothing requested.
    ///
    /// `callback` runs once per granted frame. It typically forwards to
    /// [`RedrawScheduler::on_frame`](strata_core::frame::RedrawScheduler::on_frame)
    /// with the provided host so the scheduler can re-arm.
    pub fn new(callback: impl FnMut(FrameTick, &mut dyn FrameHost) + 'static) -> Self {
        let inner = Rc::new(RafInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            delivered: Cell::new(0),
            raf_id: Cell::new(None),
        });

        // The closure holds a weak handle so the host can be dropped.
        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.raf_id.set(None);

            let frame_index = inner.delivered.replace(inner.delivered.get() + 1);
            let tick = FrameTick {
                now: HostTime::from_millis_f64(timestamp_ms),
                frame_index,
            };

            // A re-entrant request from inside the callback only touches
            // `closure` and `raf_id`, never `callback`.
            let mut frame = RafFrame { inner: &inner };
            (inner.callback.borrow_mut())(tick, &mut frame);
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Returns `true` if a callback is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.raf_id.get().is_some()
    }

    /// Cancels the pending callback, if any.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Number of frames delivered so far.
    #[must_use]
    pub fn frames_delivered(&self) -> u64 {
        self.inner.delivered.get()
    }
}

impl FrameHost for RafHost {
    fn request_frame(&mut self) {
        self.inner.request();
    }

    fn now(&self) -> HostTime {
        crate::now()
    }
}

impl Drop for RafHost {
    fn drop(&mut self) {
        self.inner.cancel();
        // Breaks the closure's hold on the wasm-side callback.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafHost")
            .field("pending", &self.is_pending())
            .field("delivered", &self.inner.delivered.get())
            .finish()
    }
}
