// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node listener storage.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use super::kind::EventKind;
use super::simulated::SimulatedEvent;
use crate::scene::Scene;

/// A shared, re-entrancy-checked event handler.
pub(crate) type Handler = Rc<RefCell<dyn FnMut(&mut Scene, &mut SimulatedEvent)>>;

/// Identifies one registered listener within a scene.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) id: ListenerId,
    pub(crate) handler: Handler,
    pub(crate) once: bool,
}

/// Listeners attached to one node, split by phase.
///
/// Allocated on first registration; nodes without listeners carry nothing.
#[derive(Default)]
pub struct ListenerRegistry {
    capture: BTreeMap<EventKind, Vec<Entry>>,
    bubble: BTreeMap<EventKind, Vec<Entry>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |m: &BTreeMap<EventKind, Vec<Entry>>| m.values().map(Vec::len).sum::<usize>();
        f.debug_struct("ListenerRegistry")
            .field("capture", &count(&self.capture))
            .field("bubble", &count(&self.bubble))
            .finish()
    }
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, kind: EventKind, capture: bool, entry: Entry) {
        let map = if capture {
            &mut self.capture
        } else {
            &mut self.bubble
        };
        map.entry(kind).or_default().push(entry);
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        for map in [&mut self.capture, &mut self.bubble] {
            let mut emptied = None;
            let mut found = false;
            for (kind, entries) in map.iter_mut() {
                if let Some(pos) = entries.iter().position(|e| e.id == id) {
                    entries.remove(pos);
                    found = true;
                    if entries.is_empty() {
                        emptied = Some(kind.clone());
                    }
                    break;
                }
            }
            if let Some(kind) = emptied {
                map.remove(&kind);
            }
            if found {
                return true;
            }
        }
        false
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.capture
            .values()
            .chain(self.bubble.values())
            .any(|entries| entries.iter().any(|e| e.id == id))
    }

    /// Clones the current entries so handlers may add or remove listeners
    /// while the list is being walked.
    pub(crate) fn snapshot(&self, kind: &EventKind, capture: bool) -> Vec<Entry> {
        let map = if capture { &self.capture } else { &self.bubble };
        map.get(kind).cloned().unwrap_or_default()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capture
            .values()
            .chain(self.bubble.values())
            .map(Vec::len)
            .sum()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capture.is_empty() && self.bubble.is_empty()
    }

    /// Kinds with at least one listener in either phase.
    pub fn kinds(&self) -> impl Iterator<Item = &EventKind> {
        self.capture.keys().chain(self.bubble.keys())
    }
}
