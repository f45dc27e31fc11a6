// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event kind names.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

/// The name of an event, as listeners register for it.
///
/// Any string is a valid kind, so applications can dispatch their own events
/// through the same pipeline. The pointer vocabulary is provided as constants.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKind(Cow<'static, str>);

impl EventKind {
    /// A pointer was pressed.
    pub const POINTER_DOWN: Self = Self::from_static("pointerdown");
    /// A pointer moved.
    pub const POINTER_MOVE: Self = Self::from_static("pointermove");
    /// A pointer was released.
    pub const POINTER_UP: Self = Self::from_static("pointerup");
    /// The host cancelled a pointer.
    pub const POINTER_CANCEL: Self = Self::from_static("pointercancel");
    /// A press and release on the same element.
    pub const CLICK: Self = Self::from_static("click");
    /// A wheel or trackpad scroll.
    pub const WHEEL: Self = Self::from_static("wheel");
    /// Pointer entered a node or one of its descendants (bubbles).
    pub const POINTER_OVER: Self = Self::from_static("pointerover");
    /// Pointer left a node or one of its descendants.
    pub const POINTER_OUT: Self = Self::from_static("pointerout");
    /// Pointer entered exactly this node.
    pub const POINTER_ENTER: Self = Self::from_static("pointerenter");
    /// Pointer left exactly this node.
    pub const POINTER_LEAVE: Self = Self::from_static("pointerleave");

    /// Creates a kind from a static string without allocating.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a kind from any string.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the kind name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventKind({})", self.0)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Native input kinds an [`InputSource`](super::InputSource) can bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawKind {
    /// `pointerdown`.
    PointerDown,
    /// `pointermove`; also feeds the synthesized over/out/enter/leave.
    PointerMove,
    /// `pointerup`.
    PointerUp,
    /// `pointercancel`.
    PointerCancel,
    /// `click`.
    Click,
    /// `wheel`.
    Wheel,
}

impl RawKind {
    /// All raw kinds.
    pub const ALL: [Self; 6] = [
        Self::PointerDown,
        Self::PointerMove,
        Self::PointerUp,
        Self::PointerCancel,
        Self::Click,
        Self::Wheel,
    ];

    /// The native event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::Click => "click",
            Self::Wheel => "wheel",
        }
    }

    /// Whether the native listener should be registered as passive.
    #[must_use]
    pub const fn is_passive(self) -> bool {
        matches!(self, Self::PointerMove | Self::Wheel)
    }

    /// The event kind dispatched for this raw input.
    #[must_use]
    pub const fn event_kind(self) -> EventKind {
        EventKind::from_static(self.as_str())
    }

    /// The raw kind that must be bound for listeners of `kind` to fire, or
    /// `None` for kinds that no native input produces.
    #[must_use]
    pub fn for_listener(kind: &EventKind) -> Option<Self> {
        match kind.as_str() {
            "pointerdown" => Some(Self::PointerDown),
            "pointermove" | "pointerover" | "pointerout" | "pointerenter" | "pointerleave" => {
                Some(Self::PointerMove)
            }
            "pointerup" => Some(Self::PointerUp),
            "pointercancel" => Some(Self::PointerCancel),
            "click" => Some(Self::Click),
            "wheel" => Some(Self::Wheel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_need_pointer_move() {
        assert_eq!(
            RawKind::for_listener(&EventKind::POINTER_ENTER),
            Some(RawKind::PointerMove)
        );
        assert_eq!(RawKind::for_listener(&EventKind::new("drop-node")), None);
    }

    #[test]
    fn custom_and_builtin_kinds_compare_by_name() {
        assert_eq!(EventKind::new(String::from("click")), EventKind::CLICK);
        assert_eq!(RawKind::Wheel.event_kind(), EventKind::WHEEL);
        assert!(RawKind::Wheel.is_passive());
        assert!(!RawKind::Click.is_passive());
    }
}
