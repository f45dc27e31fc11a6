// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tri-state inherited flags.

/// An inheritable boolean: visibility, display, and pointer-enabled state.
///
/// A node in [`Inherit`](Self::Inherit) takes the value of its nearest
/// explicit ancestor, or `true` when no ancestor is explicit. Setting an
/// explicit value on a node stops inheritance at that node without touching
/// its descendants; descendants that are explicit themselves keep their value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cascade {
    /// Follow the nearest explicit ancestor.
    #[default]
    Inherit,
    /// Explicitly on.
    ForceOn,
    /// Explicitly off.
    ForceOff,
}

impl Cascade {
    /// The explicit value, if any.
    #[inline]
    #[must_use]
    pub const fn explicit(self) -> Option<bool> {
        match self {
            Self::Inherit => None,
            Self::ForceOn => Some(true),
            Self::ForceOff => Some(false),
        }
    }

    /// Resolves against the value inherited from the parent.
    #[inline]
    #[must_use]
    pub const fn resolve(self, inherited: bool) -> bool {
        match self {
            Self::Inherit => inherited,
            Self::ForceOn => true,
            Self::ForceOff => false,
        }
    }
}

impl From<bool> for Cascade {
    fn from(value: bool) -> Self {
        if value { Self::ForceOn } else { Self::ForceOff }
    }
}
