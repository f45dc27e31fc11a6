// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque keys for backend-managed resources such as images.

use core::fmt;

/// An opaque handle to a backend-managed resource (decoded image, font, …).
///
/// Keys are assigned by the host and passed through the scene to the
/// [`RenderBackend`](crate::backend::RenderBackend) without interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(pub u64);

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey({})", self.0)
    }
}

/// Load state of an image source.
///
/// A failed load is indistinguishable from one still in flight: both leave
/// the image in [`Loading`](Self::Loading) and the draw pass skips it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageState {
    /// Not yet decoded (or failed); drawing skips the image primitive.
    #[default]
    Loading,
    /// Decoded and drawable.
    Ready,
}
