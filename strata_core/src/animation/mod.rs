// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick-driven interpolation.
//!
//! [`Animation`] is one generic state machine over keyed channels of
//! [`AnimValue`]s. It knows nothing about nodes: the scene binds it to node
//! properties through [`Property`], and applications can drive their own
//! keys with it directly.
//!
//! The host advances every attached animation with
//! [`Scene::tick_animations`](crate::Scene::tick_animations), normally from
//! the [`RedrawScheduler`](crate::frame::RedrawScheduler) frame callback.

mod easing;
mod machine;
mod property;
mod value;

pub use easing::Easing;
pub use machine::{Animation, Status, Timing, Track};
pub use property::{AnimationId, Property};
pub use value::AnimValue;

pub(crate) use property::Animations;
