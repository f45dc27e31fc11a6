// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered 2D scene graph with dirty tracking, hit testing, event dispatch,
//! and tick-driven animation.
//!
//! `strata_core` provides the data structures and algorithms of a retained
//! 2D renderer. It is `no_std` compatible (with `alloc`), stores every node of
//! a scene in one struct-of-arrays [`NodeTree`](node::NodeTree), and addresses
//! nodes through generational [`NodeId`](node::NodeId) handles.
//!
//! # Architecture
//!
//! A host drives the engine from a "next paint" callback:
//!
//! ```text
//!   RawInput ──► EventObserver ──► Scene::pick() ──► Scene::dispatch()
//!                                                        │ (listeners mutate nodes)
//!                                                        ▼
//!   FrameHost ──► RedrawScheduler::on_frame()
//!                     │
//!                     ├─► Scene::tick_animations()   (Animation<Property>)
//!                     ├─► Scene::draw()              (update pass, queue, cull)
//!                     │       └─► RenderBackend       (one per layer)
//!                     └─► re-arm while dirty or animating
//! ```
//!
//! **[`node`]**: Arena tree with sibling-unique names, tags, tri-state
//! cascades, local transforms, and the `dirty` / local / world update bits.
//! Setting `dirty` walks up to the root; clearing it walks down the subtree.
//!
//! **[`shape`]**: Drawable geometry, paint, bounding boxes, and precise hit
//! testing through an explicitly owned [`HitRasterizer`](shape::HitRasterizer).
//!
//! **[`layer`]** and **[`scene`]**: Per-layer draw queues ordered by
//! effective z, strict viewport culling, cross-layer picking, and the camera
//! mapping between surface and world coordinates.
//!
//! **[`event`]**: Lazily allocated listener registries, capture → target →
//! bubble flow, and pointer transitions synthesized from raw moves.
//!
//! **[`animation`]**: One generic interpolation state machine bound to node
//! properties.
//!
//! **[`frame`]**: Coalesced redraw requests over a host frame primitive.
//!
//! **[`backend`]**: The [`RenderBackend`](backend::RenderBackend) contract
//! and a recording implementation.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   draw and per-event dispatch records.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod backend;
pub mod error;
pub mod event;
pub mod frame;
pub mod layer;
pub mod node;
pub mod paint;
pub mod resource;
pub mod scene;
pub mod shape;
pub mod time;
pub mod trace;

pub use error::SceneError;
pub use node::NodeId;
pub use scene::Scene;
