// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializable snapshots of strata scenes.
//!
//! [`capture`] turns a live [`Scene`](strata_core::scene::Scene) into plain
//! [`SceneSnapshot`] data; [`restore`] rebuilds a scene from it. [`to_json`]
//! and [`from_json`] move snapshots through `serde_json`.
//!
//! A snapshot holds structure and appearance only: hierarchy, layer options,
//! names, tags, transforms, z, cascades, geometry, and paint. Listeners,
//! payloads, running animations, image load state, and text measurements are
//! runtime state and start fresh after a restore.
//!
//! ```text
//!   Scene ──capture──► SceneSnapshot ──to_json──► String
//!   Scene ◄──restore── SceneSnapshot ◄─from_json── &str
//! ```

mod capture;
mod model;
mod restore;

use core::fmt;

use strata_core::error::SceneError;
use strata_core::shape::ShapeKind;

pub use capture::capture;
pub use model::{
    LayerSnapshot, NodeSnapshot, PaintSnapshot, PathElSnapshot, SceneSnapshot, ShapeSnapshot,
    TextSnapshot, TransformSnapshot,
};
pub use restore::restore;

/// Errors from decoding or restoring a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// The scene rejected the data (unknown shape kind, duplicate name, …).
    Scene(SceneError),
    /// A shape lacks the field its kind requires.
    MissingField {
        /// The shape's kind.
        kind: ShapeKind,
        /// The missing field.
        field: &'static str,
    },
    /// The JSON text was malformed.
    Json(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene(err) => fmt::Display::fmt(err, f),
            Self::MissingField { kind, field } => {
                write!(f, "{kind} shape is missing `{field}`")
            }
            Self::Json(err) => write!(f, "invalid snapshot JSON: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scene(err) => Some(err),
            Self::MissingField { .. } => None,
            Self::Json(err) => Some(err),
        }
    }
}

impl From<SceneError> for SnapshotError {
    fn from(err: SceneError) -> Self {
        Self::Scene(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Serializes a snapshot as pretty-printed JSON.
pub fn to_json(snapshot: &SceneSnapshot) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parses a snapshot from JSON.
pub fn from_json(json: &str) -> Result<SceneSnapshot, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}
