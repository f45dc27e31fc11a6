// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable scene errors.
//!
//! Structural misuse that a caller can reasonably trigger from data (a
//! duplicate name, an unknown shape kind in a document) is reported through
//! [`SceneError`]. Using a stale [`NodeId`] is a programming error and panics
//! instead, like any out-of-bounds access.

use alloc::string::String;
use core::fmt;

use crate::node::NodeId;

/// Errors returned by tree mutation and scene construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// A sibling with the same name is already attached to the parent.
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
    /// A shape kind string did not name any known geometry.
    UnknownShapeKind(String),
    /// An easing id did not name any known easing curve.
    UnknownEasing(String),
    /// The parent cannot hold children (drawables are leaves).
    NotAContainer(NodeId),
    /// Inserting the node would make it its own ancestor.
    WouldCycle(NodeId),
    /// Layers may only be attached directly to the scene root, and only layers
    /// may be attached there.
    LayerOutsideRoot(NodeId),
    /// The scene root can never become a child.
    RootNotInsertable,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "a sibling named `{name}` already exists")
            }
            Self::UnknownShapeKind(kind) => write!(f, "unknown shape kind `{kind}`"),
            Self::UnknownEasing(id) => write!(f, "unknown easing `{id}`"),
            Self::NotAContainer(id) => write!(f, "{id:?} cannot contain children"),
            Self::WouldCycle(id) => write!(f, "inserting {id:?} would create a cycle"),
            Self::LayerOutsideRoot(id) => {
                write!(f, "{id:?}: layers live directly under the scene root")
            }
            Self::RootNotInsertable => f.write_str("the scene root cannot be inserted"),
        }
    }
}

impl core::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_conflict() {
        let err = SceneError::DuplicateName {
            name: "handle".into(),
        };
        assert_eq!(err.to_string(), "a sibling named `handle` already exists");
        assert_eq!(
            SceneError::UnknownShapeKind("hexagon".into()).to_string(),
            "unknown shape kind `hexagon`"
        );
    }
}
