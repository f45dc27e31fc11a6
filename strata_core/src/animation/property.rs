// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding of [`Animation`] channels to node properties.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Vec2;

use super::machine::{Animation, Status, Timing};
use super::value::AnimValue;
use crate::node::{NodeId, NodeTree};
use crate::scene::Scene;
use crate::shape::Geometry;
use crate::time::HostTime;

/// A node property an animation can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    /// Horizontal translation.
    X,
    /// Vertical translation.
    Y,
    /// Rotation in radians.
    Rotation,
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
    /// Local z.
    Z,
    /// Paint opacity.
    Opacity,
    /// Fill color.
    Fill,
    /// Stroke color.
    Stroke,
    /// Stroke width.
    LineWidth,
    /// Circle radius.
    Radius,
    /// Rect or image width.
    Width,
    /// Rect or image height.
    Height,
    /// Clip-reveal fraction.
    Reveal,
}

impl Property {
    /// Reads the property's current value.
    ///
    /// Returns `None` when the node has no such property (a shape property on
    /// a group, a radius on a rect, an unset fill).
    #[must_use]
    pub fn read(self, tree: &NodeTree, node: NodeId) -> Option<AnimValue> {
        let t = tree.local_transform(node);
        let scalar = |v: f64| Some(AnimValue::Scalar(v));
        match self {
            Self::X => scalar(t.translation.x),
            Self::Y => scalar(t.translation.y),
            Self::Rotation => scalar(t.rotation),
            Self::ScaleX => scalar(t.scale.x),
            Self::ScaleY => scalar(t.scale.y),
            Self::Z => scalar(tree.z(node)),
            _ => {
                let shape = tree.shape(node)?;
                match self {
                    Self::Opacity => scalar(shape.paint.opacity),
                    Self::Fill => shape.paint.fill.map(AnimValue::Color),
                    Self::Stroke => shape.paint.stroke.map(AnimValue::Color),
                    Self::LineWidth => scalar(shape.paint.line_width),
                    Self::Reveal => scalar(shape.reveal.unwrap_or(1.0)),
                    Self::Radius => match &shape.geometry {
                        Geometry::Circle(c) => scalar(c.radius),
                        _ => None,
                    },
                    Self::Width | Self::Height => {
                        let rect = match &shape.geometry {
                            Geometry::Rect(r) => *r,
                            Geometry::Image(i) => i.rect,
                            _ => return None,
                        };
                        scalar(if self == Self::Width {
                            rect.width()
                        } else {
                            rect.height()
                        })
                    }
                    _ => None,
                }
            }
        }
    }

    /// Writes `value` into the node, marking it dirty.
    ///
    /// Values of the wrong variant and properties the node lacks are ignored.
    pub fn write(self, tree: &mut NodeTree, node: NodeId, value: AnimValue) {
        match (self, value) {
            (Self::Fill | Self::Stroke, AnimValue::Color(c)) => {
                if tree.shape(node).is_none() {
                    return;
                }
                tree.update_shape(node, |s| {
                    if self == Self::Fill {
                        s.paint.fill = Some(c);
                    } else {
                        s.paint.stroke = Some(c);
                    }
                });
            }
            (_, AnimValue::Scalar(v)) => self.write_scalar(tree, node, v),
            (_, AnimValue::Color(_)) => {}
        }
    }

    fn write_scalar(self, tree: &mut NodeTree, node: NodeId, v: f64) {
        let t = tree.local_transform(node);
        match self {
            Self::X => tree.set_translation(node, Vec2::new(v, t.translation.y)),
            Self::Y => tree.set_translation(node, Vec2::new(t.translation.x, v)),
            Self::Rotation => tree.set_rotation(node, v),
            Self::ScaleX => tree.set_scale(node, Vec2::new(v, t.scale.y)),
            Self::ScaleY => tree.set_scale(node, Vec2::new(t.scale.x, v)),
            Self::Z => tree.set_z(node, v),
            Self::Fill | Self::Stroke => {}
            _ => {
                if tree.shape(node).is_none() {
                    return;
                }
                tree.update_shape(node, |s| match self {
                    Self::Opacity => s.paint.opacity = v,
                    Self::LineWidth => s.paint.line_width = v,
                    Self::Reveal => s.reveal = Some(v),
                    Self::Radius => {
                        if let Geometry::Circle(c) = &mut s.geometry {
                            c.radius = v;
                        }
                    }
                    Self::Width => match &mut s.geometry {
                        Geometry::Rect(r) => r.x1 = r.x0 + v,
                        Geometry::Image(i) => i.rect.x1 = i.rect.x0 + v,
                        _ => {}
                    },
                    Self::Height => match &mut s.geometry {
                        Geometry::Rect(r) => r.y1 = r.y0 + v,
                        Geometry::Image(i) => i.rect.y1 = i.rect.y0 + v,
                        _ => {}
                    },
                    _ => {}
                });
            }
        }
    }
}

/// Identifies an animation attached to a scene.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub(crate) u64);

impl fmt::Debug for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimationId({})", self.0)
    }
}

struct Attached {
    id: AnimationId,
    node: NodeId,
    animation: Animation<Property>,
}

/// The animations attached to a scene, in attachment order.
#[derive(Default)]
pub(crate) struct Animations {
    entries: Vec<Attached>,
    next: u64,
}

impl fmt::Debug for Animations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animations")
            .field("active", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Animations {
    fn get_mut(&mut self, id: AnimationId) -> Option<&mut Animation<Property>> {
        self.entries
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| &mut a.animation)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Scene {
    /// Attaches an animation to `node`. It starts on the next
    /// [`tick_animations`](Self::tick_animations).
    pub fn animate(&mut self, node: NodeId, animation: Animation<Property>) -> AnimationId {
        self.tree().validate(node);
        let anims = &mut self.animations;
        let id = AnimationId(anims.next);
        anims.next += 1;
        anims.entries.push(Attached {
            id,
            node,
            animation,
        });
        id
    }

    /// Animates `node` from its current property values to `targets`.
    ///
    /// Properties the node lacks are skipped.
    pub fn animate_to(
        &mut self,
        node: NodeId,
        targets: &[(Property, AnimValue)],
        timing: Timing,
    ) -> AnimationId {
        let mut animation = Animation::new(timing);
        for &(property, to) in targets {
            if let Some(from) = property.read(self.tree(), node) {
                animation.set_track(property, from, to);
            }
        }
        self.animate(node, animation)
    }

    /// Re-targets a running animation from its current values.
    ///
    /// Returns `false` if the animation already ended or was cancelled.
    pub fn retarget(
        &mut self,
        id: AnimationId,
        targets: impl IntoIterator<Item = (Property, AnimValue)>,
    ) -> bool {
        match self.animations.get_mut(id) {
            Some(animation) => {
                animation.retarget(targets);
                true
            }
            None => false,
        }
    }

    /// Detaches an animation, leaving the node at its current values.
    ///
    /// Returns `false` if it was not attached.
    pub fn cancel_animation(&mut self, id: AnimationId) -> bool {
        let entries = &mut self.animations.entries;
        let before = entries.len();
        entries.retain(|a| a.id != id);
        entries.len() != before
    }

    /// The status of an attached animation; `None` once it has ended and
    /// been removed.
    #[must_use]
    pub fn animation_status(&self, id: AnimationId) -> Option<Status> {
        self.animations
            .entries
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.animation.status())
    }

    /// Whether any animation is attached.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Advances every attached animation to `now` and writes the results
    /// into their nodes.
    ///
    /// Animations whose node was disposed are dropped; ended ones are
    /// removed. Returns whether any animation remains.
    pub fn tick_animations(&mut self, now: HostTime) -> bool {
        let mut entries = core::mem::take(&mut self.animations.entries);
        entries.retain_mut(|entry| {
            if !self.tree().is_alive(entry.node) {
                return false;
            }
            let status = entry.animation.tick(now);
            if status.applies_values() {
                let tree = self.tree_mut();
                for track in entry.animation.tracks() {
                    track.key.write(tree, entry.node, track.current);
                }
                if status == Status::Clear {
                    clear_reveal(tree, entry.node, &entry.animation);
                }
            }
            status != Status::End
        });
        self.animations.entries = entries;
        self.is_animating()
    }
}

fn clear_reveal(tree: &mut NodeTree, node: NodeId, animation: &Animation<Property>) {
    let reveals = animation.tracks().iter().any(|t| t.key == Property::Reveal);
    if reveals && tree.shape(node).is_some() {
        tree.update_shape(node, |s| s.reveal = None);
    }
}
