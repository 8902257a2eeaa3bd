//! Node components
//!
//! A component is a unit of behavior attached to exactly one node. The set of
//! variants is closed: [`Transform`], [`Sprite`] and a data-less `None`.
//!
//! Components that affect drawing do so by wrapping a [`RenderContinuation`]:
//! each one takes the "rest of the render" and returns a new continuation that
//! does its own work around it. A node wraps its subtree render with whichever
//! components it has, so absent components simply contribute no layer.

mod sprite;
mod transform;

pub use sprite::Sprite;
pub use transform::Transform;

use crate::render::Canvas;
use crate::scene::NodeId;
use std::fmt;

/// Deferred draw action taking the interpolation factor
pub type RenderContinuation<'a> = Box<dyn FnOnce(&mut dyn Canvas, f64) + 'a>;

/// Component variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// No behavior
    None,
    /// Position, rotation and scale applied to the node's subtree
    Transform,
    /// Image drawn centered on the node's origin
    Sprite,
}

impl ComponentKind {
    /// Lowercase tag used in diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Transform => "transform",
            Self::Sprite => "sprite",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant payload
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentData {
    /// No behavior
    None,
    /// Transform payload
    Transform(Transform),
    /// Sprite payload
    Sprite(Sprite),
}

/// A component and its owning node
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    parent: Option<NodeId>,
    data: ComponentData,
}

impl Component {
    /// Construct a default-valued component of the given kind, not yet attached
    pub fn new(kind: ComponentKind) -> Self {
        let data = match kind {
            ComponentKind::None => ComponentData::None,
            ComponentKind::Transform => ComponentData::Transform(Transform::default()),
            ComponentKind::Sprite => ComponentData::Sprite(Sprite::default()),
        };
        Self { parent: None, data }
    }

    /// Variant tag
    pub fn kind(&self) -> ComponentKind {
        match self.data {
            ComponentData::None => ComponentKind::None,
            ComponentData::Transform(_) => ComponentKind::Transform,
            ComponentData::Sprite(_) => ComponentKind::Sprite,
        }
    }

    /// Node this component is attached to
    ///
    /// This is a lookup reference only; the node owns the component.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Point the back-reference at a node
    pub fn set_parent(&mut self, node: NodeId) {
        self.parent = Some(node);
    }

    /// Variant payload
    pub fn data(&self) -> &ComponentData {
        &self.data
    }

    /// Mutable variant payload
    pub fn data_mut(&mut self) -> &mut ComponentData {
        &mut self.data
    }

    /// Transform payload, if this is a transform
    pub fn as_transform(&self) -> Option<&Transform> {
        match &self.data {
            ComponentData::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable transform payload, if this is a transform
    pub fn as_transform_mut(&mut self) -> Option<&mut Transform> {
        match &mut self.data {
            ComponentData::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// Sprite payload, if this is a sprite
    pub fn as_sprite(&self) -> Option<&Sprite> {
        match &self.data {
            ComponentData::Sprite(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable sprite payload, if this is a sprite
    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match &mut self.data {
            ComponentData::Sprite(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Transform> for Component {
    fn from(transform: Transform) -> Self {
        Self { parent: None, data: ComponentData::Transform(transform) }
    }
}

impl From<Sprite> for Component {
    fn from(sprite: Sprite) -> Self {
        Self { parent: None, data: ComponentData::Sprite(sprite) }
    }
}
