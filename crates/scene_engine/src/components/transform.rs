//! Transform component

use super::RenderContinuation;
use crate::foundation::math::{affine, Mat3, Vec2};
use crate::render::Canvas;

/// Position, rotation and scale for a node's subtree
///
/// Applied to the drawing context as translate, then rotate, then scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent's origin
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Axis scale factors
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation (radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-parent matrix
    pub fn to_matrix(&self) -> Mat3 {
        affine::trs(self.position, self.rotation, self.scale)
    }

    /// Wrap `next` so the drawing context is transformed before it runs
    ///
    /// The values are captured when the continuation is built.
    pub fn apply_transform<'a>(&self, next: RenderContinuation<'a>) -> RenderContinuation<'a> {
        let Self { position, rotation, scale } = *self;
        Box::new(move |canvas: &mut dyn Canvas, interpolation: f64| {
            canvas.translate(position);
            canvas.rotate(rotation);
            canvas.scale(scale);
            next(canvas, interpolation);
        })
    }
}
