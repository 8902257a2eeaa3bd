//! Drawing context consumed by the scene graph

use crate::assets::ImageHandle;
use crate::foundation::math::Vec2;

/// Immediate-mode 2D drawing context
///
/// Transform calls mutate the ambient matrix for the rest of the current
/// render pass. Hosts reset that matrix between frames.
pub trait Canvas {
    /// Move the origin
    fn translate(&mut self, offset: Vec2);

    /// Rotate around the origin (radians)
    fn rotate(&mut self, angle: f32);

    /// Scale the axes
    fn scale(&mut self, factors: Vec2);

    /// Draw an image with its top-left corner at (x, y), stretched to w x h
    fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32, w: f32, h: f32);
}
