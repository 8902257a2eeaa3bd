//! Recorded drawing commands
//!
//! [`RecordingCanvas`] turns canvas calls into a flat [`DrawCommand`] list.
//! Headless hosts log or replay it; tests assert on it.

use crate::assets::ImageHandle;
use crate::foundation::math::{affine, Mat3, Point2, Vec2};
use crate::render::Canvas;
use std::fmt;

/// A single drawing-context operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Origin moved by an offset
    Translate(Vec2),
    /// Axes rotated (radians)
    Rotate(f32),
    /// Axes scaled
    Scale(Vec2),
    /// Image drawn into a rectangle in current coordinates
    DrawImage {
        /// Image drawn
        image: ImageHandle,
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        w: f32,
        /// Height
        h: f32,
    },
    /// Free-form marker pushed by user render hooks
    Marker(String),
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translate(v) => write!(f, "translate({}, {})", v.x, v.y),
            Self::Rotate(a) => write!(f, "rotate({})", a),
            Self::Scale(v) => write!(f, "scale({}, {})", v.x, v.y),
            Self::DrawImage { image, x, y, w, h } => write!(
                f,
                "drawImage({}x{}, {}, {}, {}, {})",
                image.width(), image.height(), x, y, w, h
            ),
            Self::Marker(label) => write!(f, "[{}]", label),
        }
    }
}

/// Canvas that records every call
///
/// Also tracks the accumulated affine matrix so composed transforms can be
/// checked in world coordinates.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    matrix: Mat3,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    /// Create an empty recording with an identity matrix
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            matrix: Mat3::identity(),
        }
    }

    /// Recorded commands in call order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recording empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Record a marker (for render hooks that draw nothing but want to be seen)
    pub fn mark(&mut self, label: impl Into<String>) {
        self.commands.push(DrawCommand::Marker(label.into()));
    }

    /// Accumulated transform since the last reset
    pub fn current_transform(&self) -> Mat3 {
        self.matrix
    }

    /// Map a point from current drawing coordinates to canvas coordinates
    pub fn to_canvas(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point(&Point2::from(point)).coords
    }

    /// Reset the matrix to identity (start of a frame)
    pub fn reset_transform(&mut self) {
        self.matrix = Mat3::identity();
    }

    /// Clear commands and matrix
    pub fn clear(&mut self) {
        self.commands.clear();
        self.reset_transform();
    }

    /// Number of image draws recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn translate(&mut self, offset: Vec2) {
        self.matrix *= affine::translation(offset);
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.matrix *= affine::rotation(angle);
        self.commands.push(DrawCommand::Rotate(angle));
    }

    fn scale(&mut self, factors: Vec2) {
        self.matrix *= affine::scaling(factors);
        self.commands.push(DrawCommand::Scale(factors));
    }

    fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::DrawImage { image: *image, x, y, w, h });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_records_in_call_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.translate(Vec2::new(1.0, 2.0));
        canvas.mark("hook");
        canvas.rotate(0.5);

        assert_eq!(
            canvas.commands(),
            &[
                DrawCommand::Translate(Vec2::new(1.0, 2.0)),
                DrawCommand::Marker("hook".to_string()),
                DrawCommand::Rotate(0.5),
            ]
        );
        assert_eq!(canvas.draw_count(), 0);
    }

    #[test]
    fn test_matrix_composes_like_a_drawing_context() {
        let mut canvas = RecordingCanvas::new();
        canvas.translate(Vec2::new(10.0, 0.0));
        canvas.rotate(HALF_PI);

        let p = canvas.to_canvas(Vec2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);

        canvas.clear();
        assert!(canvas.commands().is_empty());
        assert_eq!(canvas.current_transform(), Mat3::identity());
    }
}
