//! Math utilities and types
//!
//! Provides the 2D math types used by transforms and the drawing context.

pub use nalgebra::{Vector2, Matrix3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (2D affine transforms in homogeneous coordinates)
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// 2D affine matrix builders matching the drawing-context operations
pub mod affine {
    use super::{Mat3, Vec2};

    /// Translation matrix
    pub fn translation(offset: Vec2) -> Mat3 {
        Mat3::new_translation(&offset)
    }

    /// Counter-clockwise rotation matrix (radians, y-down screens make it clockwise)
    pub fn rotation(angle: f32) -> Mat3 {
        Mat3::new_rotation(angle)
    }

    /// Non-uniform scaling matrix
    pub fn scaling(factors: Vec2) -> Mat3 {
        Mat3::new_nonuniform_scaling(&factors)
    }

    /// Translate, then rotate, then scale (the order a transform applies them)
    pub fn trs(position: Vec2, rotation_rad: f32, scale: Vec2) -> Mat3 {
        translation(position) * rotation(rotation_rad) * scaling(scale)
    }
}
