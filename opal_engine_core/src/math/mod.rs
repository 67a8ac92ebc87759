pub const EPSILON: f32 = 1e-6;

pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

pub mod matrix;
pub mod vector;

pub use matrix::Mat4;
pub use vector::{Vec3, Vec4};

/// Converts degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}
