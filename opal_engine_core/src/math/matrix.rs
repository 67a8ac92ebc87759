use super::vector::{Vec3, Vec4};
use std::ops::Mul;

/// A column-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// Create a new matrix from 4 columns.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Create a rotation matrix around the X axis.
    /// # Arguments
    /// * `angle` - The angle in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                Vec4::new(1.0, 0.0, 0.0, 0.0),
                Vec4::new(0.0, c, s, 0.0),
                Vec4::new(0.0, -s, c, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        }
    }

    /// Create a rotation matrix around the Y axis.
    /// # Arguments
    /// * `angle` - The angle in radians.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            cols: [
                Vec4::new(c, 0.0, -s, 0.0),
                Vec4::new(0.0, 1.0, 0.0, 0.0),
                Vec4::new(s, 0.0, c, 0.0),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
            ],
        }
    }

    /// Creates a right-handed perspective projection matrix with a depth
    /// range of [0, 1] (the range the wgpu clip space expects).
    /// # Arguments
    /// * `fov_y_radians`: Vertical field of view in radians.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `z_near`: Distance to the near clipping plane (must be positive).
    /// * `z_far`: Distance to the far clipping plane (must be > z_near).
    #[inline]
    pub fn perspective_rh_zo(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        debug_assert!(
            z_near > 0.0 && z_far > z_near,
            "z_near must be > 0, z_far must be > z_near"
        );

        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let aa = f / aspect_ratio;
        let cc = z_far / (z_near - z_far); // zero-to-one depth mapping
        let dd = (z_near * z_far) / (z_near - z_far);

        Self::from_cols(
            Vec4::new(aa, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, cc, -1.0), // -1.0 in W for RH perspective
            Vec4::new(0.0, 0.0, dd, 0.0),
        )
    }

    /// Creates a right-handed view matrix for a camera looking at a target.
    /// # Arguments
    /// * `eye`: The position of the camera in world space.
    /// * `target`: The point the camera is looking at. Must differ from `eye`.
    /// * `up`: The up direction of the camera in world space.
    #[inline]
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize(); // Forward (negative Z axis of camera)
        let s = f.cross(up).normalize(); // Right
        let u = s.cross(f); // Up

        // Inverse of the camera transform: Transpose(R) applied after -T.
        Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        )
    }

    /// Column-major 2D array form, matching the WGSL `mat4x4<f32>` layout
    /// for uniform upload.
    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [
            self.cols[0].to_array(),
            self.cols[1].to_array(),
            self.cols[2].to_array(),
            self.cols[3].to_array(),
        ]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix * Matrix multiplication.
impl Mul<Mat4> for Mat4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        // Result column j = self * rhs column j
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

/// Matrix * Vec4 multiplication (transforming a point/vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        // Column-major definition: result = col0*x + col1*y + col2*z + col3*w
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRAC_PI_2;
    use approx::assert_relative_eq;

    fn assert_vec4_eq(a: Vec4, b: Vec4) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
        assert_relative_eq!(a.w, b.w, epsilon = 1e-5);
    }

    #[test]
    fn identity_is_the_multiplicative_unit() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let m = Mat4::from_rotation_y(0.7);
        let v = Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_vec4_eq((Mat4::IDENTITY * m) * v, m * v);
        assert_vec4_eq(Mat4::IDENTITY * v, v);
    }

    #[test]
    fn quarter_turn_about_y_sends_x_to_negative_z() {
        let m = Mat4::from_rotation_y(FRAC_PI_2);
        assert_vec4_eq(m * Vec4::X, Vec4::new(0.0, 0.0, -1.0, 0.0));
        assert_vec4_eq(m * Vec4::Y, Vec4::Y);
    }

    #[test]
    fn quarter_turn_about_x_sends_y_to_z() {
        let m = Mat4::from_rotation_x(FRAC_PI_2);
        assert_vec4_eq(m * Vec4::Y, Vec4::new(0.0, 0.0, 1.0, 0.0));
        assert_vec4_eq(m * Vec4::X, Vec4::X);
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_and_far_plane_to_one() {
        let m = Mat4::perspective_rh_zo(FRAC_PI_2, 16.0 / 9.0, 0.1, 100.0);

        let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);

        let far = m * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn look_at_puts_the_eye_at_the_view_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let m = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

        assert_vec4_eq(m * Vec4::new(0.0, 0.0, 5.0, 1.0), Vec4::W);
        // The target sits straight ahead, 5 units down the view -Z axis.
        assert_vec4_eq(m * Vec4::W, Vec4::new(0.0, 0.0, -5.0, 1.0));
    }

    #[test]
    fn cols_array_layout_is_column_major() {
        let m = Mat4::from_cols(
            Vec4::new(1.0, 2.0, 3.0, 4.0),
            Vec4::ZERO,
            Vec4::ZERO,
            Vec4::W,
        );
        let array = m.to_cols_array_2d();
        assert_eq!(array[0], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(array[3], [0.0, 0.0, 0.0, 1.0]);
    }
}
