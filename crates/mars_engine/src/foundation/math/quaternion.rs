//! Unit-quaternion rotations
//!
//! Composition uses the Hamilton product: `a.hamilton_product(b)` (or
//! `a * b`) applies `b`'s rotation first, then `a`'s. Anything that consumes
//! a quaternion as a rotation works on a normalized copy, and degenerate
//! input falls back to the identity rather than dividing by zero.

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

use super::constants::{EPSILON, HALF_PI};
use super::matrix::Matrix4;
use super::vector::Vector3;

/// Below this `sin θ` slerp falls back to normalized lerp.
const SLERP_SIN_THRESHOLD: f64 = 1e-6;

/// Quaternion `x·i + y·j + z·k + w`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Quaternion {
    /// i component
    pub x: f64,
    /// j component
    pub y: f64,
    /// k component
    pub z: f64,
    /// Scalar component
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[allow(clippy::should_implement_trait)]
impl Quaternion {
    /// The identity rotation `(0, 0, 0, 1)`
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a quaternion from raw components
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// The identity rotation
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Vector part `(x, y, z)`
    pub const fn vector_part(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Component-wise sum
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z, self.w + other.w)
    }

    /// Component-wise difference
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z, self.w - other.w)
    }

    /// Multiply every component by `factor`
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor, self.w * factor)
    }

    /// Negate every component (same rotation, opposite hemisphere)
    pub fn neg(self) -> Self {
        self.scale(-1.0)
    }

    /// Hamilton product `self × other`: `other` rotates first
    pub fn hamilton_product(self, other: Self) -> Self {
        let (a, b) = (self, other);
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    /// Four-component dot product
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Squared norm
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Norm
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit quaternion, or identity when the norm is below `1e-10`
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length < EPSILON {
            return Self::IDENTITY;
        }
        self.scale(1.0 / length)
    }

    /// Negate the vector part
    pub const fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse, or identity when the squared norm is below `1e-10`
    pub fn inverse(self) -> Self {
        let length_squared = self.length_squared();
        if length_squared < EPSILON {
            return Self::IDENTITY;
        }
        self.conjugate().scale(1.0 / length_squared)
    }

    /// Rotate `v` by this rotation (`q · v · q̄` on a normalized copy)
    pub fn rotate_vector3(self, v: Vector3) -> Vector3 {
        let q = self.normalize();
        let pure = Self::new(v.x, v.y, v.z, 0.0);
        q.hamilton_product(pure)
            .hamilton_product(q.conjugate())
            .vector_part()
    }

    /// Homogeneous rotation matrix (all 16 cells written)
    pub fn to_rotation_matrix(self) -> Matrix4 {
        let q = self.normalize();
        let (xx, xy, xz, xw) = (q.x * q.x, q.x * q.y, q.x * q.z, q.x * q.w);
        let (yy, yz, yw) = (q.y * q.y, q.y * q.z, q.y * q.w);
        let (zz, zw) = (q.z * q.z, q.z * q.w);

        Matrix4::from_rows([
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - zw), 2.0 * (xz + yw), 0.0],
            [2.0 * (xy + zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - xw), 0.0],
            [2.0 * (xz - yw), 2.0 * (yz + xw), 1.0 - 2.0 * (xx + yy), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Extract the rotation from the upper-left 3×3 block of `matrix`
    ///
    /// Solves for whichever of `w`, `x`, `y`, `z` has the largest magnitude
    /// first (trace, then `m00`, `m11`, `m22`) to stay numerically stable.
    pub fn from_matrix(matrix: &Matrix4) -> Self {
        let m = |row, column| matrix.get(row, column);
        let (m00, m11, m22) = (m(0, 0), m(1, 1), m(2, 2));
        let trace = m00 + m11 + m22;

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new(
                (m(2, 1) - m(1, 2)) * s,
                (m(0, 2) - m(2, 0)) * s,
                (m(1, 0) - m(0, 1)) * s,
                0.25 / s,
            )
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            Self::new(
                0.25 * s,
                (m(0, 1) + m(1, 0)) / s,
                (m(0, 2) + m(2, 0)) / s,
                (m(2, 1) - m(1, 2)) / s,
            )
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            Self::new(
                (m(0, 1) + m(1, 0)) / s,
                0.25 * s,
                (m(1, 2) + m(2, 1)) / s,
                (m(0, 2) - m(2, 0)) / s,
            )
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            Self::new(
                (m(0, 2) + m(2, 0)) / s,
                (m(1, 2) + m(2, 1)) / s,
                0.25 * s,
                (m(1, 0) - m(0, 1)) / s,
            )
        }
    }

    /// Spherical linear interpolation along the shortest arc
    ///
    /// `t` is clamped to `[0, 1]`. Nearly parallel inputs fall back to a
    /// normalized linear blend.
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut end = other;
        let mut cos_theta = self.dot(other);
        if cos_theta < 0.0 {
            end = end.neg();
            cos_theta = -cos_theta;
        }
        let cos_theta = cos_theta.clamp(-1.0, 1.0);

        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        if sin_theta < SLERP_SIN_THRESHOLD {
            return self.add(end.sub(self).scale(t)).normalize();
        }

        let start_weight = ((1.0 - t) * theta).sin() / sin_theta;
        let end_weight = (t * theta).sin() / sin_theta;
        self.scale(start_weight).add(end.scale(end_weight)).normalize()
    }

    /// Normalized linear interpolation along the shortest arc
    pub fn nlerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let end = if self.dot(other) < 0.0 { other.neg() } else { other };
        self.add(end.sub(self).scale(t)).normalize()
    }

    /// Rotation of `angle` radians about `axis`; a zero axis gives identity
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let axis = axis.normalize();
        if axis == Vector3::ZERO {
            return Self::IDENTITY;
        }
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Unit axis and angle in `[0, 2π]`; identity reports the X axis
    pub fn to_axis_angle(self) -> (Vector3, f64) {
        let q = self.normalize();
        let angle = 2.0 * q.w.clamp(-1.0, 1.0).acos();
        let sin_half = (1.0 - q.w * q.w).max(0.0).sqrt();
        if sin_half < SLERP_SIN_THRESHOLD {
            return (Vector3::X, angle);
        }
        (q.vector_part().scale(1.0 / sin_half), angle)
    }

    /// Rotation from ZYX Euler angles: yaw about Z, then pitch about Y, then roll about X
    pub fn from_euler_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self::new(
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
    }

    /// ZYX Euler angles `(roll, pitch, yaw)`; pitch saturates at `±π/2`
    pub fn to_euler_angles(self) -> Vector3 {
        let q = self.normalize();

        let roll = (2.0 * (q.w * q.x + q.y * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));

        let sin_pitch = 2.0 * (q.w * q.y - q.z * q.x);
        let pitch = if sin_pitch.abs() >= 1.0 {
            HALF_PI.copysign(sin_pitch)
        } else {
            sin_pitch.asin()
        };

        let yaw = (2.0 * (q.w * q.z + q.x * q.y)).atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z));

        Vector3::new(roll, pitch, yaw)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::add(self, rhs)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::sub(self, rhs)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::neg(self)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.hamilton_product(rhs)
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Mul<Vector3> for Quaternion {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.rotate_vector3(rhs)
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        <f64 as AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
            && self.w.abs_diff_eq(&other.w, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        <f64 as RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
            && self.w.relative_eq(&other.w, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::{PI, QUARTER_PI};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const TOLERANCE: f64 = 1e-9;

    fn same_rotation(a: Quaternion, b: Quaternion) -> bool {
        a.normalize().dot(b.normalize()).abs() > 1.0 - 1e-9
    }

    fn sample_rotations() -> Vec<Quaternion> {
        vec![
            Quaternion::IDENTITY,
            Quaternion::from_axis_angle(Vector3::X, 0.4),
            Quaternion::from_axis_angle(Vector3::new(1.0, 2.0, -0.5), 2.2),
            Quaternion::from_euler_angles(0.3, -1.1, 2.9),
            Quaternion::new(0.1, -0.7, 0.3, 0.2).normalize(),
        ]
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Quaternion::default(), Quaternion::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Quaternion::IDENTITY.rotate_vector3(Vector3::Y), Vector3::Y);
    }

    #[test]
    fn test_component_wise_arithmetic() {
        let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = Quaternion::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b, Quaternion::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a - b, Quaternion::new(0.5, 1.5, 2.5, 3.5));
        assert_eq!(a * 2.0, Quaternion::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(a.conjugate(), Quaternion::new(-1.0, -2.0, -3.0, 4.0));
    }

    #[test]
    fn test_hamilton_product_basis() {
        let i = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(i * j, k);
        assert_eq!(j * i, -k);
        assert_eq!(i * i, Quaternion::new(0.0, 0.0, 0.0, -1.0));
    }

    #[test]
    fn test_composition_applies_right_operand_first() {
        let about_x = Quaternion::from_axis_angle(Vector3::X, PI / 2.0);
        let about_z = Quaternion::from_axis_angle(Vector3::Z, PI / 2.0);
        let v = Vector3::Y;

        let composed = (about_z * about_x).rotate_vector3(v);
        let sequential = about_z.rotate_vector3(about_x.rotate_vector3(v));
        assert_relative_eq!(composed, sequential, epsilon = TOLERANCE);

        let reversed = (about_x * about_z).rotate_vector3(v);
        assert!((composed - reversed).length() > 0.5);
    }

    #[test]
    fn test_normalize_and_inverse_fail_soft() {
        let tiny = Quaternion::new(1e-12, 0.0, 0.0, 0.0);
        assert_eq!(tiny.normalize(), Quaternion::IDENTITY);
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).inverse(), Quaternion::IDENTITY);

        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_relative_eq!(q.normalize().length(), 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(q * q.inverse(), Quaternion::IDENTITY, epsilon = TOLERANCE);
    }

    #[test]
    fn test_rotation_round_trip() {
        let vectors = [Vector3::X, Vector3::new(1.5, -2.0, 0.25), Vector3::new(-7.0, 3.0, 11.0)];
        for q in sample_rotations() {
            for v in vectors {
                let round_trip = q.rotate_vector3(q.inverse().rotate_vector3(v));
                assert_relative_eq!(round_trip, v, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_rotate_normalizes_internally() {
        let unit = Quaternion::from_axis_angle(Vector3::Z, 0.8);
        let stretched = unit * 3.0;
        let v = Vector3::new(2.0, 1.0, 0.0);
        assert_relative_eq!(stretched.rotate_vector3(v), unit.rotate_vector3(v), epsilon = TOLERANCE);
    }

    #[test]
    fn test_rotation_matrix_matches_vector_rotation() {
        let v = Vector3::new(0.3, -1.2, 2.0);
        for q in sample_rotations() {
            let by_matrix = q.to_rotation_matrix().transform_vector3(v);
            assert_relative_eq!(by_matrix, q.rotate_vector3(v), epsilon = TOLERANCE);
        }
    }

    #[test]
    fn test_rotation_matrix_cells() {
        let m = Quaternion::from_axis_angle(Vector3::Z, 0.6).to_rotation_matrix();
        assert_relative_eq!(m, Matrix4::rotation_z(0.6), epsilon = TOLERANCE);

        let m = Quaternion::new(0.2, 0.4, -0.1, 0.9).to_rotation_matrix();
        assert_eq!(m.row(3), crate::foundation::math::Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(m.column(3), crate::foundation::math::Vector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_matrix_all_branches() {
        let rotations = [
            // trace > 0
            Quaternion::from_axis_angle(Vector3::new(1.0, 1.0, 0.0), 0.5),
            // m00 dominant
            Quaternion::from_axis_angle(Vector3::X, PI),
            // m11 dominant
            Quaternion::from_axis_angle(Vector3::Y, PI * 0.95),
            // m22 dominant
            Quaternion::from_axis_angle(Vector3::new(0.1, 0.0, 1.0), PI),
        ];
        for q in rotations {
            let recovered = Quaternion::from_matrix(&q.to_rotation_matrix());
            assert!(same_rotation(q, recovered), "{q:?} recovered as {recovered:?}");
        }
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quaternion::from_axis_angle(Vector3::Z, 0.2);
        let b = Quaternion::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 2.0);

        assert_relative_eq!(a.slerp(b, 0.0), a, epsilon = TOLERANCE);
        assert!(same_rotation(a.slerp(b, 1.0), b));
        assert_relative_eq!(a.slerp(b, -3.0), a, epsilon = TOLERANCE);
        assert!(same_rotation(a.slerp(b, 7.0), b));

        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_relative_eq!(a.slerp(a, t), a, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn test_slerp_constant_angular_velocity() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vector3::Z, PI / 2.0);
        let middle = Quaternion::slerp(a, b, 0.5);
        assert_relative_eq!(middle, Quaternion::from_axis_angle(Vector3::Z, QUARTER_PI), epsilon = TOLERANCE);
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let a = Quaternion::from_axis_angle(Vector3::Z, 0.1);
        let b = Quaternion::from_axis_angle(Vector3::Z, 0.3).neg();
        let middle = a.slerp(b, 0.5);
        assert!(same_rotation(middle, Quaternion::from_axis_angle(Vector3::Z, 0.2)));
        assert!(middle.w > 0.0);
    }

    #[test]
    fn test_nlerp_endpoints() {
        let a = Quaternion::from_axis_angle(Vector3::X, 0.3);
        let b = Quaternion::from_axis_angle(Vector3::X, 1.3);
        assert_relative_eq!(a.nlerp(b, 0.0), a, epsilon = TOLERANCE);
        assert_relative_eq!(a.nlerp(b, 1.0), b, epsilon = TOLERANCE);
    }

    #[test]
    fn test_axis_angle_round_trip() {
        let axis = Vector3::new(1.0, -2.0, 2.0).normalize();
        let (recovered_axis, angle) = Quaternion::from_axis_angle(axis, 1.25).to_axis_angle();
        assert_relative_eq!(recovered_axis, axis, epsilon = TOLERANCE);
        assert_relative_eq!(angle, 1.25, epsilon = TOLERANCE);

        assert_eq!(Quaternion::from_axis_angle(Vector3::ZERO, 1.0), Quaternion::IDENTITY);
        assert_abs_diff_eq!(Quaternion::IDENTITY.to_axis_angle().1, 0.0);
    }

    #[test]
    fn test_euler_matches_matrix_composition() {
        let (roll, pitch, yaw) = (0.3, -0.7, 1.9);
        let q = Quaternion::from_euler_angles(roll, pitch, yaw);
        let expected = Matrix4::rotation_z(yaw) * Matrix4::rotation_y(pitch) * Matrix4::rotation_x(roll);
        assert_relative_eq!(q.to_rotation_matrix(), expected, epsilon = TOLERANCE);
    }

    #[test]
    fn test_euler_round_trip() {
        let angles = Vector3::new(0.4, 0.9, -2.1);
        let recovered = Quaternion::from_euler_angles(angles.x, angles.y, angles.z).to_euler_angles();
        assert_relative_eq!(recovered, angles, epsilon = TOLERANCE);
    }

    #[test]
    fn test_euler_gimbal_lock_saturates_pitch() {
        let angles = Quaternion::from_euler_angles(0.0, PI / 2.0, 0.0).to_euler_angles();
        assert_relative_eq!(angles.y, PI / 2.0, epsilon = 1e-6);
    }
}
