//! Math utilities and types
//!
//! Provides the value types the physics core and the renderer share:
//! 2D/3D/4D vectors, a row-major 4×4 matrix and a rotation quaternion.
//!
//! Two failure postures coexist here. Vectors and quaternions are
//! fail-soft (degenerate input yields zero / identity); [`Matrix4::inverse`]
//! is fail-loud and returns [`MathError::SingularMatrix`].

pub mod interop;
pub mod matrix;
pub mod numeric;
pub mod quaternion;
pub mod vector;

pub use matrix::Matrix4;
pub use numeric::Precision;
pub use quaternion::Quaternion;
pub use vector::{Vector2, Vector3, Vector4};

use thiserror::Error;

/// Math errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// Matrix determinant too close to zero to invert
    #[error("Matrix is singular (determinant {determinant:e})")]
    SingularMatrix {
        /// Determinant that failed the threshold
        determinant: f64,
    },
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// 2 * Pi
    pub const TAU: f64 = std::f64::consts::TAU;

    /// Pi / 2
    pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

    /// Pi / 4
    pub const QUARTER_PI: f64 = std::f64::consts::FRAC_PI_4;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f64 = 180.0 / PI;

    /// Threshold below which a squared magnitude or determinant counts as zero
    pub const EPSILON: f64 = 1e-10;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }

    /// Wrap an angle into `[0, 2π)`
    ///
    /// Angles within a few turns of the range are wrapped by repeated addition
    /// or subtraction of `2π`; larger magnitudes are reduced with `rem_euclid`
    /// first so the cost stays constant. Non-finite input is returned
    /// unchanged; callers decide how to recover.
    pub fn wrap_angle(mut angle: f64) -> f64 {
        if !angle.is_finite() {
            return angle;
        }
        if angle.abs() >= DIRECT_WRAP_LIMIT {
            angle = angle.rem_euclid(constants::TAU);
        }
        while angle >= constants::TAU {
            angle -= constants::TAU;
        }
        while angle < 0.0 {
            angle += constants::TAU;
        }
        // A tiny negative angle plus 2π rounds up to exactly 2π
        if angle >= constants::TAU {
            angle = 0.0;
        }
        angle
    }

    const DIRECT_WRAP_LIMIT: f64 = 4.0 * constants::TAU;
}
