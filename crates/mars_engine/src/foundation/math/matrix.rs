//! Row-major 4×4 transform and projection matrix
//!
//! Cells are stored row-major (`index = row * 4 + column`) and vectors are
//! treated as columns, so `a.multiply(&b)` applied to `v` transforms by `b`
//! first. All factories follow the right-handed OpenGL convention: camera
//! looks down -Z and clip-space depth spans `[-1, 1]`.
//!
//! Unlike the vector types, inversion is fail-loud. A near-singular matrix
//! yields [`MathError::SingularMatrix`] rather than a silently wrong inverse.

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

use super::constants::EPSILON;
use super::vector::{Vector2, Vector3, Vector4};
use super::MathError;

/// Row-major 4×4 matrix of `f64` cells
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Matrix4 {
    cells: [f64; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

#[allow(clippy::should_implement_trait)]
impl Matrix4 {
    /// The identity matrix
    pub const IDENTITY: Self = Self {
        cells: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Create the identity matrix
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Create a matrix with every cell zero
    pub const fn zero() -> Self {
        Self { cells: [0.0; 16] }
    }

    /// Create from 16 row-major cells
    pub const fn from_array(cells: [f64; 16]) -> Self {
        Self { cells }
    }

    /// Create from four rows
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        Self {
            cells: [
                r0[0], r0[1], r0[2], r0[3], //
                r1[0], r1[1], r1[2], r1[3], //
                r2[0], r2[1], r2[2], r2[3], //
                r3[0], r3[1], r3[2], r3[3],
            ],
        }
    }

    /// Row-major cells
    pub const fn as_array(&self) -> &[f64; 16] {
        &self.cells
    }

    /// Cell at `(row, column)`
    ///
    /// # Panics
    /// Panics if `row` or `column` is not below 4.
    #[inline]
    pub const fn get(&self, row: usize, column: usize) -> f64 {
        assert!(row < 4 && column < 4, "matrix index out of range");
        self.cells[row * 4 + column]
    }

    /// Overwrite the cell at `(row, column)`
    ///
    /// # Panics
    /// Panics if `row` or `column` is not below 4.
    #[inline]
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        assert!(row < 4 && column < 4, "matrix index out of range");
        self.cells[row * 4 + column] = value;
    }

    /// Row `index` as a vector
    pub const fn row(&self, index: usize) -> Vector4 {
        Vector4::new(
            self.get(index, 0),
            self.get(index, 1),
            self.get(index, 2),
            self.get(index, 3),
        )
    }

    /// Column `index` as a vector
    pub const fn column(&self, index: usize) -> Vector4 {
        Vector4::new(
            self.get(0, index),
            self.get(1, index),
            self.get(2, index),
            self.get(3, index),
        )
    }

    /// Matrix product `self × other`
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut cells = [0.0; 16];
        for row in 0..4 {
            for column in 0..4 {
                cells[row * 4 + column] = (0..4)
                    .map(|k| self.cells[row * 4 + k] * other.cells[k * 4 + column])
                    .sum();
            }
        }
        Self { cells }
    }

    /// Multiply every cell by `factor`
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            cells: self.cells.map(|cell| cell * factor),
        }
    }

    /// Cell-wise sum
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut cells = self.cells;
        for (cell, rhs) in cells.iter_mut().zip(other.cells) {
            *cell += rhs;
        }
        Self { cells }
    }

    /// Cell-wise difference
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let mut cells = self.cells;
        for (cell, rhs) in cells.iter_mut().zip(other.cells) {
            *cell -= rhs;
        }
        Self { cells }
    }

    /// Swap rows and columns
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut cells = [0.0; 16];
        for row in 0..4 {
            for column in 0..4 {
                cells[column * 4 + row] = self.cells[row * 4 + column];
            }
        }
        Self { cells }
    }

    /// Determinant of the 3×3 submatrix left after removing `row` and `column`
    fn minor(&self, row: usize, column: usize) -> f64 {
        let mut sub = [0.0; 9];
        let mut index = 0;
        for r in (0..4).filter(|&r| r != row) {
            for c in (0..4).filter(|&c| c != column) {
                sub[index] = self.cells[r * 4 + c];
                index += 1;
            }
        }
        sub[0] * (sub[4] * sub[8] - sub[5] * sub[7]) - sub[1] * (sub[3] * sub[8] - sub[5] * sub[6])
            + sub[2] * (sub[3] * sub[7] - sub[4] * sub[6])
    }

    fn cofactor(&self, row: usize, column: usize) -> f64 {
        let minor = self.minor(row, column);
        if (row + column) % 2 == 0 {
            minor
        } else {
            -minor
        }
    }

    /// Determinant by cofactor expansion along the first row
    pub fn determinant(&self) -> f64 {
        (0..4).map(|column| self.cells[column] * self.cofactor(0, column)).sum()
    }

    /// Inverse as adjugate divided by determinant
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when `|determinant| < 1e-10`.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let determinant = self.determinant();
        if determinant.abs() < EPSILON {
            return Err(MathError::SingularMatrix { determinant });
        }

        let inverse_determinant = 1.0 / determinant;
        let mut cells = [0.0; 16];
        for row in 0..4 {
            for column in 0..4 {
                // Adjugate is the transposed cofactor matrix
                cells[row * 4 + column] = self.cofactor(column, row) * inverse_determinant;
            }
        }
        Ok(Self { cells })
    }

    /// Inverse, or identity when the matrix is singular
    #[must_use]
    pub fn inverse_or_identity(&self) -> Self {
        self.inverse().unwrap_or_else(|error| {
            log::warn!("{error}; substituting identity");
            Self::IDENTITY
        })
    }

    /// Full homogeneous transform `self × v`
    pub fn transform_vector4(&self, v: Vector4) -> Vector4 {
        Vector4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Transform a point (`w = 1`), dividing by the resulting `w` unless it is 0 or 1
    #[allow(clippy::float_cmp)]
    pub fn transform_vector3(&self, v: Vector3) -> Vector3 {
        let result = self.transform_vector4(Vector4::from_point(v));
        let point = result.truncate();
        if result.w == 0.0 || result.w == 1.0 {
            point
        } else {
            point.scale(1.0 / result.w)
        }
    }

    /// Transform a direction (`w = 0`): rotation and scale apply, translation does not
    pub fn transform_direction(&self, v: Vector3) -> Vector3 {
        self.transform_vector4(Vector4::from_direction(v)).truncate()
    }

    /// Translation by `offset`
    pub const fn translation(offset: Vector3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Axis-aligned scaling by `factors`
    pub const fn scaling(factors: Vector3) -> Self {
        Self::from_rows([
            [factors.x, 0.0, 0.0, 0.0],
            [0.0, factors.y, 0.0, 0.0],
            [0.0, 0.0, factors.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation about +X by `angle` radians
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation about +Y by `angle` radians
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation about +Z by `angle` radians
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection
    ///
    /// `fov_y` is the vertical field of view in radians. Row 3 is
    /// `(0, 0, -1, 0)`, so the projected `w` equals `-z` of the view-space
    /// point and depth maps `[-near, -far]` onto `[-1, 1]`.
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        debug_assert!(aspect != 0.0 && near != far, "degenerate perspective frustum");
        let focal = 1.0 / (fov_y * 0.5).tan();
        let depth = near - far;
        Self::from_rows([
            [focal / aspect, 0.0, 0.0, 0.0],
            [0.0, focal, 0.0, 0.0],
            [0.0, 0.0, (far + near) / depth, 2.0 * far * near / depth],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Right-handed orthographic projection mapping the box onto `[-1, 1]³`
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        debug_assert!(left != right && bottom != top && near != far, "degenerate orthographic volume");
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;
        Self::from_rows([
            [2.0 / width, 0.0, 0.0, -(right + left) / width],
            [0.0, 2.0 / height, 0.0, -(top + bottom) / height],
            [0.0, 0.0, -2.0 / depth, -(far + near) / depth],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed view matrix looking from `eye` toward `target`
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let camera_up = right.cross(forward);
        Self::from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [camera_up.x, camera_up.y, camera_up.z, -camera_up.dot(eye)],
            [-forward.x, -forward.y, -forward.z, forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Model matrix for a 2D body: rotation about Z, then translation in the XY plane
    pub fn from_translation_rotation_z(position: Vector2, rotation: f64) -> Self {
        Self::translation(position.extend(0.0)).multiply(&Self::rotation_z(rotation))
    }

    /// Column-major `f32` layout for GPU uniform upload
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_gpu_columns(&self) -> [[f32; 4]; 4] {
        let mut columns = [[0.0_f32; 4]; 4];
        for (column, out) in columns.iter_mut().enumerate() {
            for (row, cell) in out.iter_mut().enumerate() {
                *cell = self.cells[row * 4 + column] as f32;
            }
        }
        columns
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<f64> for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform_vector4(rhs)
    }
}

impl AbsDiffEq for Matrix4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        <f64 as AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix4 {
    fn default_max_relative() -> f64 {
        <f64 as RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
