//! Conversions to and from `nalgebra`
//!
//! Collaborators that already keep their transforms in nalgebra (camera
//! rigs, mesh tooling) exchange values with the core through these `From`
//! impls. Matrix cell `(row, column)` maps to nalgebra index
//! `(row, column)`; nalgebra's column-major storage is never exposed.

use super::{Matrix4, Quaternion, Vector2, Vector3, Vector4};

impl From<nalgebra::Vector2<f64>> for Vector2 {
    fn from(v: nalgebra::Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for nalgebra::Vector2<f64> {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<nalgebra::Vector3<f64>> for Vector3 {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Vector4<f64>> for Vector4 {
    fn from(v: nalgebra::Vector4<f64>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for nalgebra::Vector4<f64> {
    fn from(v: Vector4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<nalgebra::Matrix4<f64>> for Matrix4 {
    fn from(m: nalgebra::Matrix4<f64>) -> Self {
        let mut result = Self::zero();
        for row in 0..4 {
            for column in 0..4 {
                result.set(row, column, m[(row, column)]);
            }
        }
        result
    }
}

impl From<Matrix4> for nalgebra::Matrix4<f64> {
    fn from(m: Matrix4) -> Self {
        // from_row_slice reads row-major input regardless of nalgebra's column-major storage
        Self::from_row_slice(m.as_array())
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f64>) -> Self {
        Self::new(q.i, q.j, q.k, q.w)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    fn from(q: Quaternion) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<nalgebra::UnitQuaternion<f64>> for Quaternion {
    fn from(q: nalgebra::UnitQuaternion<f64>) -> Self {
        q.into_inner().into()
    }
}
