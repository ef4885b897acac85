//! 2D, 3D and 4D vector value types
//!
//! Vectors are plain `Copy` values. Each arithmetic operation exists as a
//! named method with a statically-typed operand (`scale` takes a scalar,
//! `component_mul` takes a vector); the `std::ops` impls delegate to them.
//!
//! Division and normalization are fail-soft: dividing by exactly zero or
//! normalizing a (near) zero vector yields zeros instead of NaN.

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use super::constants::EPSILON;
use super::numeric::Precision;

/// Operations shared by every vector dimension.
macro_rules! impl_vector_common {
    ($name:ident { $($field:ident),+ }) => {
        #[allow(clippy::should_implement_trait)]
        impl $name {
            /// The zero vector
            pub const ZERO: Self = Self { $($field: 0.0),+ };

            /// Vector with every component set to `value`
            #[inline]
            pub const fn splat(value: f64) -> Self {
                Self { $($field: value),+ }
            }

            /// Component-wise sum
            #[inline]
            pub fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field),+ }
            }

            /// Component-wise difference
            #[inline]
            pub fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field),+ }
            }

            /// Multiply every component by `factor`
            #[inline]
            pub fn scale(self, factor: f64) -> Self {
                Self { $($field: self.$field * factor),+ }
            }

            /// Component-wise (Hadamard) product
            #[inline]
            pub fn component_mul(self, other: Self) -> Self {
                Self { $($field: self.$field * other.$field),+ }
            }

            /// Divide every component by `divisor`; zero divisor gives the zero vector
            #[inline]
            pub fn div_scalar(self, divisor: f64) -> Self {
                if divisor == 0.0 {
                    return Self::ZERO;
                }
                Self { $($field: self.$field / divisor),+ }
            }

            /// Component-wise quotient; components with a zero divisor become zero
            #[inline]
            pub fn component_div(self, other: Self) -> Self {
                Self {
                    $($field: if other.$field == 0.0 { 0.0 } else { self.$field / other.$field }),+
                }
            }

            /// Negate every component
            #[inline]
            pub fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }

            /// Dot product
            #[inline]
            pub fn dot(self, other: Self) -> f64 {
                0.0 $(+ self.$field * other.$field)+
            }

            /// Squared Euclidean length
            #[inline]
            pub fn length_squared(self) -> f64 {
                self.dot(self)
            }

            /// Euclidean length
            #[inline]
            pub fn length(self) -> f64 {
                self.length_with(Precision::Exact)
            }

            /// Euclidean length computed in the given precision mode
            #[inline]
            pub fn length_with(self, precision: Precision) -> f64 {
                precision.sqrt(self.length_squared())
            }

            /// Unit vector in the same direction, or zero for (near) zero input
            #[inline]
            pub fn normalize(self) -> Self {
                self.normalize_with(Precision::Exact)
            }

            /// [`normalize`](Self::normalize) in the given precision mode
            #[inline]
            pub fn normalize_with(self, precision: Precision) -> Self {
                let length_squared = self.length_squared();
                if length_squared <= EPSILON {
                    return Self::ZERO;
                }
                self.scale(precision.inv_sqrt(length_squared))
            }

            /// Squared distance between two points
            #[inline]
            pub fn distance_squared(self, other: Self) -> f64 {
                other.sub(self).length_squared()
            }

            /// Distance between two points
            #[inline]
            pub fn distance(self, other: Self) -> f64 {
                other.sub(self).length()
            }

            /// Linear interpolation, `t = 0` gives `self`
            #[inline]
            pub fn lerp(self, other: Self, t: f64) -> Self {
                self.add(other.sub(self).scale(t))
            }

            /// True when no component is NaN or infinite
            #[inline]
            pub fn is_finite(self) -> bool {
                true $(&& self.$field.is_finite())+
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $name::add(self, rhs)
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $name::sub(self, rhs)
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                $name::neg(self)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f64) -> Self {
                self.scale(rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                rhs.scale(self)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f64) -> Self {
                self.div_scalar(rhs)
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = $name::add(*self, rhs);
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = $name::sub(*self, rhs);
            }
        }

        impl MulAssign<f64> for $name {
            #[inline]
            fn mul_assign(&mut self, rhs: f64) {
                *self = self.scale(rhs);
            }
        }

        impl AbsDiffEq for $name {
            type Epsilon = f64;

            fn default_epsilon() -> f64 {
                <f64 as AbsDiffEq>::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
                true $(&& self.$field.abs_diff_eq(&other.$field, epsilon))+
            }
        }

        impl RelativeEq for $name {
            fn default_max_relative() -> f64 {
                <f64 as RelativeEq>::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
                true $(&& self.$field.relative_eq(&other.$field, epsilon, max_relative))+
            }
        }
    };
}

/// 2D vector
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

/// 3D vector
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

/// 4D (homogeneous) vector
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector4 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
    /// W component
    pub w: f64,
}

impl_vector_common!(Vector2 { x, y });
impl_vector_common!(Vector3 { x, y, z });
impl_vector_common!(Vector4 { x, y, z, w });

impl Vector2 {
    /// Unit X axis
    pub const X: Self = Self::new(1.0, 0.0);
    /// Unit Y axis
    pub const Y: Self = Self::new(0.0, 1.0);

    /// Create a new vector
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians from the X axis
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    /// Z component of the 3D cross product of `(x, y, 0)` and `(ox, oy, 0)`
    #[inline]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular `(-y, x)`
    #[inline]
    pub const fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotate counter-clockwise by `angle` radians
    #[inline]
    pub fn rotate(self, angle: f64) -> Self {
        self.rotate_with(angle, Precision::Exact)
    }

    /// [`rotate`](Self::rotate) in the given precision mode
    pub fn rotate_with(self, angle: f64, precision: Precision) -> Self {
        let (sin, cos) = precision.sin_cos(angle);
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Heading of this vector in radians, `(-π, π]`
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unsigned angle to `other` in `[0, π]`; zero if either vector is (near) zero
    pub fn angle_between(self, other: Self) -> f64 {
        let denominator = (self.length_squared() * other.length_squared()).sqrt();
        if denominator <= EPSILON {
            return 0.0;
        }
        (self.dot(other) / denominator).clamp(-1.0, 1.0).acos()
    }

    /// Angle to `other`, negative when `other` lies clockwise of `self`
    pub fn signed_angle_between(self, other: Self) -> f64 {
        let angle = self.angle_between(other);
        if self.cross(other) < 0.0 {
            -angle
        } else {
            angle
        }
    }

    /// Lift to 3D with the given Z
    #[inline]
    pub const fn extend(self, z: f64) -> Vector3 {
        Vector3::new(self.x, self.y, z)
    }

    /// Components as an array
    #[inline]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Vector3 {
    /// Unit X axis
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit Y axis
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit Z axis
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a new vector
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Cross product (right-handed)
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Lift to homogeneous 4D with the given W
    #[inline]
    pub const fn extend(self, w: f64) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    /// Drop the Z component
    #[inline]
    pub const fn truncate(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// Components as an array
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Vector4 {
    /// Create a new vector
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Homogeneous point (`w = 1`)
    #[inline]
    pub const fn from_point(point: Vector3) -> Self {
        point.extend(1.0)
    }

    /// Homogeneous direction (`w = 0`)
    #[inline]
    pub const fn from_direction(direction: Vector3) -> Self {
        direction.extend(0.0)
    }

    /// Drop the W component
    #[inline]
    pub const fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Components as an array
    #[inline]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f64; 4]> for Vector4 {
    fn from([x, y, z, w]: [f64; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}
