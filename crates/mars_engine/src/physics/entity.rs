//! Kinematic state of a simulated body
//!
//! The world owns every [`Entity`]; the physics core only borrows a slice
//! of them for the duration of a call and mutates the kinematic fields in
//! place.

use serde::{Deserialize, Serialize};

use crate::foundation::math::utils::wrap_angle;
use crate::foundation::math::{Matrix4, Quaternion, Vector2, Vector3};

/// A circular rigid body moving in the XY plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    /// Center position in world units
    pub position: Vector2,

    /// Linear velocity in world units per second
    pub velocity: Vector2,

    /// Mass; zero or negative marks the body as immovable
    pub mass: f64,

    /// Heading in radians, kept in `[0, 2π)`
    pub rotation: f64,

    /// Inactive bodies are skipped by integration and collision
    pub active: bool,

    /// Collision radius (`>= 0`)
    pub radius: f64,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            position: Vector2::ZERO,
            velocity: Vector2::ZERO,
            mass: 1.0,
            rotation: 0.0,
            active: true,
            radius: 0.0,
        }
    }
}

impl Entity {
    /// Create an active unit-mass body at rest
    pub fn new(position: Vector2, radius: f64) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            ..Default::default()
        }
    }

    /// Create an immovable body
    pub fn new_static(position: Vector2, radius: f64) -> Self {
        Self::new(position, radius).with_mass(0.0)
    }

    /// Set the initial velocity
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the mass
    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set the heading, wrapped into `[0, 2π)`
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = wrap_angle(rotation);
        self
    }

    /// Set whether the body takes part in simulation
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether forces, impulses and corrections move this body
    pub fn is_movable(&self) -> bool {
        self.mass > 0.0
    }

    /// `1 / mass`, or zero for immovable bodies
    pub fn inverse_mass(&self) -> f64 {
        if self.is_movable() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Linear momentum `mass · velocity` (zero for immovable bodies)
    pub fn momentum(&self) -> Vector2 {
        if self.is_movable() {
            self.velocity.scale(self.mass)
        } else {
            Vector2::ZERO
        }
    }

    /// Kinetic energy `½ m |v|²` (zero for immovable bodies)
    pub fn kinetic_energy(&self) -> f64 {
        if self.is_movable() {
            0.5 * self.mass * self.velocity.length_squared()
        } else {
            0.0
        }
    }

    /// Unit vector along the current heading
    pub fn heading(&self) -> Vector2 {
        Vector2::from_angle(self.rotation)
    }

    /// Model matrix placing this body in the world (translation × rotation about Z)
    pub fn model_matrix(&self) -> Matrix4 {
        Matrix4::from_translation_rotation_z(self.position, self.rotation)
    }

    /// Heading as a rotation about +Z, for collaborators working in 3D
    pub fn orientation(&self) -> Quaternion {
        Quaternion::from_axis_angle(Vector3::Z, self.rotation)
    }
}
