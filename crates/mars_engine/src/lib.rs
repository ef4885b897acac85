//! # Mars Engine
//!
//! Math and physics core for a 2D space-flight game.
//!
//! ## Features
//!
//! - **Vector Math**: 2D/3D/4D vectors with exact or fast square roots
//! - **Transforms**: 4×4 matrices (projection, view, model) and quaternions
//! - **Rigid Bodies**: Semi-implicit Euler integration with drag
//! - **Collisions**: Circle-circle detection with impulse response
//! - **Configuration**: TOML / RON loading with validation
//!
//! ## Quick Start
//!
//! ```rust
//! use mars_engine::prelude::*;
//!
//! let config = PhysicsConfig::default();
//! let mut bodies = vec![
//!     Entity::new(Vector2::new(-1.0, 0.0), 1.0).with_velocity(Vector2::new(2.0, 0.0)),
//!     Entity::new_static(Vector2::new(1.0, 0.0), 1.0),
//! ];
//!
//! apply_force(&mut bodies[0], Vector2::new(0.0, 1.0));
//! let report = step(&mut bodies, &config);
//! assert_eq!(report.collisions.len(), 1);
//!
//! let model = bodies[0].model_matrix();
//! assert!(model.inverse().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::many_single_char_names)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod physics;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, ConfigFormat, PhysicsConfig, SimulationConfig},
        foundation::{
            math::{Matrix4, MathError, Precision, Quaternion, Vector2, Vector3, Vector4},
            time::{FixedTimestep, Stopwatch},
        },
        physics::{
            apply_force, apply_torque, detect_collision, resolve_collisions, step, update_positions,
            CollisionEvent, CollisionKind, Entity, StepReport,
        },
    };
}
