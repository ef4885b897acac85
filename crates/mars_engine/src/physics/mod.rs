//! Physics module for 2D rigid-body motion and circle collisions
//!
//! Bodies are plain [`Entity`] values owned by the caller. Every operation
//! borrows a slice for the duration of the call and keeps no state between
//! calls.

pub mod collision;
pub mod entity;
pub mod integrator;
pub mod step;

pub use collision::{
    detect_collision,
    resolve_collisions,
    resolve_collisions_with,
    CollisionEvent,
    CollisionKind,
    CollisionSolver,
};
pub use entity::Entity;
pub use integrator::{apply_force, apply_torque, integrate, update_positions};
pub use step::{advance_frame, step, StepReport};
