//! Semi-implicit Euler integration of entity kinematics
//!
//! Forces and torques are converted straight into velocity / heading deltas
//! (no acceleration state is kept). Position then advances with the updated
//! velocity, and a per-tick damping factor models minimal ambient drag.
//!
//! Immovable bodies (`mass <= 0`) ignore forces and torques; this is the
//! documented encoding for static scenery, not an error.

use crate::foundation::math::utils::wrap_angle;
use crate::foundation::math::Vector2;

use super::entity::Entity;

/// Velocity multiplier applied once per tick
pub const DEFAULT_DAMPING: f64 = 0.999;

/// Advance every active entity by `dt` seconds with the default drag
pub fn update_positions(entities: &mut [Entity], dt: f64) {
    integrate(entities, dt, DEFAULT_DAMPING);
}

/// Advance every active entity by `dt` seconds, then scale velocity by `damping`
///
/// Inactive entities are left untouched.
pub fn integrate(entities: &mut [Entity], dt: f64, damping: f64) {
    for entity in entities.iter_mut().filter(|entity| entity.active) {
        entity.position += entity.velocity.scale(dt);
        entity.velocity = entity.velocity.scale(damping);
    }
}

/// Apply an instantaneous force: `velocity += force / mass`
pub fn apply_force(entity: &mut Entity, force: Vector2) {
    if !entity.is_movable() {
        return;
    }
    entity.velocity += force.div_scalar(entity.mass);
}

/// Apply an instantaneous torque: `rotation += torque / mass`, wrapped into `[0, 2π)`
pub fn apply_torque(entity: &mut Entity, torque: f64) {
    if !entity.is_movable() {
        return;
    }
    let rotation = entity.rotation + torque / entity.mass;
    if rotation.is_finite() {
        entity.rotation = wrap_angle(rotation);
    } else {
        log::warn!("Non-finite rotation after torque {torque}; resetting heading to 0");
        entity.rotation = 0.0;
    }
}
