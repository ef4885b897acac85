//! Per-tick driver
//!
//! One tick is: advance positions with the configured timestep and damping,
//! then run a full collision pass over the active set. Forces and torques for
//! the tick are applied by the caller beforehand.

use crate::core::config::PhysicsConfig;
use crate::foundation::time::FixedTimestep;

use super::collision::{CollisionEvent, CollisionSolver};
use super::entity::Entity;
use super::integrator::integrate;

/// Summary of one simulation tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Contacts resolved this tick, in resolution order
    pub collisions: Vec<CollisionEvent>,
    /// Entities that took part in the tick
    pub active_entities: usize,
    /// Total kinetic energy after the collision pass
    pub kinetic_energy: f64,
}

impl StepReport {
    /// Whether any contact was resolved
    pub fn had_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }
}

/// Run one fixed tick over `entities`
pub fn step(entities: &mut [Entity], config: &PhysicsConfig) -> StepReport {
    integrate(entities, config.timestep, config.linear_damping);
    let collisions = CollisionSolver::from_config(config).resolve(entities);

    let active = entities.iter().filter(|entity| entity.active);
    let report = StepReport {
        collisions,
        active_entities: active.clone().count(),
        kinetic_energy: active.map(Entity::kinetic_energy).sum(),
    };

    log::debug!(
        "Step: {} active, {} collisions, kinetic energy {:.3}",
        report.active_entities,
        report.collisions.len(),
        report.kinetic_energy
    );
    report
}

/// Feed a variable frame time through `timestep` and run the resulting ticks
///
/// Returns one report per tick actually run (possibly none).
pub fn advance_frame(
    entities: &mut [Entity],
    config: &PhysicsConfig,
    timestep: &mut FixedTimestep,
    frame_time: f64,
) -> Vec<StepReport> {
    let ticks = timestep.advance(frame_time);
    (0..ticks).map(|_| step(entities, config)).collect()
}
