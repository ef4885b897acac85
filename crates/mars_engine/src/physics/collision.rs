//! Circle-circle collision detection and impulse response
//!
//! The collision pass has three phases:
//!
//! 1. **Broad scan**: every unordered pair `(i, j)` with `i < j`, visited in
//!    ascending `i` then ascending `j`. No spatial acceleration structure.
//! 2. **Narrow test**: two active bodies touch when the squared center
//!    distance is at most the squared sum of their radii.
//! 3. **Resolution**: positional de-penetration along the contact normal,
//!    followed by an impulse (two movable bodies) or a reflection (one
//!    movable body against an immovable one).
//!
//! Pairs are resolved one after another against the already-updated state of
//! earlier pairs, so the visiting order is part of the result. A three-body
//! pile-up resolves identically on every run.

use serde::{Deserialize, Serialize};

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Precision, Vector2};

use super::entity::Entity;

/// Default coefficient of restitution
pub const DEFAULT_RESTITUTION: f64 = 0.8;

/// Squared center distance below which the contact normal is undefined
pub const DEGENERATE_DISTANCE_SQUARED: f64 = 1e-4;

/// Distance each body is pushed along X to split coincident centers
pub const DEGENERATE_NUDGE: f64 = 0.1;

/// How a colliding pair was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Centers (nearly) coincided; both bodies were nudged apart along X
    Degenerate,
    /// Two movable bodies exchanged an impulse
    Dynamic,
    /// A movable body bounced off an immovable one
    Static,
    /// Two movable bodies overlapped while already moving apart; only the
    /// overlap was corrected
    Separating,
    /// Neither body can move; nothing changed
    Immovable,
}

/// One resolved contact, reported in resolution order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Index of the first body (always the lower index)
    pub first: usize,
    /// Index of the second body
    pub second: usize,
    /// Unit normal pointing from `first` toward `second`
    pub normal: Vector2,
    /// Overlap depth before correction
    pub penetration: f64,
    /// Resolution branch taken
    pub kind: CollisionKind,
}

/// Stateless pairwise collision resolver
///
/// Holds only the per-pass parameters; the entity slice is borrowed for the
/// duration of each call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSolver {
    restitution: f64,
    precision: Precision,
}

impl Default for CollisionSolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESTITUTION)
    }
}

impl CollisionSolver {
    /// Create a solver with the given restitution, clamped into `[0, 1]`
    pub fn new(restitution: f64) -> Self {
        Self {
            restitution: clamp_restitution(restitution),
            precision: Precision::Exact,
        }
    }

    /// Create a solver from the physics configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.restitution).with_precision(config.precision)
    }

    /// Select the square-root mode used for contact distances
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Coefficient of restitution in use
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Indices of every touching pair, without resolving anything
    pub fn detect_pairs(&self, entities: &[Entity]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..entities.len() {
            for j in (i + 1)..entities.len() {
                if detect_collision(&entities[i], &entities[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Detect and resolve every colliding pair in `(i, j)` order
    pub fn resolve(&self, entities: &mut [Entity]) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        for i in 0..entities.len() {
            if !entities[i].active {
                continue;
            }
            for j in (i + 1)..entities.len() {
                if !detect_collision(&entities[i], &entities[j]) {
                    continue;
                }
                let (head, tail) = entities.split_at_mut(j);
                let event = self.resolve_pair(i, j, &mut head[i], &mut tail[0]);
                log::trace!(
                    "Resolved {:?} collision between {} and {} (penetration {:.4})",
                    event.kind,
                    i,
                    j,
                    event.penetration
                );
                events.push(event);
            }
        }
        events
    }

    fn resolve_pair(&self, first: usize, second: usize, a: &mut Entity, b: &mut Entity) -> CollisionEvent {
        let offset = b.position - a.position;
        let distance_squared = offset.length_squared();
        let radius_sum = a.radius + b.radius;

        if distance_squared < DEGENERATE_DISTANCE_SQUARED {
            log::debug!("Bodies {first} and {second} share a center; nudging apart");
            a.position.x -= DEGENERATE_NUDGE;
            b.position.x += DEGENERATE_NUDGE;
            return CollisionEvent {
                first,
                second,
                normal: Vector2::X,
                penetration: radius_sum - self.precision.sqrt(distance_squared),
                kind: CollisionKind::Degenerate,
            };
        }

        let inverse_distance = self.precision.inv_sqrt(distance_squared);
        let normal = offset.scale(inverse_distance);
        let penetration = radius_sum - distance_squared * inverse_distance;

        let kind = match (a.is_movable(), b.is_movable()) {
            (true, true) => self.resolve_dynamic(a, b, normal, penetration),
            (true, false) => self.resolve_against_static(a, normal, penetration),
            (false, true) => self.resolve_against_static(b, -normal, penetration),
            (false, false) => CollisionKind::Immovable,
        };

        CollisionEvent {
            first,
            second,
            normal,
            penetration,
            kind,
        }
    }

    /// Split the overlap by mass share, then exchange an impulse along `normal`
    fn resolve_dynamic(&self, a: &mut Entity, b: &mut Entity, normal: Vector2, penetration: f64) -> CollisionKind {
        let total_mass = a.mass + b.mass;
        a.position -= normal.scale(penetration * b.mass / total_mass);
        b.position += normal.scale(penetration * a.mass / total_mass);

        let normal_velocity = (b.velocity - a.velocity).dot(normal);
        if normal_velocity > 0.0 {
            return CollisionKind::Separating;
        }

        let impulse = -(1.0 + self.restitution) * normal_velocity / (a.inverse_mass() + b.inverse_mass());
        a.velocity -= normal.scale(impulse / a.mass);
        b.velocity += normal.scale(impulse / b.mass);
        CollisionKind::Dynamic
    }

    /// Push `body` out along `-toward_static` and reflect its velocity
    ///
    /// `toward_static` points from the movable body to the immovable one.
    fn resolve_against_static(&self, body: &mut Entity, toward_static: Vector2, penetration: f64) -> CollisionKind {
        body.position -= toward_static.scale(penetration);

        let normal_speed = body.velocity.dot(toward_static);
        let reflected = body.velocity - toward_static.scale(2.0 * normal_speed);
        body.velocity = reflected.scale(self.restitution);
        CollisionKind::Static
    }
}

/// Clamp a restitution coefficient into `[0, 1]`, replacing NaN with the default
pub fn clamp_restitution(restitution: f64) -> f64 {
    if restitution.is_nan() {
        log::warn!("Restitution is NaN; using {DEFAULT_RESTITUTION}");
        return DEFAULT_RESTITUTION;
    }
    let clamped = restitution.clamp(0.0, 1.0);
    if (clamped - restitution).abs() > 0.0 {
        log::warn!("Restitution {restitution} outside [0, 1]; clamped to {clamped}");
    }
    clamped
}

/// True when both bodies are active and their circles touch or overlap
pub fn detect_collision(a: &Entity, b: &Entity) -> bool {
    if !a.active || !b.active {
        return false;
    }
    let radius_sum = a.radius + b.radius;
    a.position.distance_squared(b.position) <= radius_sum * radius_sum
}

/// Resolve every colliding pair among `entities` with the given restitution
pub fn resolve_collisions(entities: &mut [Entity], restitution: f64) -> Vec<CollisionEvent> {
    CollisionSolver::new(restitution).resolve(entities)
}

/// [`resolve_collisions`] with an explicit square-root precision mode
pub fn resolve_collisions_with(
    entities: &mut [Entity],
    restitution: f64,
    precision: Precision,
) -> Vec<CollisionEvent> {
    CollisionSolver::new(restitution)
        .with_precision(precision)
        .resolve(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body(x: f64, y: f64, vx: f64, vy: f64, mass: f64, radius: f64) -> Entity {
        Entity::new(Vector2::new(x, y), radius)
            .with_velocity(Vector2::new(vx, vy))
            .with_mass(mass)
    }

    fn total_momentum(entities: &[Entity]) -> Vector2 {
        entities.iter().fold(Vector2::ZERO, |sum, entity| sum + entity.momentum())
    }

    #[test]
    fn test_elastic_head_on_exchange() {
        let mut entities = [body(0.0, 0.0, 1.0, 0.0, 1.0, 1.0), body(1.5, 0.0, -1.0, 0.0, 1.0, 1.0)];
        let events = resolve_collisions(&mut entities, 1.0);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionKind::Dynamic);
        assert_relative_eq!(events[0].penetration, 0.5);
        assert_relative_eq!(entities[0].velocity.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(entities[1].velocity.x, 1.0, epsilon = 1e-12);
        assert!(entities[0].position.distance(entities[1].position) >= 2.0);
    }

    #[test]
    fn test_non_colliding_pair_untouched() {
        let original = [body(0.0, 0.0, 0.3, -0.2, 1.0, 1.0), body(10.0, 0.0, -4.0, 1.0, 2.0, 1.0)];
        let mut entities = original.clone();
        let events = resolve_collisions(&mut entities, DEFAULT_RESTITUTION);

        assert!(events.is_empty());
        for (after, before) in entities.iter().zip(original.iter()) {
            assert_eq!(after.position.x.to_bits(), before.position.x.to_bits());
            assert_eq!(after.position.y.to_bits(), before.position.y.to_bits());
            assert_eq!(after.velocity.x.to_bits(), before.velocity.x.to_bits());
            assert_eq!(after.velocity.y.to_bits(), before.velocity.y.to_bits());
        }
    }

    #[test]
    fn test_immovable_reflection_scaled_by_restitution() {
        let restitution = 0.8;
        let mut entities = [body(0.0, 1.5, 0.0, -5.0, 1.0, 1.0), Entity::new_static(Vector2::ZERO, 1.0)];
        let events = resolve_collisions(&mut entities, restitution);

        assert_eq!(events[0].kind, CollisionKind::Static);
        assert!(entities[0].velocity.y > 0.0);
        assert_relative_eq!(entities[0].velocity.y, 5.0 * restitution, epsilon = 1e-12);
        assert_relative_eq!(entities[0].position, Vector2::new(0.0, 2.0), epsilon = 1e-12);
        assert_eq!(entities[1].position, Vector2::ZERO);
        assert_eq!(entities[1].velocity, Vector2::ZERO);
    }

    #[test]
    fn test_static_body_first_in_order() {
        let mut entities = [Entity::new_static(Vector2::ZERO, 1.0), body(0.0, 1.5, 0.0, -5.0, 1.0, 1.0)];
        resolve_collisions(&mut entities, 0.5);

        assert_relative_eq!(entities[1].velocity, Vector2::new(0.0, 2.5), epsilon = 1e-12);
        assert_relative_eq!(entities[1].position, Vector2::new(0.0, 2.0), epsilon = 1e-12);
        assert_eq!(entities[0].position, Vector2::ZERO);
    }

    #[test]
    fn test_static_body_reflects_regardless_of_direction() {
        let mut entities = [body(0.0, 1.5, 0.0, 3.0, 1.0, 1.0), Entity::new_static(Vector2::ZERO, 1.0)];
        let events = resolve_collisions(&mut entities, 0.8);

        assert_eq!(events[0].kind, CollisionKind::Static);
        assert_relative_eq!(entities[0].velocity, Vector2::new(0.0, -2.4), epsilon = 1e-12);
        assert_relative_eq!(entities[0].position.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let mut entities = [body(0.0, 0.0, 0.0, 0.0, 3.0, 1.0), body(1.0, 0.0, 0.0, 0.0, 1.0, 1.0)];
        resolve_collisions(&mut entities, 0.8);

        // Overlap of 1.0 split 1:3 in favour of the heavy body
        assert_relative_eq!(entities[0].position.x, -0.25, epsilon = 1e-12);
        assert_relative_eq!(entities[1].position.x, 1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_separating_pair_gets_no_impulse() {
        let mut entities = [body(0.0, 0.0, -1.0, 0.0, 1.0, 1.0), body(1.0, 0.0, 1.0, 0.0, 1.0, 1.0)];
        let events = resolve_collisions(&mut entities, 1.0);

        assert_eq!(events[0].kind, CollisionKind::Separating);
        assert_eq!(entities[0].velocity, Vector2::new(-1.0, 0.0));
        assert_eq!(entities[1].velocity, Vector2::new(1.0, 0.0));
        assert_relative_eq!(entities[0].position.distance(entities[1].position), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inelastic_collision_stops_along_normal() {
        let mut entities = [body(0.0, 0.0, 2.0, 1.0, 1.0, 1.0), body(1.8, 0.0, -1.0, 0.0, 2.0, 1.0)];
        let before = total_momentum(&entities);
        resolve_collisions(&mut entities, 0.0);

        let relative = (entities[1].velocity - entities[0].velocity).dot(Vector2::X);
        assert_relative_eq!(relative, 0.0, epsilon = 1e-12);
        assert_relative_eq!(entities[0].velocity.y, 1.0);
        assert_relative_eq!(total_momentum(&entities), before, epsilon = 1e-12);
    }

    #[test]
    fn test_oblique_collision_conserves_momentum() {
        let mut entities = [body(0.0, 0.0, 1.0, 0.5, 2.0, 1.0), body(1.2, 0.9, -0.5, -1.0, 0.5, 0.6)];
        let before = total_momentum(&entities);
        let events = resolve_collisions(&mut entities, 0.8);

        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].normal.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(total_momentum(&entities), before, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_overlap_nudged_apart() {
        let mut entities = [body(5.0, 5.0, 1.0, 0.0, 1.0, 1.0), body(5.005, 5.0, -1.0, 0.0, 1.0, 1.0)];
        let events = resolve_collisions(&mut entities, 0.8);

        assert_eq!(events[0].kind, CollisionKind::Degenerate);
        assert_relative_eq!(entities[0].position.x, 4.9, epsilon = 1e-12);
        assert_relative_eq!(entities[1].position.x, 5.105, epsilon = 1e-12);
        assert_eq!(entities[0].velocity, Vector2::new(1.0, 0.0));
        assert_eq!(entities[1].velocity, Vector2::new(-1.0, 0.0));
    }

    #[test]
    fn test_inactive_entities_excluded() {
        let inactive = body(0.5, 0.0, 0.0, 0.0, 1.0, 1.0).with_active(false);
        let mut entities = [body(0.0, 0.0, 1.0, 0.0, 1.0, 1.0), inactive.clone()];
        assert!(!detect_collision(&entities[0], &entities[1]));

        let events = resolve_collisions(&mut entities, 0.8);
        assert!(events.is_empty());
        assert_eq!(entities[1], inactive);
    }

    #[test]
    fn test_both_immovable_untouched() {
        let mut entities = [Entity::new_static(Vector2::ZERO, 1.0), Entity::new_static(Vector2::new(1.0, 0.0), 1.0)];
        let events = resolve_collisions(&mut entities, 0.8);
        assert_eq!(events[0].kind, CollisionKind::Immovable);
        assert_eq!(entities[0].position, Vector2::ZERO);
        assert_eq!(entities[1].position, Vector2::new(1.0, 0.0));
    }

    #[test]
    fn test_touching_circles_collide() {
        let a = body(0.0, 0.0, 0.0, 0.0, 1.0, 1.0);
        let b = body(2.0, 0.0, 0.0, 0.0, 1.0, 1.0);
        assert!(detect_collision(&a, &b));
        assert!(!detect_collision(&a, &body(2.001, 0.0, 0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_three_body_resolution_is_deterministic() {
        let scene = [
            body(0.0, 0.0, 1.0, 0.0, 1.0, 1.0),
            body(1.5, 0.0, 0.0, 0.0, 2.0, 1.0),
            body(0.7, 1.2, 0.0, -1.0, 1.5, 1.0),
        ];

        let mut first = scene.clone();
        let mut second = scene.clone();
        let first_events = resolve_collisions(&mut first, 0.8);
        let second_events = resolve_collisions(&mut second, 0.8);

        assert_eq!(first, second);
        assert_eq!(first_events, second_events);
        let order: Vec<(usize, usize)> = first_events.iter().map(|e| (e.first, e.second)).collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_detect_pairs_reports_without_mutating() {
        let scene = [
            body(0.0, 0.0, 0.0, 0.0, 1.0, 1.0),
            body(1.0, 0.0, 0.0, 0.0, 1.0, 1.0),
            body(50.0, 0.0, 0.0, 0.0, 1.0, 1.0),
            body(0.0, 1.5, 0.0, 0.0, 1.0, 1.0),
        ];
        let pairs = CollisionSolver::default().detect_pairs(&scene);
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 3)]);
    }

    #[test]
    fn test_fast_precision_matches_exact() {
        let scene = [body(0.0, 0.0, 1.0, 0.3, 1.0, 1.0), body(1.3, 0.4, -1.0, 0.0, 1.0, 1.0)];
        let mut exact = scene.clone();
        let mut fast = scene.clone();
        resolve_collisions(&mut exact, 0.8);
        resolve_collisions_with(&mut fast, 0.8, Precision::Fast);

        for (f, e) in fast.iter().zip(exact.iter()) {
            assert_relative_eq!(f.position, e.position, epsilon = 1e-4);
            assert_relative_eq!(f.velocity, e.velocity, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_restitution_clamped() {
        assert_eq!(CollisionSolver::new(1.5).restitution(), 1.0);
        assert_eq!(CollisionSolver::new(-0.5).restitution(), 0.0);
        assert_eq!(CollisionSolver::new(f64::NAN).restitution(), DEFAULT_RESTITUTION);
        assert_eq!(CollisionSolver::default().restitution(), DEFAULT_RESTITUTION);
    }
}
