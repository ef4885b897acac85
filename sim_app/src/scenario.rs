//! Asteroid field generation

use mars_engine::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

const SHIP_RADIUS: f64 = 0.6;
const SHIP_MASS: f64 = 1.0;
const STATION_RADIUS: f64 = 4.0;
const ASTEROID_RADIUS: std::ops::Range<f64> = 0.5..2.5;
const ASTEROID_SPEED: std::ops::Range<f64> = 0.5..6.0;
const PLACEMENT_ATTEMPTS: usize = 64;

/// Index of the player ship in a generated world
pub const SHIP: usize = 0;
/// Index of the space station in a generated world
pub const STATION: usize = 1;

/// Build the player ship, a static station and a seeded asteroid field
///
/// Asteroids spawn clear of the station so the first tick starts without
/// overlaps against it; overlaps among asteroids are left to the solver.
pub fn generate_world(config: &SimulationConfig) -> Vec<Entity> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let extent = config.world_half_extent;

    let mut entities: Vec<Entity> = Vec::with_capacity(config.asteroid_count + 2);
    entities.push(
        Entity::new(Vector2::new(0.0, -0.5 * extent), SHIP_RADIUS)
            .with_mass(SHIP_MASS)
            .with_rotation(std::f64::consts::FRAC_PI_2),
    );
    entities.push(Entity::new_static(Vector2::ZERO, STATION_RADIUS));

    for _ in 0..config.asteroid_count {
        let radius = rng.gen_range(ASTEROID_RADIUS);
        let Some(position) = (0..PLACEMENT_ATTEMPTS)
            .map(|_| Vector2::new(rng.gen_range(-extent..extent), rng.gen_range(-extent..extent)))
            .find(|position| position.length() >= STATION_RADIUS + radius + 1.0)
        else {
            log::warn!("World extent {extent} too small to place asteroid clear of the station");
            continue;
        };

        let velocity = Vector2::from_angle(rng.gen_range(0.0..std::f64::consts::TAU))
            .scale(rng.gen_range(ASTEROID_SPEED));
        // Mass grows with area so large rocks shove small ones around
        let mass = radius * radius;
        entities.push(
            Entity::new(position, radius)
                .with_velocity(velocity)
                .with_mass(mass)
                .with_rotation(rng.gen_range(0.0..std::f64::consts::TAU)),
        );
    }
    entities
}

/// Frame time with up to ±25% jitter around the nominal timestep
pub fn jittered_frame_time(rng: &mut StdRng, timestep: f64) -> f64 {
    timestep * rng.gen_range(0.75..1.25)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_is_seeded() {
        let config = SimulationConfig::default();
        assert_eq!(generate_world(&config), generate_world(&config));

        let other = SimulationConfig { seed: config.seed + 1, ..config.clone() };
        assert_ne!(generate_world(&config), generate_world(&other));
    }

    #[test]
    fn test_world_layout() {
        let config = SimulationConfig { asteroid_count: 10, ..Default::default() };
        let world = generate_world(&config);
        assert_eq!(world.len(), 12);
        assert!(world[SHIP].is_movable());
        assert!(!world[STATION].is_movable());

        for asteroid in &world[2..] {
            assert!(!detect_collision(asteroid, &world[STATION]));
            assert!(asteroid.position.x.abs() <= config.world_half_extent);
        }
    }
}
